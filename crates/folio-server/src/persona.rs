//! Assistant persona
//!
//! The persona document (the site owner's resume) is loaded once at startup
//! and read-only thereafter; every relayed conversation gets one system
//! entry built from it, with the optional uploaded-file context appended.

use std::fs;
use std::path::Path;

const DEFAULT_RESUME: &str = include_str!("../assets/resume.md");

#[derive(Debug, Clone)]
pub struct Persona {
    resume: String,
}

impl Persona {
    /// Persona backed by the resume bundled into the binary.
    pub fn bundled() -> Self {
        Self {
            resume: DEFAULT_RESUME.to_string(),
        }
    }

    /// Load the resume from `path` when given, falling back to the bundled
    /// document.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => {
                let resume = fs::read_to_string(path).map_err(|err| {
                    anyhow::anyhow!("Failed to read resume {}: {}", path.display(), err)
                })?;
                Ok(Self { resume })
            }
            None => Ok(Self::bundled()),
        }
    }

    /// Build the system entry prepended to every outbound conversation.
    pub fn system_prompt(&self, context: Option<&str>) -> String {
        let context_block = match context {
            Some(context) => format!("\n\nAdditional context (from uploaded file):\n\n{context}\n"),
            None => String::new(),
        };

        format!(
            "You are Kernel, the assistant on Jordan Clemens' portfolio site. \
You are knowledgeable, professional, and enthusiastic about Jordan's work.\n\n\
Here is Jordan's resume:\n\n{resume}{context_block}\n\
Answer questions about Jordan's experience, skills, and projects. Give \
specific examples from the resume when relevant, be honest when you don't \
know something, and keep responses concise but informative.",
            resume = self.resume,
        )
    }
}
