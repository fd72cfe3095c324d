//! Compile Errors
//!
//! Error type shared by the offline compiler and its collaborators.
//! Collaborator failures travel through the orchestrator unchanged.

use crate::parse_util::ParseError;
use crate::resource_loader::ResourceError;
use thiserror::Error;

pub type CompileResult<T> = Result<T, CompileError>;

#[derive(Debug, Error)]
pub enum CompileError {
    /// `compile_templates` was called with an empty batch.
    #[error("No components given")]
    NoComponents,

    #[error("Could not compile '{type_name}' because it is not a component.")]
    NotAComponent { type_name: String },

    #[error("Could not synthesize a host for '{type_name}': {message}")]
    InvalidSelector { type_name: String, message: String },

    #[error("Template parse errors in '{type_name}':\n{}", format_parse_errors(.errors))]
    TemplateParse {
        type_name: String,
        errors: Vec<ParseError>,
    },

    #[error("Could not compile stylesheet '{url}': {message}")]
    Stylesheet { url: String, message: String },

    #[error(transparent)]
    Resource(#[from] ResourceError),

    #[error("Could not emit '{module_url}': {message}")]
    Emit { module_url: String, message: String },

    #[error("Invalid compiler configuration: {0}")]
    Config(#[from] serde_json::Error),
}

fn format_parse_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
