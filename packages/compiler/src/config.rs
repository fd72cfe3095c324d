//! Compiler Configuration

use crate::error::CompileResult;
use serde::{Deserialize, Serialize};

/// Options the offline compiler hands to its view compiler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompilerConfig {
    /// Generate debug information in view factories
    pub gen_debug_info: bool,
    /// Log every binding update in generated change detection
    pub log_binding_update: bool,
}

impl CompilerConfig {
    pub fn new(gen_debug_info: bool, log_binding_update: bool) -> Self {
        CompilerConfig {
            gen_debug_info,
            log_binding_update,
        }
    }

    /// Read a configuration from JSON. Missing keys keep their defaults.
    pub fn from_json(json: &str) -> CompileResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
