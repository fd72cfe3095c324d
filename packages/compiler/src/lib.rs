#![deny(clippy::all)]

/**
 * Angular Offline Compiler
 *
 * Compiles normalized component metadata ahead of time into generated
 * factory modules and stylesheet modules.
 */

// Core modules
pub mod collaborators;
pub mod compile_metadata;
pub mod config;
pub mod dependencies;
pub mod directive_matching;
pub mod error;
pub mod identifiers;
pub mod naming;
pub mod offline_compiler;
pub mod parse_util;
pub mod resource_loader;

// Code generation
pub mod output;

// Re-exports
pub use compile_metadata::{
    CompileDirectiveMetadata, CompilePipeMetadata, CompileTemplateMetadata, CompileTypeMetadata,
    NormalizedComponentWithViewDirectives, ViewEncapsulation,
};
pub use config::CompilerConfig;
pub use error::{CompileError, CompileResult};
pub use offline_compiler::{OfflineCompiler, SourceModule, StyleSheetSourceWithImports};
pub use output::ts_emitter::TypeScriptEmitter;
pub use resource_loader::{FileResourceLoader, InMemoryResourceLoader, ResourceError, ResourceLoader};
