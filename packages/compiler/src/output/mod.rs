//! Output Module
//!
//! Statement tree and the emitters that print it.

pub mod abstract_emitter;
pub mod import_generator;
pub mod output_ast;
pub mod ts_emitter;
