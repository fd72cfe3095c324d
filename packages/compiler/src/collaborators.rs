//! Collaborators
//!
//! The passes the offline compiler drives but does not implement: directive
//! normalization, template parsing, style and view compilation, and printing.

use crate::compile_metadata::{CompileDirectiveMetadata, CompilePipeMetadata};
use crate::config::CompilerConfig;
use crate::dependencies::{StylesCompileDependency, ViewDependency};
use crate::error::CompileResult;
use crate::output::output_ast::{Expression, Statement};
use async_trait::async_trait;

/// Output of a style compiler: statements building one styles array.
#[derive(Debug, Clone, PartialEq)]
pub struct StylesCompileResult {
    pub statements: Vec<Statement>,
    /// Imported stylesheets, in import order.
    pub dependencies: Vec<StylesCompileDependency>,
    /// Variable holding the styles array.
    pub styles_var: String,
}

/// Output of a view compiler: statements defining one view factory.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewCompileResult {
    pub statements: Vec<Statement>,
    pub dependencies: Vec<ViewDependency>,
    pub view_factory_var: String,
}

/// Loads template and style resources referenced by raw metadata.
#[async_trait(?Send)]
pub trait DirectiveNormalizer {
    async fn normalize_directive(
        &self,
        directive: &CompileDirectiveMetadata,
    ) -> CompileResult<CompileDirectiveMetadata>;
}

/// Parses a component template against the directives and pipes in scope.
pub trait TemplateParser {
    type Ast;

    fn parse(
        &self,
        component: &CompileDirectiveMetadata,
        template: &str,
        directives: &[CompileDirectiveMetadata],
        pipes: &[CompilePipeMetadata],
        context_name: &str,
    ) -> CompileResult<Self::Ast>;
}

pub trait StyleCompiler {
    /// Styles declared on a component, inline and by url.
    fn compile_component(&self, component: &CompileDirectiveMetadata) -> CompileResult<StylesCompileResult>;

    /// One standalone stylesheet.
    fn compile_stylesheet(&self, stylesheet_url: &str, css_text: &str, shim: bool) -> CompileResult<StylesCompileResult>;
}

/// Compiles a parsed template into a view factory.
pub trait ViewCompiler<Ast> {
    fn compile_component(
        &self,
        component: &CompileDirectiveMetadata,
        template: &Ast,
        styles: Box<Expression>,
        pipes: &[CompilePipeMetadata],
        config: &CompilerConfig,
    ) -> CompileResult<ViewCompileResult>;
}

/// Prints the statements of one module.
pub trait OutputEmitter {
    fn emit_statements(
        &self,
        module_url: &str,
        statements: &[Statement],
        exported_vars: &[String],
    ) -> CompileResult<String>;
}
