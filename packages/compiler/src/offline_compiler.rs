//! Offline Compiler
//!
//! Drives the collaborators for a batch of components and assembles the
//! generated statements into source modules.
//!
//! Per component, the generated module holds:
//! - the component's view factory,
//! - the view factory of its synthesized host component,
//! - `<Type>NgFactory`, a `ComponentFactory` tying selector, host view
//!   factory and component type together.
//!
//! Cross-module references are resolved with the rules in [`crate::naming`]
//! before statements enter the module buffer.

use crate::collaborators::{
    DirectiveNormalizer, OutputEmitter, StyleCompiler, TemplateParser, ViewCompiler,
};
use crate::compile_metadata::{
    create_host_component_meta, CompileDirectiveMetadata, CompilePipeMetadata,
    NormalizedComponentWithViewDirectives,
};
use crate::config::CompilerConfig;
use crate::dependencies::{resolve_style_statements, resolve_view_statements};
use crate::error::{CompileError, CompileResult};
use crate::identifiers::Identifiers;
use crate::naming::{component_factory_name, split_last_suffix, styles_module_url, template_module_url};
use crate::output::output_ast::{self as o, Statement, StmtModifier, TypeModifier};
use crate::resource_loader::ResourceLoader;

/// One generated module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceModule {
    module_url: String,
    source: String,
}

impl SourceModule {
    pub fn new(module_url: String, source: String) -> Self {
        SourceModule { module_url, source }
    }

    pub fn module_url(&self) -> &str {
        &self.module_url
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

/// A compiled stylesheet and the stylesheet urls it imports.
///
/// The imports are not compiled; callers recurse on `imported_urls` themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSheetSourceWithImports {
    pub source: SourceModule,
    pub imported_urls: Vec<String>,
}

pub struct OfflineCompiler<N, P, S, V, E, R> {
    directive_normalizer: N,
    template_parser: P,
    style_compiler: S,
    view_compiler: V,
    output_emitter: E,
    resource_loader: R,
    config: CompilerConfig,
}

impl<N, P, S, V, E, R> OfflineCompiler<N, P, S, V, E, R>
where
    N: DirectiveNormalizer,
    P: TemplateParser,
    S: StyleCompiler,
    V: ViewCompiler<P::Ast>,
    E: OutputEmitter,
    R: ResourceLoader,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        directive_normalizer: N,
        template_parser: P,
        style_compiler: S,
        view_compiler: V,
        output_emitter: E,
        resource_loader: R,
        config: CompilerConfig,
    ) -> Self {
        OfflineCompiler {
            directive_normalizer,
            template_parser,
            style_compiler,
            view_compiler,
            output_emitter,
            resource_loader,
            config,
        }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    pub async fn normalize_directive_metadata(
        &self,
        directive: &CompileDirectiveMetadata,
    ) -> CompileResult<CompileDirectiveMetadata> {
        self.directive_normalizer.normalize_directive(directive).await
    }

    /// Compile every component of the batch into a single factory module.
    ///
    /// The module is named after the first component's module. The batch
    /// fails as a whole: no module is produced if any entry fails.
    pub fn compile_templates(
        &self,
        components: &[NormalizedComponentWithViewDirectives],
    ) -> CompileResult<SourceModule> {
        let first = components.first().ok_or(CompileError::NoComponents)?;
        for entry in components {
            assert_component(&entry.component)?;
        }

        let module_url = template_module_url(&first.component.type_);
        log::debug!(
            "compiling {} component(s) into {}",
            components.len(),
            module_url
        );

        let mut statements = Vec::new();
        let mut exported_vars = Vec::with_capacity(components.len() * 3);
        for entry in components {
            let comp_meta = &entry.component;
            let comp_view_factory_var =
                self.compile_component(comp_meta, &entry.directives, &entry.pipes, &mut statements)?;
            exported_vars.push(comp_view_factory_var);

            let host_meta = create_host_component_meta(comp_meta)?;
            let host_view_factory_var = self.compile_component(
                &host_meta,
                std::slice::from_ref(comp_meta),
                &[],
                &mut statements,
            )?;

            let comp_factory_var = component_factory_name(&comp_meta.type_);
            statements.push(component_factory_stmt(
                comp_meta,
                &comp_factory_var,
                &host_view_factory_var,
            ));
            exported_vars.push(host_view_factory_var);
            exported_vars.push(comp_factory_var);
        }

        self.codegen_source_module(module_url, &statements, &exported_vars)
    }

    /// Fetch and compile one stylesheet.
    ///
    /// Imports inside the stylesheet resolve to modules with the same
    /// `suffix`; their raw urls are returned in import order.
    pub async fn load_and_compile_stylesheet(
        &self,
        stylesheet_url: &str,
        shim: bool,
        suffix: &str,
    ) -> CompileResult<StyleSheetSourceWithImports> {
        let css_text = self.resource_loader.get(stylesheet_url).await?;
        log::debug!("compiling stylesheet {} (shim: {})", stylesheet_url, shim);

        let compile_result = self
            .style_compiler
            .compile_stylesheet(stylesheet_url, &css_text, shim)?;
        let imported_urls = compile_result
            .dependencies
            .iter()
            .map(|dep| dep.module_url.clone())
            .collect();
        let statements = resolve_style_statements(
            compile_result.statements,
            &compile_result.dependencies,
            suffix,
        );

        let source = self.codegen_source_module(
            styles_module_url(stylesheet_url, shim, suffix),
            &statements,
            &[compile_result.styles_var],
        )?;
        Ok(StyleSheetSourceWithImports {
            source,
            imported_urls,
        })
    }

    /// Compile styles and view of one component into `target_statements`.
    ///
    /// Returns the name of the generated view factory.
    fn compile_component(
        &self,
        comp_meta: &CompileDirectiveMetadata,
        directives: &[CompileDirectiveMetadata],
        pipes: &[CompilePipeMetadata],
        target_statements: &mut Vec<Statement>,
    ) -> CompileResult<String> {
        log::debug!("compiling view of {}", comp_meta.type_.name);
        let styles_result = self.style_compiler.compile_component(comp_meta)?;
        let parsed_template = self.template_parser.parse(
            comp_meta,
            comp_meta.template_text(),
            directives,
            pipes,
            &comp_meta.type_.name,
        )?;
        let view_result = self.view_compiler.compile_component(
            comp_meta,
            &parsed_template,
            o::variable(styles_result.styles_var.as_str()),
            pipes,
            &self.config,
        )?;

        let (_, file_suffix) = split_last_suffix(&comp_meta.type_.module_url);
        target_statements.extend(resolve_style_statements(
            styles_result.statements,
            &styles_result.dependencies,
            file_suffix,
        ));
        target_statements.extend(resolve_view_statements(
            view_result.statements,
            &view_result.dependencies,
        ));
        Ok(view_result.view_factory_var)
    }

    fn codegen_source_module(
        &self,
        module_url: String,
        statements: &[Statement],
        exported_vars: &[String],
    ) -> CompileResult<SourceModule> {
        let source = self
            .output_emitter
            .emit_statements(&module_url, statements, exported_vars)?;
        Ok(SourceModule::new(module_url, source))
    }
}

fn assert_component(meta: &CompileDirectiveMetadata) -> CompileResult<()> {
    if meta.is_component {
        Ok(())
    } else {
        Err(CompileError::NotAComponent {
            type_name: meta.type_.name.clone(),
        })
    }
}

/// `const <Type>NgFactory = new ComponentFactory<Type>(selector, hostViewFactory, Type)`
fn component_factory_stmt(
    comp_meta: &CompileDirectiveMetadata,
    comp_factory_var: &str,
    host_view_factory_var: &str,
) -> Statement {
    let comp_type = || o::import_type(comp_meta.type_.to_reference(), None, TypeModifier::None);
    let factory_type = o::import_type(
        Identifiers::component_factory(),
        Some(vec![comp_type()]),
        TypeModifier::Const,
    );
    let selector = comp_meta.selector.clone().unwrap_or_default();

    let value = o::import_expr(Identifiers::component_factory(), Some(vec![comp_type()])).instantiate(
        vec![
            *o::literal(selector),
            *o::variable(host_view_factory_var),
            *o::import_expr(comp_meta.type_.to_reference(), None),
        ],
        Some(factory_type.clone()),
    );
    o::declare_var(comp_factory_var, value, Some(factory_type), StmtModifier::Final)
}
