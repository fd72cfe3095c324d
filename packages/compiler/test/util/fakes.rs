//! Hand-written collaborators for driving the offline compiler in tests.
//!
//! All fakes share one [`Recorder`] so tests can check what was asked of
//! them. Generated statements are small but real: every cross-module
//! reference goes through a placeholder so resolution shows in the output.

#![allow(dead_code)]

use angular_offline_compiler::collaborators::{
    DirectiveNormalizer, OutputEmitter, StyleCompiler, StylesCompileResult, TemplateParser,
    ViewCompileResult, ViewCompiler,
};
use angular_offline_compiler::dependencies::{
    ComponentFactoryDependency, StylesCompileDependency, ViewDependency, ViewFactoryDependency,
};
use angular_offline_compiler::output::output_ast::{self as o, Expression, PlaceholderId, Statement};
use angular_offline_compiler::parse_util::{ParseError, ParseLocation, ParseSourceFile, ParseSourceSpan};
use angular_offline_compiler::{
    CompileDirectiveMetadata, CompileError, CompilePipeMetadata, CompileResult, CompileTemplateMetadata,
    CompileTypeMetadata, CompilerConfig, InMemoryResourceLoader, OfflineCompiler, ResourceError,
    ResourceLoader, TypeScriptEmitter, ViewEncapsulation,
};
use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub fn component(name: &str, module_url: &str, selector: &str) -> CompileDirectiveMetadata {
    CompileDirectiveMetadata::component(
        CompileTypeMetadata::new(name, module_url),
        selector,
        CompileTemplateMetadata::inline(format!("<span>{}</span>", name)),
    )
}

pub fn directive(name: &str, module_url: &str, selector: &str) -> CompileDirectiveMetadata {
    CompileDirectiveMetadata::directive(CompileTypeMetadata::new(name, module_url), selector)
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmittedModule {
    pub module_url: String,
    pub statements: Vec<Statement>,
    pub exported_vars: Vec<String>,
}

/// What the fakes were asked, in call order.
#[derive(Default)]
pub struct Recorder {
    pub parsed: RefCell<Vec<ParsedTemplate>>,
    pub styled_components: RefCell<Vec<String>>,
    pub stylesheets: RefCell<Vec<(String, bool)>>,
    pub views: RefCell<Vec<String>>,
    pub view_configs: RefCell<Vec<CompilerConfig>>,
    pub emitted: RefCell<Vec<EmittedModule>>,
    pub fetches: Cell<usize>,
}

impl Recorder {
    pub fn emit_calls(&self) -> usize {
        self.emitted.borrow().len()
    }

    pub fn collaborator_calls(&self) -> usize {
        self.parsed.borrow().len()
            + self.styled_components.borrow().len()
            + self.stylesheets.borrow().len()
            + self.views.borrow().len()
            + self.emit_calls()
    }
}

/// Fills in `template` from `template_url` when only the url is given.
pub struct FakeNormalizer {
    loader: InMemoryResourceLoader,
}

impl FakeNormalizer {
    pub fn new(loader: InMemoryResourceLoader) -> Self {
        FakeNormalizer { loader }
    }
}

#[async_trait(?Send)]
impl DirectiveNormalizer for FakeNormalizer {
    async fn normalize_directive(
        &self,
        directive: &CompileDirectiveMetadata,
    ) -> CompileResult<CompileDirectiveMetadata> {
        let mut normalized = directive.clone();
        if let Some(template) = normalized.template.as_mut() {
            if template.template.is_empty() && !template.template_url.is_empty() {
                template.template = self.loader.get(&template.template_url).await?;
            }
        }
        Ok(normalized)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTemplate {
    pub component: String,
    pub template: String,
    /// Component directives in scope.
    pub child_components: Vec<CompileTypeMetadata>,
    pub directives: Vec<String>,
    pub pipes: Vec<String>,
}

/// Accepts any template not containing `<invalid`.
pub struct FakeTemplateParser {
    recorder: Rc<Recorder>,
}

impl TemplateParser for FakeTemplateParser {
    type Ast = ParsedTemplate;

    fn parse(
        &self,
        component: &CompileDirectiveMetadata,
        template: &str,
        directives: &[CompileDirectiveMetadata],
        pipes: &[CompilePipeMetadata],
        context_name: &str,
    ) -> CompileResult<ParsedTemplate> {
        if let Some(offset) = template.find("<invalid") {
            let file = ParseSourceFile::new(template.to_string(), context_name.to_string());
            let start = ParseLocation::new(file.clone(), offset, 0, offset);
            let end = ParseLocation::new(file, template.len(), 0, template.len());
            return Err(CompileError::TemplateParse {
                type_name: context_name.to_string(),
                errors: vec![ParseError::new(
                    ParseSourceSpan::new(start, end),
                    "Unexpected element".to_string(),
                )],
            });
        }
        let parsed = ParsedTemplate {
            component: component.type_.name.clone(),
            template: template.to_string(),
            child_components: directives
                .iter()
                .filter(|d| d.is_component)
                .map(|d| d.type_.clone())
                .collect(),
            directives: directives.iter().map(|d| d.type_.name.clone()).collect(),
            pipes: pipes.iter().map(|p| p.name.clone()).collect(),
        };
        self.recorder.parsed.borrow_mut().push(parsed.clone());
        Ok(parsed)
    }
}

/// Emits `const <stylesVar> = [...]` with one placeholder per imported stylesheet.
///
/// Standalone stylesheets are scanned for `@import '<url>';` lines.
pub struct FakeStyleCompiler {
    recorder: Rc<Recorder>,
}

impl FakeStyleCompiler {
    fn styles_result(styles_var: String, css: Vec<String>, imports: Vec<(String, bool)>) -> StylesCompileResult {
        let mut entries: Vec<Expression> = css.into_iter().map(|c| *o::literal(c)).collect();
        let mut dependencies = Vec::new();
        for (i, (url, is_shimmed)) in imports.into_iter().enumerate() {
            let placeholder = PlaceholderId(i);
            entries.push(*o::placeholder(placeholder));
            dependencies.push(StylesCompileDependency {
                module_url: url,
                is_shimmed,
                name: "styles".to_string(),
                placeholder,
            });
        }
        StylesCompileResult {
            statements: vec![o::declare_var(
                styles_var.clone(),
                o::literal_arr(entries),
                None,
                o::StmtModifier::Final,
            )],
            dependencies,
            styles_var,
        }
    }
}

impl StyleCompiler for FakeStyleCompiler {
    fn compile_component(&self, component: &CompileDirectiveMetadata) -> CompileResult<StylesCompileResult> {
        self.recorder
            .styled_components
            .borrow_mut()
            .push(component.type_.name.clone());
        let template = component.template.clone().unwrap_or_default();
        let shim = template.encapsulation == ViewEncapsulation::Emulated;
        Ok(Self::styles_result(
            format!("styles_{}", component.type_.name),
            template.styles,
            template.style_urls.into_iter().map(|url| (url, shim)).collect(),
        ))
    }

    fn compile_stylesheet(&self, stylesheet_url: &str, css_text: &str, shim: bool) -> CompileResult<StylesCompileResult> {
        self.recorder
            .stylesheets
            .borrow_mut()
            .push((stylesheet_url.to_string(), shim));
        let mut css = Vec::new();
        let mut imports = Vec::new();
        for line in css_text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            match line.strip_prefix("@import ") {
                Some(rest) => {
                    let url = rest.trim_end_matches(';').trim_matches(|c| c == '\'' || c == '"');
                    if url.is_empty() {
                        return Err(CompileError::Stylesheet {
                            url: stylesheet_url.to_string(),
                            message: "empty @import".to_string(),
                        });
                    }
                    imports.push((url.to_string(), shim));
                }
                None => css.push(line.to_string()),
            }
        }
        Ok(Self::styles_result("styles".to_string(), css, imports))
    }
}

/// Emits `function viewFactory_<Name>0() { return [styles, ...children]; }`.
///
/// Every component directive in scope is referenced by its view factory.
pub struct FakeViewCompiler {
    recorder: Rc<Recorder>,
}

impl ViewCompiler<ParsedTemplate> for FakeViewCompiler {
    fn compile_component(
        &self,
        component: &CompileDirectiveMetadata,
        template: &ParsedTemplate,
        styles: Box<Expression>,
        _pipes: &[CompilePipeMetadata],
        config: &CompilerConfig,
    ) -> CompileResult<ViewCompileResult> {
        assert_eq!(template.component, component.type_.name);
        self.recorder.view_configs.borrow_mut().push(config.clone());
        self.recorder.views.borrow_mut().push(component.type_.name.clone());

        let mut entries = vec![*styles];
        let mut dependencies = Vec::new();
        for (i, child) in template.child_components.iter().enumerate() {
            let placeholder = PlaceholderId(i);
            entries.push(*o::placeholder(placeholder).call_fn(vec![]));
            dependencies.push(ViewDependency::ViewFactory(ViewFactoryDependency {
                component: child.clone(),
                name: format!("viewFactory_{}0", child.name),
                placeholder,
            }));
        }
        if config.gen_debug_info {
            entries.push(*o::literal(template.template.as_str()));
        }

        let view_factory_var = format!("viewFactory_{}0", component.type_.name);
        Ok(ViewCompileResult {
            statements: vec![o::declare_fn(
                view_factory_var.clone(),
                vec![],
                vec![o::return_stmt(o::literal_arr(entries))],
                None,
            )],
            dependencies,
            view_factory_var,
        })
    }
}

/// References `Dialog`'s component factory, plus one placeholder it never lists.
pub struct FactoryRefViewCompiler;

impl ViewCompiler<ParsedTemplate> for FactoryRefViewCompiler {
    fn compile_component(
        &self,
        component: &CompileDirectiveMetadata,
        _template: &ParsedTemplate,
        styles: Box<Expression>,
        _pipes: &[CompilePipeMetadata],
        _config: &CompilerConfig,
    ) -> CompileResult<ViewCompileResult> {
        let view_factory_var = format!("viewFactory_{}0", component.type_.name);
        let dependency = ViewDependency::ComponentFactory(ComponentFactoryDependency {
            component: CompileTypeMetadata::new("Dialog", "lib/dialog.ts"),
            placeholder: PlaceholderId(7),
        });
        Ok(ViewCompileResult {
            statements: vec![o::declare_var(
                view_factory_var.clone(),
                o::literal_arr(vec![
                    *styles,
                    *o::placeholder(PlaceholderId(7)),
                    *o::placeholder(PlaceholderId(8)),
                ]),
                None,
                o::StmtModifier::Final,
            )],
            dependencies: vec![dependency],
            view_factory_var,
        })
    }
}

/// Records every emitted module and prints it as TypeScript.
pub struct RecordingEmitter {
    inner: TypeScriptEmitter,
    recorder: Rc<Recorder>,
}

impl OutputEmitter for RecordingEmitter {
    fn emit_statements(
        &self,
        module_url: &str,
        statements: &[Statement],
        exported_vars: &[String],
    ) -> CompileResult<String> {
        self.recorder.emitted.borrow_mut().push(EmittedModule {
            module_url: module_url.to_string(),
            statements: statements.to_vec(),
            exported_vars: exported_vars.to_vec(),
        });
        self.inner.emit_statements(module_url, statements, exported_vars)
    }
}

/// In-memory loader that counts fetches.
pub struct CountingLoader {
    inner: InMemoryResourceLoader,
    recorder: Rc<Recorder>,
}

#[async_trait(?Send)]
impl ResourceLoader for CountingLoader {
    async fn get(&self, url: &str) -> Result<String, ResourceError> {
        self.recorder.fetches.set(self.recorder.fetches.get() + 1);
        self.inner.get(url).await
    }
}

pub type TestCompiler<V = FakeViewCompiler> = OfflineCompiler<
    FakeNormalizer,
    FakeTemplateParser,
    FakeStyleCompiler,
    V,
    RecordingEmitter,
    CountingLoader,
>;

#[derive(Default)]
pub struct Fixture {
    resources: InMemoryResourceLoader,
    config: CompilerConfig,
    recorder: Rc<Recorder>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resource(mut self, url: &str, content: &str) -> Self {
        self.resources.add(url, content);
        self
    }

    pub fn config(mut self, config: CompilerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> (TestCompiler, Rc<Recorder>) {
        let view_compiler = FakeViewCompiler {
            recorder: self.recorder.clone(),
        };
        self.build_with_view_compiler(view_compiler)
    }

    pub fn build_with_view_compiler<V>(self, view_compiler: V) -> (TestCompiler<V>, Rc<Recorder>)
    where
        V: ViewCompiler<ParsedTemplate>,
    {
        let recorder = self.recorder;
        let compiler = OfflineCompiler::new(
            FakeNormalizer::new(self.resources.clone()),
            FakeTemplateParser {
                recorder: recorder.clone(),
            },
            FakeStyleCompiler {
                recorder: recorder.clone(),
            },
            view_compiler,
            RecordingEmitter {
                inner: TypeScriptEmitter::new(),
                recorder: recorder.clone(),
            },
            CountingLoader {
                inner: self.resources,
                recorder: recorder.clone(),
            },
            self.config,
        );
        (compiler, recorder)
    }
}

pub fn compiler() -> (TestCompiler, Rc<Recorder>) {
    Fixture::new().build()
}
