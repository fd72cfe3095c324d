//! Compile Metadata
//!
//! Normalized metadata describing components, directives and pipes, as handed
//! to the offline compiler after template loading.

use crate::directive_matching::CssSelector;
use crate::error::{CompileError, CompileResult};
use crate::output::output_ast::ExternalReference;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Identity of a type: its name and the module defining it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileTypeMetadata {
    pub name: String,
    pub module_url: String,
    #[serde(default)]
    pub is_host: bool,
}

impl CompileTypeMetadata {
    pub fn new(name: impl Into<String>, module_url: impl Into<String>) -> Self {
        CompileTypeMetadata {
            name: name.into(),
            module_url: module_url.into(),
            is_host: false,
        }
    }

    /// Reference to the type itself from generated code.
    pub fn to_reference(&self) -> ExternalReference {
        ExternalReference::new(self.module_url.clone(), self.name.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ViewEncapsulation {
    #[default]
    Emulated,
    Native,
    None,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompileTemplateMetadata {
    pub encapsulation: ViewEncapsulation,
    pub template: String,
    pub template_url: String,
    pub styles: Vec<String>,
    pub style_urls: Vec<String>,
    pub ng_content_selectors: Vec<String>,
}

impl CompileTemplateMetadata {
    pub fn inline(template: impl Into<String>) -> Self {
        CompileTemplateMetadata {
            template: template.into(),
            ..Default::default()
        }
    }
}

/// Metadata of a directive, or of a component when `is_component` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileDirectiveMetadata {
    #[serde(rename = "type")]
    pub type_: CompileTypeMetadata,
    pub is_component: bool,
    #[serde(default)]
    pub selector: Option<String>,
    #[serde(default)]
    pub export_as: Option<String>,
    #[serde(default)]
    pub inputs: IndexMap<String, String>,
    #[serde(default)]
    pub outputs: IndexMap<String, String>,
    #[serde(default)]
    pub host_attributes: IndexMap<String, String>,
    #[serde(default)]
    pub template: Option<CompileTemplateMetadata>,
}

impl CompileDirectiveMetadata {
    pub fn component(
        type_: CompileTypeMetadata,
        selector: impl Into<String>,
        template: CompileTemplateMetadata,
    ) -> Self {
        CompileDirectiveMetadata {
            type_,
            is_component: true,
            selector: Some(selector.into()),
            export_as: None,
            inputs: IndexMap::new(),
            outputs: IndexMap::new(),
            host_attributes: IndexMap::new(),
            template: Some(template),
        }
    }

    pub fn directive(type_: CompileTypeMetadata, selector: impl Into<String>) -> Self {
        CompileDirectiveMetadata {
            type_,
            is_component: false,
            selector: Some(selector.into()),
            export_as: None,
            inputs: IndexMap::new(),
            outputs: IndexMap::new(),
            host_attributes: IndexMap::new(),
            template: None,
        }
    }

    /// Template text, empty for directives.
    pub fn template_text(&self) -> &str {
        self.template.as_ref().map(|t| t.template.as_str()).unwrap_or("")
    }

    pub fn template_url(&self) -> &str {
        self.template
            .as_ref()
            .map(|t| t.template_url.as_str())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilePipeMetadata {
    #[serde(rename = "type")]
    pub type_: CompileTypeMetadata,
    pub name: String,
    #[serde(default = "default_pure")]
    pub pure: bool,
}

fn default_pure() -> bool {
    true
}

impl CompilePipeMetadata {
    pub fn new(type_: CompileTypeMetadata, name: impl Into<String>) -> Self {
        CompilePipeMetadata {
            type_,
            name: name.into(),
            pure: true,
        }
    }
}

/// One entry of an offline compilation batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedComponentWithViewDirectives {
    pub component: CompileDirectiveMetadata,
    #[serde(default)]
    pub directives: Vec<CompileDirectiveMetadata>,
    #[serde(default)]
    pub pipes: Vec<CompilePipeMetadata>,
}

impl NormalizedComponentWithViewDirectives {
    pub fn new(
        component: CompileDirectiveMetadata,
        directives: Vec<CompileDirectiveMetadata>,
        pipes: Vec<CompilePipeMetadata>,
    ) -> Self {
        NormalizedComponentWithViewDirectives {
            component,
            directives,
            pipes,
        }
    }
}

/// Synthesize the host component of `comp_meta`.
///
/// The host lives in the same module under `<Name>_Host` and its whole
/// template is one element matching the component's first selector.
pub fn create_host_component_meta(
    comp_meta: &CompileDirectiveMetadata,
) -> CompileResult<CompileDirectiveMetadata> {
    let invalid = |message: String| CompileError::InvalidSelector {
        type_name: comp_meta.type_.name.clone(),
        message,
    };
    let selector = comp_meta
        .selector
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| invalid("component has no selector".to_string()))?;
    let template = CssSelector::parse(selector)
        .map_err(invalid)?
        .first()
        .map(|s| s.get_matching_element_template())
        .ok_or_else(|| invalid(format!("selector '{}' matches nothing", selector)))?;

    Ok(CompileDirectiveMetadata {
        type_: CompileTypeMetadata {
            name: format!("{}_Host", comp_meta.type_.name),
            module_url: comp_meta.type_.module_url.clone(),
            is_host: true,
        },
        is_component: true,
        selector: Some("*".to_string()),
        export_as: None,
        inputs: IndexMap::new(),
        outputs: IndexMap::new(),
        host_attributes: IndexMap::new(),
        template: Some(CompileTemplateMetadata {
            encapsulation: ViewEncapsulation::None,
            template,
            ..Default::default()
        }),
    })
}
