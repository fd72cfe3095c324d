//! Compile Dependencies
//!
//! Cross-module references emitted by the style and view compilers, and the
//! pass that turns them into concrete imports.
//!
//! A compile result carries its statements plus a list of dependencies, each
//! naming the [`PlaceholderId`] it stands for. Resolution never touches the
//! dependencies themselves: it computes a placeholder -> reference table and
//! rebuilds the statements from it.

use crate::compile_metadata::CompileTypeMetadata;
use crate::naming::{component_factory_name, styles_module_url, template_module_url};
use crate::output::output_ast::{
    Expression, ExternalExpr, ExternalReference, PlaceholderExpr, PlaceholderId, Statement,
};
use std::collections::HashMap;

/// Reference to the view factory generated for another component.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewFactoryDependency {
    pub component: CompileTypeMetadata,
    /// Name of the referenced view factory, chosen by the view compiler.
    pub name: String,
    pub placeholder: PlaceholderId,
}

/// Reference to the component factory generated for another component.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentFactoryDependency {
    pub component: CompileTypeMetadata,
    pub placeholder: PlaceholderId,
}

/// The dependency shapes a view compiler may produce.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewDependency {
    ViewFactory(ViewFactoryDependency),
    ComponentFactory(ComponentFactoryDependency),
}

impl ViewDependency {
    pub fn placeholder(&self) -> PlaceholderId {
        match self {
            ViewDependency::ViewFactory(dep) => dep.placeholder,
            ViewDependency::ComponentFactory(dep) => dep.placeholder,
        }
    }

    /// Where the referenced symbol lives once everything is emitted.
    pub fn resolve(&self) -> ExternalReference {
        match self {
            ViewDependency::ViewFactory(dep) => ExternalReference {
                module_name: Some(template_module_url(&dep.component)),
                name: dep.name.clone(),
            },
            ViewDependency::ComponentFactory(dep) => ExternalReference {
                module_name: Some(template_module_url(&dep.component)),
                name: component_factory_name(&dep.component),
            },
        }
    }
}

/// A stylesheet imported by a compiled stylesheet.
#[derive(Debug, Clone, PartialEq)]
pub struct StylesCompileDependency {
    /// Url of the imported stylesheet, as written in the importer.
    pub module_url: String,
    pub is_shimmed: bool,
    /// Name of the styles array exported by the imported module.
    pub name: String,
    pub placeholder: PlaceholderId,
}

impl StylesCompileDependency {
    /// Resolve against the file suffix of the importing module.
    pub fn resolve(&self, containing_suffix: &str) -> ExternalReference {
        ExternalReference {
            module_name: Some(styles_module_url(
                &self.module_url,
                self.is_shimmed,
                containing_suffix,
            )),
            name: self.name.clone(),
        }
    }
}

/// Replace every placeholder found in `resolved` by an import of its reference.
///
/// Placeholders without an entry are kept as authored.
pub fn resolve_placeholders(
    statements: Vec<Statement>,
    resolved: &HashMap<PlaceholderId, ExternalReference>,
) -> Vec<Statement> {
    let mut rewrite = |expr: Expression| match expr {
        Expression::Placeholder(PlaceholderExpr { id, type_params }) => match resolved.get(&id) {
            Some(reference) => {
                log::trace!("resolved placeholder {} to {:?}", id, reference);
                Expression::External(ExternalExpr {
                    value: reference.clone(),
                    type_params,
                })
            }
            None => Expression::Placeholder(PlaceholderExpr { id, type_params }),
        },
        other => other,
    };
    statements
        .into_iter()
        .map(|stmt| stmt.transform(&mut rewrite))
        .collect()
}

/// Resolve view statements against their view and component factory dependencies.
pub fn resolve_view_statements(
    statements: Vec<Statement>,
    dependencies: &[ViewDependency],
) -> Vec<Statement> {
    let resolved: HashMap<_, _> = dependencies
        .iter()
        .map(|dep| (dep.placeholder(), dep.resolve()))
        .collect();
    resolve_placeholders(statements, &resolved)
}

/// Resolve style statements; imported stylesheets share `containing_suffix`.
pub fn resolve_style_statements(
    statements: Vec<Statement>,
    dependencies: &[StylesCompileDependency],
    containing_suffix: &str,
) -> Vec<Statement> {
    let resolved: HashMap<_, _> = dependencies
        .iter()
        .map(|dep| (dep.placeholder, dep.resolve(containing_suffix)))
        .collect();
    resolve_placeholders(statements, &resolved)
}
