//! Runtime Identifiers
//!
//! Runtime symbols referenced by the code the offline compiler writes itself.

use crate::output::output_ast::ExternalReference;

const COMPONENT_FACTORY_MODULE: &str = "@angular/core/src/linker/component_factory";

pub struct Identifiers;

impl Identifiers {
    /// `ComponentFactory`, instantiated once per compiled component.
    pub fn component_factory() -> ExternalReference {
        ExternalReference::new(COMPONENT_FACTORY_MODULE, "ComponentFactory")
    }
}
