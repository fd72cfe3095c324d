//! Naming Rules
//!
//! Where generated artifacts live and what their exported symbols are called.
//! Everything here is a pure function of metadata.

use crate::compile_metadata::CompileTypeMetadata;

/// Infix inserted before the suffix of a component's module to name its factory module.
pub const FACTORY_MODULE_INFIX: &str = ".ngfactory";

/// Infix marking the module of a shimmed (scoped) stylesheet.
pub const SHIM_MODULE_INFIX: &str = ".shim";

/// Suffix of the exported component factory symbol.
pub const COMPONENT_FACTORY_SUFFIX: &str = "NgFactory";

/// Split `path` at its last `.` into `(base, suffix)`.
///
/// The suffix keeps the dot. Without a dot the suffix is empty.
pub fn split_last_suffix(path: &str) -> (&str, &str) {
    match path.rfind('.') {
        Some(last_dot) => path.split_at(last_dot),
        None => (path, ""),
    }
}

/// `a/b.ts` -> `a/b.ngfactory.ts`
pub fn factory_module_url(module_url: &str) -> String {
    let (base, suffix) = split_last_suffix(module_url);
    format!("{}{}{}", base, FACTORY_MODULE_INFIX, suffix)
}

/// Factory module of the given component type.
pub fn template_module_url(type_: &CompileTypeMetadata) -> String {
    factory_module_url(&type_.module_url)
}

/// `MyComp` -> `MyCompNgFactory`
pub fn component_factory_name(type_: &CompileTypeMetadata) -> String {
    format!("{}{}", type_.name, COMPONENT_FACTORY_SUFFIX)
}

/// Module of a compiled stylesheet: `x.css.shim.ts` when shimmed, `x.css.ts` otherwise.
pub fn styles_module_url(stylesheet_url: &str, shim: bool, suffix: &str) -> String {
    if shim {
        format!("{}{}{}", stylesheet_url, SHIM_MODULE_INFIX, suffix)
    } else {
        format!("{}{}", stylesheet_url, suffix)
    }
}
