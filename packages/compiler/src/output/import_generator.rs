//! Import Generator
//!
//! Computes the module specifier one generated module uses to import another.

/// Turns an imported module url into a specifier usable from `module_url_from`.
pub trait ImportGenerator {
    fn get_import_path(&self, module_url_from: &str, imported_url: &str) -> String;
}

/// Relative specifiers for project modules, package names passed through.
///
/// A url is a package when it starts with `@`, or when it has neither a
/// directory nor a file suffix (`rxjs`). The `.ts` suffix is dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelativeImportGenerator;

impl RelativeImportGenerator {
    fn is_package(url: &str) -> bool {
        url.starts_with('@') || !(url.contains('/') || url.contains('.'))
    }
}

impl ImportGenerator for RelativeImportGenerator {
    fn get_import_path(&self, module_url_from: &str, imported_url: &str) -> String {
        if Self::is_package(imported_url) {
            return imported_url.to_string();
        }
        let imported = imported_url.strip_suffix(".ts").unwrap_or(imported_url);

        let from_segments: Vec<&str> = module_url_from.split('/').collect();
        let from_dir = &from_segments[..from_segments.len() - 1];
        let to_segments: Vec<&str> = imported.split('/').collect();

        let common = from_dir
            .iter()
            .zip(&to_segments)
            .take_while(|(a, b)| a == b)
            .count()
            .min(to_segments.len() - 1);

        let ups = from_dir.len() - common;
        let prefix = if ups == 0 {
            "./".to_string()
        } else {
            "../".repeat(ups)
        };
        format!("{}{}", prefix, to_segments[common..].join("/"))
    }
}
