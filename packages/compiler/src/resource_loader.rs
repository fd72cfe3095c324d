//! Resource Loader
//!
//! Fetches stylesheet text for the offline compiler. This is the single
//! suspension point of the stylesheet pipeline.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

/// Resource load error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ResourceError {
    pub url: String,
    pub message: String,
}

impl ResourceError {
    pub fn not_found(url: &str) -> Self {
        Self {
            url: url.to_string(),
            message: format!("Resource not found: {}", url),
        }
    }

    pub fn load_failed(url: &str, reason: &str) -> Self {
        Self {
            url: url.to_string(),
            message: format!("Failed to load {}: {}", url, reason),
        }
    }
}

/// Resource loader trait.
#[async_trait(?Send)]
pub trait ResourceLoader {
    async fn get(&self, url: &str) -> Result<String, ResourceError>;
}

/// In-memory resource loader.
#[derive(Debug, Clone, Default)]
pub struct InMemoryResourceLoader {
    resources: HashMap<String, String>,
}

impl InMemoryResourceLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, url: &str, content: &str) {
        self.resources.insert(url.to_string(), content.to_string());
    }

    pub fn with(mut self, url: &str, content: &str) -> Self {
        self.add(url, content);
        self
    }
}

#[async_trait(?Send)]
impl ResourceLoader for InMemoryResourceLoader {
    async fn get(&self, url: &str) -> Result<String, ResourceError> {
        self.resources
            .get(url)
            .cloned()
            .ok_or_else(|| ResourceError::not_found(url))
    }
}

/// File-based resource loader. Urls are resolved against `root_dir`.
#[derive(Debug, Clone)]
pub struct FileResourceLoader {
    root_dir: PathBuf,
}

impl FileResourceLoader {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    fn resolve(&self, url: &str) -> PathBuf {
        self.root_dir.join(url.trim_start_matches('/'))
    }
}

#[async_trait(?Send)]
impl ResourceLoader for FileResourceLoader {
    async fn get(&self, url: &str) -> Result<String, ResourceError> {
        let path = self.resolve(url);
        if !path.is_file() {
            return Err(ResourceError::not_found(url));
        }
        std::fs::read_to_string(&path).map_err(|e| ResourceError::load_failed(url, &e.to_string()))
    }
}
