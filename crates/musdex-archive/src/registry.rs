//! Registry selecting an archive handler by name

use std::collections::BTreeMap;

use crate::{ArchiveHandler, Error, Result, ZipHandler};

/// Handler used for config entries that name none.
pub const DEFAULT_HANDLER: &str = "zip";

/// Registry of archive handlers keyed by [`ArchiveHandler::name`].
pub struct HandlerRegistry {
    handlers: BTreeMap<&'static str, Box<dyn ArchiveHandler>>,
}

impl HandlerRegistry {
    /// Create an empty registry.
    pub fn empty() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }

    /// Create a registry with all built-in handlers.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(ZipHandler::new()));
        registry
    }

    /// Add a handler, replacing any registered under the same name.
    pub fn register(&mut self, handler: Box<dyn ArchiveHandler>) {
        self.handlers.insert(handler.name(), handler);
    }

    /// Look up a handler; `None` selects [`DEFAULT_HANDLER`].
    pub fn get(&self, name: Option<&str>) -> Result<&dyn ArchiveHandler> {
        let name = name.unwrap_or(DEFAULT_HANDLER);
        self.handlers
            .get(name)
            .map(|h| h.as_ref())
            .ok_or_else(|| Error::UnknownHandler {
                name: name.to_string(),
                available: self.names().join(", "),
            })
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.handlers.keys().copied().collect()
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
