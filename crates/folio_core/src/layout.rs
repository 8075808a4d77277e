//! Layout name to template handle resolution.
//!
//! The registry is owned by the rendering side and handed in explicitly;
//! handles are opaque here (a template path, a compiled template, ...).

use crate::error::ErrorKind;
use rustc_hash::FxHashMap;

/// Registered layouts, keyed by exact, case-sensitive name.
#[derive(Debug, Clone)]
pub struct LayoutRegistry<H> {
    layouts: FxHashMap<String, H>,
}

impl<H> Default for LayoutRegistry<H> {
    fn default() -> Self {
        Self {
            layouts: FxHashMap::default(),
        }
    }
}

impl<H> LayoutRegistry<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handle` under `name`, returning the handle it replaced.
    pub fn register(&mut self, name: impl Into<String>, handle: H) -> Option<H> {
        self.layouts.insert(name.into(), handle)
    }

    /// Look up the handle for `name`.
    ///
    /// No normalization or fallback: `Post` and `post` are different layouts.
    pub fn resolve(&self, name: &str) -> Result<&H, ErrorKind> {
        self.layouts
            .get(name)
            .ok_or_else(|| ErrorKind::UnknownLayout(name.to_owned()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.layouts.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.layouts.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }
}

impl<H, K: Into<String>> FromIterator<(K, H)> for LayoutRegistry<H> {
    fn from_iter<I: IntoIterator<Item = (K, H)>>(iter: I) -> Self {
        let mut registry = Self::new();
        for (name, handle) in iter {
            registry.register(name, handle);
        }
        registry
    }
}
