//! External resources (fonts) a scene needs before its text can be built.

use std::sync::Arc;

use creator_animation_core::{AnimatedEntity, ResolvedEntity};
use hashbrown::{HashMap, HashSet};
use log::{debug, warn};

use crate::error::DependencyError;

/// Anything that may reference a font family.
pub trait FontSource {
    fn font_name(&self) -> Option<&str>;
}

impl FontSource for AnimatedEntity {
    fn font_name(&self) -> Option<&str> {
        AnimatedEntity::font_name(self)
    }
}

impl FontSource for ResolvedEntity {
    fn font_name(&self) -> Option<&str> {
        ResolvedEntity::font_name(self)
    }
}

/// Font families referenced by `entities`, in first-use order, without duplicates.
pub fn required_fonts<T: FontSource>(entities: &[T]) -> Vec<String> {
    let mut seen = HashSet::new();
    entities
        .iter()
        .filter_map(FontSource::font_name)
        .filter(|name| seen.insert(*name))
        .map(str::to_string)
        .collect()
}

/// Source of raw font bytes (system font lookup, bundled assets, network).
pub trait FontLoader {
    fn load_font(&mut self, name: &str) -> Result<Vec<u8>, DependencyError>;
}

/// Loaded resources, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct Dependencies {
    fonts: HashMap<String, Arc<[u8]>>,
}

impl Dependencies {
    pub fn font(&self, name: &str) -> Option<&[u8]> {
        self.fonts.get(name).map(|bytes| &bytes[..])
    }

    pub fn has_font(&self, name: &str) -> bool {
        self.fonts.contains_key(name)
    }

    pub fn font_count(&self) -> usize {
        self.fonts.len()
    }

    pub fn insert_font(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.fonts.insert(name.into(), Arc::from(bytes));
    }
}

/// Outcome of one [`DependencyService::prepare`] call.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PrepareReport {
    pub loaded: Vec<String>,
    pub failed: Vec<(String, DependencyError)>,
}

#[derive(Debug, Default)]
pub struct DependencyService {
    dependencies: Dependencies,
}

impl DependencyService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dependencies(&self) -> &Dependencies {
        &self.dependencies
    }

    /// Load every font in `names` that is not loaded yet. Failures are logged
    /// and reported; the font stays missing and is retried on the next call.
    pub fn prepare<L>(&mut self, names: &[String], loader: &mut L) -> PrepareReport
    where
        L: FontLoader + ?Sized,
    {
        let mut report = PrepareReport::default();
        let missing: Vec<&String> = names
            .iter()
            .filter(|n| !self.dependencies.has_font(n))
            .collect();
        for name in missing {
            match loader.load_font(name) {
                Ok(bytes) => {
                    debug!("dependencies: loaded font '{name}' ({} bytes)", bytes.len());
                    self.dependencies.insert_font(name.clone(), bytes);
                    report.loaded.push(name.clone());
                }
                Err(err) => {
                    warn!("dependencies: {err}");
                    report.failed.push((name.clone(), err));
                }
            }
        }
        report
    }

    pub fn prepare_for<T, L>(&mut self, entities: &[T], loader: &mut L) -> PrepareReport
    where
        T: FontSource,
        L: FontLoader + ?Sized,
    {
        let names = required_fonts(entities);
        self.prepare(&names, loader)
    }
}
