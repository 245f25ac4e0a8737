//! Entity-keyed build-artifact cache.
//!
//! Protocol per entity id, driven by the entity's `cache.valid` flag:
//! - invalid: release any stored artifact, build a fresh one and hand it to the
//!   caller unstored ([`Lookup::Fresh`]). The caller stores it with
//!   [`ArtifactCache::commit`] and marks the entity valid if its build inputs
//!   have not changed since.
//! - valid: reuse the stored artifact ([`Lookup::Cached`]), or build and store
//!   one when none exists yet ([`Lookup::Stored`]).
//!
//! Every artifact that leaves the cache is released exactly once. Build errors
//! propagate; release errors are logged.

use hashbrown::hash_map::EntryRef;
use hashbrown::HashMap;
use log::{debug, warn};

use crate::error::ReleaseError;

/// A derived resource owned by the cache (shaped text, glyph buffers, ...).
pub trait Artifact {
    /// Free any manually-owned resources. Called exactly once per artifact.
    fn release(self) -> Result<(), ReleaseError>;
}

/// Result of [`ArtifactCache::obtain`].
#[derive(Debug)]
pub enum Lookup<'a, C> {
    /// Stored artifact reused as-is.
    Cached(&'a C),
    /// No artifact existed for a valid entity; built and stored.
    Stored(&'a C),
    /// Rebuilt for an invalid entity; not stored yet.
    Fresh(C),
}

impl<C> Lookup<'_, C> {
    pub fn is_fresh(&self) -> bool {
        matches!(self, Lookup::Fresh(_))
    }

    pub fn artifact(&self) -> &C {
        match self {
            Lookup::Cached(a) | Lookup::Stored(a) => a,
            Lookup::Fresh(a) => a,
        }
    }
}

#[derive(Debug)]
pub struct ArtifactCache<C: Artifact> {
    entries: HashMap<String, C>,
}

impl<C: Artifact> Default for ArtifactCache<C> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

fn release_logged<C: Artifact>(id: &str, artifact: C) {
    if let Err(err) = artifact.release() {
        warn!("artifact cache: releasing '{id}' failed: {err}");
    }
}

impl<C: Artifact> ArtifactCache<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&C> {
        self.entries.get(id)
    }

    /// Reuse, build-and-store, or rebuild the artifact of `id`.
    pub fn obtain<E, F>(&mut self, id: &str, valid: bool, build: F) -> Result<Lookup<'_, C>, E>
    where
        F: FnOnce() -> Result<C, E>,
    {
        if !valid {
            if let Some(stale) = self.entries.remove(id) {
                debug!("artifact cache: '{id}' invalidated; releasing stale artifact");
                release_logged(id, stale);
            }
            return build().map(Lookup::Fresh);
        }

        match self.entries.entry_ref(id) {
            EntryRef::Occupied(entry) => Ok(Lookup::Cached(entry.into_mut())),
            EntryRef::Vacant(entry) => {
                let artifact = build()?;
                Ok(Lookup::Stored(entry.insert(artifact)))
            }
        }
    }

    /// Store `artifact` under `id`, releasing whatever was stored before.
    pub fn commit(&mut self, id: &str, artifact: C) -> &C {
        if let Some(previous) = self.entries.remove(id) {
            release_logged(id, previous);
        }
        self.entries.entry_ref(id).or_insert(artifact)
    }

    /// Release and drop the artifact of `id`, if any.
    pub fn evict(&mut self, id: &str) -> bool {
        match self.entries.remove(id) {
            Some(artifact) => {
                release_logged(id, artifact);
                true
            }
            None => false,
        }
    }

    /// Keep only artifacts whose id satisfies `keep`; release the rest.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str) -> bool,
    {
        let stale: Vec<String> = self
            .entries
            .keys()
            .filter(|id| !keep(id.as_str()))
            .cloned()
            .collect();
        for id in stale {
            self.evict(&id);
        }
    }

    pub fn clear(&mut self) {
        for (id, artifact) in self.entries.drain() {
            release_logged(&id, artifact);
        }
    }
}

impl<C: Artifact> Drop for ArtifactCache<C> {
    fn drop(&mut self) {
        self.clear();
    }
}
