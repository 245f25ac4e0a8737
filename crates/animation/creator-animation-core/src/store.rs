//! Editing-state store: the single owner of the scene, the current frame and
//! the playing flag.
//!
//! Every mutation is copy-on-write on an `Arc` snapshot: readers holding an
//! older snapshot (a frame being resolved, a draw in progress) never observe
//! a change. Subscribers receive [`StoreEvent`]s over a channel; no-op
//! mutations emit nothing.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

use log::debug;

use crate::config::Config;
use crate::entity::{validate_entities, AnimatedEntity, BuildKey};
use crate::error::CoreError;
use crate::ids::new_entity_id;
use crate::timeline::{RenderState, Timeline};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    EntitiesChanged,
    FrameChanged(i32),
    PlayingChanged(bool),
}

#[derive(Debug)]
pub struct SceneStore {
    config: Config,
    entities: Arc<Vec<AnimatedEntity>>,
    render_state: RenderState,
    playing: bool,
    subscribers: Vec<Sender<StoreEvent>>,
}

impl SceneStore {
    pub fn new(config: Config) -> Result<Self, CoreError> {
        Self::with_entities(config, Vec::new())
    }

    pub fn with_entities(config: Config, entities: Vec<AnimatedEntity>) -> Result<Self, CoreError> {
        config.validate()?;
        validate_entities(&entities)?;
        Ok(Self {
            config,
            entities: Arc::new(entities),
            render_state: RenderState::default(),
            playing: false,
            subscribers: Vec::new(),
        })
    }

    /// Load a store from a wire timeline (entities, frame and config).
    pub fn from_timeline(timeline: Timeline) -> Result<Self, CoreError> {
        timeline.validate()?;
        let config = timeline.config();
        let mut store = Self::with_entities(config, timeline.entities)?;
        store.render_state = timeline.render_state;
        Ok(store)
    }

    pub fn config(&self) -> Config {
        self.config
    }

    /// Immutable snapshot of the ordered scene.
    pub fn entities(&self) -> Arc<Vec<AnimatedEntity>> {
        Arc::clone(&self.entities)
    }

    pub fn entity(&self, id: &str) -> Option<&AnimatedEntity> {
        self.entities.iter().find(|e| e.id() == id)
    }

    pub fn render_state(&self) -> RenderState {
        self.render_state
    }

    pub fn curr_frame(&self) -> i32 {
        self.render_state.curr_frame
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Snapshot in wire shape for the resolve boundary.
    pub fn timeline(&self) -> Timeline {
        Timeline::new(self.config, self.entities.to_vec(), self.render_state)
    }

    pub fn subscribe(&mut self) -> Receiver<StoreEvent> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    fn notify(&mut self, event: StoreEvent) {
        self.subscribers.retain(|tx| tx.send(event).is_ok());
    }

    /// Append an entity with a fresh id and an invalid cache. Returns the id.
    pub fn create_entity(&mut self, mut entity: AnimatedEntity) -> Result<String, CoreError> {
        let id = new_entity_id();
        entity.set_id(id.clone());
        entity.cache_mut().valid = false;
        entity.validate(&format!("entities[{}]", self.entities.len()))?;
        Arc::make_mut(&mut self.entities).push(entity);
        self.notify(StoreEvent::EntitiesChanged);
        Ok(id)
    }

    /// Clone-with-patch update of the entity at `index`.
    ///
    /// The id cannot be changed by a patch. When the patch changes the inputs of
    /// the entity's build artifact, `cache.valid` is cleared.
    pub fn update_entity<F>(&mut self, index: usize, patch: F) -> Result<(), CoreError>
    where
        F: FnOnce(&mut AnimatedEntity),
    {
        let current = self
            .entities
            .get(index)
            .ok_or_else(|| CoreError::EntityNotFound(format!("#{index}")))?;
        let mut next = current.clone();
        patch(&mut next);
        next.set_id(current.id().to_string());
        if next.build_key() != current.build_key() {
            debug!("entity '{}' build inputs changed; invalidating cache", current.id());
            next.cache_mut().valid = false;
        }
        if &next == current {
            return Ok(());
        }
        next.validate(&format!("entities[{index}]"))?;
        Arc::make_mut(&mut self.entities)[index] = next;
        self.notify(StoreEvent::EntitiesChanged);
        Ok(())
    }

    pub fn update_entity_by_id<F>(&mut self, id: &str, patch: F) -> Result<(), CoreError>
    where
        F: FnOnce(&mut AnimatedEntity),
    {
        let index = self.index_of(id)?;
        self.update_entity(index, patch)
    }

    /// Set the cache validity flag unconditionally.
    pub fn set_cache_valid(&mut self, id: &str, valid: bool) -> Result<(), CoreError> {
        self.update_entity_by_id(id, |e| e.cache_mut().valid = valid)
    }

    /// Mark the artifact of `id` valid, but only when it was built from the
    /// entity's current build inputs. Returns whether the flag was set; an
    /// edit that landed after the build leaves the cache invalid.
    pub fn mark_built(&mut self, id: &str, built_from: &BuildKey) -> Result<bool, CoreError> {
        let index = self.index_of(id)?;
        if self.entities[index].build_key().as_ref() != Some(built_from) {
            debug!("entity '{id}' changed since its artifact was built; cache stays invalid");
            return Ok(false);
        }
        self.update_entity(index, |e| e.cache_mut().valid = true)?;
        Ok(true)
    }

    pub fn delete_entity(&mut self, id: &str) -> Result<AnimatedEntity, CoreError> {
        let index = self.index_of(id)?;
        let removed = Arc::make_mut(&mut self.entities).remove(index);
        self.notify(StoreEvent::EntitiesChanged);
        Ok(removed)
    }

    /// Replace the whole ordered list (reorder, bulk load).
    pub fn set_entities(&mut self, entities: Vec<AnimatedEntity>) -> Result<(), CoreError> {
        validate_entities(&entities)?;
        if *self.entities == entities {
            return Ok(());
        }
        self.entities = Arc::new(entities);
        self.notify(StoreEvent::EntitiesChanged);
        Ok(())
    }

    pub fn set_current_frame(&mut self, frame: i32) {
        if self.render_state.curr_frame == frame {
            return;
        }
        self.render_state = RenderState { curr_frame: frame };
        self.notify(StoreEvent::FrameChanged(frame));
    }

    pub fn set_playing(&mut self, playing: bool) {
        if self.playing == playing {
            return;
        }
        self.playing = playing;
        self.notify(StoreEvent::PlayingChanged(playing));
    }

    pub fn set_config(&mut self, config: Config) -> Result<(), CoreError> {
        config.validate()?;
        if self.config == config {
            return Ok(());
        }
        self.config = config;
        // Renderers depend on fps/duration through the resolved scene.
        self.notify(StoreEvent::EntitiesChanged);
        Ok(())
    }

    fn index_of(&self, id: &str) -> Result<usize, CoreError> {
        self.entities
            .iter()
            .position(|e| e.id() == id)
            .ok_or_else(|| CoreError::EntityNotFound(id.to_string()))
    }
}
