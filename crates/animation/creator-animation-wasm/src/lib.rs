use js_sys::JSON;
use serde::Serialize;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use creator_animation_core::{
    AnimatedEntity, Config, CoreError, RenderState, ResolvedEntity, SceneStore, Timeline,
};
use creator_render_core::required_fonts;

fn core_err(e: CoreError) -> JsError {
    JsError::new(&e.to_string())
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsError> {
    // Plain objects rather than Maps for tuple/struct fields.
    let serializer = swb::Serializer::json_compatible();
    value
        .serialize(&serializer)
        .map_err(|e| JsError::new(&format!("serialize error: {e}")))
}

fn from_js<T: serde::de::DeserializeOwned>(value: JsValue, what: &str) -> Result<T, JsError> {
    swb::from_value(value).map_err(|e| JsError::new(&format!("{what} parse error: {e}")))
}

/// Editing-state handle for a scene: copy-on-write commands plus resolve.
#[wasm_bindgen]
pub struct CreatorScene {
    store: SceneStore,
}

#[wasm_bindgen]
impl CreatorScene {
    /// Create from a wire timeline object, or an empty scene with default
    /// config when `timeline` is undefined/null.
    #[wasm_bindgen(constructor)]
    pub fn new(timeline: JsValue) -> Result<CreatorScene, JsError> {
        console_error_panic_hook::set_once();

        let store = if timeline.is_undefined() || timeline.is_null() {
            SceneStore::new(Config::default()).map_err(core_err)?
        } else {
            // Round-trip through JSON so validation errors carry wire paths.
            let text: String = JSON::stringify(&timeline)
                .map_err(|_| JsError::new("timeline is not JSON-serializable"))?
                .into();
            SceneStore::from_timeline(Timeline::from_json(&text).map_err(core_err)?)
                .map_err(core_err)?
        };
        Ok(CreatorScene { store })
    }

    /// Resolved entities at `frame` (or the current frame when omitted).
    #[wasm_bindgen]
    pub fn resolve(&self, frame: Option<i32>) -> Result<JsValue, JsError> {
        let frame = frame.unwrap_or_else(|| self.store.curr_frame());
        let resolved = creator_animation_core::resolve_frame(
            &self.store.entities(),
            frame,
            self.store.config().fps,
        )
        .map_err(core_err)?;
        to_js(&resolved.entities)
    }

    #[wasm_bindgen(js_name = timeline)]
    pub fn timeline(&self) -> Result<JsValue, JsError> {
        to_js(&self.store.timeline())
    }

    #[wasm_bindgen(js_name = currentFrame)]
    pub fn current_frame(&self) -> i32 {
        self.store.curr_frame()
    }

    #[wasm_bindgen(js_name = setCurrentFrame)]
    pub fn set_current_frame(&mut self, frame: i32) {
        self.store.set_current_frame(frame);
    }

    #[wasm_bindgen(js_name = totalFrames)]
    pub fn total_frames(&self) -> i32 {
        self.store.config().total_frames()
    }

    /// Append an entity; returns its newly assigned id.
    #[wasm_bindgen(js_name = createEntity)]
    pub fn create_entity(&mut self, entity: JsValue) -> Result<String, JsError> {
        let entity: AnimatedEntity = from_js(entity, "entity")?;
        self.store.create_entity(entity).map_err(core_err)
    }

    /// Replace the entity with `id` by `entity` (its id is kept).
    #[wasm_bindgen(js_name = updateEntityById)]
    pub fn update_entity_by_id(&mut self, id: &str, entity: JsValue) -> Result<(), JsError> {
        let entity: AnimatedEntity = from_js(entity, "entity")?;
        self.store
            .update_entity_by_id(id, move |e| *e = entity)
            .map_err(core_err)
    }

    #[wasm_bindgen(js_name = deleteEntity)]
    pub fn delete_entity(&mut self, id: &str) -> Result<(), JsError> {
        self.store.delete_entity(id).map(|_| ()).map_err(core_err)
    }

    /// Replace the ordered entity list (reorder, bulk load).
    #[wasm_bindgen(js_name = setEntities)]
    pub fn set_entities(&mut self, entities: JsValue) -> Result<(), JsError> {
        let entities: Vec<AnimatedEntity> = from_js(entities, "entities")?;
        self.store.set_entities(entities).map_err(core_err)
    }

    #[wasm_bindgen(js_name = setCacheValid)]
    pub fn set_cache_valid(&mut self, id: &str, valid: bool) -> Result<(), JsError> {
        self.store.set_cache_valid(id, valid).map_err(core_err)
    }

    /// Font families the current scene needs.
    #[wasm_bindgen(js_name = requiredFonts)]
    pub fn required_fonts(&self) -> Result<JsValue, JsError> {
        to_js(&required_fonts(self.store.entities().as_slice()))
    }
}

/// Stateless resolve: wire timeline JSON in, resolved entity array JSON out.
#[wasm_bindgen(js_name = resolveTimelineJson)]
pub fn resolve_timeline_json(timeline_json: &str) -> Result<String, JsError> {
    console_error_panic_hook::set_once();
    creator_animation_core::resolve_timeline_json(timeline_json).map_err(core_err)
}

/// Font families referenced by a resolved entity array.
#[wasm_bindgen(js_name = requiredFontsForResolved)]
pub fn required_fonts_for_resolved(entities: JsValue) -> Result<JsValue, JsError> {
    let entities: Vec<ResolvedEntity> = from_js(entities, "entities")?;
    to_js(&required_fonts(&entities))
}

/// Default render state, for hosts building timelines by hand.
#[wasm_bindgen(js_name = defaultRenderState)]
pub fn default_render_state() -> Result<JsValue, JsError> {
    to_js(&RenderState::default())
}

#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
