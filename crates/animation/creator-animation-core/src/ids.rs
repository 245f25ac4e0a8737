//! Fresh identifiers for entities and keyframes created by the editing layer.

use uuid::Uuid;

#[inline]
pub fn new_entity_id() -> String {
    Uuid::new_v4().to_string()
}

#[inline]
pub fn new_keyframe_id() -> String {
    Uuid::new_v4().to_string()
}
