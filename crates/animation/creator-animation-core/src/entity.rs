//! Entity model: animated (authoring) variants and their resolved counterparts.
//!
//! Every animated variant carries a stable `id`, a `cache` validity flag, an
//! [`AnimationData`] window and animatable geometry. Resolving replaces each
//! animated field by its value at a local time and passes `cache` through
//! untouched: only the editing layer writes that flag.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::keyframe::Keyframes;
use crate::paint::{Paint, PaintStyle, TextPaint};
use crate::value::{AnimatedTransform, AnimatedVec2, Transform};

/// Validity of the entity's derived build artifact (e.g. shaped text).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cache {
    pub valid: bool,
}

fn default_visible() -> bool {
    true
}

/// Active window `[offset, offset + duration)` relative to scene frame 0.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationData {
    pub offset: f32,
    pub duration: f32,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

impl AnimationData {
    pub fn new(offset: f32, duration: f32) -> Self {
        Self {
            offset,
            duration,
            visible: true,
        }
    }

    /// Entity-local time for a scene time.
    #[inline]
    pub fn local_time(&self, global_time: f32) -> f32 {
        global_time - self.offset
    }

    /// Whether a local time falls inside the active window of a visible entity.
    #[inline]
    pub fn is_active(&self, local_time: f32) -> bool {
        self.visible && local_time >= 0.0 && local_time < self.duration
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Rect,
    Ellipse,
    Text,
    StaggeredText,
}

/// Inputs of an entity's build artifact. A change invalidates the cache.
#[derive(Clone, Debug, PartialEq)]
pub enum BuildKey {
    Text { text: String, paint: TextPaint },
    StaggeredText { text: String, paint: TextPaint },
}

// ---------------------------------------------------------------------------
// Animated variants

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimatedRectEntity {
    pub id: String,
    pub cache: Cache,
    pub paint: Paint,
    pub position: AnimatedVec2,
    pub size: AnimatedVec2,
    pub origin: AnimatedVec2,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<AnimatedTransform>,
    pub animation_data: AnimationData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimatedEllipseEntity {
    pub id: String,
    pub cache: Cache,
    pub paint: Paint,
    pub radius: AnimatedVec2,
    pub position: AnimatedVec2,
    pub origin: AnimatedVec2,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<AnimatedTransform>,
    pub animation_data: AnimationData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimatedTextEntity {
    pub id: String,
    pub cache: Cache,
    pub text: String,
    pub paint: TextPaint,
    pub origin: AnimatedVec2,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<AnimatedTransform>,
    pub animation_data: AnimationData,
}

/// Per-letter properties of a staggered text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimatedStaggeredTextLetter {
    pub transform: AnimatedTransform,
    pub paint: TextPaint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimatedStaggeredTextEntity {
    pub id: String,
    pub cache: Cache,
    pub text: String,
    /// Extra delay in seconds per letter index.
    pub stagger: f32,
    pub origin: AnimatedVec2,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<AnimatedTransform>,
    pub letter: AnimatedStaggeredTextLetter,
    pub animation_data: AnimationData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AnimatedEntity {
    Rect(AnimatedRectEntity),
    Ellipse(AnimatedEllipseEntity),
    Text(AnimatedTextEntity),
    StaggeredText(AnimatedStaggeredTextEntity),
}

fn evaluate_transform(
    transform: &Option<AnimatedTransform>,
    t: f32,
) -> Result<Option<Transform>, CoreError> {
    transform.as_ref().map(|tf| tf.evaluate(t)).transpose()
}

impl AnimatedEntity {
    pub fn id(&self) -> &str {
        match self {
            AnimatedEntity::Rect(e) => &e.id,
            AnimatedEntity::Ellipse(e) => &e.id,
            AnimatedEntity::Text(e) => &e.id,
            AnimatedEntity::StaggeredText(e) => &e.id,
        }
    }

    pub(crate) fn set_id(&mut self, id: String) {
        match self {
            AnimatedEntity::Rect(e) => e.id = id,
            AnimatedEntity::Ellipse(e) => e.id = id,
            AnimatedEntity::Text(e) => e.id = id,
            AnimatedEntity::StaggeredText(e) => e.id = id,
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            AnimatedEntity::Rect(_) => EntityKind::Rect,
            AnimatedEntity::Ellipse(_) => EntityKind::Ellipse,
            AnimatedEntity::Text(_) => EntityKind::Text,
            AnimatedEntity::StaggeredText(_) => EntityKind::StaggeredText,
        }
    }

    pub fn cache(&self) -> Cache {
        match self {
            AnimatedEntity::Rect(e) => e.cache,
            AnimatedEntity::Ellipse(e) => e.cache,
            AnimatedEntity::Text(e) => e.cache,
            AnimatedEntity::StaggeredText(e) => e.cache,
        }
    }

    pub fn cache_mut(&mut self) -> &mut Cache {
        match self {
            AnimatedEntity::Rect(e) => &mut e.cache,
            AnimatedEntity::Ellipse(e) => &mut e.cache,
            AnimatedEntity::Text(e) => &mut e.cache,
            AnimatedEntity::StaggeredText(e) => &mut e.cache,
        }
    }

    pub fn animation_data(&self) -> &AnimationData {
        match self {
            AnimatedEntity::Rect(e) => &e.animation_data,
            AnimatedEntity::Ellipse(e) => &e.animation_data,
            AnimatedEntity::Text(e) => &e.animation_data,
            AnimatedEntity::StaggeredText(e) => &e.animation_data,
        }
    }

    pub fn build_key(&self) -> Option<BuildKey> {
        match self {
            AnimatedEntity::Rect(_) | AnimatedEntity::Ellipse(_) => None,
            AnimatedEntity::Text(e) => Some(BuildKey::Text {
                text: e.text.clone(),
                paint: e.paint.clone(),
            }),
            AnimatedEntity::StaggeredText(e) => Some(BuildKey::StaggeredText {
                text: e.text.clone(),
                paint: e.letter.paint.clone(),
            }),
        }
    }

    /// Font family referenced by this entity, if any.
    pub fn font_name(&self) -> Option<&str> {
        match self {
            AnimatedEntity::Rect(_) | AnimatedEntity::Ellipse(_) => None,
            AnimatedEntity::Text(e) => Some(&e.paint.font_name),
            AnimatedEntity::StaggeredText(e) => Some(&e.letter.paint.font_name),
        }
    }

    /// Evaluate every animated field at `local_time` (seconds inside the window).
    pub fn evaluate(&self, local_time: f32) -> Result<ResolvedEntity, CoreError> {
        let t = local_time;
        let resolved = match self {
            AnimatedEntity::Rect(e) => ResolvedEntity::Rect(RectEntity {
                id: e.id.clone(),
                cache: e.cache,
                paint: e.paint,
                position: e.position.evaluate(t)?,
                size: e.size.evaluate(t)?,
                origin: e.origin.evaluate(t)?,
                transform: evaluate_transform(&e.transform, t)?,
                animation_data: e.animation_data,
            }),
            AnimatedEntity::Ellipse(e) => ResolvedEntity::Ellipse(EllipseEntity {
                id: e.id.clone(),
                cache: e.cache,
                paint: e.paint,
                radius: e.radius.evaluate(t)?,
                position: e.position.evaluate(t)?,
                origin: e.origin.evaluate(t)?,
                transform: evaluate_transform(&e.transform, t)?,
                animation_data: e.animation_data,
            }),
            AnimatedEntity::Text(e) => ResolvedEntity::Text(TextEntity {
                id: e.id.clone(),
                cache: e.cache,
                text: e.text.clone(),
                paint: e.paint.clone(),
                origin: e.origin.evaluate(t)?,
                transform: evaluate_transform(&e.transform, t)?,
                animation_data: e.animation_data,
            }),
            AnimatedEntity::StaggeredText(e) => {
                let transforms = e
                    .text
                    .chars()
                    .enumerate()
                    .map(|(index, _)| {
                        let letter_time = (t - index as f32 * e.stagger).max(0.0);
                        e.letter.transform.evaluate(letter_time)
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                ResolvedEntity::StaggeredText(StaggeredTextEntity {
                    id: e.id.clone(),
                    cache: e.cache,
                    text: e.text.clone(),
                    stagger: e.stagger,
                    origin: e.origin.evaluate(t)?,
                    transform: evaluate_transform(&e.transform, t)?,
                    letter: StaggeredTextLetter {
                        transforms,
                        paint: e.letter.paint.clone(),
                    },
                    animation_data: e.animation_data,
                })
            }
        };
        Ok(resolved)
    }

    /// Sort every track by offset (editing-layer helper).
    pub fn sort_keyframes(&mut self) {
        fn sort_tf(tf: &mut Option<AnimatedTransform>) {
            if let Some(tf) = tf {
                tf.sort_keyframes();
            }
        }
        match self {
            AnimatedEntity::Rect(e) => {
                e.position.sort_keyframes();
                e.size.sort_keyframes();
                e.origin.sort_keyframes();
                sort_tf(&mut e.transform);
            }
            AnimatedEntity::Ellipse(e) => {
                e.radius.sort_keyframes();
                e.position.sort_keyframes();
                e.origin.sort_keyframes();
                sort_tf(&mut e.transform);
            }
            AnimatedEntity::Text(e) => {
                e.origin.sort_keyframes();
                sort_tf(&mut e.transform);
            }
            AnimatedEntity::StaggeredText(e) => {
                e.origin.sort_keyframes();
                sort_tf(&mut e.transform);
                e.letter.transform.sort_keyframes();
            }
        }
    }

    fn tracks(&self) -> Vec<(&'static str, &Keyframes)> {
        fn vec2<'a>(
            out: &mut Vec<(&'static str, &'a Keyframes)>,
            name: &'static str,
            v: &'a AnimatedVec2,
        ) {
            out.extend(v.keyframes.iter().map(|n| (name, &n.keyframes)));
        }
        fn transform<'a>(
            out: &mut Vec<(&'static str, &'a Keyframes)>,
            name: &'static str,
            tf: &'a AnimatedTransform,
        ) {
            vec2(out, name, &tf.translate);
            vec2(out, name, &tf.skew);
            vec2(out, name, &tf.scale);
            out.extend(tf.rotate.keyframes.iter().map(|n| (name, &n.keyframes)));
        }

        let mut out = Vec::new();
        match self {
            AnimatedEntity::Rect(e) => {
                vec2(&mut out, "position", &e.position);
                vec2(&mut out, "size", &e.size);
                vec2(&mut out, "origin", &e.origin);
                if let Some(tf) = &e.transform {
                    transform(&mut out, "transform", tf);
                }
            }
            AnimatedEntity::Ellipse(e) => {
                vec2(&mut out, "radius", &e.radius);
                vec2(&mut out, "position", &e.position);
                vec2(&mut out, "origin", &e.origin);
                if let Some(tf) = &e.transform {
                    transform(&mut out, "transform", tf);
                }
            }
            AnimatedEntity::Text(e) => {
                vec2(&mut out, "origin", &e.origin);
                if let Some(tf) = &e.transform {
                    transform(&mut out, "transform", tf);
                }
            }
            AnimatedEntity::StaggeredText(e) => {
                vec2(&mut out, "origin", &e.origin);
                if let Some(tf) = &e.transform {
                    transform(&mut out, "transform", tf);
                }
                transform(&mut out, "letter.transform", &e.letter.transform);
            }
        }
        out
    }

    /// Schema-level checks applied at the wire boundary. Empty or unsorted
    /// tracks are evaluation errors, not schema errors, and are not checked here.
    pub fn validate(&self, path: &str) -> Result<(), CoreError> {
        let anim = self.animation_data();
        if !anim.offset.is_finite() {
            return Err(CoreError::validation(
                format!("{path}.animation_data.offset"),
                "must be finite",
            ));
        }
        if !anim.duration.is_finite() || anim.duration < 0.0 {
            return Err(CoreError::validation(
                format!("{path}.animation_data.duration"),
                "must be finite and >= 0",
            ));
        }

        let check_paint = |field: &str, style: &PaintStyle| match style.stroke_width() {
            Some(w) if w.is_nan() || w < 0.0 => Err(CoreError::validation(
                format!("{path}.{field}.style.width"),
                "stroke width must be >= 0",
            )),
            _ => Ok(()),
        };
        let check_text_paint = |field: &str, paint: &TextPaint| {
            if paint.size.is_nan() || paint.size < 0.0 {
                return Err(CoreError::validation(
                    format!("{path}.{field}.size"),
                    "text size must be >= 0",
                ));
            }
            check_paint(field, &paint.style)
        };

        match self {
            AnimatedEntity::Rect(e) => check_paint("paint", &e.paint.style)?,
            AnimatedEntity::Ellipse(e) => check_paint("paint", &e.paint.style)?,
            AnimatedEntity::Text(e) => check_text_paint("paint", &e.paint)?,
            AnimatedEntity::StaggeredText(e) => {
                if !e.stagger.is_finite() || e.stagger < 0.0 {
                    return Err(CoreError::validation(
                        format!("{path}.stagger"),
                        "must be finite and >= 0",
                    ));
                }
                check_text_paint("letter.paint", &e.letter.paint)?;
            }
        }

        for (name, track) in self.tracks() {
            if track
                .values
                .iter()
                .any(|k| !k.value.is_finite() || !k.offset.is_finite())
            {
                return Err(CoreError::validation(
                    format!("{path}.{name}"),
                    "keyframe values and offsets must be finite",
                ));
            }
            let mut seen = HashSet::new();
            if let Some(k) = track.values.iter().find(|k| !seen.insert(k.id.as_str())) {
                return Err(CoreError::validation(
                    format!("{path}.{name}"),
                    format!("duplicate keyframe id '{}'", k.id),
                ));
            }
        }
        Ok(())
    }
}

/// Validate an ordered scene: every entity on its own, then id uniqueness.
pub fn validate_entities(entities: &[AnimatedEntity]) -> Result<(), CoreError> {
    let mut seen = HashSet::with_capacity(entities.len());
    for (i, entity) in entities.iter().enumerate() {
        let path = format!("entities[{i}]");
        entity.validate(&path)?;
        if !seen.insert(entity.id()) {
            return Err(CoreError::validation(
                format!("{path}.id"),
                format!("duplicate entity id '{}'", entity.id()),
            ));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Resolved variants

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectEntity {
    pub id: String,
    pub cache: Cache,
    pub paint: Paint,
    pub position: (f32, f32),
    pub size: (f32, f32),
    pub origin: (f32, f32),
    pub transform: Option<Transform>,
    pub animation_data: AnimationData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EllipseEntity {
    pub id: String,
    pub cache: Cache,
    pub paint: Paint,
    pub radius: (f32, f32),
    pub position: (f32, f32),
    pub origin: (f32, f32),
    pub transform: Option<Transform>,
    pub animation_data: AnimationData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextEntity {
    pub id: String,
    pub cache: Cache,
    pub text: String,
    pub paint: TextPaint,
    pub origin: (f32, f32),
    pub transform: Option<Transform>,
    pub animation_data: AnimationData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaggeredTextLetter {
    /// One transform per `char` of the text.
    pub transforms: Vec<Transform>,
    pub paint: TextPaint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaggeredTextEntity {
    pub id: String,
    pub cache: Cache,
    pub text: String,
    pub stagger: f32,
    pub origin: (f32, f32),
    pub transform: Option<Transform>,
    pub letter: StaggeredTextLetter,
    pub animation_data: AnimationData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ResolvedEntity {
    Rect(RectEntity),
    Ellipse(EllipseEntity),
    Text(TextEntity),
    StaggeredText(StaggeredTextEntity),
}

impl ResolvedEntity {
    pub fn id(&self) -> &str {
        match self {
            ResolvedEntity::Rect(e) => &e.id,
            ResolvedEntity::Ellipse(e) => &e.id,
            ResolvedEntity::Text(e) => &e.id,
            ResolvedEntity::StaggeredText(e) => &e.id,
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            ResolvedEntity::Rect(_) => EntityKind::Rect,
            ResolvedEntity::Ellipse(_) => EntityKind::Ellipse,
            ResolvedEntity::Text(_) => EntityKind::Text,
            ResolvedEntity::StaggeredText(_) => EntityKind::StaggeredText,
        }
    }

    pub fn cache(&self) -> Cache {
        match self {
            ResolvedEntity::Rect(e) => e.cache,
            ResolvedEntity::Ellipse(e) => e.cache,
            ResolvedEntity::Text(e) => e.cache,
            ResolvedEntity::StaggeredText(e) => e.cache,
        }
    }

    pub fn animation_data(&self) -> &AnimationData {
        match self {
            ResolvedEntity::Rect(e) => &e.animation_data,
            ResolvedEntity::Ellipse(e) => &e.animation_data,
            ResolvedEntity::Text(e) => &e.animation_data,
            ResolvedEntity::StaggeredText(e) => &e.animation_data,
        }
    }

    /// Build inputs this entity was resolved with; compare against the
    /// scene's current [`AnimatedEntity::build_key`] before trusting an
    /// artifact built from it.
    pub fn build_key(&self) -> Option<BuildKey> {
        match self {
            ResolvedEntity::Rect(_) | ResolvedEntity::Ellipse(_) => None,
            ResolvedEntity::Text(e) => Some(BuildKey::Text {
                text: e.text.clone(),
                paint: e.paint.clone(),
            }),
            ResolvedEntity::StaggeredText(e) => Some(BuildKey::StaggeredText {
                text: e.text.clone(),
                paint: e.letter.paint.clone(),
            }),
        }
    }

    pub fn font_name(&self) -> Option<&str> {
        match self {
            ResolvedEntity::Rect(_) | ResolvedEntity::Ellipse(_) => None,
            ResolvedEntity::Text(e) => Some(&e.paint.font_name),
            ResolvedEntity::StaggeredText(e) => Some(&e.letter.paint.font_name),
        }
    }
}
