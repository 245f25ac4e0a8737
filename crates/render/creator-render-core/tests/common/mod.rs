#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use creator_animation_core::{
    AnimatedEntity, AnimatedNumber, AnimatedRectEntity, AnimatedTextEntity, AnimatedVec2,
    AnimationData, Cache, Color, Config, EllipseEntity, Keyframe, Paint, PaintStyle, RectEntity,
    SceneStore, StaggeredTextEntity, TextAlign, TextEntity, TextPaint,
};
use creator_render_core::{
    Artifact, Dependencies, DependencyError, FontLoader, ReleaseError, RenderError, Renderer,
};

pub type ReleaseLog = Rc<RefCell<Vec<(String, u32)>>>;

/// Artifact that records its own release.
#[derive(Debug)]
pub struct Tracked {
    pub id: String,
    pub serial: u32,
    /// Text the artifact was shaped from.
    pub text: String,
    log: ReleaseLog,
}

impl Tracked {
    pub fn new(id: &str, serial: u32, log: &ReleaseLog) -> Self {
        Self {
            id: id.to_string(),
            serial,
            text: String::new(),
            log: Rc::clone(log),
        }
    }
}

impl Artifact for Tracked {
    fn release(self) -> Result<(), ReleaseError> {
        self.log.borrow_mut().push((self.id, self.serial));
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct FakeRenderer {
    pub calls: Vec<String>,
    pub builds: u32,
    pub released: ReleaseLog,
    /// (entity text, artifact text) per text draw.
    pub texts: Vec<(String, String)>,
    pub fail_draw: Option<String>,
}

impl FakeRenderer {
    fn build(
        &mut self,
        id: &str,
        text: &str,
        font: &str,
        deps: &Dependencies,
    ) -> Result<Tracked, RenderError> {
        if !deps.has_font(font) {
            return Err(RenderError::MissingFont(font.to_string()));
        }
        self.builds += 1;
        self.calls.push(format!("build:{id}"));
        Ok(Tracked {
            text: text.to_string(),
            ..Tracked::new(id, self.builds, &self.released)
        })
    }

    fn draw(&mut self, id: &str) -> Result<(), RenderError> {
        if self.fail_draw.as_deref() == Some(id) {
            return Err(RenderError::Draw(format!("{id} refused")));
        }
        self.calls.push(format!("draw:{id}"));
        Ok(())
    }

    pub fn drawn(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|c| c.strip_prefix("draw:"))
            .map(str::to_string)
            .collect()
    }
}

impl Renderer for FakeRenderer {
    type Text = Tracked;
    type StaggeredText = Tracked;

    fn clear(&mut self, size: (i32, i32)) {
        self.calls.push(format!("clear:{}x{}", size.0, size.1));
    }

    fn draw_rect(&mut self, rect: &RectEntity) -> Result<(), RenderError> {
        self.draw(&rect.id)
    }

    fn draw_ellipse(&mut self, ellipse: &EllipseEntity) -> Result<(), RenderError> {
        self.draw(&ellipse.id)
    }

    fn build_text(
        &mut self,
        text: &TextEntity,
        deps: &Dependencies,
    ) -> Result<Tracked, RenderError> {
        self.build(&text.id, &text.text, &text.paint.font_name, deps)
    }

    fn draw_text(&mut self, text: &TextEntity, artifact: &Tracked) -> Result<(), RenderError> {
        assert_eq!(artifact.id, text.id);
        self.texts.push((text.text.clone(), artifact.text.clone()));
        self.draw(&text.id)
    }

    fn build_staggered_text(
        &mut self,
        text: &StaggeredTextEntity,
        deps: &Dependencies,
    ) -> Result<Tracked, RenderError> {
        self.build(&text.id, &text.text, &text.letter.paint.font_name, deps)
    }

    fn draw_staggered_text(
        &mut self,
        text: &StaggeredTextEntity,
        artifact: &Tracked,
    ) -> Result<(), RenderError> {
        assert_eq!(artifact.id, text.id);
        self.draw(&text.id)
    }
}

/// Serves fonts from a fixed list; everything else is unavailable.
#[derive(Debug, Default)]
pub struct FakeLoader {
    pub available: Vec<String>,
    pub requests: Vec<String>,
}

impl FakeLoader {
    pub fn with(fonts: &[&str]) -> Self {
        Self {
            available: fonts.iter().map(|f| f.to_string()).collect(),
            requests: Vec::new(),
        }
    }
}

impl FontLoader for FakeLoader {
    fn load_font(&mut self, name: &str) -> Result<Vec<u8>, DependencyError> {
        self.requests.push(name.to_string());
        if self.available.iter().any(|f| f == name) {
            Ok(name.as_bytes().to_vec())
        } else {
            Err(DependencyError::FontUnavailable {
                name: name.to_string(),
                reason: "not installed".into(),
            })
        }
    }
}

pub fn rect(id: &str) -> AnimatedEntity {
    AnimatedEntity::Rect(AnimatedRectEntity {
        id: id.to_string(),
        cache: Cache::default(),
        paint: Paint {
            style: PaintStyle::fill(Color::new(0, 0, 0, 1.0)),
        },
        position: AnimatedVec2::new(
            AnimatedNumber::from_keyframes(vec![
                Keyframe::new(0.0, 0.0),
                Keyframe::new(100.0, 1.0),
            ]),
            AnimatedNumber::constant(0.0),
        ),
        size: AnimatedVec2::constant(10.0, 10.0),
        origin: AnimatedVec2::constant(0.0, 0.0),
        transform: None,
        animation_data: AnimationData::new(0.0, 10.0),
    })
}

pub fn text(id: &str, font: &str) -> AnimatedEntity {
    AnimatedEntity::Text(AnimatedTextEntity {
        id: id.to_string(),
        cache: Cache::default(),
        text: "Hello".into(),
        paint: TextPaint {
            style: PaintStyle::fill(Color::default()),
            align: TextAlign::Center,
            font_name: font.to_string(),
            size: 40.0,
        },
        origin: AnimatedVec2::constant(0.0, 0.0),
        transform: None,
        animation_data: AnimationData::new(0.0, 10.0),
    })
}

/// 10 fps, 1 s: ten frames, 100 ms apart.
pub fn small_config() -> Config {
    Config {
        fps: 10,
        duration: 1.0,
        size: (320, 240),
    }
}

pub fn store_with(entities: Vec<AnimatedEntity>) -> SceneStore {
    SceneStore::with_entities(small_config(), entities).unwrap()
}
