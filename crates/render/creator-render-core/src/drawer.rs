//! Draw path: resolved scene + build cache -> backend draw calls.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use creator_animation_core::{
    EllipseEntity, RectEntity, ResolvedEntity, ResolvedFrame, SceneStore, StaggeredTextEntity,
    TextEntity,
};
use hashbrown::HashSet;
use log::{debug, warn};
use serde::Serialize;

use crate::cache::{Artifact, ArtifactCache, Lookup};
use crate::dependencies::Dependencies;
use crate::error::RenderError;
use crate::scheduler::{FrameHandle, FramePurpose, FrameScheduler};

/// Rendering backend. Rasterization itself lives behind this trait.
pub trait Renderer {
    /// Shaped text layout for a [`TextEntity`].
    type Text: Artifact;
    /// Per-letter layout for a [`StaggeredTextEntity`].
    type StaggeredText: Artifact;

    fn clear(&mut self, size: (i32, i32));
    fn draw_rect(&mut self, rect: &RectEntity) -> Result<(), RenderError>;
    fn draw_ellipse(&mut self, ellipse: &EllipseEntity) -> Result<(), RenderError>;
    fn build_text(
        &mut self,
        text: &TextEntity,
        deps: &Dependencies,
    ) -> Result<Self::Text, RenderError>;
    fn draw_text(&mut self, text: &TextEntity, artifact: &Self::Text) -> Result<(), RenderError>;
    fn build_staggered_text(
        &mut self,
        text: &StaggeredTextEntity,
        deps: &Dependencies,
    ) -> Result<Self::StaggeredText, RenderError>;
    fn draw_staggered_text(
        &mut self,
        text: &StaggeredTextEntity,
        artifact: &Self::StaggeredText,
    ) -> Result<(), RenderError>;
}

/// At-most-one-draw guard. Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct DrawLock {
    locked: Arc<AtomicBool>,
}

/// Held for the duration of a draw; unlocks on drop.
#[derive(Debug)]
pub struct DrawGuard {
    locked: Arc<AtomicBool>,
}

impl DrawLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_lock(&self) -> Option<DrawGuard> {
        self.locked
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| DrawGuard {
                locked: Arc::clone(&self.locked),
            })
    }

    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Acquire)
    }
}

impl Drop for DrawGuard {
    fn drop(&mut self) {
        self.locked.store(false, Ordering::Release);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DrawReport {
    pub frame: i32,
    /// Ids in the order they were drawn (back to front).
    pub drawn: Vec<String>,
    /// Ids whose artifact was (re)built during this draw.
    pub built: Vec<String>,
    /// Ids skipped because building or drawing failed.
    pub skipped: Vec<(String, String)>,
}

pub struct Drawer<R: Renderer> {
    renderer: R,
    text_cache: ArtifactCache<R::Text>,
    staggered_cache: ArtifactCache<R::StaggeredText>,
    frame: Option<ResolvedFrame>,
    size: (i32, i32),
    lock: DrawLock,
    pending: Option<FrameHandle>,
    draw_count: u64,
}

impl<R: Renderer> Drawer<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            text_cache: ArtifactCache::new(),
            staggered_cache: ArtifactCache::new(),
            frame: None,
            size: (0, 0),
            lock: DrawLock::new(),
            pending: None,
            draw_count: 0,
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn lock(&self) -> DrawLock {
        self.lock.clone()
    }

    pub fn frame(&self) -> Option<&ResolvedFrame> {
        self.frame.as_ref()
    }

    pub fn pending_redraw(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn draw_count(&self) -> u64 {
        self.draw_count
    }

    pub fn text_cache(&self) -> &ArtifactCache<R::Text> {
        &self.text_cache
    }

    pub fn staggered_text_cache(&self) -> &ArtifactCache<R::StaggeredText> {
        &self.staggered_cache
    }

    /// True when every entity of the current frame has a valid build cache.
    pub fn is_cached(&self) -> bool {
        self.frame.as_ref().is_some_and(ResolvedFrame::is_cached)
    }

    /// Take a freshly resolved frame and schedule its redraw.
    ///
    /// While a draw holds the lock the frame is stored but no redraw is
    /// requested; the next mutation or tick supersedes it. Returns whether a
    /// redraw is pending afterwards.
    pub fn apply<S>(&mut self, frame: ResolvedFrame, size: (i32, i32), scheduler: &mut S) -> bool
    where
        S: FrameScheduler + ?Sized,
    {
        self.frame = Some(frame);
        self.size = size;
        if self.lock.is_locked() {
            debug!("drawer: draw in progress, redraw not re-entered");
            return false;
        }
        let rebuild = !self.is_cached();
        self.request_redraw(scheduler, rebuild);
        true
    }

    /// Schedule a redraw. A forced rebuild cancels an already pending redraw
    /// and requests a new one; otherwise a pending redraw is reused.
    pub fn request_redraw<S>(&mut self, scheduler: &mut S, rebuild: bool)
    where
        S: FrameScheduler + ?Sized,
    {
        match self.pending {
            Some(handle) if rebuild => {
                scheduler.cancel(handle);
                self.pending = Some(scheduler.request(FramePurpose::Redraw));
            }
            Some(_) => {}
            None => self.pending = Some(scheduler.request(FramePurpose::Redraw)),
        }
    }

    /// Paint the current frame back to front. Returns `None` when another draw
    /// holds the lock or nothing has been resolved yet.
    ///
    /// Freshly built artifacts are committed, and their entity is marked valid
    /// in `store` when its build inputs are unchanged. Artifacts of entities no
    /// longer in the scene are released.
    pub fn draw(&mut self, store: &mut SceneStore, deps: &Dependencies) -> Option<DrawReport> {
        let _guard = self.lock.try_lock()?;
        self.pending = None;
        let frame = self.frame.as_ref()?;

        self.renderer.clear(self.size);
        self.draw_count += 1;
        let mut report = DrawReport {
            frame: frame.frame,
            ..DrawReport::default()
        };

        for entity in frame.draw_order() {
            let id = entity.id();
            let outcome = match entity {
                ResolvedEntity::Rect(rect) => self.renderer.draw_rect(rect).map(|_| false),
                ResolvedEntity::Ellipse(ellipse) => {
                    self.renderer.draw_ellipse(ellipse).map(|_| false)
                }
                ResolvedEntity::Text(text) => draw_cached(
                    &mut self.renderer,
                    &mut self.text_cache,
                    store,
                    entity,
                    |r| r.build_text(text, deps),
                    |r, artifact| r.draw_text(text, artifact),
                ),
                ResolvedEntity::StaggeredText(text) => draw_cached(
                    &mut self.renderer,
                    &mut self.staggered_cache,
                    store,
                    entity,
                    |r| r.build_staggered_text(text, deps),
                    |r, artifact| r.draw_staggered_text(text, artifact),
                ),
            };
            match outcome {
                Ok(built) => {
                    if built {
                        report.built.push(id.to_string());
                    }
                    report.drawn.push(id.to_string());
                }
                Err(err) => {
                    warn!("drawer: skipping '{id}': {err}");
                    report.skipped.push((id.to_string(), err.to_string()));
                }
            }
        }

        let scene = store.entities();
        let live: HashSet<&str> = scene.iter().map(|e| e.id()).collect();
        self.text_cache.retain(|id| live.contains(id));
        self.staggered_cache.retain(|id| live.contains(id));

        Some(report)
    }
}

/// Obtain (reuse or build) the artifact of `entity` and draw with it.
/// Returns whether the artifact was built.
///
/// A fresh artifact is always committed, but the scene entity is only marked
/// valid when its build inputs still match the resolved snapshot it was built
/// from.
fn draw_cached<R, C, B, D>(
    renderer: &mut R,
    cache: &mut ArtifactCache<C>,
    store: &mut SceneStore,
    entity: &ResolvedEntity,
    build: B,
    draw: D,
) -> Result<bool, RenderError>
where
    C: Artifact,
    B: FnOnce(&mut R) -> Result<C, RenderError>,
    D: FnOnce(&mut R, &C) -> Result<(), RenderError>,
{
    let id = entity.id();
    match cache.obtain(id, entity.cache().valid, || build(renderer))? {
        Lookup::Cached(artifact) => draw(renderer, artifact).map(|_| false),
        Lookup::Stored(artifact) => draw(renderer, artifact).map(|_| true),
        Lookup::Fresh(artifact) => {
            if let Some(key) = entity.build_key() {
                if let Err(err) = store.mark_built(id, &key) {
                    debug!("drawer: could not mark '{id}' valid: {err}");
                }
            }
            let artifact = cache.commit(id, artifact);
            draw(renderer, artifact).map(|_| true)
        }
    }
}
