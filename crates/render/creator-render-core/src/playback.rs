//! Playback service: owns the editing store and drives
//! store events -> resolve requests -> resolved frames -> redraws,
//! plus the frame-tick loop while playing.
//!
//! Frame-advance decisions are made before the resolve request is dispatched.
//! Responses are applied in the order they complete.

use std::sync::mpsc::Receiver;

use creator_animation_core::{SceneStore, StoreEvent};
use log::{debug, error, info, trace, warn};

use crate::backend::{ResolveBackend, ResolveRequest, ResolveResponse};
use crate::dependencies::{required_fonts, DependencyService, FontLoader};
use crate::drawer::{DrawReport, Drawer, Renderer};
use crate::scheduler::{FrameHandle, FramePurpose, FrameScheduler, QueuedScheduler};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
}

pub struct PlaybackService<R, B, S, L>
where
    R: Renderer,
    B: ResolveBackend,
    S: FrameScheduler,
    L: FontLoader,
{
    store: SceneStore,
    events: Receiver<StoreEvent>,
    drawer: Drawer<R>,
    backend: B,
    scheduler: S,
    loader: L,
    dependencies: DependencyService,
    state: PlaybackState,
    tick: Option<FrameHandle>,
    last_tick_ms: f64,
    next_seq: u64,
    last_applied_seq: Option<u64>,
}

impl<R, B, S, L> PlaybackService<R, B, S, L>
where
    R: Renderer,
    B: ResolveBackend,
    S: FrameScheduler,
    L: FontLoader,
{
    pub fn new(mut store: SceneStore, renderer: R, backend: B, scheduler: S, loader: L) -> Self {
        let events = store.subscribe();
        Self {
            store,
            events,
            drawer: Drawer::new(renderer),
            backend,
            scheduler,
            loader,
            dependencies: DependencyService::new(),
            state: PlaybackState::Stopped,
            tick: None,
            last_tick_ms: 0.0,
            next_seq: 0,
            last_applied_seq: None,
        }
    }

    pub fn store(&self) -> &SceneStore {
        &self.store
    }

    /// Editing commands go through here; call [`Self::pump`] afterwards.
    pub fn store_mut(&mut self) -> &mut SceneStore {
        &mut self.store
    }

    pub fn drawer(&self) -> &Drawer<R> {
        &self.drawer
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn loader_mut(&mut self) -> &mut L {
        &mut self.loader
    }

    pub fn dependencies(&self) -> &DependencyService {
        &self.dependencies
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn last_applied_seq(&self) -> Option<u64> {
        self.last_applied_seq
    }

    /// Initial evaluation of the loaded scene.
    pub fn init(&mut self) {
        self.seek();
    }

    /// Request a resolve of the current scene at the current frame.
    pub fn seek(&mut self) -> u64 {
        self.next_seq += 1;
        let seq = self.next_seq;
        self.backend.submit(ResolveRequest {
            seq,
            timeline: self.store.timeline(),
        });
        seq
    }

    /// Stopped -> Playing: prefetch fonts for the whole scene, then start ticking.
    pub fn play(&mut self, now_ms: f64) {
        if self.state == PlaybackState::Playing {
            return;
        }
        let scene = self.store.entities();
        let report = self
            .dependencies
            .prepare(&required_fonts(scene.as_slice()), &mut self.loader);
        if !report.failed.is_empty() {
            warn!("playback: starting with {} missing font(s)", report.failed.len());
        }
        info!("playback: play from frame {}", self.store.curr_frame());
        self.state = PlaybackState::Playing;
        self.store.set_playing(true);
        self.last_tick_ms = now_ms;
        self.tick = Some(self.scheduler.request(FramePurpose::Tick));
    }

    /// Playing -> Stopped: cancel the pending tick.
    pub fn stop(&mut self) {
        if self.state == PlaybackState::Stopped {
            return;
        }
        if let Some(handle) = self.tick.take() {
            self.scheduler.cancel(handle);
        }
        info!("playback: stopped at frame {}", self.store.curr_frame());
        self.state = PlaybackState::Stopped;
        self.store.set_playing(false);
    }

    /// One tick of the playback loop. Returns whether the frame advanced.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        if self.state != PlaybackState::Playing {
            return false;
        }
        self.tick = Some(self.scheduler.request(FramePurpose::Tick));

        let config = self.store.config();
        let interval = config.frame_interval_ms();
        let elapsed = now_ms - self.last_tick_ms;
        if elapsed < interval {
            return false;
        }
        self.last_tick_ms = now_ms - elapsed % interval;

        let next = (self.store.curr_frame() + 1).rem_euclid(config.total_frames());
        trace!("playback: advance to frame {next}");
        self.store.set_current_frame(next);
        self.seek();
        true
    }

    /// Dispatch a fired frame callback.
    pub fn on_frame(
        &mut self,
        handle: FrameHandle,
        purpose: FramePurpose,
        now_ms: f64,
    ) -> Option<DrawReport> {
        match purpose {
            FramePurpose::Tick => {
                if self.tick == Some(handle) {
                    self.tick = None;
                    self.tick(now_ms);
                }
                None
            }
            FramePurpose::Redraw => self
                .drawer
                .draw(&mut self.store, self.dependencies.dependencies()),
        }
    }

    /// React to store events, then apply every completed resolve response.
    pub fn pump(&mut self, now_ms: f64) {
        let events: Vec<StoreEvent> = self.events.try_iter().collect();
        let mut needs_seek = false;
        for event in events {
            match event {
                StoreEvent::PlayingChanged(true) => self.play(now_ms),
                StoreEvent::PlayingChanged(false) => self.stop(),
                StoreEvent::EntitiesChanged | StoreEvent::FrameChanged(_) => {
                    needs_seek |= self.state == PlaybackState::Stopped;
                }
            }
        }
        if needs_seek {
            self.seek();
        }

        while let Some(response) = self.backend.poll() {
            self.apply(response);
        }
    }

    fn apply(&mut self, response: ResolveResponse) {
        let ResolveResponse { seq, size, result } = response;
        let frame = match result {
            Ok(frame) => frame,
            Err(err) => {
                error!("playback: resolve #{seq} failed: {err}");
                return;
            }
        };
        for failure in &frame.failures {
            debug!("playback: resolve #{seq} excluded '{}'", failure.id);
        }
        self.dependencies
            .prepare(&required_fonts(&frame.entities), &mut self.loader);
        self.last_applied_seq = Some(seq);
        self.drawer.apply(frame, size, &mut self.scheduler);
    }
}

impl<R, B, L> PlaybackService<R, B, QueuedScheduler, L>
where
    R: Renderer,
    B: ResolveBackend,
    L: FontLoader,
{
    /// Host frame for the queued scheduler: pump, then fire every due callback.
    pub fn run_frame(&mut self, now_ms: f64) -> Vec<DrawReport> {
        self.pump(now_ms);
        let due = self.scheduler.take_due();
        due.into_iter()
            .filter_map(|(handle, purpose)| self.on_frame(handle, purpose, now_ms))
            .collect()
    }
}
