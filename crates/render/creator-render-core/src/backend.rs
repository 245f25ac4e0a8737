//! The resolve boundary: a scene snapshot goes out, a resolved frame comes back.
//!
//! Resolution may run elsewhere (a worker, a native host process) and complete
//! later. Responses carry the sequence number of their request and are applied
//! in completion order.

use std::collections::VecDeque;

use creator_animation_core::{resolve_frame_json, CoreError, ResolvedFrame, Timeline};
use log::trace;

#[derive(Debug, Clone, PartialEq)]
pub struct ResolveRequest {
    pub seq: u64,
    pub timeline: Timeline,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolveResponse {
    pub seq: u64,
    pub size: (i32, i32),
    pub result: Result<ResolvedFrame, CoreError>,
}

pub trait ResolveBackend {
    fn submit(&mut self, request: ResolveRequest);
    /// Next completed response, if any.
    fn poll(&mut self) -> Option<ResolveResponse>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Transport {
    /// Resolve the snapshot directly.
    #[default]
    InProcess,
    /// Serialize to the wire JSON shape and back, as a remote host would.
    Json,
}

/// Resolves synchronously on submit; responses queue until polled.
#[derive(Debug, Default)]
pub struct LocalBackend {
    transport: Transport,
    ready: VecDeque<ResolveResponse>,
}

impl LocalBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transport(transport: Transport) -> Self {
        Self {
            transport,
            ready: VecDeque::new(),
        }
    }

    fn resolve(&self, timeline: &Timeline) -> Result<ResolvedFrame, CoreError> {
        match self.transport {
            Transport::InProcess => {
                timeline.validate()?;
                timeline.calculate()
            }
            Transport::Json => {
                let out = resolve_frame_json(&timeline.to_json()?)?;
                Ok(serde_json::from_str(&out)?)
            }
        }
    }
}

impl ResolveBackend for LocalBackend {
    fn submit(&mut self, request: ResolveRequest) {
        trace!(
            "resolve #{}: frame {}",
            request.seq,
            request.timeline.render_state.curr_frame
        );
        let result = self.resolve(&request.timeline);
        self.ready.push_back(ResolveResponse {
            seq: request.seq,
            size: request.timeline.size,
            result,
        });
    }

    fn poll(&mut self) -> Option<ResolveResponse> {
        self.ready.pop_front()
    }
}
