//! Conversions between timeline seconds and frame indices.

/// Nearest frame for a timestamp in seconds.
#[inline]
pub fn timestamp_to_frame(timestamp: f32, fps: u32) -> i32 {
    (timestamp * fps as f32).round() as i32
}

/// Start time in seconds of a frame. `fps == 0` maps everything to 0.
#[inline]
pub fn frame_to_timestamp(frame: i32, fps: u32) -> f32 {
    if fps == 0 {
        return 0.0;
    }
    frame as f32 / fps as f32
}
