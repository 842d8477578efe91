//! Frame pump
//!
//! The host calls [`on_frame`] once per rendered frame on its main thread.
//! Each call drains the main-thread task queue, which is how key presses and
//! other off-thread work reach the hook dispatcher.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crate::tasks;

/// Frame counter (increments every `on_frame` call)
static FRAME_COUNT: AtomicU64 = AtomicU64::new(0);

/// Processing time above which a frame is reported
const SLOW_FRAME_NS: u64 = 1_000_000;

pub fn frame_count() -> u64 {
    FRAME_COUNT.load(Ordering::Relaxed)
}

/// Called by the host every frame. Returns the number of tasks run.
pub fn on_frame() -> usize {
    let start = Instant::now();
    let frame = FRAME_COUNT.fetch_add(1, Ordering::Relaxed) + 1;

    let processed = tasks::process_queued_tasks();
    if processed > 0 {
        tracing::trace!("Processed {} queued tasks", processed);
    }

    let elapsed = start.elapsed().as_nanos() as u64;
    if elapsed > SLOW_FRAME_NS {
        tracing::warn!("Frame {} spent {}ms in queued tasks", frame, elapsed / 1_000_000);
    }

    processed
}
