//! Main-thread task queue
//!
//! Engine objects may only be touched on the host's main thread. Work that
//! arrives elsewhere (input capture, file watchers) is queued here and run by
//! the frame pump.

pub mod queue;

pub use queue::{process_queued_tasks, queue_task, Task, TaskError, TaskQueue};
