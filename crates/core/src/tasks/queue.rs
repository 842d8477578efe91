//! Bounded task queue drained once per frame

use std::sync::LazyLock;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

/// A task to execute on the main thread
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Default capacity, also the per-frame processing limit
const QUEUE_CAPACITY: usize = 1024;

/// Task queue errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    #[error("Task queue is full")]
    Full,

    #[error("Task queue is disconnected")]
    Disconnected,
}

/// Multi-producer queue consumed on the main thread
pub struct TaskQueue {
    sender: Sender<Task>,
    receiver: Receiver<Task>,
    capacity: usize,
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::with_capacity(QUEUE_CAPACITY)
    }
}

impl TaskQueue {
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
        }
    }

    /// Queue a task without blocking. A full queue drops the task.
    pub fn push<F>(&self, task: F) -> Result<(), TaskError>
    where
        F: FnOnce() + Send + 'static,
    {
        match self.sender.try_send(Box::new(task)) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                tracing::warn!("Task queue full, dropping task");
                Err(TaskError::Full)
            }
            Err(TrySendError::Disconnected(_)) => {
                tracing::error!("Task queue disconnected");
                Err(TaskError::Disconnected)
            }
        }
    }

    /// Run queued tasks, at most one queue's worth, and return how many ran.
    /// Tasks queued while draining wait for the next frame once the limit is hit.
    pub fn drain(&self) -> usize {
        let mut count = 0;
        while count < self.capacity {
            match self.receiver.try_recv() {
                Ok(task) => {
                    task();
                    count += 1;
                }
                Err(_) => break,
            }
        }
        count
    }

    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

static TASK_QUEUE: LazyLock<TaskQueue> = LazyLock::new(TaskQueue::default);

/// Queue a task to execute on the next frame. Safe from any thread.
#[tracing::instrument(skip(task))]
pub fn queue_task<F>(task: F) -> Result<(), TaskError>
where
    F: FnOnce() + Send + 'static,
{
    TASK_QUEUE.push(task)
}

/// Run queued tasks. Called by the frame pump on the main thread.
#[tracing::instrument]
pub fn process_queued_tasks() -> usize {
    TASK_QUEUE.drain()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_full_queue_rejects() {
        let queue = TaskQueue::with_capacity(2);
        queue.push(|| {}).unwrap();
        queue.push(|| {}).unwrap();
        assert_eq!(queue.push(|| {}), Err(TaskError::Full));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_drain_runs_in_order() {
        let queue = TaskQueue::with_capacity(8);
        let order = Arc::new(parking_lot::Mutex::new(Vec::new()));
        for i in 0..3 {
            let order = Arc::clone(&order);
            queue.push(move || order.lock().push(i)).unwrap();
        }

        assert_eq!(queue.drain(), 3);
        assert_eq!(*order.lock(), vec![0, 1, 2]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_drain_from_other_thread() {
        let queue = Arc::new(TaskQueue::with_capacity(16));
        let ran = Arc::new(AtomicUsize::new(0));

        let producer = {
            let queue = Arc::clone(&queue);
            let ran = Arc::clone(&ran);
            std::thread::spawn(move || {
                for _ in 0..4 {
                    let ran = Arc::clone(&ran);
                    queue
                        .push(move || {
                            ran.fetch_add(1, Ordering::SeqCst);
                        })
                        .unwrap();
                }
            })
        };
        producer.join().unwrap();

        assert_eq!(queue.drain(), 4);
        assert_eq!(ran.load(Ordering::SeqCst), 4);
    }
}
