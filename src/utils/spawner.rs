// ============================================================================
// TASK SPAWNER - Fire-and-forget futures on the UI thread
// ============================================================================
// Stores use this to kick off work in response to a state change (e.g. the
// basket fetch after login) without the caller awaiting it.
// ============================================================================

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use futures::future::LocalBoxFuture;

pub type LocalTask = LocalBoxFuture<'static, ()>;

pub trait TaskSpawner {
    fn spawn(&self, task: LocalTask);
}

/// Runs tasks on the browser microtask queue
#[cfg(target_arch = "wasm32")]
#[derive(Clone, Copy, Default)]
pub struct LocalSpawner;

#[cfg(target_arch = "wasm32")]
impl TaskSpawner for LocalSpawner {
    fn spawn(&self, task: LocalTask) {
        wasm_bindgen_futures::spawn_local(task);
    }
}

/// Queues tasks until the owner drives them with `run_until_idle`.
/// Used on native targets, where the host decides when work runs.
#[derive(Clone, Default)]
pub struct QueuedSpawner {
    queue: Rc<RefCell<VecDeque<LocalTask>>>,
}

impl QueuedSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Run queued tasks in FIFO order, including any they enqueue
    pub async fn run_until_idle(&self) {
        loop {
            let next = self.queue.borrow_mut().pop_front();
            match next {
                Some(task) => task.await,
                None => break,
            }
        }
    }
}

impl TaskSpawner for QueuedSpawner {
    fn spawn(&self, task: LocalTask) {
        self.queue.borrow_mut().push_back(task);
    }
}
