use crate::lifecycle::LifecycleError;
use crossbeam_queue::SegQueue;
use futures::task::AtomicWaker;
use slotmap::{new_key_type, SlotMap};
use std::{
    cell::RefCell,
    future::Future,
    mem,
    pin::Pin,
    rc::Rc,
    sync::Arc,
    task::{Context, Poll, Wake, Waker},
};

type LocalFuture = Pin<Box<dyn Future<Output = ()>>>;

type Update = Box<dyn FnOnce() -> Result<(), LifecycleError>>;

new_key_type! {
    /// Key of a task spawned on a [`Runtime`].
    pub struct TaskKey;
}

/// Identifier of one mounted component instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(pub u64);

struct Task {
    owner: InstanceId,
    /// `None` while the task is being polled.
    future: Option<LocalFuture>,
}

/// Single-threaded executor for deferred component work.
///
/// Tasks are owned by the instance that spawned them and are dropped,
/// and therefore cancelled, with [`Runtime::cancel_owned_by`].
#[derive(Clone, Default)]
pub struct Runtime {
    /// Local tasks stored on this runtime.
    tasks: Rc<RefCell<SlotMap<TaskKey, Task>>>,

    /// Queue for ready local tasks.
    task_queue: Arc<SegQueue<TaskKey>>,

    /// Queue for updates that mutate component state.
    update_queue: Rc<SegQueue<Update>>,

    /// Waker of whoever is driving this runtime.
    waker: Arc<AtomicWaker>,
}

impl Runtime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a task owned by `owner`.
    pub fn spawn(&self, owner: InstanceId, future: impl Future<Output = ()> + 'static) -> TaskKey {
        let key = self.tasks.borrow_mut().insert(Task {
            owner,
            future: Some(Box::pin(future)),
        });

        #[cfg(feature = "tracing")]
        tracing::trace!(?key, ?owner, "spawn task");

        self.task_queue.push(key);
        self.wake();
        key
    }

    /// Queue an update to run on the next [`Runtime::run_updates`].
    pub fn update(&self, f: impl FnOnce() -> Result<(), LifecycleError> + 'static) {
        self.update_queue.push(Box::new(f));
        self.wake();
    }

    /// Drop every task owned by `owner`, returning how many were cancelled.
    pub fn cancel_owned_by(&self, owner: InstanceId) -> usize {
        let mut tasks = self.tasks.borrow_mut();
        let len = tasks.len();
        tasks.retain(|_, task| task.owner != owner);

        let cancelled = len - tasks.len();

        #[cfg(feature = "tracing")]
        tracing::trace!(?owner, cancelled, "cancel tasks");

        cancelled
    }

    /// Number of tasks that have not completed.
    pub fn task_count(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Returns `true` if no task is alive and no update is queued.
    pub fn is_idle(&self) -> bool {
        self.task_count() == 0 && self.update_queue.is_empty()
    }

    /// Register the waker notified when new work becomes ready.
    pub fn set_waker(&self, waker: &Waker) {
        self.waker.register(waker);
    }

    /// Returns `true` if a task is waiting to be polled.
    pub fn has_ready_tasks(&self) -> bool {
        !self.task_queue.is_empty()
    }

    /// Poll every ready task once, returning `true` if any were polled.
    ///
    /// # Panics
    /// Propagates a panic from a task. The panicking task is removed first.
    pub fn poll_tasks(&self) -> bool {
        let mut is_ready = false;

        while let Some(key) = self.task_queue.pop() {
            // Keys of completed or cancelled tasks may still be queued.
            let Some(mut future) = self
                .tasks
                .borrow_mut()
                .get_mut(key)
                .and_then(|task| task.future.take())
            else {
                continue;
            };

            let waker = Waker::from(Arc::new(TaskWaker {
                key,
                queue: self.task_queue.clone(),
                waker: self.waker.clone(),
            }));
            let mut cx = Context::from_waker(&waker);

            let guard = RemoveOnUnwind {
                tasks: &self.tasks,
                key,
            };
            let poll = future.as_mut().poll(&mut cx);
            mem::forget(guard);
            is_ready = true;

            let mut tasks = self.tasks.borrow_mut();
            match poll {
                Poll::Ready(()) => {
                    tasks.remove(key);
                }
                Poll::Pending => {
                    if let Some(task) = tasks.get_mut(key) {
                        task.future = Some(future);
                    }
                }
            }
        }

        is_ready
    }

    /// Run every queued update, returning `true` if any ran.
    pub fn run_updates(&self) -> Result<bool, LifecycleError> {
        let mut is_ready = false;

        while let Some(update) = self.update_queue.pop() {
            update()?;
            is_ready = true;
        }

        Ok(is_ready)
    }

    fn wake(&self) {
        self.waker.wake();
    }
}

/// Removes a task whose poll unwound, so it is not left without a future.
struct RemoveOnUnwind<'a> {
    tasks: &'a RefCell<SlotMap<TaskKey, Task>>,
    key: TaskKey,
}

impl Drop for RemoveOnUnwind<'_> {
    fn drop(&mut self) {
        if let Ok(mut tasks) = self.tasks.try_borrow_mut() {
            tasks.remove(self.key);
        }
    }
}

struct TaskWaker {
    key: TaskKey,
    queue: Arc<SegQueue<TaskKey>>,
    waker: Arc<AtomicWaker>,
}

impl Wake for TaskWaker {
    fn wake(self: Arc<Self>) {
        self.queue.push(self.key);
        self.waker.wake();
    }
}
