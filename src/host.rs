use crate::{
    clock::{Clock, LocalClock},
    config::HostConfig,
    demo::{FetchRequest, LifecycleDemo},
    lifecycle::LifecycleError,
    runtime::{InstanceId, Runtime},
    sink::TraceSink,
    view::ShellView,
};
use std::{
    cell::RefCell,
    rc::{Rc, Weak},
    task::{Context, Poll},
};
use thiserror::Error;

/// Error returned by a [`Host`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("no component is mounted")]
    NotMounted,

    #[error("tasks can only be polled inside a tokio runtime")]
    NoRuntime,

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

struct Mounted {
    id: InstanceId,
    demo: Rc<RefCell<LifecycleDemo>>,
}

/// Shell that mounts, drives and unmounts a [`LifecycleDemo`].
///
/// Hooks run in this order:
/// - mount: construct, reconcile, render, post-initial-display, did-mount
/// - update: should-update, render, snapshot-before-update, did-update
/// - unmount: will-unmount, then every task of the instance is cancelled
pub struct Host {
    config: HostConfig,
    sink: Box<dyn TraceSink>,
    clock: Rc<dyn Clock>,
    rt: Runtime,
    mounted: Option<Mounted>,
    next_id: u64,
}

impl Host {
    /// Create a new host, mounting the component if [`HostConfig::initially_mounted`] is set.
    pub fn new(config: HostConfig, sink: impl TraceSink + 'static) -> Self {
        Self::with_clock(config, sink, LocalClock)
    }

    /// Create a new host that stamps log entries with `clock`.
    pub fn with_clock(
        config: HostConfig,
        sink: impl TraceSink + 'static,
        clock: impl Clock + 'static,
    ) -> Self {
        let mut me = Self {
            config,
            sink: Box::new(sink),
            clock: Rc::new(clock),
            rt: Runtime::new(),
            mounted: None,
            next_id: 0,
        };
        if me.config.initially_mounted {
            if let Err(_error) = me.mount() {
                #[cfg(feature = "tracing")]
                tracing::error!(error = %_error, "initial mount failed");
            }
        }
        me
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    /// Identifier of the mounted instance.
    pub fn instance(&self) -> Option<InstanceId> {
        self.mounted.as_ref().map(|mounted| mounted.id)
    }

    /// Borrow the mounted component.
    pub fn demo(&self) -> Option<std::cell::Ref<'_, LifecycleDemo>> {
        self.mounted.as_ref().map(|mounted| mounted.demo.borrow())
    }

    pub fn runtime(&self) -> &Runtime {
        &self.rt
    }

    /// Flip the mount toggle.
    pub fn toggle(&mut self) -> Result<(), HostError> {
        if self.mounted.is_some() {
            self.unmount()
        } else {
            self.mount()
        }
    }

    /// User action: increment the mounted component's counter.
    pub fn increment(&mut self) -> Result<(), HostError> {
        let mounted = self.mounted.as_ref().ok_or(HostError::NotMounted)?;
        update_pass(&mut mounted.demo.borrow_mut(), LifecycleDemo::increment)?;
        Ok(())
    }

    /// Poll ready tasks and run queued updates without waiting.
    ///
    /// Returns `true` if any work was done.
    ///
    /// # Errors
    /// Returns [`HostError::NoRuntime`] if a task is ready but this is not called
    /// from within a tokio runtime. The task stays queued.
    ///
    /// # Panics
    /// Panics if the surrounding tokio runtime was built without the time driver.
    pub fn try_settle(&mut self) -> Result<bool, HostError> {
        if self.rt.has_ready_tasks() && tokio::runtime::Handle::try_current().is_err() {
            return Err(HostError::NoRuntime);
        }

        let is_polled = self.rt.poll_tasks();
        let is_updated = self.rt.run_updates()?;
        Ok(is_polled || is_updated)
    }

    /// Poll for the next unit of work.
    pub fn poll_settle(&mut self, cx: &mut Context) -> Poll<Result<(), HostError>> {
        self.rt.set_waker(cx.waker());

        match self.try_settle() {
            Ok(true) => Poll::Ready(Ok(())),
            Ok(false) => Poll::Pending,
            Err(error) => Poll::Ready(Err(error)),
        }
    }

    /// Wait for the next unit of work and process it.
    pub async fn settle(&mut self) -> Result<(), HostError> {
        futures::future::poll_fn(|cx| self.poll_settle(cx)).await
    }

    /// Process work until no task is alive and no update is queued.
    pub async fn run_until_idle(&mut self) -> Result<(), HostError> {
        while !self.rt.is_idle() {
            self.settle().await?;
        }
        Ok(())
    }

    /// Render the shell.
    pub fn view(&self) -> Result<ShellView, HostError> {
        let demo = match &self.mounted {
            Some(mounted) => Some(mounted.demo.borrow().render()?),
            None => None,
        };
        Ok(ShellView { demo })
    }

    fn mount(&mut self) -> Result<(), HostError> {
        let demo = LifecycleDemo::with_fetch(self.clock.clone(), self.config.fetch());
        self.mount_instance(demo)
    }

    /// Run the mount sequence on `demo` and store it only if every hook succeeds.
    fn mount_instance(&mut self, mut demo: LifecycleDemo) -> Result<(), HostError> {
        let id = InstanceId(self.next_id);
        self.next_id += 1;

        #[cfg(feature = "tracing")]
        tracing::debug!(?id, "mount");

        let fetch = mount_sequence(&mut demo)?;

        let demo = Rc::new(RefCell::new(demo));
        self.spawn_fetch(id, Rc::downgrade(&demo), fetch);
        self.mounted = Some(Mounted { id, demo });
        Ok(())
    }

    fn unmount(&mut self) -> Result<(), HostError> {
        let mounted = self.mounted.take().ok_or(HostError::NotMounted)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(id = ?mounted.id, "unmount");

        let result = mounted.demo.borrow_mut().will_unmount(&*self.sink);
        self.rt.cancel_owned_by(mounted.id);
        result?;
        Ok(())
    }

    fn spawn_fetch(&self, id: InstanceId, demo: Weak<RefCell<LifecycleDemo>>, fetch: FetchRequest) {
        let rt = self.rt.clone();

        self.rt.spawn(id, async move {
            tokio::time::sleep(fetch.delay).await;

            let payload = fetch.payload;
            rt.update(move || {
                // The instance may be gone if it was unmounted after this update was queued.
                let Some(demo) = demo.upgrade() else {
                    return Ok(());
                };
                let mut demo = demo.borrow_mut();
                update_pass(&mut demo, move |demo| demo.receive_payload(payload).map(drop))
            });
        });
    }
}

fn mount_sequence(demo: &mut LifecycleDemo) -> Result<FetchRequest, LifecycleError> {
    demo.reconcile()?;
    demo.render()?;
    demo.post_initial_display()?;
    demo.did_mount()
}

/// Apply `change` to `demo` inside a full update pass.
fn update_pass(
    demo: &mut LifecycleDemo,
    change: impl FnOnce(&mut LifecycleDemo) -> Result<(), LifecycleError>,
) -> Result<(), LifecycleError> {
    let prev = demo.snapshot();
    change(demo)?;

    demo.should_update(&prev)?;
    demo.render()?;
    demo.snapshot_before_update(&prev)?;
    demo.did_update(&prev)
}

#[cfg(test)]
mod tests {
    use super::{mount_sequence, Host, HostError};
    use crate::{
        clock::FixedClock,
        config::HostConfig,
        demo::LifecycleDemo,
        lifecycle::{Hook, LifecycleError, Stage},
        sink::MemorySink,
    };
    use std::rc::Rc;

    fn host(config: HostConfig) -> (Host, MemorySink) {
        let sink = MemorySink::new();
        let host = Host::with_clock(config, sink.clone(), FixedClock::new("9:00:00 AM"));
        (host, sink)
    }

    #[test]
    fn it_starts_mounted_by_default() {
        let (host, _) = host(HostConfig::default());

        assert!(host.is_mounted());
        assert_eq!(host.demo().unwrap().log().len(), 4);
        assert_eq!(host.runtime().task_count(), 1);
    }

    #[test]
    fn it_can_start_unmounted() {
        let (mut host, sink) = host(HostConfig::default().with_initially_mounted(false));

        assert!(!host.is_mounted());
        assert_eq!(host.increment(), Err(HostError::NotMounted));
        assert!(host.view().unwrap().demo.is_none());
        assert!(host.runtime().is_idle());

        host.toggle().unwrap();
        assert!(host.is_mounted());
        assert!(sink.is_empty());
    }

    #[test]
    fn it_cancels_the_fetch_on_unmount() {
        let (mut host, sink) = host(HostConfig::default());

        host.toggle().unwrap();

        assert!(!host.is_mounted());
        assert!(host.runtime().is_idle());
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn it_remounts_with_a_fresh_instance() {
        let (mut host, _) = host(HostConfig::default());
        let first = host.instance().unwrap();
        host.increment().unwrap();

        host.toggle().unwrap();
        host.toggle().unwrap();

        assert_ne!(host.instance().unwrap(), first);
        let demo = host.demo().unwrap();
        assert_eq!(demo.counter(), 0);
        assert_eq!(demo.log().len(), 4);
    }

    #[test]
    fn it_requires_a_runtime_to_poll_tasks() {
        let (mut host, _) = host(HostConfig::default());

        assert_eq!(host.try_settle(), Err(HostError::NoRuntime));
        assert!(host.runtime().has_ready_tasks());
        assert_eq!(host.runtime().task_count(), 1);

        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        assert_eq!(rt.block_on(async { host.try_settle() }), Ok(true));
        assert!(!host.runtime().has_ready_tasks());
        assert_eq!(host.runtime().task_count(), 1);

        drop(host);
    }

    #[test]
    fn it_does_not_keep_a_failed_mount() {
        let (mut host, _) = host(HostConfig::default().with_initially_mounted(false));

        let mut demo = LifecycleDemo::new(Rc::new(FixedClock::new("")));
        mount_sequence(&mut demo).unwrap();

        assert_eq!(
            host.mount_instance(demo),
            Err(HostError::Lifecycle(LifecycleError::InvalidTransition {
                hook: Hook::Reconcile,
                stage: Stage::Mounted
            }))
        );
        assert!(!host.is_mounted());
        assert!(host.runtime().is_idle());
    }
}
