//! The lifecycle logging component.
//!
//! [`LifecycleDemo`] appends one [`LogEntry`] per hook it observes.
//! The hooks are plain methods: whoever hosts the component decides when they run
//! (see [`Host`](crate::host::Host) for the order used by this crate).

use crate::{
    clock::Clock,
    entry::{Log, LogEntry, Phase},
    lifecycle::{Lifecycle, LifecycleError, Stage},
    sink::{TraceEvent, TraceSink},
    view::DemoView,
};
use std::{rc::Rc, time::Duration};

const CONSTRUCTOR: &str = "First method called. Used for:\n\
    • Initializing state\n\
    • Binding methods\n\
    • Setting up initial configuration";

const DERIVE_STATE: &str = "Static method called before render. Used for:\n\
    • Syncing state with props\n\
    • Replacing componentWillReceiveProps\n\
    • Must return new state or null";

const RENDER: &str = "Required method that returns JSX. Called when:\n\
    • Initial mount\n\
    • State changes\n\
    • Props changes\n\
    • Parent re-renders";

const DID_MOUNT: &str = "Called after component is mounted to DOM. Perfect for:\n\
    • API calls\n\
    • Subscriptions\n\
    • DOM manipulations\n\
    • Setting up timers";

const SHOULD_UPDATE: &str = "Performance optimization method. Used for:\n\
    • Controlling re-renders\n\
    • Preventing unnecessary updates\n\
    • Must return true or false";

const SNAPSHOT: &str = "Called right before DOM updates. Used for:\n\
    • Capturing DOM info (e.g., scroll position)\n\
    • Passing values to componentDidUpdate\n\
    • Must return value or null";

const DID_UPDATE: &str = "Called after component updates. Used for:\n\
    • Side effects after render\n\
    • Network requests based on prop/state changes\n\
    • DOM manipulations";

const WILL_UNMOUNT: &str = "Called before component is destroyed. Used for:\n\
    • Cleanup tasks\n\
    • Cancelling network requests\n\
    • Removing event listeners\n\
    • Clearing timers";

/// Default delay of the simulated fetch.
pub const FETCH_DELAY: Duration = Duration::from_millis(1500);

/// Default payload of the simulated fetch.
pub const FETCH_PAYLOAD: &str = "Fetched data";

/// Simulated network fetch requested by [`LifecycleDemo::did_mount`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchRequest {
    /// Time to wait before the payload arrives.
    pub delay: Duration,
    /// Value delivered to [`LifecycleDemo::receive_payload`].
    pub payload: String,
}

impl Default for FetchRequest {
    fn default() -> Self {
        Self {
            delay: FETCH_DELAY,
            payload: FETCH_PAYLOAD.to_owned(),
        }
    }
}

/// State captured before an update is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub counter: u32,
}

/// Component that logs its own lifecycle.
pub struct LifecycleDemo {
    counter: u32,
    log: Log,
    async_payload: Option<String>,
    error: Option<LifecycleError>,
    lifecycle: Lifecycle,
    fetch: FetchRequest,
    clock: Rc<dyn Clock>,
}

impl LifecycleDemo {
    /// Construct a new component with the default [`FetchRequest`].
    pub fn new(clock: Rc<dyn Clock>) -> Self {
        Self::with_fetch(clock, FetchRequest::default())
    }

    /// Construct a new component, logging the constructor.
    pub fn with_fetch(clock: Rc<dyn Clock>, fetch: FetchRequest) -> Self {
        let mut me = Self {
            counter: 0,
            log: Log::new(),
            async_payload: None,
            error: None,
            lifecycle: Lifecycle::constructed(),
            fetch,
            clock,
        };
        me.append(Phase::Mounting, "1. Constructor", CONSTRUCTOR);
        me
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }

    pub fn log(&self) -> &Log {
        &self.log
    }

    pub fn async_payload(&self) -> Option<&str> {
        self.async_payload.as_deref()
    }

    /// Error slot. Nothing in this component sets it.
    pub fn error(&self) -> Option<&LifecycleError> {
        self.error.as_ref()
    }

    pub fn stage(&self) -> Stage {
        self.lifecycle.stage()
    }

    /// Capture the state an update pass compares against.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            counter: self.counter,
        }
    }

    /// Props/state reconciliation pass.
    ///
    /// The phase is inferred from the log: with only the constructor entry
    /// present the component is still mounting.
    pub fn reconcile(&mut self) -> Result<(), LifecycleError> {
        self.lifecycle.reconcile()?;

        if self.log.len() == 1 {
            self.append(Phase::Mounting, "2. getDerivedStateFromProps", DERIVE_STATE);
        } else {
            self.append(Phase::Updating, "1. getDerivedStateFromProps", DERIVE_STATE);
        }
        Ok(())
    }

    /// Render this component.
    pub fn render(&self) -> Result<DemoView, LifecycleError> {
        self.lifecycle.render()?;

        Ok(DemoView {
            counter: self.counter,
            payload: self.async_payload.clone(),
            entries: self.log.as_slice().to_vec(),
        })
    }

    /// Runs once after the first render is displayed.
    ///
    /// Logs the initial render when only the constructor and reconciliation
    /// entries exist so far.
    pub fn post_initial_display(&mut self) -> Result<(), LifecycleError> {
        if self.lifecycle.post_initial_display()? && self.log.len() == 2 {
            self.append(Phase::Mounting, "3. render", RENDER);
        }
        Ok(())
    }

    /// Runs after the component is first attached.
    ///
    /// Returns the simulated fetch the host should schedule.
    pub fn did_mount(&mut self) -> Result<FetchRequest, LifecycleError> {
        self.lifecycle.did_mount()?;
        self.append(Phase::Mounting, "4. componentDidMount", DID_MOUNT);

        Ok(self.fetch.clone())
    }

    /// Decide whether a pending update should be applied. Always approves.
    pub fn should_update(&mut self, prev: &Snapshot) -> Result<bool, LifecycleError> {
        self.lifecycle.should_update()?;

        if prev.counter != self.counter {
            self.append(Phase::Updating, "2. shouldComponentUpdate", SHOULD_UPDATE);
        }
        Ok(true)
    }

    /// Runs right before changes are committed.
    pub fn snapshot_before_update(&mut self, prev: &Snapshot) -> Result<(), LifecycleError> {
        self.lifecycle.snapshot_before_update()?;

        if prev.counter != self.counter {
            self.append(Phase::Updating, "4. getSnapshotBeforeUpdate", SNAPSHOT);
        }
        Ok(())
    }

    /// Runs after changes are committed.
    pub fn did_update(&mut self, prev: &Snapshot) -> Result<(), LifecycleError> {
        self.lifecycle.did_update()?;

        if prev.counter != self.counter {
            self.append(Phase::Updating, "5. componentDidUpdate", DID_UPDATE);
        }
        Ok(())
    }

    /// Runs before the component is destroyed.
    ///
    /// Emits a single diagnostic to `sink`; the on-screen log is untouched.
    pub fn will_unmount(&mut self, sink: &dyn TraceSink) -> Result<(), LifecycleError> {
        self.lifecycle.will_unmount()?;

        sink.record(TraceEvent {
            phase: Phase::Unmounting,
            title: "componentWillUnmount".to_owned(),
            description: WILL_UNMOUNT.to_owned(),
        });
        Ok(())
    }

    /// User action: increment the counter and log a render marker.
    ///
    /// Only accepted once the component is mounted and not inside an update pass.
    pub fn increment(&mut self) -> Result<(), LifecycleError> {
        self.lifecycle.set_state()?;

        self.counter += 1;
        self.append(Phase::Updating, "3. render", RENDER);
        Ok(())
    }

    /// Deliver the simulated fetch result.
    ///
    /// The payload is set at most once. Returns `false` if one was already present.
    pub fn receive_payload(&mut self, payload: impl Into<String>) -> Result<bool, LifecycleError> {
        self.lifecycle.set_state()?;

        if self.async_payload.is_some() {
            return Ok(false);
        }
        self.async_payload = Some(payload.into());
        Ok(true)
    }

    fn append(&mut self, phase: Phase, title: &str, description: &str) {
        let entry = LogEntry::new(phase, title, description, self.clock.timestamp());

        #[cfg(feature = "tracing")]
        tracing::debug!(%phase, title, idx = self.log.len(), "log entry");

        self.log.push(entry);
    }
}
