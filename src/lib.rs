//! # lifecycle-log
//! Visualize the order in which a UI component's lifecycle hooks run.
//!
//! A [`Host`](host::Host) mounts a [`LifecycleDemo`](demo::LifecycleDemo) and drives its hooks.
//! Every hook appends an immutable [`LogEntry`](entry::LogEntry) to the component's log,
//! which is rendered as a list of phase, title, timestamp and description.
//!
//! ```
//! use lifecycle_log::prelude::*;
//!
//! let mut host = Host::new(HostConfig::default(), MemorySink::new());
//! host.increment().unwrap();
//!
//! let demo = host.demo().unwrap();
//! assert_eq!(demo.counter(), 1);
//! assert_eq!(demo.log()[0].phase(), Phase::Mounting);
//! ```
//!
//! ## Hooks
//! The lifecycle is an explicit state machine (see [`lifecycle`]).
//! Hooks called out of order return a [`LifecycleError`](lifecycle::LifecycleError)
//! and leave the log untouched.
//!
//! ## Deferred work
//! Mounting schedules a simulated fetch on the host's [`Runtime`](runtime::Runtime).
//! Tasks are cancelled when their instance is unmounted,
//! so a late fetch can never touch a torn-down component.

#![cfg_attr(docsrs, feature(doc_cfg))]

/// Prelude of commonly-used types.
/// `use lifecycle_log::prelude::*;`
pub mod prelude {
    pub use crate::{
        clock::{Clock, FixedClock, LocalClock},
        config::HostConfig,
        demo::{FetchRequest, LifecycleDemo, Snapshot},
        entry::{Log, LogEntry, Phase},
        host::{Host, HostError},
        lifecycle::{Hook, Lifecycle, LifecycleError, Stage},
        sink::{MemorySink, TraceEvent, TraceSink},
        view::{DemoView, ShellView},
    };

    #[cfg(feature = "tracing")]
    pub use crate::sink::TracingSink;
}

pub mod clock;

pub mod config;

pub mod demo;

pub mod entry;

pub mod host;

pub mod lifecycle;

pub mod runtime;

pub mod sink;

pub mod view;
