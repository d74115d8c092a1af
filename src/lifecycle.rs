//! Explicit lifecycle state machine.
//!
//! ```text
//! Uninitialized -> Constructed -> AwaitingFirstRender -> Mounted <-> Updating
//!                                                                  \-> Unmounted
//! ```
//!
//! Each hook is a named transition on [`Lifecycle`].
//! Calling a hook from a stage that does not allow it returns a [`LifecycleError`]
//! and leaves the stage unchanged.

use std::fmt;
use thiserror::Error;

/// Stage of a component's existence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Not yet constructed.
    Uninitialized,
    /// Constructed, but state has not been reconciled.
    Constructed,
    /// Reconciled and waiting to be displayed and attached.
    AwaitingFirstRender,
    /// Attached and idle.
    Mounted,
    /// Inside an update pass.
    Updating,
    /// Torn down. Terminal.
    Unmounted,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Stage::Uninitialized => "uninitialized",
            Stage::Constructed => "constructed",
            Stage::AwaitingFirstRender => "awaiting first render",
            Stage::Mounted => "mounted",
            Stage::Updating => "updating",
            Stage::Unmounted => "unmounted",
        })
    }
}

/// Lifecycle hook, named after the transition it drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Hook {
    Construct,
    Reconcile,
    Render,
    PostInitialDisplay,
    DidMount,
    ShouldUpdate,
    SnapshotBeforeUpdate,
    DidUpdate,
    WillUnmount,
    SetState,
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Hook::Construct => "construct",
            Hook::Reconcile => "reconcile",
            Hook::Render => "render",
            Hook::PostInitialDisplay => "post_initial_display",
            Hook::DidMount => "did_mount",
            Hook::ShouldUpdate => "should_update",
            Hook::SnapshotBeforeUpdate => "snapshot_before_update",
            Hook::DidUpdate => "did_update",
            Hook::WillUnmount => "will_unmount",
            Hook::SetState => "set_state",
        })
    }
}

/// Error returned by a hook called out of order.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("`{hook}` cannot run while the component is {stage}")]
    InvalidTransition { hook: Hook, stage: Stage },

    #[error("`{hook}` called after the component was unmounted")]
    Unmounted { hook: Hook },
}

/// Lifecycle state machine of a single component instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lifecycle {
    stage: Stage,
    is_displayed: bool,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    /// Create a new state machine in [`Stage::Uninitialized`].
    pub fn new() -> Self {
        Self {
            stage: Stage::Uninitialized,
            is_displayed: false,
        }
    }

    /// Create a new state machine in [`Stage::Constructed`].
    pub fn constructed() -> Self {
        Self {
            stage: Stage::Constructed,
            is_displayed: false,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Returns `true` once the first display has been recorded.
    pub fn is_displayed(&self) -> bool {
        self.is_displayed
    }

    pub fn construct(&mut self) -> Result<(), LifecycleError> {
        self.transition(Hook::Construct, &[Stage::Uninitialized], Stage::Constructed)
    }

    /// Reconcile state before rendering.
    ///
    /// Runs once while mounting, and may run again inside an update pass.
    pub fn reconcile(&mut self) -> Result<(), LifecycleError> {
        match self.stage {
            Stage::Updating => self.stay(Hook::Reconcile, &[Stage::Updating]),
            _ => self.transition(
                Hook::Reconcile,
                &[Stage::Constructed],
                Stage::AwaitingFirstRender,
            ),
        }
    }

    /// Check that the component can currently be rendered.
    pub fn render(&self) -> Result<(), LifecycleError> {
        self.check(
            Hook::Render,
            &[Stage::AwaitingFirstRender, Stage::Mounted, Stage::Updating],
        )
    }

    /// Record the first display of the component.
    ///
    /// Returns `true` the first time this is called and `false` afterwards.
    pub fn post_initial_display(&mut self) -> Result<bool, LifecycleError> {
        self.check(Hook::PostInitialDisplay, &[Stage::AwaitingFirstRender])?;

        let is_first = !self.is_displayed;
        self.is_displayed = true;
        Ok(is_first)
    }

    pub fn did_mount(&mut self) -> Result<(), LifecycleError> {
        self.transition(Hook::DidMount, &[Stage::AwaitingFirstRender], Stage::Mounted)
    }

    /// Enter an update pass.
    pub fn should_update(&mut self) -> Result<(), LifecycleError> {
        self.transition(Hook::ShouldUpdate, &[Stage::Mounted], Stage::Updating)
    }

    pub fn snapshot_before_update(&self) -> Result<(), LifecycleError> {
        self.check(Hook::SnapshotBeforeUpdate, &[Stage::Updating])
    }

    /// Leave an update pass.
    pub fn did_update(&mut self) -> Result<(), LifecycleError> {
        self.transition(Hook::DidUpdate, &[Stage::Updating], Stage::Mounted)
    }

    /// Check that state can be changed outside of an update pass.
    ///
    /// Only a mounted, idle component accepts state changes.
    pub fn set_state(&self) -> Result<(), LifecycleError> {
        self.check(Hook::SetState, &[Stage::Mounted])
    }

    pub fn will_unmount(&mut self) -> Result<(), LifecycleError> {
        self.transition(
            Hook::WillUnmount,
            &[
                Stage::Constructed,
                Stage::AwaitingFirstRender,
                Stage::Mounted,
                Stage::Updating,
            ],
            Stage::Unmounted,
        )
    }

    fn check(&self, hook: Hook, allowed: &[Stage]) -> Result<(), LifecycleError> {
        if self.stage == Stage::Unmounted {
            return Err(LifecycleError::Unmounted { hook });
        }

        if allowed.contains(&self.stage) {
            Ok(())
        } else {
            Err(LifecycleError::InvalidTransition {
                hook,
                stage: self.stage,
            })
        }
    }

    fn stay(&self, hook: Hook, allowed: &[Stage]) -> Result<(), LifecycleError> {
        self.check(hook, allowed)?;

        #[cfg(feature = "tracing")]
        tracing::trace!(%hook, stage = %self.stage, "lifecycle hook");

        Ok(())
    }

    fn transition(&mut self, hook: Hook, allowed: &[Stage], to: Stage) -> Result<(), LifecycleError> {
        self.check(hook, allowed)?;

        #[cfg(feature = "tracing")]
        tracing::trace!(%hook, from = %self.stage, %to, "lifecycle transition");

        self.stage = to;
        Ok(())
    }
}
