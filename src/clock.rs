use std::rc::Rc;

/// Source of the human-readable timestamps stamped on log entries.
pub trait Clock {
    /// Current time formatted for display.
    fn timestamp(&self) -> String;
}

/// Wall clock in the local timezone, formatted as `3:04:05 PM`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn timestamp(&self) -> String {
        chrono::Local::now().format("%-I:%M:%S %p").to_string()
    }
}

/// Clock that always reports the same time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixedClock(pub String);

impl FixedClock {
    pub fn new(timestamp: impl Into<String>) -> Self {
        Self(timestamp.into())
    }
}

impl Clock for FixedClock {
    fn timestamp(&self) -> String {
        self.0.clone()
    }
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn timestamp(&self) -> String {
        (**self).timestamp()
    }
}
