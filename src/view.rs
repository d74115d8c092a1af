use crate::entry::LogEntry;
use std::fmt;

/// Placeholder shown until the simulated fetch completes.
pub const LOADING: &str = "Loading...";

/// Rendered state of a [`LifecycleDemo`](crate::demo::LifecycleDemo).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DemoView {
    pub counter: u32,
    pub payload: Option<String>,
    pub entries: Vec<LogEntry>,
}

impl DemoView {
    /// Label for the async data section.
    pub fn payload_label(&self) -> &str {
        self.payload.as_deref().unwrap_or(LOADING)
    }
}

impl fmt::Display for DemoView {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Lifecycle Methods by Phase")?;
        writeln!(f)?;
        writeln!(f, "Component State: {}  [i] Trigger Update Phase", self.counter)?;
        writeln!(f, "Async Data: {}", self.payload_label())?;
        writeln!(f)?;
        writeln!(f, "Lifecycle Method Logs:")?;

        for entry in &self.entries {
            writeln!(
                f,
                "  [{}] {}  ({})",
                entry.phase(),
                entry.title(),
                entry.timestamp()
            )?;
            for line in entry.description().lines() {
                writeln!(f, "      {line}")?;
            }
        }
        Ok(())
    }
}

/// Rendered state of the [`Host`](crate::host::Host).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShellView {
    pub demo: Option<DemoView>,
}

impl ShellView {
    /// Label of the mount toggle.
    pub fn toggle_label(&self) -> &'static str {
        if self.demo.is_some() {
            "Unmount Component"
        } else {
            "Mount Component"
        }
    }
}

impl fmt::Display for ShellView {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Component Lifecycle Demo")?;
        writeln!(f, "[t] {}", self.toggle_label())?;

        if let Some(demo) = &self.demo {
            write!(f, "\n{demo}")?;
        }
        Ok(())
    }
}
