use std::{fmt, ops::Index, slice};

/// Coarse classification of when a lifecycle hook runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// The component is being created and attached.
    Mounting,
    /// The component is reacting to a state change.
    Updating,
    /// The component is being torn down.
    Unmounting,
}

impl Phase {
    /// Display name of this phase, e.g. `Mounting`.
    pub fn name(self) -> &'static str {
        match self {
            Phase::Mounting => "Mounting",
            Phase::Updating => "Updating",
            Phase::Unmounting => "Unmounting",
        }
    }

    /// Lower-case style class of this phase, e.g. `mounting`.
    pub fn class(self) -> &'static str {
        match self {
            Phase::Mounting => "mounting",
            Phase::Updating => "updating",
            Phase::Unmounting => "unmounting",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Immutable record of one lifecycle hook invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
    phase: Phase,
    title: String,
    description: String,
    timestamp: String,
}

impl LogEntry {
    /// Create a new entry.
    pub fn new(
        phase: Phase,
        title: impl Into<String>,
        description: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            phase,
            title: title.into(),
            description: description.into(),
            timestamp: timestamp.into(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Multi-line, bullet formatted description.
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }
}

/// Append-only sequence of [`LogEntry`]s in insertion order.
///
/// Entries can be read but never removed, replaced or reordered.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Log {
    entries: Vec<LogEntry>,
}

impl Log {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry to the end of this log.
    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&LogEntry> {
        self.entries.get(idx)
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    pub fn iter(&self) -> slice::Iter<'_, LogEntry> {
        self.entries.iter()
    }

    /// Borrow every entry as a slice.
    pub fn as_slice(&self) -> &[LogEntry] {
        &self.entries
    }
}

impl Index<usize> for Log {
    type Output = LogEntry;

    fn index(&self, idx: usize) -> &Self::Output {
        &self.entries[idx]
    }
}

impl<'a> IntoIterator for &'a Log {
    type Item = &'a LogEntry;
    type IntoIter = slice::Iter<'a, LogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
