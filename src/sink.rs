use crate::entry::Phase;
use std::{cell::RefCell, rc::Rc, sync::Arc};

/// Structured diagnostic record emitted outside of the on-screen log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceEvent {
    pub phase: Phase,
    pub title: String,
    pub description: String,
}

/// Destination for [`TraceEvent`]s.
pub trait TraceSink {
    /// Record a diagnostic event.
    fn record(&self, event: TraceEvent);
}

macro_rules! impl_trace_sink {
    ($($t:tt),*) => {
        $(
            impl<T: TraceSink + ?Sized> TraceSink for $t<T> {
                fn record(&self, event: TraceEvent) {
                    (**self).record(event);
                }
            }
        )*
    };
}

impl_trace_sink!(Box, Rc, Arc);

/// Sink that keeps every event in memory.
///
/// Clones share the same storage.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    events: Rc<RefCell<Vec<TraceEvent>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every event recorded so far.
    pub fn events(&self) -> Vec<TraceEvent> {
        self.events.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

impl TraceSink for MemorySink {
    fn record(&self, event: TraceEvent) {
        self.events.borrow_mut().push(event);
    }
}

/// Sink that emits events through [`tracing`].
#[cfg(feature = "tracing")]
#[cfg_attr(docsrs, doc(cfg(feature = "tracing")))]
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

#[cfg(feature = "tracing")]
impl TraceSink for TracingSink {
    fn record(&self, event: TraceEvent) {
        tracing::info!(
            phase = %event.phase,
            title = %event.title,
            description = %event.description,
            "lifecycle trace"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{MemorySink, TraceEvent, TraceSink};
    use crate::entry::Phase;
    use std::rc::Rc;

    fn event() -> TraceEvent {
        TraceEvent {
            phase: Phase::Unmounting,
            title: "teardown".into(),
            description: String::new(),
        }
    }

    #[test]
    fn it_shares_storage_between_clones() {
        let sink = MemorySink::new();
        let boxed: Box<dyn TraceSink> = Box::new(sink.clone());

        boxed.record(event());
        Rc::new(sink.clone()).record(event());

        assert_eq!(sink.len(), 2);
        assert_eq!(sink.events()[0], event());
    }
}
