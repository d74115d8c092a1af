use crate::demo::{FetchRequest, FETCH_DELAY, FETCH_PAYLOAD};
use std::time::Duration;

/// Configuration for a [`Host`](crate::host::Host).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostConfig {
    /// Delay before the simulated fetch completes.
    pub fetch_delay: Duration,
    /// Payload delivered by the simulated fetch.
    pub fetch_payload: String,
    /// Mount the component when the host is created.
    pub initially_mounted: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            fetch_delay: FETCH_DELAY,
            fetch_payload: FETCH_PAYLOAD.to_owned(),
            initially_mounted: true,
        }
    }
}

impl HostConfig {
    pub fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = delay;
        self
    }

    pub fn with_fetch_payload(mut self, payload: impl Into<String>) -> Self {
        self.fetch_payload = payload.into();
        self
    }

    pub fn with_initially_mounted(mut self, is_mounted: bool) -> Self {
        self.initially_mounted = is_mounted;
        self
    }

    pub(crate) fn fetch(&self) -> FetchRequest {
        FetchRequest {
            delay: self.fetch_delay,
            payload: self.fetch_payload.clone(),
        }
    }
}
