//! Scripted fetcher shared by the driver tests.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use steamdex_core::{AppId, DetailOutcome};
use steamdex_fetch::{DetailFetcher, FetchError};

/// One scripted response step.
#[derive(Debug, Clone)]
pub(crate) enum StubStep {
    Found(serde_json::Value),
    Absent,
    Fail,
    RateLimit,
}

/// Fetcher driven by per-ID scripts; the last step of a script
/// repeats forever, and unscripted IDs report absent. Every call is
/// recorded so tests can assert on attempt counts.
pub(crate) struct StubFetcher {
    scripts: Mutex<HashMap<AppId, VecDeque<StubStep>>>,
    calls: Mutex<Vec<AppId>>,
}

impl StubFetcher {
    pub(crate) fn new() -> Self {
        Self {
            scripts: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Scripts an ID to always return this record.
    pub(crate) fn with_record(self, id: AppId, record: serde_json::Value) -> Self {
        self.with_script(id, vec![StubStep::Found(record)])
    }

    /// Scripts an ID to always report absent.
    pub(crate) fn with_absent(self, id: AppId) -> Self {
        self.with_script(id, vec![StubStep::Absent])
    }

    /// Scripts an ID to always fail with a retryable error.
    pub(crate) fn with_failures(self, id: AppId) -> Self {
        self.with_script(id, vec![StubStep::Fail])
    }

    /// Scripts an explicit step sequence for an ID.
    pub(crate) fn with_script(self, id: AppId, steps: Vec<StubStep>) -> Self {
        self.scripts.lock().unwrap().insert(id, steps.into());
        self
    }

    /// All calls made, in order.
    pub(crate) fn calls(&self) -> Vec<AppId> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of calls made for one ID.
    pub(crate) fn call_count(&self, id: AppId) -> usize {
        self.calls.lock().unwrap().iter().filter(|&&c| c == id).count()
    }
}

#[async_trait]
impl DetailFetcher for StubFetcher {
    async fn fetch_detail(&self, app_id: AppId) -> Result<DetailOutcome, FetchError> {
        self.calls.lock().unwrap().push(app_id);

        let step = {
            let mut scripts = self.scripts.lock().unwrap();
            match scripts.get_mut(&app_id) {
                Some(script) if script.len() > 1 => script.pop_front().unwrap(),
                Some(script) => script.front().cloned().unwrap_or(StubStep::Absent),
                None => StubStep::Absent,
            }
        };

        match step {
            StubStep::Found(record) => Ok(DetailOutcome::Found(record)),
            StubStep::Absent => Ok(DetailOutcome::Absent),
            StubStep::Fail => Err(FetchError::InvalidResponse("stub failure".into())),
            StubStep::RateLimit => Err(FetchError::RateLimited { retry_after: Some(0) }),
        }
    }
}
