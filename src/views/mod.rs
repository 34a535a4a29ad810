//! Page orchestrators: compose filter state, the shared cache, and the
//! view-model mappers per screen. Thin by design — all reusable logic lives
//! in `cache`, `filters`, and `viewmodel`.

pub mod due_activities;
pub mod scorecard;
pub mod session;
pub mod users;
pub mod weekly_report;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ViewRefresh;
use crate::error::FetchError;
use crate::filters::RequestDescriptor;
use crate::state::AppState;

/// Idle sleep for pollers whose view has revalidation disabled; they wake
/// periodically to notice a config change.
pub(crate) const POLLER_IDLE_SECS: u64 = 300;

/// Fetch a request through the shared cache, deduplicating and honoring the
/// view's freshness window.
pub(crate) async fn load_json(
    state: &AppState,
    request: &RequestDescriptor,
    refresh: ViewRefresh,
) -> Result<Value, FetchError> {
    let key = request.cache_key();
    let loader = state.loader.clone();
    let descriptor = request.clone();
    state
        .cache
        .fetch(&key, refresh.freshness(), move || async move {
            loader.load(&descriptor).await
        })
        .await
}

/// Decode a raw cached body into its typed payload.
///
/// A body that parses as JSON but violates the schema is as malformed as a
/// non-JSON one.
pub(crate) fn decode<T: DeserializeOwned>(
    value: Value,
    endpoint: &str,
) -> Result<T, FetchError> {
    serde_json::from_value(value)
        .map_err(|e| FetchError::Malformed(format!("{}: {}", endpoint, e)))
}

#[cfg(test)]
pub(crate) mod testing {
    //! Stub loader for orchestrator tests: canned responses per cache key,
    //! with a call counter for de-duplication assertions.

    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::Value;

    use crate::error::FetchError;
    use crate::fetcher::ApiLoader;
    use crate::filters::RequestDescriptor;

    #[derive(Default)]
    pub struct StubLoader {
        responses: HashMap<String, Result<Value, FetchError>>,
        calls: AtomicUsize,
    }

    impl StubLoader {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(mut self, key: &str, body: Value) -> Self {
            self.responses.insert(key.to_string(), Ok(body));
            self
        }

        pub fn fail(mut self, key: &str, err: FetchError) -> Self {
            self.responses.insert(key.to_string(), Err(err));
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ApiLoader for StubLoader {
        async fn load(&self, request: &RequestDescriptor) -> Result<Value, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .get(&request.cache_key())
                .cloned()
                .unwrap_or_else(|| {
                    Err(FetchError::Network(format!(
                        "no stub for {}",
                        request.cache_key()
                    )))
                })
        }
    }
}
