//! Salesperson lookup for the filter dropdowns.
//!
//! More than one filter bar fetches this list, so it goes through the shared
//! cache like everything else. A failure here degrades gracefully — the
//! dropdown simply lacks options — and never blocks the main view.

use crate::filters::users_request;
use crate::state::AppState;
use crate::types::SalesUser;

/// Fetch the salesperson list, returning an empty list on any failure.
pub async fn load_users(state: &AppState) -> Vec<SalesUser> {
    let request = users_request();
    let refresh = state.view_refresh(|v| v.users);

    let value = match super::load_json(state, &request, refresh).await {
        Ok(value) => value,
        Err(e) => {
            log::warn!("users lookup failed, dropdown will be empty: {}", e);
            return Vec::new();
        }
    };

    match super::decode::<Vec<SalesUser>>(value, request.endpoint) {
        Ok(users) => users,
        Err(e) => {
            log::warn!("users decode failed, dropdown will be empty: {}", e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::FetchError;
    use crate::views::testing::StubLoader;
    use serde_json::json;
    use std::sync::Arc;

    fn state_with(loader: StubLoader) -> (AppState, Arc<StubLoader>) {
        let loader = Arc::new(loader);
        let state = AppState::with_loader(
            Config::with_base_url("https://api.example.com"),
            loader.clone(),
        );
        (state, loader)
    }

    #[tokio::test]
    async fn test_users_load() {
        let (state, _) = state_with(StubLoader::new().respond(
            "/api/users",
            json!([ { "id": 1, "name": "Dana" }, { "id": 2, "name": "Omar" } ]),
        ));

        let users = load_users(&state).await;
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].name, "Dana");
    }

    #[tokio::test]
    async fn test_failure_degrades_to_empty_options() {
        let (state, _) = state_with(
            StubLoader::new().fail("/api/users", FetchError::Network("refused".into())),
        );
        assert!(load_users(&state).await.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_dropdowns_share_one_call() {
        let (state, stub) = state_with(
            StubLoader::new().respond("/api/users", json!([ { "id": 1, "name": "Dana" } ])),
        );

        let (a, b) = tokio::join!(load_users(&state), load_users(&state));
        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 1);
        assert_eq!(stub.calls(), 1);
    }
}
