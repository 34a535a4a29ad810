//! Configuration loaded from `~/.scorecard/config.json`.
//!
//! Supplies the API base address (never hardcoded in a production build)
//! and per-view freshness/revalidation settings. Each view's intervals are
//! independent: the scorecard revalidates on a long period while the
//! one-shot reports default to none.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub api_base_url: String,
    #[serde(default)]
    pub views: ViewsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewsConfig {
    #[serde(default = "ViewRefresh::scorecard")]
    pub scorecard: ViewRefresh,
    #[serde(default = "ViewRefresh::report")]
    pub weekly_report: ViewRefresh,
    #[serde(default = "ViewRefresh::report")]
    pub due_activities: ViewRefresh,
    #[serde(default = "ViewRefresh::report")]
    pub users: ViewRefresh,
}

/// Freshness and revalidation settings for one view.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewRefresh {
    /// Maximum age before a cached response must be refetched on access.
    pub freshness_secs: u64,
    /// Periodic revalidation interval; 0 disables the poller for this view.
    pub revalidate_secs: u64,
}

impl ViewRefresh {
    /// Scorecard default: short freshness, 10-minute revalidation.
    fn scorecard() -> Self {
        ViewRefresh {
            freshness_secs: 5,
            revalidate_secs: 600,
        }
    }

    /// One-shot reports: dedup window only, no periodic revalidation.
    fn report() -> Self {
        ViewRefresh {
            freshness_secs: 5,
            revalidate_secs: 0,
        }
    }

    pub fn freshness(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.freshness_secs)
    }
}

// The field-level serde defaults cover a partial `views` object; this
// covers the object being absent entirely. Both paths must agree.
impl Default for ViewsConfig {
    fn default() -> Self {
        ViewsConfig {
            scorecard: ViewRefresh::scorecard(),
            weekly_report: ViewRefresh::report(),
            due_activities: ViewRefresh::report(),
            users: ViewRefresh::report(),
        }
    }
}

/// Get the canonical config file path (~/.scorecard/config.json).
pub fn config_path() -> Result<PathBuf, String> {
    let home = dirs::home_dir().ok_or("Could not find home directory")?;
    Ok(home.join(".scorecard").join("config.json"))
}

/// Load configuration from the canonical path.
pub fn load_config() -> Result<Config, String> {
    load_config_from(&config_path()?)
}

/// Load and validate configuration from an explicit path.
pub fn load_config_from(path: &Path) -> Result<Config, String> {
    if !path.exists() {
        return Err(format!(
            "Config file not found at {}. Create it with: {{ \"apiBaseUrl\": \"https://your-api.example.com\" }}",
            path.display()
        ));
    }

    let content =
        fs::read_to_string(path).map_err(|e| format!("Failed to read config: {}", e))?;

    let config: Config =
        serde_json::from_str(&content).map_err(|e| format!("Failed to parse config: {}", e))?;

    if config.api_base_url.trim().is_empty() {
        return Err("Config is missing apiBaseUrl".to_string());
    }
    url::Url::parse(&config.api_base_url)
        .map_err(|e| format!("Invalid apiBaseUrl: {}", e))?;

    Ok(config)
}

impl Config {
    /// A config with defaults for everything but the base address —
    /// used by tests and first-run tooling.
    pub fn with_base_url(api_base_url: &str) -> Self {
        Config {
            api_base_url: api_base_url.to_string(),
            views: ViewsConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("config.json");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_minimal_config_gets_view_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, r#"{ "apiBaseUrl": "https://api.example.com" }"#);

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.api_base_url, "https://api.example.com");
        // Absent views object: per-view defaults apply.
        assert_eq!(config.views.scorecard.revalidate_secs, 600);
        assert_eq!(config.views.weekly_report.revalidate_secs, 0);
        assert_eq!(config.views.weekly_report.freshness_secs, 5);
    }

    #[test]
    fn test_partial_views_object_keeps_per_view_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            r#"{
                "apiBaseUrl": "https://api.example.com",
                "views": { "scorecard": { "freshnessSecs": 30, "revalidateSecs": 120 } }
            }"#,
        );

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.views.scorecard.revalidate_secs, 120);
        assert_eq!(config.views.scorecard.freshness_secs, 30);
        assert_eq!(config.views.due_activities.revalidate_secs, 0);
    }

    #[test]
    fn test_missing_file_error_mentions_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config_from(&dir.path().join("absent.json")).unwrap_err();
        assert!(err.contains("absent.json"));
        assert!(err.contains("apiBaseUrl"));
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, r#"{ "apiBaseUrl": "nope" }"#);
        assert!(load_config_from(&path).is_err());
    }
}
