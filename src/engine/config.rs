use anyhow::{Context, Result};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    /// Overrides the catalog's backend game id for every session.
    pub game_id_override: Option<String>,
    /// `None` keeps the transport's default.
    pub request_timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            game_id_override: None,
            request_timeout_secs: None,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let base_url = non_empty("TEXTWORLD_API_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let request_timeout_secs = non_empty("TEXTWORLD_REQUEST_TIMEOUT_SECS")
            .map(|raw| {
                raw.parse::<u64>()
                    .with_context(|| format!("TEXTWORLD_REQUEST_TIMEOUT_SECS must be a whole number of seconds, got {raw:?}"))
            })
            .transpose()?;

        Ok(Self {
            base_url,
            game_id_override: non_empty("TEXTWORLD_GAME_ID"),
            request_timeout_secs,
        })
    }

    /// Game id sent to `/reset` for a catalog entry.
    pub fn backend_game_id<'a>(&'a self, catalog_id: &'a str) -> &'a str {
        if let Some(id) = self.game_id_override.as_deref() {
            return id;
        }
        crate::model::game::find_game(catalog_id)
            .map(|g| g.backend_id)
            .unwrap_or(catalog_id)
    }
}
