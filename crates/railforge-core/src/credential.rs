use std::env;
use std::fmt;

pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// An explicit key wins over the environment; the environment variable is
/// consulted here and nowhere else.
pub fn resolve_api_key(explicit: Option<&str>) -> Option<ApiKey> {
    resolve_from(explicit, env::var(API_KEY_ENV).ok())
}

fn resolve_from(explicit: Option<&str>, env_key: Option<String>) -> Option<ApiKey> {
    if let Some(key) = explicit {
        if !key.is_empty() {
            return Some(ApiKey::new(key));
        }
    }
    env_key.filter(|key| !key.is_empty()).map(ApiKey::new)
}
