use std::time::Duration;

/// Environment variable holding the service base URL.
pub const API_BASE_ENV: &str = "VERDICT_API_BASE";
/// Local development endpoint used when nothing is configured.
pub const DEFAULT_API_BASE: &str = "http://localhost:5000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Whole-request deadline. `None` waits for the service as long as it takes.
    pub request_timeout: Option<Duration>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
        }
    }
}

impl ClientSettings {
    /// Defaults, with the base URL taken from `VERDICT_API_BASE` when set.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = lookup(API_BASE_ENV)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        Self {
            base_url,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_or_blank_env_uses_default() {
        assert_eq!(ClientSettings::from_lookup(|_| None).base_url, DEFAULT_API_BASE);
        assert_eq!(
            ClientSettings::from_lookup(|_| Some("  ".to_string())).base_url,
            DEFAULT_API_BASE
        );
    }

    #[test]
    fn env_overrides_base_url() {
        let settings = ClientSettings::from_lookup(|key| {
            (key == API_BASE_ENV).then(|| "https://verdict.example.org ".to_string())
        });
        assert_eq!(settings.base_url, "https://verdict.example.org");
        assert_eq!(settings.request_timeout, None);
    }
}
