use std::env;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Which flight-plan submission route the USS exposes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum SubmitEndpoint {
    /// `PUT /uss/v1/flight_plan/`
    Plain,
    /// `PUT /uss/v1/flight_plan/with_conflict`, which also reports conflicts.
    #[default]
    WithConflict,
}

impl SubmitEndpoint {
    pub fn path(self) -> &'static str {
        match self {
            SubmitEndpoint::Plain => "/uss/v1/flight_plan/",
            SubmitEndpoint::WithConflict => "/uss/v1/flight_plan/with_conflict",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "plain" => Some(SubmitEndpoint::Plain),
            "with_conflict" | "with-conflict" => Some(SubmitEndpoint::WithConflict),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UssConfig {
    pub base_url: String,
    pub submit_endpoint: SubmitEndpoint,
    pub timeout: Duration,
}

impl Default for UssConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            submit_endpoint: SubmitEndpoint::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl UssConfig {
    /// Reads `USS_BASE_URL`, `USS_SUBMIT_ENDPOINT` and `USS_TIMEOUT_SECS`,
    /// falling back to defaults for unset or unparsable values.
    pub fn from_env() -> Self {
        let base_url = env::var("USS_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let submit_endpoint = env::var("USS_SUBMIT_ENDPOINT")
            .ok()
            .and_then(|v| SubmitEndpoint::parse(&v))
            .unwrap_or_default();
        Self {
            base_url,
            submit_endpoint,
            timeout: Duration::from_secs(env_var_u64("USS_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_submit_endpoint(mut self, endpoint: SubmitEndpoint) -> Self {
        self.submit_endpoint = endpoint;
        self
    }
}

fn env_var_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::SubmitEndpoint;

    #[test]
    fn endpoint_names_parse() {
        assert_eq!(SubmitEndpoint::parse("plain"), Some(SubmitEndpoint::Plain));
        assert_eq!(
            SubmitEndpoint::parse(" With_Conflict "),
            Some(SubmitEndpoint::WithConflict)
        );
        assert_eq!(SubmitEndpoint::parse("other"), None);
        assert_eq!(SubmitEndpoint::default().path(), "/uss/v1/flight_plan/with_conflict");
    }
}
