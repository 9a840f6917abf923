use std::time::Duration;

use tracing::debug;

/// Forces the probe's verdict: `1`/`true` means offline, `0`/`false` means
/// online. Anything else is ignored.
pub const OFFLINE_OVERRIDE_ENV: &str = "TD_OFFLINE";

/// Stand-in for a browser's online flag: a cheap HEAD against the API base.
/// Any HTTP response counts as online; only a transport failure counts as
/// offline.
#[derive(Debug, Clone)]
pub struct ConnectivityProbe {
    base: String,
    client: reqwest::Client,
    forced: Option<bool>,
}

impl ConnectivityProbe {
    pub fn new(base: String, probe_timeout: Duration) -> Self {
        Self::with_override(
            base,
            probe_timeout,
            std::env::var(OFFLINE_OVERRIDE_ENV).ok(),
        )
    }

    /// Like [`new`](Self::new) with the override value passed in directly,
    /// so callers holding many probes in one process do not race on the
    /// environment.
    pub fn with_override(
        base: String,
        probe_timeout: Duration,
        raw_override: Option<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("td")
            .connect_timeout(probe_timeout)
            .timeout(probe_timeout)
            .build()
            .expect("reqwest client");
        Self {
            base,
            client,
            forced: forced_verdict(raw_override.as_deref()),
        }
    }

    pub async fn is_online(&self) -> bool {
        if let Some(online) = self.forced {
            return online;
        }
        let url = format!("{}/todos", self.base.trim_end_matches('/'));
        match self.client.head(&url).send().await {
            Ok(_) => true,
            Err(err) => {
                debug!(%url, error = %err, "connectivity probe failed");
                false
            }
        }
    }
}

/// The forced `is_online` answer encoded in the override value, if any.
fn forced_verdict(raw: Option<&str>) -> Option<bool> {
    match raw.map(str::trim) {
        Some("1") | Some("true") => Some(false),
        Some("0") | Some("false") => Some(true),
        _ => None,
    }
}
