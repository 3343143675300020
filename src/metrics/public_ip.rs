use std::time::{Duration, Instant};

use log::debug;

const PUBLIC_IP_URL: &str = "https://api.ipify.org";
const REFRESH_INTERVAL: Duration = Duration::from_secs(60);
const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// The host's public address, refreshed at most once per minute. A failed
/// refresh keeps serving the last known address.
pub struct PublicIpCache {
    ip: Option<String>,
    fetched_at: Option<Instant>,
}

impl PublicIpCache {
    pub fn new() -> Self {
        PublicIpCache {
            ip: None,
            fetched_at: None,
        }
    }

    pub async fn get(&mut self, http: &reqwest::Client) -> Option<String> {
        if let Some(at) = self.fetched_at {
            if at.elapsed() < REFRESH_INTERVAL {
                return self.ip.clone();
            }
        }
        match fetch(http).await {
            Some(ip) => {
                self.ip = Some(ip);
                self.fetched_at = Some(Instant::now());
            }
            None => debug!("public ip refresh failed, keeping cached value"),
        }
        self.ip.clone()
    }
}

impl Default for PublicIpCache {
    fn default() -> Self {
        Self::new()
    }
}

async fn fetch(http: &reqwest::Client) -> Option<String> {
    let response = http
        .get(PUBLIC_IP_URL)
        .timeout(FETCH_TIMEOUT)
        .send()
        .await
        .ok()?;
    if !response.status().is_success() {
        return None;
    }
    let body = response.text().await.ok()?;
    let ip = body.trim();
    if ip.is_empty() {
        return None;
    }
    Some(ip.to_string())
}
