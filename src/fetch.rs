use crate::config::HarvestLimits;
use crate::{HarvestError, Result};
use std::io::Read;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: String,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Resolves URLs to responses. Transport failures come back as
/// `HarvestError::Transport`; HTTP error statuses are returned as responses.
pub trait HttpFetcher {
    /// Page request; carries a browser user agent and no timeout.
    fn fetch_page(&self, url: &str) -> Result<HttpResponse>;

    /// Image download with a short timeout.
    fn fetch_image(&self, url: &str) -> Result<HttpResponse>;
}

pub struct UreqFetcher {
    page_agent: ureq::Agent,
    image_agent: ureq::Agent,
}

impl UreqFetcher {
    pub fn new(image_timeout: Duration) -> Self {
        Self {
            page_agent: build_agent(None),
            image_agent: build_agent(Some(image_timeout)),
        }
    }
}

impl Default for UreqFetcher {
    fn default() -> Self {
        Self::new(HarvestLimits::default().image_timeout)
    }
}

impl HttpFetcher for UreqFetcher {
    fn fetch_page(&self, url: &str) -> Result<HttpResponse> {
        call_get(&self.page_agent, url)
    }

    fn fetch_image(&self, url: &str) -> Result<HttpResponse> {
        call_get(&self.image_agent, url)
    }
}

fn build_agent(timeout: Option<Duration>) -> ureq::Agent {
    let mut config = ureq::Agent::config_builder();
    config = config
        .http_status_as_error(false)
        .timeout_global(timeout)
        .user_agent(DEFAULT_USER_AGENT);
    config.build().into()
}

fn call_get(agent: &ureq::Agent, url: &str) -> Result<HttpResponse> {
    let transport = |message: String| HarvestError::Transport {
        url: url.to_string(),
        message,
    };

    let mut response = agent.get(url).call().map_err(|e| transport(e.to_string()))?;
    let status = response.status().as_u16();
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase();

    let mut body = Vec::new();
    response
        .body_mut()
        .as_reader()
        .read_to_end(&mut body)
        .map_err(|e| transport(e.to_string()))?;

    Ok(HttpResponse {
        status,
        content_type,
        body,
    })
}
