//! Per-attempt request headers.
//!
//! Origins that reject automated traffic tend to key on the User-Agent, so
//! each attempt presents one of a small pool of real browser strings.

use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, DNT, UPGRADE_INSECURE_REQUESTS, USER_AGENT,
};

use crate::entropy::Entropy;

/// Browser identities rotated across attempts.
pub const USER_AGENTS: [&str; 4] = [
    // Chrome, Windows
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
    // Chrome, macOS
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.114 Safari/537.36",
    // Firefox, Linux
    "Mozilla/5.0 (X11; Linux x86_64; rv:89.0) Gecko/20100101 Firefox/89.0",
    // Safari, iPhone
    "Mozilla/5.0 (iPhone; CPU iPhone OS 14_6 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.1.1 Mobile/15E148 Safari/604.1",
];

pub const PDF_ACCEPT: &str = "application/pdf,application/json;q=0.9,image/webp,*/*;q=0.8";

/// Headers decorating one outbound attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RandomHeaderSet {
    user_agent: &'static str,
}

impl RandomHeaderSet {
    /// Draw a fresh header set.
    pub fn generate(entropy: &dyn Entropy) -> Self {
        let index = entropy
            .pick_index(USER_AGENTS.len())
            .min(USER_AGENTS.len() - 1);
        Self {
            user_agent: USER_AGENTS[index],
        }
    }

    pub fn user_agent(&self) -> &'static str {
        self.user_agent
    }

    pub fn to_header_map(&self) -> HeaderMap {
        let mut headers = HeaderMap::with_capacity(4);
        headers.insert(USER_AGENT, HeaderValue::from_static(self.user_agent));
        headers.insert(ACCEPT, HeaderValue::from_static(PDF_ACCEPT));
        headers.insert(DNT, HeaderValue::from_static("1"));
        headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
        headers
    }
}
