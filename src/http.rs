//! HTTP client helper with native-tls support.

use std::time::Duration;
use ureq::Agent;
use ureq::tls::{RootCerts, TlsConfig, TlsProvider};

use crate::error::FetchError;

/// Timeout for registry requests. A slow registry must not hang the
/// caller indefinitely.
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum response body size for API responses (10 MB).
pub const MAX_API_RESPONSE_SIZE: u64 = 10 * 1024 * 1024;

/// Allowlisted hostnames for release-registry requests.
///
/// Only GitHub's API, web, and download hosts are permitted. Any other
/// host is rejected regardless of the URL path.
const ALLOWED_HOSTS: &[&str] = &[
    "github.com",
    "api.github.com",
    "codeload.github.com",
    "objects.githubusercontent.com",
    "github-releases.githubusercontent.com",
];

/// Validate that a URL is safe to use for registry operations.
///
/// Enforces:
/// - HTTPS scheme only (no HTTP, ftp, file://, etc.)
/// - Host must be in the registry allowlist
pub fn validate_registry_url(url: &str) -> Result<(), FetchError> {
    let parsed =
        url::Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("'{}': {}", url, e)))?;

    // Plain HTTP can be intercepted and downgraded.
    match parsed.scheme() {
        "https" => {}
        scheme => {
            return Err(FetchError::InvalidUrl(format!(
                "insecure scheme '{}' rejected; only HTTPS is allowed. URL: {}",
                scheme, url
            )));
        }
    }

    let host = parsed.host_str().unwrap_or("");
    if !ALLOWED_HOSTS.contains(&host) {
        return Err(FetchError::InvalidUrl(format!(
            "host '{}' is not in the allowed list for registry operations. \
             Allowed hosts: {}. URL: {}",
            host,
            ALLOWED_HOSTS.join(", "),
            url
        )));
    }

    Ok(())
}

/// Create a new HTTP agent configured with native-tls and a global timeout.
pub fn agent() -> Agent {
    let tls_config = TlsConfig::builder()
        .provider(TlsProvider::NativeTls)
        .root_certs(RootCerts::PlatformVerifier)
        .build();

    Agent::config_builder()
        .tls_config(tls_config)
        .timeout_global(Some(HTTP_TIMEOUT))
        .build()
        .into()
}
