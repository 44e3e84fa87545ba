//! Release metadata fetching and wire parsing.
//!
//! Talks to the registry's "latest release for repository" endpoint and
//! maps the wire JSON into a [`ReleaseRecord`]. The network seam is the
//! [`ReleaseFetcher`] trait so hosts and tests can substitute transports;
//! [`HttpReleaseFetcher`] is the production implementation.

use serde::Deserialize;

use crate::error::FetchError;
use crate::identity::RepoIdentity;

/// Client identifier sent with every registry request.
const CLIENT_IDENT: &str = "plugin-update";

/// A downloadable file attached to a release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseAsset {
    /// Asset file name as published.
    pub name: String,
    /// Direct download URL for the asset.
    pub download_url: String,
}

/// Immutable snapshot of one upstream release.
///
/// A record is never partially populated: either the fetch produced all
/// required fields or the fetch failed as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseRecord {
    /// Raw tag, possibly with a leading `v`/`V` prefix. Always non-empty.
    pub tag_name: String,
    /// RFC 3339 publish timestamp, as received. Optional on the wire.
    pub published_at: Option<String>,
    /// Free-text release notes (markdown-like).
    pub notes_body: String,
    /// Link to the human-facing release page.
    pub html_url: String,
    /// Attached assets, in the order the registry listed them.
    pub assets: Vec<ReleaseAsset>,
    /// Source-archive fallback URL (wire `zipball_url`).
    pub archive_url: Option<String>,
}

/// Transport seam for fetching release metadata.
///
/// The production implementation is [`HttpReleaseFetcher`]; tests use
/// in-memory doubles.
pub trait ReleaseFetcher: Send + Sync {
    /// Fetch the latest release for the identified repository.
    fn fetch_latest_release(&self, identity: &RepoIdentity) -> Result<ReleaseRecord, FetchError>;
}

/// Fetches releases over HTTPS via the shared [`crate::http`] agent.
#[derive(Debug, Default)]
pub struct HttpReleaseFetcher;

impl ReleaseFetcher for HttpReleaseFetcher {
    fn fetch_latest_release(&self, identity: &RepoIdentity) -> Result<ReleaseRecord, FetchError> {
        let api_url = identity.latest_release_url();
        // Validate at call time so a bad owner/name from configuration is
        // caught before any network traffic.
        crate::http::validate_registry_url(&api_url)?;

        log::debug!("fetching latest release for {}", identity.slug());

        let mut request = crate::http::agent()
            .get(&api_url)
            .header("User-Agent", CLIENT_IDENT)
            .header("Accept", "application/vnd.github+json");

        // Bearer token only for private repositories.
        if let Some(token) = identity.token() {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        let mut body = match request.call() {
            Ok(response) => response.into_body(),
            Err(ureq::Error::StatusCode(code)) => return Err(FetchError::Http(code)),
            Err(e) => return Err(FetchError::Network(e.to_string())),
        };

        let body_str = body
            .with_config()
            .limit(crate::http::MAX_API_RESPONSE_SIZE)
            .read_to_string()
            .map_err(|e| FetchError::Network(format!("failed to read response body: {e}")))?;

        parse_release(&body_str, identity)
    }
}

/// Wire shape of the registry's release JSON. Unknown fields are ignored;
/// `tag_name` is the only required field.
#[derive(Debug, Deserialize)]
struct WireRelease {
    tag_name: String,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    html_url: Option<String>,
    #[serde(default)]
    published_at: Option<String>,
    #[serde(default)]
    zipball_url: Option<String>,
    #[serde(default)]
    assets: Vec<WireAsset>,
}

#[derive(Debug, Deserialize)]
struct WireAsset {
    #[serde(default)]
    name: String,
    #[serde(default)]
    browser_download_url: String,
}

/// Map the wire JSON into a [`ReleaseRecord`].
///
/// Absence of `tag_name` (or an empty one) is the sole "malformed"
/// trigger beyond unparseable JSON.
pub(crate) fn parse_release(
    body: &str,
    identity: &RepoIdentity,
) -> Result<ReleaseRecord, FetchError> {
    let wire: WireRelease = serde_json::from_str(body)
        .map_err(|e| FetchError::MalformedResponse(e.to_string()))?;

    if wire.tag_name.is_empty() {
        return Err(FetchError::MalformedResponse(
            "release has an empty tag_name".to_string(),
        ));
    }

    // Assets with no usable download URL are dropped rather than failing
    // the whole record.
    let assets = wire
        .assets
        .into_iter()
        .filter(|a| !a.name.is_empty() && !a.browser_download_url.is_empty())
        .map(|a| ReleaseAsset {
            name: a.name,
            download_url: a.browser_download_url,
        })
        .collect();

    Ok(ReleaseRecord {
        tag_name: wire.tag_name,
        published_at: wire.published_at,
        notes_body: wire.body.unwrap_or_default(),
        html_url: wire.html_url.unwrap_or_else(|| identity.releases_page_url()),
        assets,
        archive_url: wire.zipball_url,
    })
}
