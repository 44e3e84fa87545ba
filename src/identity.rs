//! Repository identity supplied by host configuration.
//!
//! The host owns settings storage; this crate only ever receives an
//! immutable [`RepoIdentity`] value. Re-reading configuration on the host
//! side constructs a new identity rather than mutating one in place.

/// Which repository on the release registry to track, plus an optional
/// access token for private repositories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoIdentity {
    /// Repository owner (user or organization).
    pub owner: String,
    /// Repository name.
    pub name: String,
    /// Access token for private repositories. Empty strings are treated
    /// the same as absent.
    pub access_token: Option<String>,
}

impl RepoIdentity {
    /// Identity for a public repository.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            access_token: None,
        }
    }

    /// Identity for a private repository with an access token.
    pub fn with_token(
        owner: impl Into<String>,
        name: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            access_token: Some(token.into()),
        }
    }

    /// The `owner/name` slug, used as the cache key.
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// Registry API endpoint for the latest release of this repository.
    pub fn latest_release_url(&self) -> String {
        format!(
            "https://api.github.com/repos/{}/{}/releases/latest",
            self.owner, self.name
        )
    }

    /// Human-facing releases page, used as a fallback link when the
    /// release JSON omits `html_url`.
    pub fn releases_page_url(&self) -> String {
        format!("https://github.com/{}/{}/releases", self.owner, self.name)
    }

    /// The access token, with empty strings normalized to `None`.
    pub fn token(&self) -> Option<&str> {
        self.access_token.as_deref().filter(|t| !t.is_empty())
    }
}
