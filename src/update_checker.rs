//! Host-facing update check facade.
//!
//! Orchestrates the release fetcher, cache, resolver, and changelog
//! formatter for the three host call patterns: passive background check,
//! on-demand forced re-check, and cache clear. Each operation runs
//! synchronously to completion in the caller's thread; the fetcher's
//! network call is the only blocking point and is timeout-bounded.

use chrono::DateTime;
use parking_lot::Mutex;
use std::time::Duration;

use crate::cache::{DEFAULT_TTL, ReleaseCache};
use crate::changelog::format_release_notes;
use crate::error::FetchError;
use crate::identity::RepoIdentity;
use crate::release::{HttpReleaseFetcher, ReleaseFetcher, ReleaseRecord};
use crate::resolver::{ComparisonResult, resolve_update};

/// Details of a newer remote release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateInfo {
    /// Normalized remote version.
    pub version: String,
    /// Resolved artifact URL; `None` when the release has no installable
    /// package.
    pub download_url: Option<String>,
    /// Link to the release page.
    pub release_url: String,
}

/// Outcome of an update check.
///
/// Fetch failures are never folded into these variants; they stay
/// `FetchError` so outages cannot masquerade as "no update needed".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateStatus {
    /// Installed version is current (or ahead of) the remote release.
    UpToDate,
    /// A newer version exists and has a downloadable artifact.
    UpdateAvailable(UpdateInfo),
    /// A newer version exists but the release offers no installable
    /// package. Surfaced, not installable.
    UpdateNotInstallable(UpdateInfo),
}

impl UpdateStatus {
    /// Whether a newer remote version exists, installable or not.
    pub fn update_available(&self) -> bool {
        !matches!(self, UpdateStatus::UpToDate)
    }

    /// Human-readable summary for the host's management interface.
    pub fn message(&self) -> String {
        match self {
            UpdateStatus::UpToDate => "You are running the latest version.".to_string(),
            UpdateStatus::UpdateAvailable(info) => {
                format!("Version {} is available for download.", info.version)
            }
            UpdateStatus::UpdateNotInstallable(info) => format!(
                "Version {} is available, but the release provides no downloadable package.",
                info.version
            ),
        }
    }
}

/// Everything the host needs to render a rich update status view.
#[derive(Debug, Clone)]
pub struct DisplayInfo {
    /// The release record the view is based on.
    pub record: ReleaseRecord,
    /// Version comparison against the installed version.
    pub comparison: ComparisonResult,
    /// Release notes rendered as safe HTML.
    pub changelog_html: String,
    /// Publish date formatted for display. Omitted (not an error) when
    /// the release carries no usable timestamp.
    pub published: Option<String>,
}

/// Facade consumed by the host. Sole entry point into the update core.
pub struct UpdateChecker {
    identity: RepoIdentity,
    /// Installed version, owned by the host and treated as opaque input.
    installed_version: String,
    ttl: Duration,
    fetcher: Box<dyn ReleaseFetcher>,
    cache: ReleaseCache,
    /// Last check outcome, shared for the host's read accessor.
    last_status: Mutex<Option<UpdateStatus>>,
    /// Host hook invoked on cache clear so broader host-side caches of
    /// the same fact get purged too.
    on_cache_clear: Option<Box<dyn Fn() + Send + Sync>>,
}

impl UpdateChecker {
    /// Checker with the production HTTPS fetcher and the default 6 hour
    /// TTL.
    pub fn new(identity: RepoIdentity, installed_version: impl Into<String>) -> Self {
        Self::with_fetcher(identity, installed_version, Box::new(HttpReleaseFetcher))
    }

    /// Checker with a custom transport (host adapters, tests).
    pub fn with_fetcher(
        identity: RepoIdentity,
        installed_version: impl Into<String>,
        fetcher: Box<dyn ReleaseFetcher>,
    ) -> Self {
        Self {
            identity,
            installed_version: installed_version.into(),
            ttl: DEFAULT_TTL,
            fetcher,
            cache: ReleaseCache::new(),
            last_status: Mutex::new(None),
            on_cache_clear: None,
        }
    }

    /// Override the cache TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Register the host's broader cache-invalidation hook, called from
    /// [`UpdateChecker::clear_cache`].
    pub fn with_cache_clear_hook(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_cache_clear = Some(Box::new(hook));
        self
    }

    /// Check whether an update exists.
    ///
    /// With `force`, the cache entry is invalidated first and a fresh
    /// fetch is always issued; a fetch failure then leaves the cache
    /// empty and surfaces the error instead of resurrecting the old
    /// entry. Without `force`, a fresh cache entry is served without any
    /// network call.
    pub fn check_for_update(&self, force: bool) -> Result<UpdateStatus, FetchError> {
        if force {
            self.cache.invalidate(&self.identity);
        }
        let record = self.cached_or_fetch()?;
        let status = self.status_for(&record);
        *self.last_status.lock() = Some(status.clone());
        Ok(status)
    }

    /// Compose record, comparison, and rendered changelog for a rich
    /// status view. Same cache semantics as a non-forced check.
    pub fn display_info(&self) -> Result<DisplayInfo, FetchError> {
        let record = self.cached_or_fetch()?;
        let status = self.status_for(&record);
        *self.last_status.lock() = Some(status);

        let comparison = resolve_update(&self.installed_version, &record, self.identity.token());
        let changelog_html = format_release_notes(&record.notes_body);
        let published = record.published_at.as_deref().and_then(format_published);

        Ok(DisplayInfo {
            record,
            comparison,
            changelog_html,
            published,
        })
    }

    /// Invalidate the cached release and signal the host hook.
    pub fn clear_cache(&self) {
        self.cache.invalidate(&self.identity);
        *self.last_status.lock() = None;
        if let Some(hook) = &self.on_cache_clear {
            hook();
        }
    }

    /// Whether the last completed check found a newer remote version.
    /// Consumed by the host's update-listing mechanism.
    pub fn update_available(&self) -> bool {
        self.last_status
            .lock()
            .as_ref()
            .is_some_and(UpdateStatus::update_available)
    }

    /// Outcome of the last completed check, if any.
    pub fn last_status(&self) -> Option<UpdateStatus> {
        self.last_status.lock().clone()
    }

    /// Serve from cache when fresh, otherwise fetch and populate.
    fn cached_or_fetch(&self) -> Result<ReleaseRecord, FetchError> {
        if let Some(record) = self.cache.get(&self.identity) {
            log::debug!("serving cached release for {}", self.identity.slug());
            return Ok(record);
        }

        let record = self.fetcher.fetch_latest_release(&self.identity).map_err(|e| {
            log::warn!("release fetch for {} failed: {e}", self.identity.slug());
            e
        })?;
        self.cache.put(&self.identity, record.clone(), self.ttl);
        Ok(record)
    }

    fn status_for(&self, record: &ReleaseRecord) -> UpdateStatus {
        let comparison = resolve_update(&self.installed_version, record, self.identity.token());
        if !comparison.update_available {
            return UpdateStatus::UpToDate;
        }

        let info = UpdateInfo {
            version: comparison.remote_version,
            download_url: comparison.download_url,
            release_url: record.html_url.clone(),
        };
        if info.download_url.is_some() {
            UpdateStatus::UpdateAvailable(info)
        } else {
            UpdateStatus::UpdateNotInstallable(info)
        }
    }
}

/// Format a release timestamp for display.
///
/// Unparseable timestamps are skipped (logged at debug), not treated as
/// errors; a missing publish date only omits that field from the view.
fn format_published(timestamp: &str) -> Option<String> {
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(dt) => Some(dt.format("%Y-%m-%d %H:%M").to_string()),
        Err(e) => {
            log::debug!("skipping unparseable publish timestamp '{timestamp}': {e}");
            None
        }
    }
}
