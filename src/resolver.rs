//! Version comparison and download-artifact selection.
//!
//! Pure functions over an installed version string and a fetched
//! [`ReleaseRecord`], with no network or cache involvement, so everything
//! here is testable with hand-built records.

use semver::Version;

use crate::release::ReleaseRecord;

/// Normalized outcome of comparing the installed version against a
/// release record. Never persisted; recomputed per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonResult {
    /// Whether the remote release supersedes the installed version.
    pub update_available: bool,
    /// Remote version after tag normalization.
    pub remote_version: String,
    /// Resolved download URL. `None` when an update exists but the
    /// release offers no installable package; callers must surface that
    /// as a distinct condition, not drop it.
    pub download_url: Option<String>,
}

/// Strip a single leading `v`/`V` from a tag.
///
/// No other normalization happens: a tag like `version-1.2` falls
/// through to a literal comparison. Tightening this could reject
/// legitimate existing tags, so the permissive behavior is kept.
pub fn normalize_tag(tag: &str) -> &str {
    tag.strip_prefix('v')
        .or_else(|| tag.strip_prefix('V'))
        .unwrap_or(tag)
}

/// Semantic-version ordering where both sides parse; otherwise a plain
/// literal string comparison.
fn remote_is_newer(installed: &str, remote: &str) -> bool {
    match (Version::parse(installed), Version::parse(remote)) {
        (Ok(installed), Ok(remote)) => remote > installed,
        _ => remote > installed,
    }
}

/// Compare the installed version against a release record and select the
/// download artifact.
///
/// Asset selection policy: the first asset whose name contains `.zip`
/// wins; otherwise the source-archive URL is the fallback. The access
/// token, when present, is appended as a query parameter so private
/// repository downloads stay authorized.
pub fn resolve_update(
    installed: &str,
    record: &ReleaseRecord,
    token: Option<&str>,
) -> ComparisonResult {
    let remote_version = normalize_tag(&record.tag_name).to_string();
    let update_available = remote_is_newer(installed, &remote_version);

    let download_url = if update_available {
        select_download_url(record, token)
    } else {
        None
    };

    ComparisonResult {
        update_available,
        remote_version,
        download_url,
    }
}

/// Pick the packaged artifact, falling back to the source archive.
fn select_download_url(record: &ReleaseRecord, token: Option<&str>) -> Option<String> {
    let url = record
        .assets
        .iter()
        .find(|asset| asset.name.contains(".zip"))
        .map(|asset| asset.download_url.clone())
        .or_else(|| record.archive_url.clone())?;

    Some(with_access_token(&url, token))
}

/// Append the access token as an `access_token` query parameter.
///
/// Unparseable URLs pass through untouched rather than failing the whole
/// resolution.
fn with_access_token(url: &str, token: Option<&str>) -> String {
    let Some(token) = token else {
        return url.to_string();
    };
    match url::Url::parse(url) {
        Ok(mut parsed) => {
            parsed.query_pairs_mut().append_pair("access_token", token);
            parsed.into()
        }
        Err(_) => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::release::ReleaseAsset;

    fn record_with_tag(tag: &str) -> ReleaseRecord {
        ReleaseRecord {
            tag_name: tag.to_string(),
            published_at: None,
            notes_body: String::new(),
            html_url: "https://github.com/acme/widget/releases".to_string(),
            assets: Vec::new(),
            archive_url: Some("https://api.github.com/repos/acme/widget/zipball/latest".to_string()),
        }
    }

    #[test]
    fn test_newer_remote_yields_update() {
        for (installed, remote) in [
            ("1.0.0", "1.0.1"),
            ("1.0.0", "1.1.0"),
            ("1.9.0", "1.10.0"),
            ("0.9.9", "2.0.0"),
        ] {
            let result = resolve_update(installed, &record_with_tag(remote), None);
            assert!(
                result.update_available,
                "{remote} should supersede {installed}"
            );
        }
    }

    #[test]
    fn test_equal_or_older_remote_yields_no_update() {
        for (installed, remote) in [("1.0.1", "1.0.1"), ("1.1.0", "1.0.9"), ("2.0.0", "1.9.9")] {
            let result = resolve_update(installed, &record_with_tag(remote), None);
            assert!(
                !result.update_available,
                "{remote} should not supersede {installed}"
            );
        }
    }

    #[test]
    fn test_v_prefix_is_normalized() {
        let bare = resolve_update("1.0.0", &record_with_tag("1.0.1"), None);
        let prefixed = resolve_update("1.0.0", &record_with_tag("v1.0.1"), None);
        let upper = resolve_update("1.0.0", &record_with_tag("V1.0.1"), None);
        assert_eq!(bare, prefixed);
        assert_eq!(bare, upper);
        assert_eq!(prefixed.remote_version, "1.0.1");
    }

    #[test]
    fn test_only_one_prefix_stripped() {
        assert_eq!(normalize_tag("vv1.0.0"), "v1.0.0");
        assert_eq!(normalize_tag("version-1.2"), "ersion-1.2");
    }

    #[test]
    fn test_non_semver_tags_compare_literally() {
        // Neither side parses as semver: plain string ordering applies.
        let result = resolve_update("release-1", &record_with_tag("release-2"), None);
        assert!(result.update_available);

        let result = resolve_update("release-2", &record_with_tag("release-1"), None);
        assert!(!result.update_available);
    }

    #[test]
    fn test_zip_asset_selected_in_given_order() {
        let mut record = record_with_tag("2.0.0");
        record.assets = vec![
            ReleaseAsset {
                name: "source.tar.gz".to_string(),
                download_url: "https://github.com/acme/widget/releases/download/2.0.0/source.tar.gz"
                    .to_string(),
            },
            ReleaseAsset {
                name: "widget-2.0.zip".to_string(),
                download_url: "https://github.com/acme/widget/releases/download/2.0.0/widget-2.0.zip"
                    .to_string(),
            },
        ];

        let result = resolve_update("1.0.0", &record, None);
        assert_eq!(
            result.download_url.as_deref(),
            Some("https://github.com/acme/widget/releases/download/2.0.0/widget-2.0.zip")
        );
    }

    #[test]
    fn test_archive_fallback_when_no_zip_asset() {
        let mut record = record_with_tag("2.0.0");
        record.assets = vec![ReleaseAsset {
            name: "source.tar.gz".to_string(),
            download_url: "https://example.invalid/src".to_string(),
        }];

        let result = resolve_update("1.0.0", &record, None);
        assert_eq!(
            result.download_url.as_deref(),
            Some("https://api.github.com/repos/acme/widget/zipball/latest")
        );
    }

    #[test]
    fn test_no_artifact_at_all() {
        let mut record = record_with_tag("2.0.0");
        record.archive_url = None;

        let result = resolve_update("1.0.0", &record, None);
        assert!(result.update_available);
        assert_eq!(result.download_url, None);
    }

    #[test]
    fn test_no_download_url_when_up_to_date() {
        let result = resolve_update("2.0.0", &record_with_tag("2.0.0"), None);
        assert_eq!(result.download_url, None);
    }

    #[test]
    fn test_token_appended_to_download_url() {
        let result = resolve_update("1.0.0", &record_with_tag("2.0.0"), Some("ghp_secret"));
        let url = result.download_url.unwrap();
        assert!(
            url.contains("access_token=ghp_secret"),
            "token missing from {url}"
        );
    }

    #[test]
    fn test_token_appended_with_existing_query() {
        let url = with_access_token("https://api.github.com/zipball/v2?ref=main", Some("tok"));
        assert!(url.contains("ref=main"), "existing query lost: {url}");
        assert!(url.contains("access_token=tok"), "token missing: {url}");
    }

    #[test]
    fn test_no_token_leaves_url_untouched() {
        let url = "https://api.github.com/repos/acme/widget/zipball/latest";
        assert_eq!(with_access_token(url, None), url);
    }
}
