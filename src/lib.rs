//! Release polling and update resolution for plugin hosts.
//!
//! Provides:
//! - `release`: registry fetch contract and wire parsing
//! - `cache`: TTL-bounded single-slot release cache
//! - `resolver`: version comparison and artifact selection
//! - `changelog`: release notes rendered as constrained safe HTML
//! - `update_checker`: the host-facing facade (check, display, clear)
//! - `install`: post-download extracted-directory relocation
//!
//! The host supplies a [`identity::RepoIdentity`] from its own
//! configuration and consumes [`update_checker::UpdateChecker`]; all
//! other host plumbing (settings storage, admin UI, authorization) stays
//! outside this crate.

pub mod cache;
pub mod changelog;
pub mod error;
pub mod http;
pub mod identity;
pub mod install;
pub mod release;
pub mod resolver;
pub mod update_checker;

pub use error::FetchError;
pub use identity::RepoIdentity;
pub use update_checker::{DisplayInfo, UpdateChecker, UpdateStatus};
