//! Release clients for hosted git providers (GitHub, GitLab).
//!
//! Every provider exposes the same single capability, creating a release
//! for an existing tag, behind the [`traits::ReleaseClient`] trait.

/// Client type selection and environment configuration.
pub mod config;

/// Builds release clients from a client type name.
pub mod factory;

/// GitHub release client built on Octocrab.
pub mod github;

/// GitLab release client built on reqwest.
pub mod gitlab;

/// Common traits for provider abstraction.
pub mod traits;

/// Request types shared by all providers.
pub mod types;
