//! Build metadata.
//!
//! The commit hash and build date are baked in at compile time from
//! `CONTAINER_MANAGER_COMMIT` and `CONTAINER_MANAGER_BUILD_DATE`, and read
//! `unknown` when those are not set.

use tracing::Span;

/// Service name attached to every log line.
pub const SERVICE_NAME: &str = env!("CARGO_PKG_NAME");

/// Release version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Commit the binary was built from.
pub const COMMIT_HASH: &str = match option_env!("CONTAINER_MANAGER_COMMIT") {
    Some(commit) => commit,
    None => "unknown",
};

/// Date the binary was built.
pub const BUILD_DATE: &str = match option_env!("CONTAINER_MANAGER_BUILD_DATE") {
    Some(date) => date,
    None => "unknown",
};

/// Multi-line description printed by the `version` command.
pub fn version_text() -> String {
    format!(
        "{} {}\nrelease: {}\ncommit hash: {}\nbuild date: {}\ntarget: {}-{}",
        SERVICE_NAME,
        VERSION,
        VERSION,
        COMMIT_HASH,
        BUILD_DATE,
        std::env::consts::ARCH,
        std::env::consts::OS
    )
}

/// Root span carrying build metadata. Everything logged inside it, request
/// spans included, is tagged with these fields.
pub fn root_span() -> Span {
    tracing::info_span!(
        "container-manager",
        service = SERVICE_NAME,
        version = VERSION,
        build = BUILD_DATE,
        commit = COMMIT_HASH
    )
}
