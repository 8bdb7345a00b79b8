//! Module source classification.
//!
//! Rules are checked in order and the first match wins:
//!
//! - **Local**: `./path` or `../path`
//! - **Git**: `git::...` or anything ending in `.git`
//! - **GitHub**: `github.com/...`
//! - **Registry**: `app.terraform.io/...` or at least two `/` separators
//! - **HTTP**: `http://...` or `https://...`
//! - **Unknown**: everything else
//!
//! Every `http://` or `https://` URL already contains two `/`, so URLs land
//! in the registry bucket before the HTTP rule is reached.

use crate::types::SourceType;

/// Classify a module `source` string.
///
/// # Examples
///
/// ```rust
/// use tfscout::scanner::classify_source;
/// use tfscout::types::SourceType;
///
/// assert_eq!(classify_source("./modules/vpc"), SourceType::Local);
/// assert_eq!(classify_source("terraform-aws-modules/eks/aws"), SourceType::Registry);
/// assert_eq!(classify_source("git::https://example.com/vpc.git"), SourceType::Git);
/// ```
#[must_use]
pub fn classify_source(source: &str) -> SourceType {
    if source.starts_with("./") || source.starts_with("../") {
        SourceType::Local
    } else if source.starts_with("git::") || source.ends_with(".git") {
        SourceType::Git
    } else if source.starts_with("github.com/") {
        SourceType::GitHub
    } else if source.starts_with("app.terraform.io/") || source.matches('/').count() >= 2 {
        SourceType::Registry
    } else if source.starts_with("http://") || source.starts_with("https://") {
        SourceType::Http
    } else {
        SourceType::Unknown
    }
}
