//! Candidate filtering: signature exclusion and wildcard matching.
//!
//! Signing tooling leaves companion artifacts next to the content it
//! signs (`sha256-….sig` tags, `….sig` files); those never belong in a
//! version/tag candidate list.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ClientError;

/// Signature tags pushed next to signed images.
static IMAGE_TAG_SIG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^sha.*\.sig$").expect("valid pattern"));

/// Signature files stored next to raw content.
static RAW_FILE_SIG: Lazy<Regex> = Lazy::new(|| Regex::new(r".*\.sig$").expect("valid pattern"));

/// Returns true when an image tag is a signature companion.
#[must_use]
pub fn is_signature_tag(tag: &str) -> bool {
    IMAGE_TAG_SIG.is_match(tag)
}

/// Returns true when a raw component name is a signature companion.
#[must_use]
pub fn is_signature_file(name: &str) -> bool {
    RAW_FILE_SIG.is_match(name)
}

/// Wildcard filter over candidate strings.
///
/// Supports `*` (any sequence) and `?` (any single character), anchored
/// at both ends; all other characters match literally.
#[derive(Debug, Clone)]
pub struct GlobFilter {
    regex: Regex,
}

impl GlobFilter {
    /// Compiles a wildcard pattern.
    ///
    /// # Examples
    ///
    /// ```
    /// use ktesios_client::filter::GlobFilter;
    ///
    /// let filter = GlobFilter::new("app-*").unwrap();
    /// assert!(filter.matches("app-1"));
    /// assert!(!filter.matches("other"));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Validation`] if the translated pattern
    /// cannot be compiled.
    pub fn new(pattern: &str) -> Result<Self, ClientError> {
        // Escape regex meta, then restore wildcards: * -> .*, ? -> .
        let mut escaped = regex::escape(pattern);
        escaped = escaped.replace("\\*", ".*");
        escaped = escaped.replace("\\?", ".");
        let regex = Regex::new(&format!("^{escaped}$"))
            .map_err(|e| ClientError::validation(format!("invalid filter pattern: {e}")))?;
        Ok(Self { regex })
    }

    /// Returns true when the candidate matches the pattern.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        self.regex.is_match(candidate)
    }
}

/// Returns true when no filter is present or the candidate matches it.
#[must_use]
pub fn admits(filter: Option<&GlobFilter>, candidate: &str) -> bool {
    filter.is_none_or(|f| f.matches(candidate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_signature_tags() {
        assert!(is_signature_tag("sha256-a1b2c3.sig"));
        assert!(!is_signature_tag("v1.2.3"));
        // The image rule requires the sha prefix; the raw rule does not.
        assert!(!is_signature_tag("release.sig"));
        assert!(is_signature_file("release.sig"));
    }

    #[test]
    fn test_raw_signature_files() {
        assert!(is_signature_file("app-1.0.tar.gz.sig"));
        assert!(!is_signature_file("app-1.0.tar.gz"));
    }

    #[test]
    fn test_glob_star() {
        let filter = GlobFilter::new("*").unwrap();
        assert!(filter.matches("dfadfadf-adsfaf"));
    }

    #[test]
    fn test_glob_prefix() {
        let filter = GlobFilter::new("app-*").unwrap();
        assert!(filter.matches("app-131232eraf"));
        assert!(filter.matches("app-1"));
        assert!(!filter.matches("other"));
    }

    #[test]
    fn test_glob_infix() {
        let filter = GlobFilter::new("*-dda*").unwrap();
        assert!(filter.matches("app-dda-dadf"));
        assert!(!filter.matches("app-131232eraf"));
    }

    #[test]
    fn test_glob_question_mark() {
        let filter = GlobFilter::new("v1.?.0").unwrap();
        assert!(filter.matches("v1.2.0"));
        assert!(!filter.matches("v1.22.0"));
    }

    #[test]
    fn test_glob_literal_dots_do_not_float() {
        let filter = GlobFilter::new("v1.0").unwrap();
        assert!(!filter.matches("v1x0"));
    }

    #[test]
    fn test_admits_without_filter() {
        assert!(admits(None, "anything"));
        let filter = GlobFilter::new("app-*").unwrap();
        assert!(admits(Some(&filter), "app-2"));
        assert!(!admits(Some(&filter), "other"));
    }
}
