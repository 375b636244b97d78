//! Client filename validation.
//!
//! Every name that reaches the filesystem goes through [`sanitize_filename`]
//! and is carried as a [`StoredName`] afterwards. The store refuses plain
//! strings, so an unchecked client value cannot be joined onto the root.

use std::fmt;

use crate::models::GatewayError;

/// Hidden directory inside the store root used to stage upload bodies.
pub const STAGING_DIR: &str = ".incoming";

/// Extensions rendered with an inline preview on the listing page
const IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".gif"];

/// A single path component that is safe to join onto the store root
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StoredName(String);

impl StoredName {
    /// Wrap a name read back from the store directory itself.
    pub(crate) fn from_listing(name: String) -> Self {
        StoredName(name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_image(&self) -> bool {
        let lower = self.0.to_lowercase();
        IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
    }
}

impl fmt::Display for StoredName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StoredName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Validate a client-supplied filename and reduce it to its base name.
///
/// Parent-directory components and NUL bytes are rejected outright. Any
/// other directory prefix (`C:\Users\me\a.png`, `docs/a.png`) is stripped.
pub fn sanitize_filename(raw: &str) -> Result<StoredName, GatewayError> {
    if raw.is_empty() {
        return Err(GatewayError::EmptyFilename);
    }

    if raw.contains('\0') {
        return Err(GatewayError::InvalidFilename(raw.escape_debug().to_string()));
    }

    if raw.split(is_separator).any(|component| component == "..") {
        return Err(GatewayError::InvalidFilename(raw.to_string()));
    }

    // rsplit always yields at least one item
    let base = raw.rsplit(is_separator).next().unwrap_or_default();

    if base.is_empty() || base == "." || base == ".." || base == STAGING_DIR {
        return Err(GatewayError::InvalidFilename(raw.to_string()));
    }

    Ok(StoredName(base.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sanitized(raw: &str) -> String {
        sanitize_filename(raw).unwrap().into_string()
    }

    #[test]
    fn test_plain_names_are_preserved() {
        assert_eq!(sanitized("report.pdf"), "report.pdf");
        assert_eq!(sanitized("archive.tar.gz"), "archive.tar.gz");
        assert_eq!(sanitized("my holiday photo (1).JPG"), "my holiday photo (1).JPG");
        assert_eq!(sanitized(".bashrc"), ".bashrc");
        assert_eq!(sanitized("résumé.txt"), "résumé.txt");
    }

    #[test]
    fn test_directory_prefixes_are_stripped() {
        assert_eq!(sanitized("docs/report.pdf"), "report.pdf");
        assert_eq!(sanitized("/absolute/path/data.bin"), "data.bin");
        assert_eq!(sanitized(r"C:\Users\me\photo.png"), "photo.png");
    }

    #[test]
    fn test_traversal_is_rejected() {
        for raw in [
            "../../etc/passwd",
            "..",
            r"..\..\windows\system32",
            "uploads/../secret",
            "a/../../b",
        ] {
            assert!(
                matches!(sanitize_filename(raw), Err(GatewayError::InvalidFilename(_))),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn test_degenerate_names_are_rejected() {
        for raw in [".", "dir/", "/", "./", "a\0b.txt", STAGING_DIR, "x/.incoming"] {
            assert!(
                matches!(sanitize_filename(raw), Err(GatewayError::InvalidFilename(_))),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_empty_name_is_reported_as_empty() {
        assert!(matches!(sanitize_filename(""), Err(GatewayError::EmptyFilename)));
    }

    #[test]
    fn test_image_detection_is_case_insensitive() {
        assert!(sanitize_filename("photo.png").unwrap().is_image());
        assert!(sanitize_filename("PHOTO.JPEG").unwrap().is_image());
        assert!(sanitize_filename("anim.Gif").unwrap().is_image());
        assert!(sanitize_filename("shot.jpg").unwrap().is_image());
        assert!(!sanitize_filename("notes.txt").unwrap().is_image());
        assert!(!sanitize_filename("png").unwrap().is_image());
        assert!(!sanitize_filename("photo.png.txt").unwrap().is_image());
    }
}
