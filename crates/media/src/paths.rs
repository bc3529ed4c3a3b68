//! Resolution of user-supplied local file references.
//!
//! A leading `~` is replaced with the process home directory. The home value
//! is taken as-is: an unset `HOME` expands to the empty string rather than
//! failing, so `~/x` becomes `/x`.

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::error::{Error, Result};

/// Expand a leading `~` using the current process's `HOME`.
#[must_use]
pub fn expand_home(raw: &str) -> PathBuf {
    expand_home_with(raw, std::env::var_os("HOME"))
}

/// Expand a leading `~` using an explicit home directory value.
#[must_use]
pub fn expand_home_with(raw: &str, home: Option<OsString>) -> PathBuf {
    let Some(rest) = raw.strip_prefix('~') else {
        return PathBuf::from(raw);
    };
    let mut expanded = home.unwrap_or_default();
    expanded.push(rest);
    PathBuf::from(expanded)
}

/// Expand `raw` and make sure the result exists.
///
/// Fails with [`Error::FileNotFound`] carrying the expanded path. Permission
/// problems are not checked here; they surface when the file is read.
pub async fn resolve_existing(raw: &str) -> Result<PathBuf> {
    let path = expand_home(raw);
    ensure_exists(&path).await?;
    debug!(raw, resolved = %path.display(), "resolved local path");
    Ok(path)
}

async fn ensure_exists(path: &Path) -> Result<()> {
    match tokio::fs::try_exists(path).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(Error::file_not_found(path)),
        Err(e) => Err(Error::io(format!("cannot access '{}'", path.display()), e)),
    }
}

/// Final path component as a UTF-8 string, if any.
#[must_use]
pub fn file_name_of(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest};

    #[rstest]
    #[case("~/notes/a.pdf", "/home/alice/notes/a.pdf")]
    #[case("~", "/home/alice")]
    #[case("/tmp/a.png", "/tmp/a.png")]
    #[case("relative/~/b.png", "relative/~/b.png")]
    fn expands_leading_tilde(#[case] raw: &str, #[case] expected: &str) {
        let home = Some(OsString::from("/home/alice"));
        assert_eq!(expand_home_with(raw, home), PathBuf::from(expected));
    }

    #[test]
    fn unset_home_expands_to_empty_prefix() {
        assert_eq!(expand_home_with("~/a.png", None), PathBuf::from("/a.png"));
    }

    #[rstest]
    #[case("~/a")]
    #[case("~")]
    #[case("~/~/b")]
    fn expansion_never_keeps_leading_tilde(#[case] raw: &str) {
        let once = expand_home_with(raw, Some(OsString::from("/root")));
        assert!(!once.to_string_lossy().starts_with('~'));
        let twice = expand_home_with(&once.to_string_lossy(), Some(OsString::from("/root")));
        assert_eq!(once, twice);
    }

    #[tokio::test]
    async fn resolves_existing_file() {
        let tmp = tempfile::NamedTempFile::with_suffix(".png").unwrap();
        let raw = tmp.path().to_str().unwrap();
        let resolved = resolve_existing(raw).await.unwrap();
        assert_eq!(resolved, tmp.path());
    }

    #[tokio::test]
    async fn missing_file_reports_resolved_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.pdf");
        let err = resolve_existing(missing.to_str().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
        assert_eq!(
            err.to_string(),
            format!("file not found: {}", missing.display())
        );
    }

    #[tokio::test]
    async fn missing_tilde_path_is_reported_expanded() {
        let err = resolve_existing("~/larkbridge-missing-4f1c/a.png")
            .await
            .unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("file not found: "));
        assert!(!message.contains('~'));
    }

    #[test]
    fn file_name_of_takes_last_component() {
        assert_eq!(
            file_name_of(Path::new("/tmp/report.pdf")).as_deref(),
            Some("report.pdf")
        );
        assert_eq!(file_name_of(Path::new("/")), None);
    }
}
