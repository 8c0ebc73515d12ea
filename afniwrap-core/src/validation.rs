//! Standalone parameter validation.
//!
//! These checks run over a whole tool configuration before any formatting
//! begins: mandatory presence, co-occurrence constraints, equal-length list
//! groups, and input-file existence. The first failed check aborts the
//! build with a typed error naming the parameter and constraint.

use std::path::Path;

use crate::error::{CoreError, CoreResult};

/// Fails with `MissingParameter` when a mandatory list field is empty.
pub fn require_nonempty<T>(param: &'static str, values: &[T]) -> CoreResult<()> {
    if values.is_empty() {
        return Err(CoreError::MissingParameter(param));
    }
    Ok(())
}

/// Fails with `UnsatisfiedDependency` when `param` is set but its required
/// co-field is not.
pub fn require_together(
    param: &'static str,
    requires: &'static str,
    co_field_present: bool,
) -> CoreResult<()> {
    if !co_field_present {
        return Err(CoreError::UnsatisfiedDependency { param, requires });
    }
    Ok(())
}

/// Fails with `LengthMismatch` when a grouped list field does not match the
/// expected element count.
pub fn require_len<T>(param: &'static str, values: &[T], expected: usize) -> CoreResult<()> {
    if values.len() != expected {
        return Err(CoreError::LengthMismatch {
            param,
            expected,
            actual: values.len(),
        });
    }
    Ok(())
}

/// Fails with `InputNotFound` when a declared input path does not resolve
/// to an existing file.
pub fn require_exists(path: &Path) -> CoreResult<()> {
    if !path.is_file() {
        log::warn!("input file not found: {}", path.display());
        return Err(CoreError::InputNotFound(path.to_path_buf()));
    }
    Ok(())
}

/// Existence check over a whole list of input paths.
pub fn require_all_exist(paths: &[impl AsRef<Path>]) -> CoreResult<()> {
    for path in paths {
        require_exists(path.as_ref())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_require_nonempty() {
        assert!(require_nonempty::<&str>("in_file", &["a"]).is_ok());
        let err = require_nonempty::<&str>("in_file", &[]).unwrap_err();
        assert!(matches!(err, CoreError::MissingParameter("in_file")));
    }

    #[test]
    fn test_require_together() {
        assert!(require_together("stim_files", "models", true).is_ok());
        let err = require_together("stim_files", "models", false).unwrap_err();
        assert!(matches!(
            err,
            CoreError::UnsatisfiedDependency {
                param: "stim_files",
                requires: "models",
            }
        ));
    }

    #[test]
    fn test_require_len() {
        assert!(require_len("models", &["GAM", "GAM"], 2).is_ok());
        let err = require_len("models", &["GAM", "GAM", "GAM"], 2).unwrap_err();
        match err {
            CoreError::LengthMismatch {
                param,
                expected,
                actual,
            } => {
                assert_eq!(param, "models");
                assert_eq!(expected, 2);
                assert_eq!(actual, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_require_exists() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "0 12 24").unwrap();
        assert!(require_exists(file.path()).is_ok());

        let missing = file.path().with_extension("missing");
        let err = require_exists(&missing).unwrap_err();
        assert!(matches!(err, CoreError::InputNotFound(p) if p == missing));
    }

    #[test]
    fn test_require_all_exist_reports_first_missing() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let missing = file.path().with_extension("gone");
        let paths = vec![file.path().to_path_buf(), missing.clone()];
        let err = require_all_exist(&paths).unwrap_err();
        assert!(matches!(err, CoreError::InputNotFound(p) if p == missing));
    }
}
