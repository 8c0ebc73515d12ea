//! Derivation of generated output filenames.
//!
//! Parameters flagged "generate if absent" get their final value from a
//! source name plus a fixed suffix rule. Every function here is pure and
//! runs before the formatter consumes the value.

use std::path::Path;

/// Extensions treated as a single unit when splitting, so
/// `vol.nii.gz` splits into `vol` + `.nii.gz`.
const SPECIAL_EXTENSIONS: [&str; 3] = [".nii.gz", ".tar.gz", ".niml.dset"];

/// Splits a path into (stem, extension), dropping any directory component.
///
/// The extension includes its leading dot and may be multi-part for the
/// known neuroimaging suffixes; a name without a dot yields an empty
/// extension.
#[must_use]
pub fn split_filename(path: &str) -> (String, String) {
    let name = Path::new(path)
        .file_name()
        .map_or_else(String::new, |n| n.to_string_lossy().into_owned());

    for special in SPECIAL_EXTENSIONS {
        if let Some(stem) = name.strip_suffix(special) {
            if !stem.is_empty() {
                return (stem.to_string(), special.to_string());
            }
        }
    }

    match name.rfind('.') {
        Some(idx) if idx > 0 => (name[..idx].to_string(), name[idx..].to_string()),
        _ => (name, String::new()),
    }
}

/// Derives the design-matrix filename for the deconvolution tool.
///
/// Names that already reference the design matrix (an `.xmat` extension or
/// a stem ending in `xmat`) are normalized to end in `.1D`; anything else
/// gets the full `.xmat.1D` suffix.
///
/// `design` -> `design.xmat.1D`, `foo.xmat` -> `foo.1D`,
/// `X.xmat.1D` -> `X.xmat.1D`.
#[must_use]
pub fn derive_xmat_name(name: &str) -> String {
    let (stem, ext) = split_filename(name);
    if ext == ".xmat" || stem.ends_with("xmat") {
        format!("{stem}.1D")
    } else {
        format!("{stem}.xmat.1D")
    }
}

/// Derives a statistics-bucket filename: stem plus a fixed suffix and the
/// `.nii.gz` extension. `Decon.nii.gz` with suffix `_stats` ->
/// `Decon_stats.nii.gz`.
#[must_use]
pub fn derive_bucket_name(name: &str, suffix: &str) -> String {
    let (stem, _) = split_filename(name);
    format!("{stem}{suffix}.nii.gz")
}

/// Derives the design-matrix image filename: stem plus `.jpg`.
#[must_use]
pub fn derive_xjpeg_name(name: &str) -> String {
    let (stem, ext) = split_filename(name);
    if ext == ".jpg" {
        format!("{stem}{ext}")
    } else {
        format!("{stem}.jpg")
    }
}
