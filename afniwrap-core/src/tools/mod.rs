// ============================================================================
// afniwrap-core/src/tools/mod.rs
// ============================================================================
//
// TOOL WRAPPERS: Typed Parameter Models for the Wrapped AFNI Programs
//
// This module holds one typed configuration struct per wrapped AFNI tool,
// plus the parameter types the tools share. Each config validates itself as
// a whole, derives any generated output filenames, and assembles one
// immutable command line together with the manifest of files the caller
// should expect after execution.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::command::CommandLine;
use crate::error::CoreError;

/// Deconvolution regression wrapper (`3dDeconvolve`)
pub mod deconvolve;

/// Restricted-maximum-likelihood fit wrapper (`3dREMLfit`)
pub mod remlfit;

pub use deconvolve::Deconvolve;
pub use remlfit::RemlFit;

// ============================================================================
// SHARED PARAMETER TYPES
// ============================================================================

/// Order of the baseline polynomial: the literal `A` (automatic) or an
/// explicit degree. Rendered as `A` or base-10 decimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polort {
    Auto,
    Degree(i32),
}

impl Default for Polort {
    fn default() -> Self {
        Self::Auto
    }
}

impl fmt::Display for Polort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "A"),
            Self::Degree(n) => write!(f, "{n}"),
        }
    }
}

impl FromStr for Polort {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("A") {
            return Ok(Self::Auto);
        }
        s.parse::<i32>()
            .map(Self::Degree)
            .map_err(|_| CoreError::InvalidValue {
                param: "polort",
                value: s.to_string(),
                allowed: "'A' or an integer",
            })
    }
}

impl Serialize for Polort {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Auto => serializer.serialize_str("A"),
            Self::Degree(n) => serializer.serialize_i32(*n),
        }
    }
}

impl<'de> Deserialize<'de> for Polort {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PolortVisitor;

        impl Visitor<'_> for PolortVisitor {
            type Value = Polort;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("the string \"A\" or an integer degree")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Polort, E> {
                i32::try_from(v)
                    .map(Polort::Degree)
                    .map_err(|_| E::custom(format!("polort degree out of range: {v}")))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Polort, E> {
                i32::try_from(v)
                    .map(Polort::Degree)
                    .map_err(|_| E::custom(format!("polort degree out of range: {v}")))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Polort, E> {
                Polort::from_str(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(PolortVisitor)
    }
}

/// Whether stimulus timings in the onset files are local or global.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timing {
    #[default]
    Local,
    Global,
}

impl fmt::Display for Timing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Global => write!(f, "global"),
        }
    }
}

impl FromStr for Timing {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(Self::Local),
            "global" => Ok(Self::Global),
            other => Err(CoreError::InvalidValue {
                param: "timing",
                value: other.to_string(),
                allowed: "'local' or 'global'",
            }),
        }
    }
}

/// Output dataset format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputDatatype {
    #[default]
    Float,
    Short,
}

impl fmt::Display for OutputDatatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float => write!(f, "float"),
            Self::Short => write!(f, "short"),
        }
    }
}

impl FromStr for OutputDatatype {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "float" => Ok(Self::Float),
            "short" => Ok(Self::Short),
            other => Err(CoreError::InvalidValue {
                param: "output_datatype",
                value: other.to_string(),
                allowed: "'float' or 'short'",
            }),
        }
    }
}

// ============================================================================
// BUILD RESULTS
// ============================================================================

/// A cross-field suppression rule, evaluated before formatting: when its
/// trigger holds, the named parameter is omitted from the command line even
/// if it carries a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkipRule {
    pub param: &'static str,
    pub reason: &'static str,
}

impl SkipRule {
    pub(crate) fn covers(rules: &[SkipRule], param: &str) -> bool {
        rules.iter().any(|r| {
            if r.param == param {
                log::debug!("skipping '{}': {}", r.param, r.reason);
                true
            } else {
                false
            }
        })
    }
}

/// Output files the caller should expect to exist after execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputManifest {
    files: Vec<PathBuf>,
}

impl OutputManifest {
    pub(crate) fn push(&mut self, path: impl Into<PathBuf>) {
        self.files.push(path.into());
    }

    /// Declared output paths, in emission order.
    #[must_use]
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }
}

/// A validated, fully assembled tool invocation.
#[derive(Debug, Clone)]
pub struct BuiltCommand {
    /// The command line to hand to a `CommandRunner`.
    pub command: CommandLine,
    /// Files the tool is expected to produce.
    pub outputs: OutputManifest,
}

pub(crate) fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
