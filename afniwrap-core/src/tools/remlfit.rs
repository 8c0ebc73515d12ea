//! Wrapper for `3dREMLfit`, AFNI's restricted-maximum-likelihood fitting
//! tool.
//!
//! The repeated block here is the symbolic-contrast section: one
//! `-gltsym 'SYM: <expr>' <label>` line per (contrast, label) pair, in
//! input order. Input datasets are passed as a single quoted argument, the
//! way the tool expects multi-run input.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::command::{quote, ArgGroup, CommandBuilder};
use crate::error::CoreResult;
use crate::filenames;
use crate::tools::{path_str, BuiltCommand, OutputManifest, Polort};
use crate::validation;

/// Typed parameter set for one `3dREMLfit` invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemlFit {
    /// Maximum number of warnings before stopping execution.
    pub goforit: Option<i32>,
    /// Order of the baseline polynomial.
    pub polort: Polort,
    /// Input dataset(s). Mandatory; every path must exist.
    pub in_file: Vec<PathBuf>,
    /// Symbolic contrast expressions (general linear tests). Requires `labels`.
    pub glt: Vec<String>,
    /// Label for each contrast, parallel to `glt`.
    pub labels: Vec<String>,
    /// Output F-statistics for each stimulus.
    pub fout: bool,
    /// Output R^2 statistics.
    pub rout: bool,
    /// Output T-statistics for each stimulus.
    pub tout: bool,
    /// Output the sample variance (MSE) map.
    pub vout: bool,
    /// Turn on output of baseline coefficients and stats.
    pub bout: bool,
    /// Do not output baseline estimates.
    pub no_bout: bool,
    /// Name of the statistics bucket (`_REML` derivation applies).
    pub out_file: PathBuf,
    /// Name of the variance output volume.
    pub out_var: PathBuf,
    /// Name of the beta-coefficient output volume.
    pub out_beta: PathBuf,
}

impl Default for RemlFit {
    fn default() -> Self {
        Self {
            goforit: None,
            polort: Polort::default(),
            in_file: Vec::new(),
            glt: Vec::new(),
            labels: Vec::new(),
            fout: false,
            rout: false,
            tout: false,
            vout: false,
            bout: false,
            no_bout: false,
            out_file: PathBuf::from("STATS.nii.gz"),
            out_var: PathBuf::from("Rvars.nii.gz"),
            out_beta: PathBuf::from("Rbetas.nii.gz"),
        }
    }
}

impl RemlFit {
    /// External program this configuration drives.
    pub const PROGRAM: &'static str = "3dREMLfit";

    /// Validates the whole parameter set; runs before any formatting.
    pub fn validate(&self) -> CoreResult<()> {
        validation::require_nonempty("in_file", &self.in_file)?;
        if !self.glt.is_empty() {
            validation::require_together("glt", "labels", !self.labels.is_empty())?;
            validation::require_len("labels", &self.labels, self.glt.len())?;
        }
        validation::require_all_exist(&self.in_file)?;
        Ok(())
    }

    /// Validates, derives generated filenames, and assembles the command
    /// line plus the manifest of expected outputs.
    pub fn build(&self) -> CoreResult<BuiltCommand> {
        self.validate()?;

        let mut builder = CommandBuilder::new(Self::PROGRAM);
        if let Some(goforit) = self.goforit {
            builder = builder.arg_at(3, "-GOFORIT", goforit);
        }
        builder = builder
            .arg_at(4, "-polort", self.polort)
            .group(input_group(&self.in_file));

        if !self.glt.is_empty() {
            builder = builder.group(self.contrast_block());
        }

        for (flag, enabled) in [
            ("-fout", self.fout),
            ("-rout", self.rout),
            ("-tout", self.tout),
            ("-vout", self.vout),
            ("-bout", self.bout),
        ] {
            if enabled {
                builder = builder.flag(flag);
            }
        }

        let mut outputs = OutputManifest::default();
        let bucket = filenames::derive_bucket_name(&path_str(&self.out_file), "_REML");
        builder = builder.arg("-Rbuck", &bucket);
        outputs.push(bucket);

        let out_var = path_str(&self.out_var);
        builder = builder.arg("-Rvar", &out_var);
        outputs.push(out_var);

        let out_beta = path_str(&self.out_beta);
        builder = builder.arg("-Rbeta", &out_beta);
        outputs.push(out_beta);

        if self.no_bout {
            builder = builder.flag_at(-1, "-nobout");
        }

        Ok(BuiltCommand {
            command: builder.build(),
            outputs,
        })
    }

    /// One `-gltsym 'SYM: <expr>' <label>` line per contrast, input order.
    fn contrast_block(&self) -> ArgGroup {
        let mut tokens = Vec::new();
        let mut lines = Vec::new();
        for (expr, label) in self.glt.iter().zip(&self.labels) {
            let sym = format!("SYM: {expr}");
            lines.push(format!("-gltsym {} {label}", quote(&sym)));
            tokens.extend(["-gltsym".to_string(), sym, label.clone()]);
        }
        ArgGroup::new(tokens, lines)
    }
}

/// Multi-run input is passed as one quoted argument, matching the tool's
/// `-input "run1 run2"` convention.
fn input_group(paths: &[PathBuf]) -> ArgGroup {
    let joined = paths.iter().map(|p| path_str(p)).collect::<Vec<_>>().join(" ");
    let line = format!("-input \"{joined}\"");
    ArgGroup::new(vec!["-input".to_string(), joined], vec![line])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use std::fs::File;
    use std::path::Path;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        File::create(&path).unwrap();
        path
    }

    fn contrast_config(dir: &Path) -> RemlFit {
        RemlFit {
            in_file: vec![touch(dir, "run1.nii.gz"), touch(dir, "run2.nii.gz")],
            glt: vec!["a-b".to_string(), "b-c".to_string()],
            labels: vec!["AvB".to_string(), "BvC".to_string()],
            ..RemlFit::default()
        }
    }

    #[test]
    fn test_contrast_section_one_line_per_pair_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let built = contrast_config(dir.path()).build().unwrap();
        let script = built.command.to_string();

        assert!(script.contains("-gltsym 'SYM: a-b' AvB"));
        assert!(script.contains("-gltsym 'SYM: b-c' BvC"));
        assert_eq!(script.matches("-gltsym").count(), 2);
        assert!(script.find("'SYM: a-b'").unwrap() < script.find("'SYM: b-c'").unwrap());
    }

    #[test]
    fn test_multi_run_input_is_one_quoted_argument() {
        let dir = tempfile::tempdir().unwrap();
        let built = contrast_config(dir.path()).build().unwrap();

        let run1 = path_str(&dir.path().join("run1.nii.gz"));
        let run2 = path_str(&dir.path().join("run2.nii.gz"));
        let args = built.command.args();
        let input_pos = args.iter().position(|a| a == "-input").unwrap();
        assert_eq!(args[input_pos + 1], format!("{run1} {run2}"));
        assert!(built
            .command
            .to_string()
            .contains(&format!("-input \"{run1} {run2}\"")));
    }

    #[test]
    fn test_default_outputs_and_reml_derivation() {
        let dir = tempfile::tempdir().unwrap();
        let config = RemlFit {
            glt: Vec::new(),
            labels: Vec::new(),
            ..contrast_config(dir.path())
        };
        let built = config.build().unwrap();
        let args = built.command.args();

        assert_eq!(built.command.program(), "3dREMLfit");
        assert_eq!(&args[..2], ["-polort", "A"]);
        assert!(args.windows(2).any(|w| w == ["-Rbuck", "STATS_REML.nii.gz"]));
        assert!(args.windows(2).any(|w| w == ["-Rvar", "Rvars.nii.gz"]));
        assert!(args.windows(2).any(|w| w == ["-Rbeta", "Rbetas.nii.gz"]));
        assert!(!args.contains(&"-gltsym".to_string()));
        assert_eq!(
            built.outputs.files(),
            [
                PathBuf::from("STATS_REML.nii.gz"),
                PathBuf::from("Rvars.nii.gz"),
                PathBuf::from("Rbetas.nii.gz"),
            ]
        );
    }

    #[test]
    fn test_no_bout_is_anchored_last() {
        let dir = tempfile::tempdir().unwrap();
        let config = RemlFit {
            no_bout: true,
            ..contrast_config(dir.path())
        };
        let args = config.build().unwrap().command.args();
        assert_eq!(args.last().unwrap(), "-nobout");
    }

    #[test]
    fn test_glt_requires_labels() {
        let dir = tempfile::tempdir().unwrap();
        let config = RemlFit {
            labels: Vec::new(),
            ..contrast_config(dir.path())
        };
        assert!(matches!(
            config.build().unwrap_err(),
            CoreError::UnsatisfiedDependency {
                param: "glt",
                requires: "labels",
            }
        ));
    }

    #[test]
    fn test_contrast_label_length_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let config = RemlFit {
            labels: vec!["AvB".to_string()],
            ..contrast_config(dir.path())
        };
        assert!(matches!(
            config.build().unwrap_err(),
            CoreError::LengthMismatch {
                param: "labels",
                expected: 2,
                actual: 1,
            }
        ));
    }

    #[test]
    fn test_missing_input_dataset() {
        let err = RemlFit::default().build().unwrap_err();
        assert!(matches!(err, CoreError::MissingParameter("in_file")));

        let dir = tempfile::tempdir().unwrap();
        let mut config = contrast_config(dir.path());
        config.in_file.push(dir.path().join("gone.nii.gz"));
        assert!(matches!(
            config.build().unwrap_err(),
            CoreError::InputNotFound(p) if p.ends_with("gone.nii.gz")
        ));
    }

    #[test]
    fn test_build_is_byte_identical_across_invocations() {
        let dir = tempfile::tempdir().unwrap();
        let config = contrast_config(dir.path());
        assert_eq!(
            config.build().unwrap().command.to_string(),
            config.build().unwrap().command.to_string()
        );
    }
}
