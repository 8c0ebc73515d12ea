//! Wrapper for `3dDeconvolve`, AFNI's deconvolution regression tool.
//!
//! The interesting part of this interface is the repeated stimulus block:
//! the `-num_stimts` count flag is fused with one
//! `-stim_times <i> <file> '<model>' -stim_label <i> <label>` entry per
//! stimulus, drawn from three parallel lists that must match the declared
//! count. Everything else is plain flag formatting plus the generated
//! design-matrix and bucket filenames.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::command::{quote, shell_quote, ArgGroup, CommandBuilder};
use crate::error::{CoreError, CoreResult};
use crate::filenames;
use crate::tools::{path_str, BuiltCommand, OutputDatatype, OutputManifest, Polort, SkipRule, Timing};
use crate::validation;

/// Typed parameter set for one `3dDeconvolve` invocation.
///
/// Optional parameters are `Option` or empty lists; defaults match the
/// canonical schema (local timings, automatic baseline polynomial, float
/// output, `X.xmat.1D` design matrix, `Decon.nii.gz` bucket).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Deconvolve {
    /// Whether stimulus timings in `stim_files` are local or global.
    pub timing: Timing,
    /// Stop after generating the design matrix.
    pub stop: bool,
    /// Maximum number of warnings before stopping execution.
    pub goforit: Option<i32>,
    /// Order of the baseline polynomial.
    pub polort: Polort,
    /// Output dataset format.
    pub output_datatype: OutputDatatype,
    /// Input dataset(s). Mandatory; every path must exist.
    pub in_file: Vec<PathBuf>,
    /// Number of stimulus time files. Mandatory; must match the list lengths.
    pub num_stimts: Option<i32>,
    /// Onset-time files, one per stimulus. Requires `models` and `labels`.
    pub stim_files: Vec<PathBuf>,
    /// Response model for each stimulus, parallel to `stim_files`.
    pub models: Vec<String>,
    /// Label for each stimulus, parallel to `stim_files` and `models`.
    pub labels: Vec<String>,
    /// Motion regressor file.
    pub ortvec: Option<PathBuf>,
    /// Name of the output design matrix (generated-name rule applies).
    pub out_xmat: PathBuf,
    /// Generate an image of the design matrix under this name.
    pub out_xjpeg: Option<PathBuf>,
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
    /// Do not create the output bucket; suppresses `out_file` entirely.
    pub no_bucket: bool,
    /// Name of the output bucket (`_stats` derivation applies).
    pub out_file: PathBuf,
}

impl Default for Deconvolve {
    fn default() -> Self {
        Self {
            timing: Timing::default(),
            stop: false,
            goforit: None,
            polort: Polort::default(),
            output_datatype: OutputDatatype::default(),
            in_file: Vec::new(),
            num_stimts: None,
            stim_files: Vec::new(),
            models: Vec::new(),
            labels: Vec::new(),
            ortvec: None,
            out_xmat: PathBuf::from("X.xmat.1D"),
            out_xjpeg: None,
            fout: false,
            rout: false,
            tout: false,
            vout: false,
            bout: false,
            no_bucket: false,
            out_file: PathBuf::from("Decon.nii.gz"),
        }
    }
}

impl Deconvolve {
    /// External program this configuration drives.
    pub const PROGRAM: &'static str = "3dDeconvolve";

    /// Validates the whole parameter set; runs before any formatting.
    pub fn validate(&self) -> CoreResult<()> {
        validation::require_nonempty("in_file", &self.in_file)?;
        let num_stimts = self.required_num_stimts()?;
        validation::require_nonempty("stim_files", &self.stim_files)?;
        validation::require_together("stim_files", "models", !self.models.is_empty())?;
        validation::require_together("stim_files", "labels", !self.labels.is_empty())?;
        validation::require_len("stim_files", &self.stim_files, num_stimts)?;
        validation::require_len("models", &self.models, num_stimts)?;
        validation::require_len("labels", &self.labels, num_stimts)?;
        validation::require_all_exist(&self.in_file)?;
        validation::require_all_exist(&self.stim_files)?;
        if let Some(ortvec) = &self.ortvec {
            validation::require_exists(ortvec)?;
        }
        Ok(())
    }

    /// Validates, derives generated filenames, and assembles the command
    /// line plus the manifest of expected outputs.
    pub fn build(&self) -> CoreResult<BuiltCommand> {
        self.validate()?;
        let num_stimts = self.required_num_stimts()?;
        let skips = self.skip_rules();

        let mut builder = CommandBuilder::new(Self::PROGRAM)
            .flag_at(1, &format!("-{}_times", self.timing));
        if self.stop {
            builder = builder.flag_at(2, "-x1D_stop");
        }
        if let Some(goforit) = self.goforit {
            builder = builder.arg_at(3, "-GOFORIT", goforit);
        }
        builder = builder
            .arg_at(4, "-polort", self.polort)
            .flag_at(5, &format!("-{}", self.output_datatype))
            .group(input_group(&self.in_file))
            .group(self.stim_block(num_stimts));
        if let Some(ortvec) = &self.ortvec {
            builder = builder.arg("-ortvec", path_str(ortvec));
        }

        let xjpeg = self
            .out_xjpeg
            .as_ref()
            .map(|p| filenames::derive_xjpeg_name(&path_str(p)));
        if let Some(name) = &xjpeg {
            builder = builder.arg("-xjpeg", name);
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
        if !SkipRule::covers(&skips, "out_file") {
            let bucket = filenames::derive_bucket_name(&path_str(&self.out_file), "_stats");
            builder = builder.arg("-bucket", &bucket);
            outputs.push(bucket);
        }
        if self.no_bucket {
            builder = builder.flag_at(-2, "-nobucket");
        }

        let xmat = filenames::derive_xmat_name(&path_str(&self.out_xmat));
        builder = builder.arg_at(-1, "-x1D", &xmat);
        outputs.push(xmat);
        if let Some(name) = xjpeg {
            outputs.push(name);
        }

        Ok(BuiltCommand {
            command: builder.build(),
            outputs,
        })
    }

    fn required_num_stimts(&self) -> CoreResult<usize> {
        let num_stimts = self
            .num_stimts
            .ok_or(CoreError::MissingParameter("num_stimts"))?;
        usize::try_from(num_stimts).ok().filter(|n| *n > 0).ok_or(
            CoreError::InvalidValue {
                param: "num_stimts",
                value: num_stimts.to_string(),
                allowed: "a positive integer",
            },
        )
    }

    /// Cross-field suppression rules, evaluated before formatting.
    fn skip_rules(&self) -> Vec<SkipRule> {
        let mut rules = Vec::new();
        if self.no_bucket {
            rules.push(SkipRule {
                param: "out_file",
                reason: "no_bucket suppresses the output bucket",
            });
        }
        rules
    }

    /// The fused `-num_stimts` block: count flag plus one
    /// `-stim_times`/`-stim_label` entry per stimulus, index starting at 1.
    fn stim_block(&self, num_stimts: usize) -> ArgGroup {
        let mut tokens = vec!["-num_stimts".to_string(), num_stimts.to_string()];
        let mut lines = vec![format!("-num_stimts {num_stimts}")];

        let entries = self
            .stim_files
            .iter()
            .zip(&self.models)
            .zip(&self.labels)
            .enumerate();
        for (i, ((file, model), label)) in entries {
            let index = (i + 1).to_string();
            let file = path_str(file);
            lines.push(format!(
                "-stim_times {index} {file} {} -stim_label {index} {label}",
                quote(model)
            ));
            tokens.extend([
                "-stim_times".to_string(),
                index.clone(),
                file,
                model.clone(),
                "-stim_label".to_string(),
                index,
                label.clone(),
            ]);
        }

        ArgGroup::new(tokens, lines)
    }
}

fn input_group(paths: &[PathBuf]) -> ArgGroup {
    let mut tokens = vec!["-input".to_string()];
    let mut line = "-input".to_string();
    for path in paths {
        let path = path_str(path);
        line.push(' ');
        line.push_str(&shell_quote(&path));
        tokens.push(path);
    }
    ArgGroup::new(tokens, vec![line])
}
