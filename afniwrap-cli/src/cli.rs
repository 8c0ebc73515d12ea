// afniwrap-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use afniwrap_core::{OutputDatatype, Polort, Timing};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Afniwrap: command-line builders for AFNI GLM tools",
    long_about = "Builds validated 3dDeconvolve and 3dREMLfit command lines \
                  via the afniwrap-core library, optionally running them."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Print the assembled command line without executing it.
    #[arg(long, global = true, default_value_t = false)]
    pub dry_run: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Builds and runs a 3dDeconvolve invocation
    Deconvolve(DeconvolveArgs),
    /// Builds and runs a 3dREMLfit invocation
    Remlfit(RemlfitArgs),
}

#[derive(Parser, Debug)]
pub struct DeconvolveArgs {
    /// JSON job file holding the full parameter set; other parameter
    /// flags are ignored when this is given
    #[arg(long, value_name = "FILE")]
    pub params: Option<PathBuf>,

    /// Input dataset(s)
    #[arg(short = 'i', long = "input", value_name = "DATASET")]
    pub in_file: Vec<PathBuf>,

    /// Whether stimulus timings are 'local' or 'global'
    #[arg(long, value_name = "TIMING")]
    pub timing: Option<Timing>,

    /// Stop after generating the design matrix
    #[arg(long)]
    pub stop: bool,

    /// Maximum number of warnings before stopping execution
    #[arg(long, value_name = "N")]
    pub goforit: Option<i32>,

    /// Order of the baseline polynomial ('A' or an integer)
    #[arg(long, value_name = "ORDER")]
    pub polort: Option<Polort>,

    /// Output dataset format ('float' or 'short')
    #[arg(long, value_name = "TYPE")]
    pub output_datatype: Option<OutputDatatype>,

    /// Number of stimulus time files
    #[arg(long, value_name = "N")]
    pub num_stimts: Option<i32>,

    /// Onset-time file for one stimulus (repeat per stimulus)
    #[arg(long = "stim-file", value_name = "FILE")]
    pub stim_files: Vec<PathBuf>,

    /// Response model for one stimulus (repeat, parallel to --stim-file)
    #[arg(long = "model", value_name = "MODEL")]
    pub models: Vec<String>,

    /// Label for one stimulus (repeat, parallel to --stim-file)
    #[arg(long = "label", value_name = "LABEL")]
    pub labels: Vec<String>,

    /// Motion regressor file
    #[arg(long, value_name = "FILE")]
    pub ortvec: Option<PathBuf>,

    /// Name of the output design matrix
    #[arg(long, value_name = "NAME")]
    pub out_xmat: Option<PathBuf>,

    /// Generate an image of the design matrix under this name
    #[arg(long, value_name = "NAME")]
    pub out_xjpeg: Option<PathBuf>,

    /// Output F-statistics for each stimulus
    #[arg(long)]
    pub fout: bool,

    /// Output R^2 statistics
    #[arg(long)]
    pub rout: bool,

    /// Output T-statistics for each stimulus
    #[arg(long)]
    pub tout: bool,

    /// Output the sample variance (MSE) map
    #[arg(long)]
    pub vout: bool,

    /// Turn on output of baseline coefficients and stats
    #[arg(long)]
    pub bout: bool,

    /// Do not create the output bucket
    #[arg(long)]
    pub no_bucket: bool,

    /// Name of the output bucket
    #[arg(short = 'o', long, value_name = "NAME")]
    pub out_file: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct RemlfitArgs {
    /// JSON job file holding the full parameter set; other parameter
    /// flags are ignored when this is given
    #[arg(long, value_name = "FILE")]
    pub params: Option<PathBuf>,

    /// Input dataset(s)
    #[arg(short = 'i', long = "input", value_name = "DATASET")]
    pub in_file: Vec<PathBuf>,

    /// Maximum number of warnings before stopping execution
    #[arg(long, value_name = "N")]
    pub goforit: Option<i32>,

    /// Order of the baseline polynomial ('A' or an integer)
    #[arg(long, value_name = "ORDER")]
    pub polort: Option<Polort>,

    /// Symbolic contrast expression (repeat per contrast)
    #[arg(long = "glt", value_name = "EXPR")]
    pub glt: Vec<String>,

    /// Label for one contrast (repeat, parallel to --glt)
    #[arg(long = "label", value_name = "LABEL")]
    pub labels: Vec<String>,

    /// Output F-statistics for each stimulus
    #[arg(long)]
    pub fout: bool,

    /// Output R^2 statistics
    #[arg(long)]
    pub rout: bool,

    /// Output T-statistics for each stimulus
    #[arg(long)]
    pub tout: bool,

    /// Output the sample variance (MSE) map
    #[arg(long)]
    pub vout: bool,

    /// Turn on output of baseline coefficients and stats
    #[arg(long)]
    pub bout: bool,

    /// Do not output baseline estimates
    #[arg(long)]
    pub no_bout: bool,

    /// Name of the statistics bucket
    #[arg(short = 'o', long, value_name = "NAME")]
    pub out_file: Option<PathBuf>,

    /// Name of the variance output volume
    #[arg(long, value_name = "NAME")]
    pub out_var: Option<PathBuf>,

    /// Name of the beta-coefficient output volume
    #[arg(long, value_name = "NAME")]
    pub out_beta: Option<PathBuf>,
}
