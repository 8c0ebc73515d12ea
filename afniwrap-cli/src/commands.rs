//! Command implementations for the CLI.
//!
//! Each subcommand resolves its arguments (or a JSON job file) into a core
//! configuration, builds the command line, prints it, and hands it to the
//! system runner unless `--dry-run` was given.

use std::fs;
use std::path::Path;

use afniwrap_core::{
    check_dependency, BuiltCommand, CommandRunner, CoreError, CoreResult, Deconvolve, RemlFit,
    SystemRunner,
};

use crate::cli::{DeconvolveArgs, RemlfitArgs};

/// Runs the `deconvolve` subcommand.
pub fn run_deconvolve(args: &DeconvolveArgs, dry_run: bool) -> CoreResult<()> {
    let config = deconvolve_config(args)?;
    execute(config.build()?, dry_run)
}

/// Runs the `remlfit` subcommand.
pub fn run_remlfit(args: &RemlfitArgs, dry_run: bool) -> CoreResult<()> {
    let config = remlfit_config(args)?;
    execute(config.build()?, dry_run)
}

fn deconvolve_config(args: &DeconvolveArgs) -> CoreResult<Deconvolve> {
    if let Some(path) = &args.params {
        return load_params(path);
    }

    let mut config = Deconvolve {
        in_file: args.in_file.clone(),
        stop: args.stop,
        goforit: args.goforit,
        num_stimts: args.num_stimts,
        stim_files: args.stim_files.clone(),
        models: args.models.clone(),
        labels: args.labels.clone(),
        ortvec: args.ortvec.clone(),
        out_xjpeg: args.out_xjpeg.clone(),
        fout: args.fout,
        rout: args.rout,
        tout: args.tout,
        vout: args.vout,
        bout: args.bout,
        no_bucket: args.no_bucket,
        ..Deconvolve::default()
    };
    if let Some(timing) = args.timing {
        config.timing = timing;
    }
    if let Some(polort) = args.polort {
        config.polort = polort;
    }
    if let Some(datatype) = args.output_datatype {
        config.output_datatype = datatype;
    }
    if let Some(out_xmat) = &args.out_xmat {
        config.out_xmat = out_xmat.clone();
    }
    if let Some(out_file) = &args.out_file {
        config.out_file = out_file.clone();
    }
    Ok(config)
}

fn remlfit_config(args: &RemlfitArgs) -> CoreResult<RemlFit> {
    if let Some(path) = &args.params {
        return load_params(path);
    }

    let mut config = RemlFit {
        in_file: args.in_file.clone(),
        goforit: args.goforit,
        glt: args.glt.clone(),
        labels: args.labels.clone(),
        fout: args.fout,
        rout: args.rout,
        tout: args.tout,
        vout: args.vout,
        bout: args.bout,
        no_bout: args.no_bout,
        ..RemlFit::default()
    };
    if let Some(polort) = args.polort {
        config.polort = polort;
    }
    if let Some(out_file) = &args.out_file {
        config.out_file = out_file.clone();
    }
    if let Some(out_var) = &args.out_var {
        config.out_var = out_var.clone();
    }
    if let Some(out_beta) = &args.out_beta {
        config.out_beta = out_beta.clone();
    }
    Ok(config)
}

/// Loads a tool configuration from a JSON job file.
fn load_params<T: serde::de::DeserializeOwned>(path: &Path) -> CoreResult<T> {
    log::debug!("loading parameters from {}", path.display());
    let text = fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(|e| {
        CoreError::Other(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Prints the assembled command and expected outputs, then runs it unless
/// this is a dry run.
fn execute(built: BuiltCommand, dry_run: bool) -> CoreResult<()> {
    println!("{}", built.command);
    for output in built.outputs.files() {
        log::info!("expected output: {}", output.display());
    }

    if dry_run {
        log::info!("dry run, not executing {}", built.command.program());
        return Ok(());
    }

    check_dependency(built.command.program())?;
    SystemRunner.run(&built.command)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    use crate::cli::{Cli, Commands};

    #[test]
    fn test_flags_map_onto_core_config() {
        let cli = Cli::try_parse_from([
            "afniwrap",
            "deconvolve",
            "-i",
            "run1.nii.gz",
            "--num-stimts",
            "1",
            "--stim-file",
            "a.1D",
            "--model",
            "GAM",
            "--label",
            "go",
            "--no-bucket",
            "--out-xmat",
            "design",
        ])
        .unwrap();
        let Commands::Deconvolve(args) = cli.command else {
            panic!("wrong subcommand");
        };
        let config = deconvolve_config(&args).unwrap();
        assert!(config.no_bucket);
        assert_eq!(config.out_xmat, std::path::PathBuf::from("design"));
        assert_eq!(config.out_file, std::path::PathBuf::from("Decon.nii.gz"));
    }

    #[test]
    fn test_params_file_overrides_flags() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"in_file": ["run1.nii.gz"], "glt": ["a-b"], "labels": ["AvB"], "no_bout": true}}"#
        )
        .unwrap();

        let args = RemlfitArgs {
            params: Some(file.path().to_path_buf()),
            in_file: Vec::new(),
            goforit: None,
            polort: None,
            glt: Vec::new(),
            labels: Vec::new(),
            fout: false,
            rout: false,
            tout: false,
            vout: false,
            bout: false,
            no_bout: false,
            out_file: None,
            out_var: None,
            out_beta: None,
        };
        let config = remlfit_config(&args).unwrap();
        assert!(config.no_bout);
        assert_eq!(config.glt, ["a-b"]);
    }

    #[test]
    fn test_malformed_params_file_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = load_params::<RemlFit>(file.path()).unwrap_err();
        assert!(matches!(err, CoreError::Other(msg) if msg.contains("failed to parse")));
    }
}
