//! YAML job descriptions.
//!
//! A job file captures one reconstruction run so it can be repeated
//! without retyping flags:
//!
//! ```yaml
//! input: measurements.csv
//! sampling_step: 0.5 deg
//! report: run.yaml
//! dump: cells.json
//! ```

use crate::{args::CliArgs, error::CliError};
use lobe_base::units::Degrees;
use serde::Deserialize;
use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

/// One reconstruction run: what to read, how to sample, where to write.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Job {
    /// Measurement CSV to ingest.
    pub input: PathBuf,
    /// Angular sampling step of the reconstruction lattice.
    #[serde(default = "default_step")]
    pub sampling_step: Degrees,
    /// Where to write the YAML report; stdout when absent.
    #[serde(default)]
    pub report: Option<PathBuf>,
    /// Where to write the export cells as JSON; skipped when absent.
    #[serde(default)]
    pub dump: Option<PathBuf>,
}

fn default_step() -> Degrees { Degrees::new(1.0) }

impl Job {
    /// Loads a job description from a YAML file.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let file = File::open(path).map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_yaml::from_reader(BufReader::new(file))?)
    }

    /// Builds the effective job from the command line, merging an optional
    /// job file with the flags (explicit flags win).
    pub fn resolve(args: &CliArgs) -> Result<Self, CliError> {
        let base = match args.job.as_deref() {
            Some(path) => Some(Self::load(path)?),
            None => None,
        };
        let input = args
            .input
            .clone()
            .or_else(|| base.as_ref().map(|job| job.input.clone()))
            .ok_or(CliError::MissingInput)?;
        let sampling_step = if args.step != default_step() {
            args.step
        } else {
            base.as_ref()
                .map(|job| job.sampling_step)
                .unwrap_or(args.step)
        };
        Ok(Self {
            input,
            sampling_step,
            report: args
                .report
                .clone()
                .or_else(|| base.as_ref().and_then(|job| job.report.clone())),
            dump: args
                .dump
                .clone()
                .or_else(|| base.as_ref().and_then(|job| job.dump.clone())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lobe_base::deg;

    #[test]
    fn minimal_job_defaults() {
        let job: Job = serde_yaml::from_str("input: scans.csv\n").unwrap();
        assert_eq!(job.input, PathBuf::from("scans.csv"));
        assert_eq!(job.sampling_step, deg!(1.0));
        assert!(job.report.is_none());
        assert!(job.dump.is_none());
    }

    #[test]
    fn full_job_round_trip() {
        let job: Job = serde_yaml::from_str(
            "input: scans.csv\nsampling_step: 0.5 deg\nreport: out.yaml\ndump: cells.json\n",
        )
        .unwrap();
        assert_eq!(job.sampling_step, deg!(0.5));
        assert_eq!(job.report, Some(PathBuf::from("out.yaml")));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(serde_yaml::from_str::<Job>("input: a.csv\nresolution: 5\n").is_err());
    }
}
