//! Command line front end for the lobe reconstruction engine.
//!
//! The engine itself is pure and I/O-free; everything here is boundary
//! work: flags, job files, CSV ingestion, logging, and report output.

mod args;
mod error;
mod io;
mod job;

use args::CliArgs;
use clap::Parser;
use error::CliError;
use job::Job;
use lobe_base::units::{Degrees, Nanometres, Radians};
use lobe_bsdf::{spectral_cells, BsdfVolume, BsdfVolumeBuilder};
use serde::Serialize;
use std::{fs::File, io::Write, path::Path};

/// Per-cell line of the YAML report.
#[derive(Debug, Serialize)]
struct CellSummary {
    wavelength: Nanometres,
    incidence: Radians,
    reflectance: f32,
    transmittance: Option<f32>,
}

/// The YAML report written after a successful build.
#[derive(Debug, Serialize)]
struct Report {
    sampling_step: Degrees,
    theta_samples: usize,
    phi_samples: usize,
    cells: Vec<CellSummary>,
}

impl Report {
    fn new(volume: &BsdfVolume, sampling_step: Degrees) -> Self {
        let mut cells = Vec::new();
        for (w, wavelength) in volume.wavelengths().iter().enumerate() {
            for (i, incidence) in volume.incidences().iter().enumerate() {
                cells.push(CellSummary {
                    wavelength: *wavelength,
                    incidence: *incidence,
                    reflectance: volume.reflectance().get(i, w),
                    transmittance: volume.transmittance().map(|t| t.get(i, w)),
                });
            }
        }
        Self {
            sampling_step,
            theta_samples: volume.grid().n_theta(),
            phi_samples: volume.grid().n_phi(),
            cells,
        }
    }
}

fn log_filter_from_level(level: u8) -> log::LevelFilter {
    match level {
        0 => log::LevelFilter::Error,
        1 => log::LevelFilter::Warn,
        2 => log::LevelFilter::Info,
        3 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

/// Sets up the logger from the CLI flags.
fn init_logger(args: &CliArgs, launch_time: std::time::SystemTime) {
    let log_level = if args.verbose { 4 } else { args.log_level };
    let timestamp = args.log_timestamp;
    env_logger::builder()
        .format(move |buf, record| {
            let top_level_module = record
                .module_path()
                .unwrap_or("?")
                .split("::")
                .next()
                .unwrap_or("?");
            if timestamp {
                let duration = launch_time.elapsed().unwrap_or_default();
                let millis = duration.as_millis() % 1000;
                let seconds = duration.as_secs() % 60;
                let minutes = (duration.as_secs() / 60) % 60;
                writeln!(
                    buf,
                    "{}:{:02}.{:03} {:5} [{}]: {}",
                    minutes,
                    seconds,
                    millis,
                    record.level(),
                    top_level_module,
                    record.args()
                )
            } else {
                writeln!(
                    buf,
                    "{:5} [{}]: {}",
                    record.level(),
                    top_level_module,
                    record.args()
                )
            }
        })
        .filter_level(log_filter_from_level(log_level))
        .init();
}

fn write_or_print(report: &Report, target: Option<&Path>) -> Result<(), CliError> {
    let yaml = serde_yaml::to_string(report)?;
    match target {
        Some(path) => {
            let mut file = File::create(path).map_err(|source| CliError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            file.write_all(yaml.as_bytes()).map_err(|source| CliError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            log::info!("report written to {}", path.display());
        },
        None => print!("{yaml}"),
    }
    Ok(())
}

fn run() -> Result<(), CliError> {
    let launch_time = std::time::SystemTime::now();
    let args = CliArgs::parse();
    init_logger(&args, launch_time);
    log::info!(
        "lobe launched at {} on {}",
        chrono::DateTime::<chrono::Utc>::from(launch_time),
        std::env::consts::OS
    );

    let job = Job::resolve(&args)?;
    let loaded = io::load_measurements_csv(&job.input)?;
    let volume = BsdfVolumeBuilder::new(loaded.set)
        .with_wavelengths(loaded.wavelengths)
        .with_sampling_step(job.sampling_step)
        .build()?;

    write_or_print(&Report::new(&volume, job.sampling_step), job.report.as_deref())?;

    if let Some(path) = job.dump.as_deref() {
        let cells = spectral_cells(&volume);
        let file = File::create(path).map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::to_writer(std::io::BufWriter::new(file), &cells)?;
        log::info!("{} export cells dumped to {}", cells.len(), path.display());
    }
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
