//! Command line interface arguments.

use lobe_base::units::Degrees;
use std::path::PathBuf;

/// Lobe command line interface arguments.
#[derive(clap::Parser, Debug)]
#[clap(
    author,
    version,
    about = "Reconstructs dense BSDF volumes from rotationally-symmetric goniometric scans."
)]
pub struct CliArgs {
    /// Path to the measurement CSV file. May be omitted when a job
    /// description supplies it.
    #[clap(help = "Measurement CSV file (incidence, theta, one column per wavelength)")]
    pub input: Option<PathBuf>,

    /// Path to a YAML job description; command line flags override its
    /// fields.
    #[clap(short, long, help = "Load a YAML job description")]
    pub job: Option<PathBuf>,

    /// Angular sampling step of the reconstruction lattice.
    #[clap(
        short,
        long,
        help = "Angular sampling step, e.g. \"1 deg\" or \"0.5 deg\"",
        default_value = "1 deg"
    )]
    pub step: Degrees,

    /// Where to write the YAML report; stdout when omitted.
    #[clap(short, long, help = "Write the YAML report to a file instead of stdout")]
    pub report: Option<PathBuf>,

    /// Where to write the full export cells as JSON.
    #[clap(long, help = "Dump the export-boundary cell records as JSON")]
    pub dump: Option<PathBuf>,

    /// Whether to print verbose information to stdout.
    #[clap(short, long, help = "Use verbose output (log level = 4)")]
    pub verbose: bool,

    /// Verbosity level for the log.
    #[clap(
        long,
        help = "Logging verbosity level\n  0 - error\n  1 - warn + error\n  2 - info + warn + \
                error\n  3 - debug + info + warn + error\n  4 - trace and everything above",
        default_value_t = 1
    )]
    pub log_level: u8,

    /// Whether to show the timestamp in the log.
    #[clap(long, help = "Show elapsed time for each log message")]
    pub log_timestamp: bool,
}
