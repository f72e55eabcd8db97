//! Measurement CSV ingestion.
//!
//! The accepted layout is the goniometer export this tool has always
//! consumed: a header row whose columns from the third onward name the
//! measured wavelengths (`555nm`), then one row per in-plane sample:
//! incidence (degrees), outgoing theta (degrees), and one intensity value
//! per wavelength column. Angles are converted to radians here, at the
//! boundary; the engine never sees degrees.

use crate::error::CliError;
use lobe_base::units::Nanometres;
use lobe_bsdf::{MeasurementPoint, MeasurementSet};
use std::path::Path;

/// Measurements read from a CSV file, together with the wavelength set
/// declared by its header.
#[derive(Debug)]
pub struct LoadedMeasurements {
    /// The measurement points, in file order.
    pub set: MeasurementSet,
    /// Wavelengths named by the header, in column order.
    pub wavelengths: Vec<Nanometres>,
}

/// Reads a measurement CSV file.
pub fn load_measurements_csv(path: &Path) -> Result<LoadedMeasurements, CliError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| CliError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

    let mut records = reader.records();
    let header = records
        .next()
        .ok_or_else(|| CliError::MalformedInput {
            path: path.to_path_buf(),
            line: 1,
            reason: "file is empty".to_string(),
        })?
        .map_err(|source| CliError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
    if header.len() < 3 {
        return Err(CliError::MalformedInput {
            path: path.to_path_buf(),
            line: 1,
            reason: "header needs at least one wavelength column".to_string(),
        });
    }
    let wavelengths: Vec<Nanometres> = header
        .iter()
        .skip(2)
        .map(|column| {
            column.parse::<Nanometres>().map_err(|err| CliError::MalformedInput {
                path: path.to_path_buf(),
                line: 1,
                reason: format!("bad wavelength column {column:?}: {err}"),
            })
        })
        .collect::<Result<_, _>>()?;

    let mut points = Vec::new();
    for (index, record) in records.enumerate() {
        let line = index + 2;
        let record = record.map_err(|source| CliError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        if record.len() != wavelengths.len() + 2 {
            return Err(CliError::MalformedInput {
                path: path.to_path_buf(),
                line,
                reason: format!(
                    "expected {} fields, found {}",
                    wavelengths.len() + 2,
                    record.len()
                ),
            });
        }
        let field = |i: usize| -> Result<f32, CliError> {
            record[i].parse::<f32>().map_err(|_| CliError::MalformedInput {
                path: path.to_path_buf(),
                line,
                reason: format!("bad numeric field {:?}", &record[i]),
            })
        };
        let incidence = lobe_base::deg!(field(0)?).in_radians();
        let theta = lobe_base::deg!(field(1)?).in_radians();
        for (w, wavelength) in wavelengths.iter().enumerate() {
            points.push(MeasurementPoint::new(
                incidence,
                *wavelength,
                theta,
                field(w + 2)?,
            ));
        }
    }

    log::info!(
        "loaded {} measurement points over {} wavelengths from {}",
        points.len(),
        wavelengths.len(),
        path.display()
    );
    Ok(LoadedMeasurements {
        set: MeasurementSet::new(points),
        wavelengths,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lobe_base::nm;
    use std::io::Write;

    fn write_temp(content: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!(
            "lobe-io-test-{}-{}.csv",
            std::process::id(),
            content.len()
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn parses_the_goniometer_layout() {
        let path = write_temp(
            "incidence,theta,555nm,600nm\n\
             0,-90,0.0,0.1\n\
             0,0,1.0,1.1\n\
             0,90,0.5,0.6\n",
        );
        let loaded = load_measurements_csv(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded.wavelengths, vec![nm!(555.0), nm!(600.0)]);
        assert_eq!(loaded.set.len(), 6);
        let point = &loaded.set.points()[2];
        assert_eq!(point.wavelength, nm!(555.0));
        assert!((point.theta.value()).abs() < 1e-6);
        assert_eq!(point.value, 1.0);
        assert!(loaded.set.has_transmissive());
    }

    #[test]
    fn bad_wavelength_column_names_the_header() {
        let path = write_temp("incidence,theta,green\n0,0,1.0\n");
        let err = load_measurements_csv(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, CliError::MalformedInput { line: 1, .. }));
    }

    #[test]
    fn short_record_reports_its_line() {
        let path = write_temp("incidence,theta,555nm\n0,0,1.0\n0,10\n");
        let err = load_measurements_csv(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, CliError::MalformedInput { line: 3, .. }));
    }
}
