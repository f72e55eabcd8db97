//! Export-boundary view of a finished volume.
//!
//! The serialization boundary consumes the volume grouped by wavelength,
//! then incidence, then branch. This module prepares exactly that grouping
//! in memory; writing any binary container is the boundary's business, not
//! ours.

use crate::volume::BsdfVolume;
use lobe_base::units::{Nanometres, Radians};
use serde::Serialize;
use std::f32::consts::FRAC_PI_2;

/// One branch of one spectral cell, flattened for the boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BranchRecord {
    /// Hemispherical integral of the branch (reflectance or
    /// transmittance).
    pub integral: f32,
    /// Polar samples in radians. Transmission samples are offset by +pi/2
    /// back into the physical [pi/2, pi] range the consumer expects.
    pub theta_samples: Vec<f32>,
    /// Azimuthal samples in radians.
    pub phi_samples: Vec<f32>,
    /// Cosine-weighted values flattened theta-major: for each theta, all
    /// phi samples.
    pub values: Vec<f32>,
}

/// One (wavelength, incidence) cell of the export grouping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellRecord {
    /// Wavelength of the cell.
    pub wavelength: Nanometres,
    /// Incidence angle of the cell.
    pub incidence: Radians,
    /// The reflective branch, always present.
    pub reflection: BranchRecord,
    /// The transmissive branch, present iff the volume carries one.
    pub transmission: Option<BranchRecord>,
}

/// Groups a volume into export cells, wavelength-major then incidence,
/// matching the boundary's container layout.
pub fn spectral_cells(volume: &BsdfVolume) -> Vec<CellRecord> {
    let grid = volume.grid();
    let thetas: Vec<f32> = grid.theta.iter().map(|t| t.value()).collect();
    let phis: Vec<f32> = grid.phi.iter().map(|p| p.value()).collect();
    let mut cells = Vec::with_capacity(volume.wavelengths().len() * volume.incidences().len());
    for (w, wavelength) in volume.wavelengths().iter().enumerate() {
        for (i, incidence) in volume.incidences().iter().enumerate() {
            let mut reflection_values = Vec::with_capacity(thetas.len() * phis.len());
            for t in 0..thetas.len() {
                for p in 0..phis.len() {
                    reflection_values.push(volume.brdf().get(i, w, p, t));
                }
            }
            let reflection = BranchRecord {
                integral: volume.reflectance().get(i, w),
                theta_samples: thetas.clone(),
                phi_samples: phis.clone(),
                values: reflection_values,
            };
            let transmission = volume.btdf().map(|btdf| {
                let mut values = Vec::with_capacity(thetas.len() * phis.len());
                for t in 0..thetas.len() {
                    for p in 0..phis.len() {
                        values.push(btdf.get(i, w, p, t));
                    }
                }
                BranchRecord {
                    integral: volume
                        .transmittance()
                        .map(|transmittance| transmittance.get(i, w))
                        .unwrap_or_default(),
                    theta_samples: thetas.iter().map(|t| t + FRAC_PI_2).collect(),
                    phi_samples: phis.clone(),
                    values,
                }
            });
            cells.push(CellRecord {
                wavelength: *wavelength,
                incidence: *incidence,
                reflection,
                transmission,
            });
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        measurement::{MeasurementPoint, MeasurementSet},
        volume::BsdfVolumeBuilder,
    };
    use approx::assert_abs_diff_eq;
    use lobe_base::{deg, nm, rad};
    use std::f32::consts::FRAC_PI_2;

    fn two_cell_volume() -> crate::volume::BsdfVolume {
        let mut points = Vec::new();
        for wavelength in [nm!(555.0), nm!(600.0)] {
            for incidence in [rad!(0.0), rad!(0.4)] {
                points.push(MeasurementPoint::new(incidence, wavelength, rad!(0.0), 0.5));
                points.push(MeasurementPoint::new(
                    incidence,
                    wavelength,
                    rad!(FRAC_PI_2),
                    0.25,
                ));
                points.push(MeasurementPoint::new(
                    incidence,
                    wavelength,
                    rad!(-FRAC_PI_2),
                    0.25,
                ));
            }
        }
        BsdfVolumeBuilder::new(MeasurementSet::new(points))
            .with_sampling_step(deg!(15.0))
            .build()
            .unwrap()
    }

    #[test]
    fn cells_are_wavelength_major() {
        let volume = two_cell_volume();
        let cells = spectral_cells(&volume);
        assert_eq!(cells.len(), 4);
        assert_eq!(cells[0].wavelength, nm!(555.0));
        assert_eq!(cells[0].incidence, rad!(0.0));
        assert_eq!(cells[1].wavelength, nm!(555.0));
        assert_eq!(cells[1].incidence, rad!(0.4));
        assert_eq!(cells[2].wavelength, nm!(600.0));
        assert_eq!(cells[3].wavelength, nm!(600.0));
    }

    #[test]
    fn transmission_thetas_are_offset_into_physical_range() {
        let volume = two_cell_volume();
        let cells = spectral_cells(&volume);
        let transmission = cells[0].transmission.as_ref().unwrap();
        assert_abs_diff_eq!(transmission.theta_samples[0], FRAC_PI_2);
        assert_abs_diff_eq!(
            *transmission.theta_samples.last().unwrap(),
            std::f32::consts::PI,
            epsilon = 1e-6
        );
        // reflection keeps the grid thetas
        assert_eq!(cells[0].reflection.theta_samples[0], 0.0);
    }

    #[test]
    fn values_flatten_theta_major() {
        let volume = two_cell_volume();
        let cells = spectral_cells(&volume);
        let grid = volume.grid();
        let record = &cells[1]; // wavelength 555, incidence 0.4
        assert_eq!(
            record.reflection.values.len(),
            grid.n_theta() * grid.n_phi()
        );
        let (t, p) = (2, 3);
        assert_eq!(
            record.reflection.values[t * grid.n_phi() + p],
            volume.brdf().get(1, 0, p, t)
        );
    }
}
