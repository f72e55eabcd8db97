//! Volume assembly: drives fitting, reconstruction, and integration over
//! every (incidence, wavelength) cell and assembles the validated tensors.

use crate::{
    error::BsdfError,
    integrate::hemispherical_integral,
    measurement::{Branch, MeasurementSet},
    polar::{reconstruct_polar_map, AngularGrid, PolarMap},
    profile::fit_cell_profiles,
    tensor::{Tensor2, Tensor4},
};
use lobe_base::units::{Degrees, Nanometres, Radians};
use rayon::prelude::*;
use serde::Serialize;

/// The finished, immutable reconstruction artifact.
///
/// Tensor axes are (incidence, wavelength, phi, theta) to match the export
/// convention; the transmissive tensor's incidence axis is reversed, an
/// export-format quirk reproduced for compatibility. The transmissive
/// channel is present iff any transmissive measurement existed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BsdfVolume {
    incidences: Vec<Radians>,
    wavelengths: Vec<Nanometres>,
    grid: AngularGrid,
    brdf: Tensor4,
    btdf: Option<Tensor4>,
    reflectance: Tensor2,
    transmittance: Option<Tensor2>,
}

impl BsdfVolume {
    /// Incidence samples, ascending.
    pub fn incidences(&self) -> &[Radians] { &self.incidences }

    /// Wavelength samples, ascending.
    pub fn wavelengths(&self) -> &[Nanometres] { &self.wavelengths }

    /// The sampling lattice shared by both channels.
    pub fn grid(&self) -> &AngularGrid { &self.grid }

    /// Reflective tensor, shape (incidence, wavelength, phi, theta).
    pub fn brdf(&self) -> &Tensor4 { &self.brdf }

    /// Transmissive tensor, if any transmissive point was measured.
    pub fn btdf(&self) -> Option<&Tensor4> { self.btdf.as_ref() }

    /// Hemispherical reflectance per (incidence, wavelength).
    pub fn reflectance(&self) -> &Tensor2 { &self.reflectance }

    /// Hemispherical transmittance per (incidence, wavelength), if any
    /// transmissive point was measured.
    pub fn transmittance(&self) -> Option<&Tensor2> { self.transmittance.as_ref() }
}

/// Stages of the linear build pipeline.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum BuildStage {
    Uninitialized,
    IncidencesResolved,
    PerCellReconstructed,
    Reshaped,
    Validated,
    Ready,
}

/// Per-cell output of the reconstruction loop, kept in iteration order
/// until the reshape stage flattens it into tensors.
struct CellOutput {
    reflective: PolarMap,
    reflectance: f32,
    transmissive: Option<PolarMap>,
    transmittance: Option<f32>,
}

/// Orchestrates one full reconstruction:
/// `Uninitialized -> IncidencesResolved -> PerCellReconstructed ->
/// Reshaped -> Validated -> Ready`.
///
/// Any failure aborts the whole build; no partial volume is ever exposed
/// and there is no internal retry.
pub struct BsdfVolumeBuilder {
    set: MeasurementSet,
    incidences: Option<Vec<Radians>>,
    wavelengths: Option<Vec<Nanometres>>,
    step: Degrees,
    stage: BuildStage,
}

impl BsdfVolumeBuilder {
    /// Starts a build over a measurement set with the default 1 degree
    /// sampling step.
    pub fn new(set: MeasurementSet) -> Self {
        Self {
            set,
            incidences: None,
            wavelengths: None,
            step: Degrees::new(1.0),
            stage: BuildStage::Uninitialized,
        }
    }

    /// Supplies the wavelength set explicitly instead of deriving it from
    /// the measurements. Sorted and de-duplicated.
    pub fn with_wavelengths(mut self, mut wavelengths: Vec<Nanometres>) -> Self {
        wavelengths.sort_by(Nanometres::total_cmp);
        wavelengths.dedup_by(|a, b| a.value() == b.value());
        self.wavelengths = Some(wavelengths);
        self
    }

    /// Supplies the incidence set explicitly instead of deriving it from
    /// the measurements. Sorted and de-duplicated.
    pub fn with_incidences(mut self, mut incidences: Vec<Radians>) -> Self {
        incidences.sort_by(Radians::total_cmp);
        incidences.dedup_by(|a, b| a.value() == b.value());
        self.incidences = Some(incidences);
        self
    }

    /// Overrides the angular sampling step (degrees, `0 < step <= 90`).
    pub fn with_sampling_step(mut self, step: Degrees) -> Self {
        self.step = step;
        self
    }

    fn advance(&mut self, from: BuildStage, to: BuildStage) {
        debug_assert_eq!(self.stage, from, "build stages ran out of order");
        self.stage = to;
    }

    /// Runs the build to completion.
    pub fn build(mut self) -> Result<BsdfVolume, BsdfError> {
        let grid = AngularGrid::from_step(self.step)?;

        // 1. resolve sample sets
        let incidences = match self.incidences.take() {
            Some(incidences) => incidences,
            None => self.set.incidences(),
        };
        let wavelengths = match self.wavelengths.take() {
            Some(wavelengths) => wavelengths,
            None => self.set.wavelengths(),
        };
        self.advance(BuildStage::Uninitialized, BuildStage::IncidencesResolved);
        log::debug!(
            "reconstructing {} incidences x {} wavelengths on a {}x{} grid",
            incidences.len(),
            wavelengths.len(),
            grid.n_theta(),
            grid.n_phi(),
        );

        // 2. per-cell reconstruction, incidence-major / wavelength-minor;
        // cells are independent, so they fan out on the thread pool and
        // land back in iteration order
        let expect_transmissive = self.set.has_transmissive();
        let cells: Vec<(Radians, Nanometres)> = incidences
            .iter()
            .flat_map(|i| wavelengths.iter().map(move |w| (*i, *w)))
            .collect();
        let set = &self.set;
        let outputs: Vec<Result<CellOutput, BsdfError>> = cells
            .par_iter()
            .map(|&(incidence, wavelength)| {
                reconstruct_cell(set, incidence, wavelength, &grid, expect_transmissive)
            })
            .collect();
        // surface the first failing cell in iteration order, independent
        // of how the work was scheduled
        let mut resolved = Vec::with_capacity(outputs.len());
        for output in outputs {
            resolved.push(output?);
        }
        self.advance(
            BuildStage::IncidencesResolved,
            BuildStage::PerCellReconstructed,
        );

        // 3. reshape into (incidence, wavelength, phi, theta) tensors; the
        // transmissive tensor's incidence axis is reversed
        let (n_inc, n_wl) = (incidences.len(), wavelengths.len());
        let shape = [n_inc, n_wl, grid.n_phi(), grid.n_theta()];
        let mut brdf = Tensor4::zeros(shape);
        let mut btdf = expect_transmissive.then(|| Tensor4::zeros(shape));
        let mut reflectance = Tensor2::zeros([n_inc, n_wl]);
        let mut transmittance = expect_transmissive.then(|| Tensor2::zeros([n_inc, n_wl]));
        for (cell_index, cell) in resolved.into_iter().enumerate() {
            let (i, w) = (cell_index / n_wl, cell_index % n_wl);
            for t in 0..grid.n_theta() {
                for p in 0..grid.n_phi() {
                    brdf.set(i, w, p, t, cell.reflective.value_at(t, p));
                }
            }
            reflectance.set(i, w, cell.reflectance);
            if let (Some(btdf), Some(map)) = (btdf.as_mut(), cell.transmissive.as_ref()) {
                for t in 0..grid.n_theta() {
                    for p in 0..grid.n_phi() {
                        btdf.set(n_inc - 1 - i, w, p, t, map.value_at(t, p));
                    }
                }
            }
            if let (Some(transmittance), Some(value)) =
                (transmittance.as_mut(), cell.transmittance)
            {
                transmittance.set(i, w, value);
            }
        }
        self.advance(BuildStage::PerCellReconstructed, BuildStage::Reshaped);

        // 4. validate
        if brdf.is_uniformly_zero() {
            return Err(BsdfError::AllZeroData {
                branch: Branch::Reflective,
            });
        }
        if let Some(btdf) = btdf.as_ref() {
            if btdf.is_uniformly_zero() {
                // legitimate for fully opaque materials, hence not fatal
                log::warn!("all values of the reconstructed transmissive tensor are zero");
            }
        }
        check_shape("brdf", brdf.shape(), shape)?;
        if let Some(btdf) = btdf.as_ref() {
            check_shape("btdf", btdf.shape(), shape)?;
        }
        check_shape2("reflectance", reflectance.shape(), [n_inc, n_wl])?;
        if let Some(transmittance) = transmittance.as_ref() {
            check_shape2("transmittance", transmittance.shape(), [n_inc, n_wl])?;
        }
        self.advance(BuildStage::Reshaped, BuildStage::Validated);

        self.advance(BuildStage::Validated, BuildStage::Ready);
        log::info!(
            "reconstructed BSDF volume: {} cells, transmissive channel: {}",
            n_inc * n_wl,
            if expect_transmissive { "yes" } else { "no" },
        );
        Ok(BsdfVolume {
            incidences,
            wavelengths,
            grid,
            brdf,
            btdf,
            reflectance,
            transmittance,
        })
    }
}

/// Runs fit -> reconstruct -> integrate for a single cell.
fn reconstruct_cell(
    set: &MeasurementSet,
    incidence: Radians,
    wavelength: Nanometres,
    grid: &AngularGrid,
    expect_transmissive: bool,
) -> Result<CellOutput, BsdfError> {
    let profiles = fit_cell_profiles(set, incidence, wavelength)?;
    if expect_transmissive && profiles.transmissive.is_none() {
        return Err(BsdfError::InsufficientData {
            incidence,
            wavelength,
            branch: Branch::Transmissive,
        });
    }
    let reflective =
        reconstruct_polar_map(&profiles.reflective, incidence, profiles.theta_max, grid);
    let reflectance = hemispherical_integral(grid, &reflective);
    let (transmissive, transmittance) = match profiles.transmissive.as_ref() {
        Some(profile) => {
            let map = reconstruct_polar_map(profile, incidence, profiles.theta_max, grid);
            let integral = hemispherical_integral(grid, &map);
            (Some(map), Some(integral))
        },
        None => (None, None),
    };
    Ok(CellOutput {
        reflective,
        reflectance,
        transmissive,
        transmittance,
    })
}

fn check_shape(
    tensor: &'static str,
    actual: [usize; 4],
    expected: [usize; 4],
) -> Result<(), BsdfError> {
    if actual != expected {
        return Err(BsdfError::ShapeMismatch {
            tensor,
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        });
    }
    Ok(())
}

fn check_shape2(
    tensor: &'static str,
    actual: [usize; 2],
    expected: [usize; 2],
) -> Result<(), BsdfError> {
    if actual != expected {
        return Err(BsdfError::ShapeMismatch {
            tensor,
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        });
    }
    Ok(())
}
