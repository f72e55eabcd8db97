//! 1D angular profile fitting.
//!
//! For one (incidence, wavelength) cell the measurement points collapse to
//! one continuous profile per branch: piecewise-linear between the measured
//! thetas, constant-slope extrapolation beyond them. Transmissive points are
//! first folded from their physical range onto the transmission-pole axis.

use crate::{
    error::BsdfError,
    measurement::{Branch, MeasurementSet},
};
use lobe_base::units::{Nanometres, Radians};

/// A continuous 1D angular profile: piecewise-linear interpolation over the
/// measured knots with constant-slope extrapolation outside the sampled
/// range. A single-knot profile degrades to a constant function.
#[derive(Debug, Clone, PartialEq)]
pub struct AngularProfile {
    /// Knot abscissae in radians, strictly ascending.
    knots: Vec<f32>,
    /// Profile values at the knots (1/sr).
    values: Vec<f32>,
}

impl AngularProfile {
    /// Builds a profile from (theta, value) samples. Samples are sorted by
    /// theta; exact duplicate abscissae collapse to their first occurrence.
    /// Returns `None` for an empty sample set.
    pub fn from_samples(samples: impl IntoIterator<Item = (f32, f32)>) -> Option<Self> {
        let mut samples: Vec<(f32, f32)> = samples.into_iter().collect();
        if samples.is_empty() {
            return None;
        }
        samples.sort_by(|a, b| a.0.total_cmp(&b.0));
        samples.dedup_by(|a, b| a.0 == b.0);
        let (knots, values) = samples.into_iter().unzip();
        Some(Self { knots, values })
    }

    /// Number of knots.
    pub fn len(&self) -> usize { self.knots.len() }

    /// Whether the profile has no knots. Never true for a constructed
    /// profile; present for API completeness.
    pub fn is_empty(&self) -> bool { self.knots.is_empty() }

    /// The sampled domain `[first, last]` in radians.
    pub fn domain(&self) -> (f32, f32) {
        (self.knots[0], self.knots[self.knots.len() - 1])
    }

    /// Evaluates the profile at `theta` (radians). Outside the sampled
    /// range the nearest segment's slope continues unchanged.
    pub fn eval(&self, theta: f32) -> f32 {
        let n = self.knots.len();
        if n == 1 {
            return self.values[0];
        }
        // segment index clamped to [0, n - 2]: clamping extends the first
        // and last segments, which is exactly constant-slope extrapolation
        let i = match self.knots.partition_point(|&k| k <= theta) {
            0 => 0,
            p => (p - 1).min(n - 2),
        };
        let (x0, x1) = (self.knots[i], self.knots[i + 1]);
        let (y0, y1) = (self.values[i], self.values[i + 1]);
        let t = (theta - x0) / (x1 - x0);
        lobe_base::lerp(y0, y1, t)
    }
}

/// Fitted profiles for one (incidence, wavelength) cell.
#[derive(Debug, Clone)]
pub struct CellProfiles {
    /// Profile of the reflective branch over the raw theta axis.
    pub reflective: AngularProfile,
    /// Profile of the transmissive branch over the folded axis, present
    /// only when the cell holds transmissive points.
    pub transmissive: Option<AngularProfile>,
    /// Maximum reflective theta measured; the reconstruction never queries
    /// the profiles past this angle.
    pub theta_max: Radians,
}

/// Folds a raw transmissive theta onto the transmission-pole axis, signed
/// by which side of the surface normal plane it was measured on.
fn fold_transmissive(theta: f32) -> f32 {
    if theta >= 0.0 {
        std::f32::consts::PI - theta
    } else {
        -std::f32::consts::PI - theta
    }
}

/// Fits the angular profiles for one cell of the measurement set.
///
/// `incidence` and `wavelength` must be members of the derived (or
/// supplied) sample sets; matching is exact. Pure function.
///
/// # Errors
///
/// [`BsdfError::InsufficientData`] when the cell holds no reflective
/// points, or holds exactly one transmissive point (a line needs two).
pub fn fit_cell_profiles(
    set: &MeasurementSet,
    incidence: Radians,
    wavelength: Nanometres,
) -> Result<CellProfiles, BsdfError> {
    let mut reflective: Vec<(f32, f32)> = Vec::new();
    let mut transmissive: Vec<(f32, f32)> = Vec::new();
    for point in set.cell(incidence, wavelength) {
        match point.branch {
            Branch::Reflective => reflective.push((point.theta.value(), point.value)),
            Branch::Transmissive => {
                transmissive.push((fold_transmissive(point.theta.value()), point.value))
            },
        }
    }

    let theta_max = reflective
        .iter()
        .map(|(theta, _)| *theta)
        .fold(f32::NEG_INFINITY, f32::max);

    let reflective =
        AngularProfile::from_samples(reflective).ok_or(BsdfError::InsufficientData {
            incidence,
            wavelength,
            branch: Branch::Reflective,
        })?;

    let transmissive = match transmissive.len() {
        0 => None,
        1 => {
            return Err(BsdfError::InsufficientData {
                incidence,
                wavelength,
                branch: Branch::Transmissive,
            })
        },
        _ => AngularProfile::from_samples(transmissive),
    };

    Ok(CellProfiles {
        reflective,
        transmissive,
        theta_max: Radians::new(theta_max),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::MeasurementPoint;
    use approx::assert_relative_eq;
    use lobe_base::{nm, rad};
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn interpolates_through_knots() {
        let p = AngularProfile::from_samples([(0.0, 1.0), (1.0, 3.0), (2.0, 2.0)]).unwrap();
        assert_eq!(p.eval(0.0), 1.0);
        assert_eq!(p.eval(1.0), 3.0);
        assert_relative_eq!(p.eval(0.5), 2.0);
        assert_relative_eq!(p.eval(1.5), 2.5);
    }

    #[test]
    fn extrapolates_with_constant_slope() {
        let p = AngularProfile::from_samples([(0.0, 1.0), (1.0, 3.0), (2.0, 2.0)]).unwrap();
        // first segment slope 2, last segment slope -1
        assert_relative_eq!(p.eval(-1.0), -1.0);
        assert_relative_eq!(p.eval(3.0), 1.0);
    }

    #[test]
    fn unsorted_input_is_sorted() {
        let p = AngularProfile::from_samples([(1.0, 3.0), (0.0, 1.0)]).unwrap();
        assert_relative_eq!(p.eval(0.5), 2.0);
    }

    #[test]
    fn single_knot_is_constant() {
        let p = AngularProfile::from_samples([(0.3, 7.0)]).unwrap();
        assert_eq!(p.eval(-5.0), 7.0);
        assert_eq!(p.eval(5.0), 7.0);
    }

    #[test]
    fn duplicate_knots_collapse() {
        let p = AngularProfile::from_samples([(0.0, 1.0), (0.0, 9.0), (1.0, 2.0)]).unwrap();
        assert_eq!(p.len(), 2);
        assert_eq!(p.eval(0.0), 1.0);
    }

    #[test]
    fn folding_maps_both_sides_onto_pole_axis() {
        assert_relative_eq!(fold_transmissive(PI), 0.0);
        assert_relative_eq!(fold_transmissive(FRAC_PI_2), FRAC_PI_2);
        assert_relative_eq!(fold_transmissive(-PI), 0.0);
        assert_relative_eq!(fold_transmissive(-FRAC_PI_2), -FRAC_PI_2);
        assert_relative_eq!(fold_transmissive(2.0), PI - 2.0);
        assert_relative_eq!(fold_transmissive(-2.0), -(PI - 2.0));
    }

    fn cell_set(thetas: &[f32]) -> MeasurementSet {
        MeasurementSet::new(
            thetas
                .iter()
                .map(|&t| MeasurementPoint::new(rad!(0.0), nm!(555.0), rad!(t), 1.0))
                .collect(),
        )
    }

    #[test]
    fn no_reflective_points_is_an_error() {
        let set = cell_set(&[2.0, 3.0]);
        let err = fit_cell_profiles(&set, rad!(0.0), nm!(555.0)).unwrap_err();
        assert_eq!(
            err,
            BsdfError::InsufficientData {
                incidence: rad!(0.0),
                wavelength: nm!(555.0),
                branch: Branch::Reflective,
            }
        );
    }

    #[test]
    fn lone_transmissive_point_is_an_error() {
        let set = cell_set(&[0.0, 0.5, 2.0]);
        let err = fit_cell_profiles(&set, rad!(0.0), nm!(555.0)).unwrap_err();
        assert_eq!(
            err,
            BsdfError::InsufficientData {
                incidence: rad!(0.0),
                wavelength: nm!(555.0),
                branch: Branch::Transmissive,
            }
        );
    }

    #[test]
    fn reflective_only_cell_has_no_transmissive_profile() {
        let set = cell_set(&[0.0, 0.5, 1.0]);
        let profiles = fit_cell_profiles(&set, rad!(0.0), nm!(555.0)).unwrap();
        assert!(profiles.transmissive.is_none());
        assert_eq!(profiles.theta_max, rad!(1.0));
    }

    #[test]
    fn theta_max_tracks_signed_maximum() {
        let set = cell_set(&[-1.2, -0.3, 0.9]);
        let profiles = fit_cell_profiles(&set, rad!(0.0), nm!(555.0)).unwrap();
        assert_eq!(profiles.theta_max, rad!(0.9));
    }
}
