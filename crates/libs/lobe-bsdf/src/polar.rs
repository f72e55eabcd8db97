//! Polar-map reconstruction.
//!
//! Expands a 1D angular profile into a dense (theta, phi) map under the
//! revolution assumption: the scattering lobe is rotationally symmetric
//! about the reflected (resp. refracted) incidence direction, so the value
//! at any outgoing direction is a blend of the profile at the two in-plane
//! angles lying at the same angular distance from that direction.

use crate::{error::BsdfError, profile::AngularProfile};
use lobe_base::{
    math::{linspace_f32, sqr},
    units::{Degrees, Radians},
};
use serde::Serialize;

/// Angular distances below this threshold (radians) are treated as the
/// degenerate specular point.
pub const DISTANCE_EPSILON: f32 = 1e-6;

/// The dense (theta, phi) sampling lattice shared by every reconstruction
/// of one build, so that exported reflective and transmissive tensors stay
/// aligned. Built once per run from a sampling step in degrees.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AngularGrid {
    /// Polar samples over [0, pi/2], uniform, endpoints included.
    pub theta: Vec<Radians>,
    /// Azimuthal samples over [0, 2*pi], uniform, endpoints included.
    pub phi: Vec<Radians>,
}

impl AngularGrid {
    /// Builds the lattice from a sampling step.
    ///
    /// Sample counts follow linspace semantics: `floor(90 / step) + 1`
    /// polar and `floor(360 / step) + 1` azimuthal samples (91 and 361 at
    /// the default 1 degree).
    ///
    /// # Errors
    ///
    /// [`BsdfError::InvalidSamplingStep`] unless `0 < step <= 90`.
    pub fn from_step(step: Degrees) -> Result<Self, BsdfError> {
        if !(step.value() > 0.0 && step.value() <= 90.0) {
            return Err(BsdfError::InvalidSamplingStep { step });
        }
        let n_theta = (90.0 / step.value()) as usize + 1;
        let n_phi = (360.0 / step.value()) as usize + 1;
        Ok(Self {
            theta: linspace_f32(0.0, std::f32::consts::FRAC_PI_2, n_theta)
                .into_iter()
                .map(Radians::new)
                .collect(),
            phi: linspace_f32(0.0, std::f32::consts::TAU, n_phi)
                .into_iter()
                .map(Radians::new)
                .collect(),
        })
    }

    /// Number of polar samples.
    pub fn n_theta(&self) -> usize { self.theta.len() }

    /// Number of azimuthal samples.
    pub fn n_phi(&self) -> usize { self.phi.len() }
}

/// Dense reconstructed values over an [`AngularGrid`] for one (incidence,
/// wavelength, branch) cell. Theta-major: `values[t * n_phi + p]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolarMap {
    n_theta: usize,
    n_phi: usize,
    values: Vec<f32>,
}

impl PolarMap {
    /// Value at polar index `t`, azimuthal index `p`.
    #[inline]
    pub fn value_at(&self, t: usize, p: usize) -> f32 { self.values[t * self.n_phi + p] }

    /// All values, theta-major.
    pub fn as_slice(&self) -> &[f32] { &self.values }

    /// Number of polar samples.
    pub fn n_theta(&self) -> usize { self.n_theta }

    /// Number of azimuthal samples.
    pub fn n_phi(&self) -> usize { self.n_phi }
}

/// Reconstructs the dense polar map of one cell from its 1D profile.
///
/// For every lattice direction the in-plane angular distance to the
/// incidence axis is
/// `d = sqrt((incidence - theta*cos(phi))^2 + (theta*sin(phi))^2)`,
/// and the value is the blend
/// `w * profile(incidence - d) + (1 - w) * profile(incidence + d)` with
/// `w = (incidence + d - theta*cos(phi)) / (2 d)`, which always lies in
/// [0, 1]. Two guards apply:
///
/// * `d < DISTANCE_EPSILON` substitutes `d = 1` (degenerate specular
///   point; inherited fallback, see the crate docs),
/// * the far-side query saturates at `theta_max` so the profile is never
///   extrapolated past the measured range; in the backward half-plane the
///   weight reaches 1 on its own and the saturation changes nothing.
///
/// Deterministic, never produces NaN for a finite profile, and continuous
/// in theta across the `theta_max` boundary.
pub fn reconstruct_polar_map(
    profile: &AngularProfile,
    incidence: Radians,
    theta_max: Radians,
    grid: &AngularGrid,
) -> PolarMap {
    let inc = incidence.value();
    let t_max = theta_max.value();
    let mut values = Vec::with_capacity(grid.n_theta() * grid.n_phi());
    for theta in &grid.theta {
        let th = theta.value();
        for phi in &grid.phi {
            let (sin_p, cos_p) = phi.value().sin_cos();
            let mut d = (sqr(inc - th * cos_p) + sqr(th * sin_p)).sqrt();
            if d < DISTANCE_EPSILON {
                d = 1.0;
            }
            let w = (inc + d - th * cos_p) / (2.0 * d);
            let near = profile.eval(inc - d);
            let far = profile.eval((inc + d).min(t_max));
            values.push(w * near + (1.0 - w) * far);
        }
    }
    PolarMap {
        n_theta: grid.n_theta(),
        n_phi: grid.n_phi(),
        values,
    }
}
