//! Measurement model: single rotationally-symmetric samples of a scattering
//! lobe, tagged by branch, plus the owning collection they arrive in.

use lobe_base::units::{Nanometres, Radians};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Scattering branch a measurement or a reconstructed channel belongs to.
///
/// Carried explicitly with every point so the hot path never re-inspects
/// raw angles to decide which half of the sphere it is working on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Branch {
    /// Scattering back into the incident hemisphere (|theta| < pi/2).
    Reflective,
    /// Scattering through the surface (|theta| >= pi/2).
    Transmissive,
}

impl Branch {
    /// Derives the branch from a raw outgoing polar angle.
    pub fn from_theta(theta: Radians) -> Self {
        if theta.abs() < Radians::HALF_PI {
            Self::Reflective
        } else {
            Self::Transmissive
        }
    }

    /// Returns whether this is the reflective branch.
    pub const fn is_reflective(&self) -> bool { matches!(self, Self::Reflective) }
}

impl Display for Branch {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reflective => write!(f, "reflective"),
            Self::Transmissive => write!(f, "transmissive"),
        }
    }
}

/// A single BSDF measurement: `value = f(incidence, wavelength, theta)`,
/// with no phi dependency (the measured lobe is assumed rotationally
/// symmetric). Immutable once constructed.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementPoint {
    /// Branch this sample belongs to, derived from the raw theta.
    pub branch: Branch,
    /// Incidence angle of the illumination.
    pub incidence: Radians,
    /// Wavelength of the illumination.
    pub wavelength: Nanometres,
    /// Raw outgoing polar angle. Reflective samples live in (-pi/2, pi/2);
    /// transmissive samples keep their physical value in [-pi, -pi/2] or
    /// [pi/2, pi] until folding.
    pub theta: Radians,
    /// Measured scattered intensity per unit solid angle (1/sr), already
    /// cosine-weighted by the acquisition chain.
    pub value: f32,
}

impl MeasurementPoint {
    /// Creates a measurement point, deriving the branch tag from `theta`.
    pub fn new(incidence: Radians, wavelength: Nanometres, theta: Radians, value: f32) -> Self {
        Self {
            branch: Branch::from_theta(theta),
            incidence,
            wavelength,
            theta,
            value,
        }
    }
}

/// An immutable collection of measurement points with derivation of the
/// ascending, de-duplicated incidence and wavelength sets.
#[derive(Debug, Clone, Default)]
pub struct MeasurementSet {
    points: Vec<MeasurementPoint>,
}

impl MeasurementSet {
    /// Wraps a sequence of measurement points.
    pub fn new(points: Vec<MeasurementPoint>) -> Self { Self { points } }

    /// All points, in insertion order.
    pub fn points(&self) -> &[MeasurementPoint] { &self.points }

    /// Number of points.
    pub fn len(&self) -> usize { self.points.len() }

    /// Whether the set holds no points at all.
    pub fn is_empty(&self) -> bool { self.points.is_empty() }

    /// Distinct incidence angles present in the set, ascending.
    pub fn incidences(&self) -> Vec<Radians> {
        let mut incidences: Vec<Radians> = self.points.iter().map(|p| p.incidence).collect();
        incidences.sort_by(Radians::total_cmp);
        incidences.dedup_by(|a, b| a.value() == b.value());
        incidences
    }

    /// Distinct wavelengths present in the set, ascending.
    pub fn wavelengths(&self) -> Vec<Nanometres> {
        let mut wavelengths: Vec<Nanometres> = self.points.iter().map(|p| p.wavelength).collect();
        wavelengths.sort_by(Nanometres::total_cmp);
        wavelengths.dedup_by(|a, b| a.value() == b.value());
        wavelengths
    }

    /// Whether any point in the set belongs to the transmissive branch.
    pub fn has_transmissive(&self) -> bool {
        self.points
            .iter()
            .any(|p| p.branch == Branch::Transmissive)
    }

    /// Points belonging to one (incidence, wavelength) cell. Cell membership
    /// is exact: incidences and wavelengths must be the very values of the
    /// derived (or supplied) sample sets.
    pub fn cell(
        &self,
        incidence: Radians,
        wavelength: Nanometres,
    ) -> impl Iterator<Item = &MeasurementPoint> {
        self.points.iter().filter(move |p| {
            p.incidence.value() == incidence.value() && p.wavelength.value() == wavelength.value()
        })
    }
}
