//! Error type for the reconstruction engine.

use crate::measurement::Branch;
use lobe_base::units::{Degrees, Nanometres, Radians};
use thiserror::Error;

/// Errors surfaced by the reconstruction engine.
///
/// Any error aborts the whole build: no partial volume is ever exposed and
/// there is no internal retry. Numerical singularities (zero angular
/// distance, quadrature refinement limits) are absorbed locally and never
/// reach this type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BsdfError {
    /// A required (incidence, wavelength, branch) cell has no, or too few,
    /// measurement points.
    #[error(
        "insufficient {branch} data for cell (incidence: {incidence}, wavelength: {wavelength})"
    )]
    InsufficientData {
        /// Incidence angle of the offending cell.
        incidence: Radians,
        /// Wavelength of the offending cell.
        wavelength: Nanometres,
        /// Branch that lacked measurements.
        branch: Branch,
    },

    /// An entire reconstructed tensor is uniformly zero. Fatal for the
    /// reflective channel only; the transmissive equivalent is a warning
    /// since fully opaque materials legitimately transmit nothing.
    #[error("all values of the reconstructed {branch} tensor are zero")]
    AllZeroData {
        /// Channel whose tensor came out uniformly zero.
        branch: Branch,
    },

    /// An assembled tensor's dimensions disagree with the sample counts.
    #[error("shape mismatch in {tensor}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        /// Name of the offending tensor.
        tensor: &'static str,
        /// Shape implied by the sample counts.
        expected: Vec<usize>,
        /// Shape actually assembled.
        actual: Vec<usize>,
    },

    /// The angular sampling step is outside (0, 90] degrees.
    #[error("invalid sampling step {step}: must satisfy 0 < step <= 90 deg")]
    InvalidSamplingStep {
        /// The rejected step.
        step: Degrees,
    },
}
