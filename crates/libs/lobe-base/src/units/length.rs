use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

/// Wavelength in nanometres.
///
/// Spectral samples are the only lengths the engine touches, so unlike
/// angles this is a plain newtype rather than a phantom-typed family.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Nanometres(f32);

impl Nanometres {
    /// Creates a new wavelength in nanometres.
    pub const fn new(value: f32) -> Self { Self(value) }

    /// Raw value in nanometres.
    pub const fn value(&self) -> f32 { self.0 }

    /// Total ordering, NaN sorting last.
    pub fn total_cmp(&self, other: &Self) -> core::cmp::Ordering { self.0.total_cmp(&other.0) }
}

impl Display for Nanometres {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { write!(f, "{} nm", self.0) }
}

impl FromStr for Nanometres {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let numeric = s
            .strip_suffix("nm")
            .map(str::trim)
            .unwrap_or(s);
        numeric
            .parse::<f32>()
            .map(Self)
            .map_err(|_| "invalid wavelength value")
    }
}

/// Extracts the raw nanometre value of a wavelength.
#[inline(always)]
pub fn nm_value(wavelength: Nanometres) -> f32 { wavelength.value() }
