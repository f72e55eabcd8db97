//! Units of measurement used throughout the workspace.
//!
//! Angles are phantom-typed over their unit so that degrees read from user
//! input cannot silently flow into the radian-based reconstruction math.

mod angle;
mod length;

pub use angle::{deg_value, rad_value, Angle, AngleUnit, Degrees, Radians, UDegree, URadian};
pub use length::{nm_value, Nanometres};

/// Constructs an `Angle<URadian>` from an expression.
#[macro_export]
macro_rules! rad {
    ($value:expr) => {
        $crate::units::Angle::<$crate::units::URadian>::new($value)
    };
}

/// Constructs an `Angle<UDegree>` from an expression.
#[macro_export]
macro_rules! deg {
    ($value:expr) => {
        $crate::units::Angle::<$crate::units::UDegree>::new($value)
    };
}

/// Constructs a `Nanometres` from an expression.
#[macro_export]
macro_rules! nm {
    ($value:expr) => {
        $crate::units::Nanometres::new($value)
    };
}

/// Finds the index of the first character (searching backwards) after which
/// only the unit suffix remains, i.e. the split point between the numeric
/// part and the trailing alphabetic unit.
pub(crate) fn findr_first_non_ascii_alphabetic(bytes: &[u8]) -> Option<usize> {
    let mut i = bytes.len();
    while i > 0 && bytes[i - 1].is_ascii_alphabetic() {
        i -= 1;
    }
    (i < bytes.len()).then_some(i)
}
