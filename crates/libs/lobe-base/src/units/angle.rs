use crate::math::ulp_eq;
use core::marker::PhantomData;
use std::{
    fmt::{Debug, Display, Formatter},
    str::FromStr,
};

/// Radian unit.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct URadian;

/// Degree unit.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct UDegree;

/// Unit trait for angle units.
pub trait AngleUnit: Debug + Copy + Clone {
    /// The name of the unit.
    const NAME: &'static str;

    /// The symbol of the unit.
    const SYMBOL: &'static str;

    /// The conversion factor from radians.
    const FACTOR_FROM_RAD: f32;

    /// The conversion factor to radians.
    const FACTOR_TO_RAD: f32 = 1.0 / Self::FACTOR_FROM_RAD;

    /// The conversion factor from degrees.
    const FACTOR_FROM_DEG: f32;

    /// The conversion factor to degrees.
    const FACTOR_TO_DEG: f32 = 1.0 / Self::FACTOR_FROM_DEG;
}

impl AngleUnit for URadian {
    const NAME: &'static str = "radian";
    const SYMBOL: &'static str = "rad";
    const FACTOR_FROM_RAD: f32 = 1.0;
    const FACTOR_FROM_DEG: f32 = std::f32::consts::PI / 180.0;
}

impl AngleUnit for UDegree {
    const NAME: &'static str = "degree";
    const SYMBOL: &'static str = "deg";
    const FACTOR_FROM_RAD: f32 = 180.0 / std::f32::consts::PI;
    const FACTOR_FROM_DEG: f32 = 1.0;
}

/// Angle with unit.
#[derive(Copy, Clone)]
pub struct Angle<A: AngleUnit> {
    value: f32,
    unit: PhantomData<A>,
}

/// Type alias for `Angle<URadian>`.
pub type Radians = Angle<URadian>;

/// Type alias for `Angle<UDegree>`.
pub type Degrees = Angle<UDegree>;

impl<A: AngleUnit> Debug for Angle<A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Angle {{ value: {}, unit: {} }}", self.value, A::SYMBOL)
    }
}

impl<A: AngleUnit> Display for Angle<A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.value, A::SYMBOL)
    }
}

impl<A: AngleUnit, B: AngleUnit> PartialEq<Angle<B>> for Angle<A> {
    fn eq(&self, other: &Angle<B>) -> bool {
        ulp_eq(
            self.value * A::FACTOR_TO_RAD,
            other.value * B::FACTOR_TO_RAD,
        )
    }
}

impl<A: AngleUnit, B: AngleUnit> PartialOrd<Angle<B>> for Angle<A> {
    fn partial_cmp(&self, other: &Angle<B>) -> Option<core::cmp::Ordering> {
        (self.value * A::FACTOR_TO_RAD).partial_cmp(&(other.value * B::FACTOR_TO_RAD))
    }
}

impl<A: AngleUnit> Angle<A> {
    /// Zero angle.
    pub const ZERO: Self = Self::new(0.0);

    /// Create a new angle with unit.
    pub const fn new(value: f32) -> Self {
        Angle {
            value,
            unit: PhantomData,
        }
    }

    /// Get the value of the angle.
    pub const fn value(&self) -> f32 { self.value }

    /// Returns the absolute value of the angle.
    pub fn abs(&self) -> Self { Self::new(self.value.abs()) }

    /// Returns the minimum of the two angles.
    pub fn min(&self, other: Self) -> Self { Self::new(self.value.min(other.value)) }

    /// Returns the maximum of the two angles.
    pub fn max(&self, other: Self) -> Self { Self::new(self.value.max(other.value)) }

    /// Converts the angle to radians.
    #[inline]
    pub fn to_radians(&self) -> Angle<URadian> { Angle::new(self.value * A::FACTOR_TO_RAD) }

    /// Converts the angle to degrees.
    #[inline]
    pub fn to_degrees(&self) -> Angle<UDegree> { Angle::new(self.value * A::FACTOR_TO_DEG) }

    /// Total ordering of angles of the same unit, NaN sorting last.
    pub fn total_cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.value.total_cmp(&other.value)
    }
}

impl Angle<URadian> {
    /// PI in radians.
    pub const PI: Self = Self::new(std::f32::consts::PI);
    /// PI/2 in radians.
    pub const HALF_PI: Self = Self::new(std::f32::consts::FRAC_PI_2);
    /// 2 * PI in radians.
    pub const TWO_PI: Self = Self::new(std::f32::consts::PI * 2.0);

    /// Converts to degrees.
    pub fn in_degrees(&self) -> Angle<UDegree> { Angle::new(self.value * UDegree::FACTOR_FROM_RAD) }

    /// Computes the sine of the angle.
    pub fn sin(&self) -> f32 { self.value.sin() }

    /// Computes the cosine of the angle.
    pub fn cos(&self) -> f32 { self.value.cos() }

    /// Computes the tangent of the angle.
    pub fn tan(&self) -> f32 { self.value.tan() }
}

impl Angle<UDegree> {
    /// PI in degrees.
    pub const PI: Self = Self::new(180.0);
    /// PI/2 in degrees.
    pub const HALF_PI: Self = Self::new(90.0);
    /// 2 * PI in degrees.
    pub const TWO_PI: Self = Self::new(360.0);

    /// Converts to radians.
    pub fn in_radians(&self) -> Angle<URadian> {
        Angle::new(self.value * URadian::FACTOR_FROM_DEG)
    }

    /// Computes the sine of the angle.
    pub fn sin(&self) -> f32 { self.value.to_radians().sin() }

    /// Computes the cosine of the angle.
    pub fn cos(&self) -> f32 { self.value.to_radians().cos() }

    /// Computes the tangent of the angle.
    pub fn tan(&self) -> f32 { self.value.to_radians().tan() }
}

impl From<Angle<UDegree>> for Angle<URadian> {
    fn from(angle: Angle<UDegree>) -> Self { angle.in_radians() }
}

impl From<Angle<URadian>> for Angle<UDegree> {
    fn from(angle: Angle<URadian>) -> Self { angle.in_degrees() }
}

impl<'a, A: AngleUnit> TryFrom<&'a str> for Angle<A> {
    type Error = &'static str;

    fn try_from(s: &'a str) -> Result<Self, Self::Error> {
        let bytes = s.trim().as_bytes();
        let i = super::findr_first_non_ascii_alphabetic(bytes)
            .ok_or("no unit found in angle string")?;
        let value = std::str::from_utf8(&bytes[..i])
            .map_err(|_| "invalid angle string")?
            .trim()
            .parse::<f32>()
            .map_err(|_| "invalid angle value")?;
        let unit = std::str::from_utf8(&bytes[i..])
            .map_err(|_| "invalid angle unit")?
            .trim();
        match unit {
            "rad" | "rads" | "radians" => Ok(Self::new(A::FACTOR_FROM_RAD * value)),
            "deg" | "degs" | "degrees" => Ok(Self::new(A::FACTOR_FROM_DEG * value)),
            _ => Err("invalid angle unit"),
        }
    }
}

impl<A: AngleUnit> FromStr for Angle<A> {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> { Self::try_from(s) }
}

impl<A: AngleUnit> serde::Serialize for Angle<A> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&format!("{} {}", self.value, A::SYMBOL))
    }
}

impl<'de, A: AngleUnit> serde::Deserialize<'de> for Angle<A> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct AngleVisitor<T>(PhantomData<T>);

        impl<'de, T: AngleUnit> serde::de::Visitor<'de> for AngleVisitor<T> {
            type Value = Angle<T>;

            fn expecting(&self, formatter: &mut Formatter) -> std::fmt::Result {
                write!(
                    formatter,
                    "a string containing a number and a unit of angle"
                )
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Angle::<T>::try_from(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(AngleVisitor::<A>(PhantomData))
    }
}

impl<A: AngleUnit> core::ops::Add for Angle<A> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output { Self::new(self.value + rhs.value) }
}

impl<A: AngleUnit> core::ops::Sub for Angle<A> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output { Self::new(self.value - rhs.value) }
}

impl<A: AngleUnit> core::ops::Mul<f32> for Angle<A> {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self::Output { Self::new(self.value * rhs) }
}

impl<A: AngleUnit> core::ops::Mul<Angle<A>> for f32 {
    type Output = Angle<A>;

    fn mul(self, rhs: Angle<A>) -> Self::Output { Angle::new(self * rhs.value) }
}

impl<A: AngleUnit> core::ops::Div<f32> for Angle<A> {
    type Output = Self;

    fn div(self, rhs: f32) -> Self::Output { Self::new(self.value / rhs) }
}

impl<A: AngleUnit> core::ops::Div<Angle<A>> for Angle<A> {
    type Output = f32;

    fn div(self, rhs: Angle<A>) -> Self::Output { self.value / rhs.value }
}

impl<A: AngleUnit> core::ops::Neg for Angle<A> {
    type Output = Self;

    fn neg(self) -> Self::Output { Self::new(-self.value) }
}

/// Extracts the raw radian value of an angle.
#[inline(always)]
pub fn rad_value(angle: Radians) -> f32 { angle.value() }

/// Extracts the raw degree value of an angle.
#[inline(always)]
pub fn deg_value(angle: Degrees) -> f32 { angle.value() }

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{deg, rad};

    #[test]
    fn conversion() {
        let a = deg!(180.0);
        assert_eq!(a.in_radians(), rad!(std::f32::consts::PI));
        assert_eq!(rad!(std::f32::consts::FRAC_PI_2).in_degrees(), deg!(90.0));
    }

    #[test]
    fn cross_unit_compare() {
        assert!(deg!(90.0) < rad!(std::f32::consts::PI));
        assert!(deg!(90.0) == rad!(std::f32::consts::FRAC_PI_2));
    }

    #[test]
    fn parse_with_suffix() {
        let a: Degrees = "0.5 deg".parse().unwrap();
        assert_eq!(a, deg!(0.5));
        let b: Radians = "90 deg".parse().unwrap();
        assert_eq!(b, rad!(std::f32::consts::FRAC_PI_2));
        assert!("0.5".parse::<Radians>().is_err());
    }

    #[test]
    fn de_serialization() {
        let a: Degrees = serde_yaml::from_str("1.0 deg").unwrap();
        assert_eq!(a, deg!(1.0));
        let s = serde_yaml::to_string(&a).unwrap();
        let b: Degrees = serde_yaml::from_str(&s).unwrap();
        assert_eq!(a, b);
    }
}
