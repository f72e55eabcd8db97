//! Hemispherical integration of a reconstructed polar map.
//!
//! The map holds cosine-weighted intensities (1/sr); the hemispherical
//! reflectance (or transmittance) is
//! `(1/pi) * integral of value(theta, phi) * sin(theta)` over
//! `theta in [0, pi/2], phi in [0, 2*pi]`, the `sin(theta)` being the
//! solid-angle Jacobian. Grid samples are joined by a bilinear spline and
//! the spline is integrated with adaptive Simpson quadrature per axis.

use crate::polar::{AngularGrid, PolarMap};

/// Absolute tolerance of the adaptive quadrature, per axis.
const QUADRATURE_EPSABS: f64 = 0.1;

/// Subdivisions forced before the tolerance test may terminate a branch.
/// The nominal tolerance is loose; refining a few levels first keeps the
/// achieved accuracy far below it without noticeable cost on the smooth
/// integrands produced by reconstruction.
const MIN_DEPTH: u32 = 4;

/// Recursion cap; branches that still disagree here are accepted as-is
/// rather than surfaced as errors.
const MAX_DEPTH: u32 = 20;

/// Bilinear interpolant over a uniform (theta, phi) lattice of integrand
/// samples.
struct BilinearGrid<'a> {
    theta_span: (f32, f32),
    phi_span: (f32, f32),
    n_theta: usize,
    n_phi: usize,
    samples: &'a [f32],
}

impl<'a> BilinearGrid<'a> {
    fn new(grid: &AngularGrid, samples: &'a [f32]) -> Self {
        debug_assert_eq!(samples.len(), grid.n_theta() * grid.n_phi());
        Self {
            theta_span: (
                grid.theta[0].value(),
                grid.theta[grid.n_theta() - 1].value(),
            ),
            phi_span: (grid.phi[0].value(), grid.phi[grid.n_phi() - 1].value()),
            n_theta: grid.n_theta(),
            n_phi: grid.n_phi(),
            samples,
        }
    }

    fn eval(&self, theta: f64, phi: f64) -> f64 {
        let ft = (theta - self.theta_span.0 as f64)
            / (self.theta_span.1 - self.theta_span.0) as f64
            * (self.n_theta - 1) as f64;
        let fp = (phi - self.phi_span.0 as f64) / (self.phi_span.1 - self.phi_span.0) as f64
            * (self.n_phi - 1) as f64;
        let ti = (ft.floor() as usize).min(self.n_theta - 2);
        let pi = (fp.floor() as usize).min(self.n_phi - 2);
        let u = (ft - ti as f64).clamp(0.0, 1.0);
        let v = (fp - pi as f64).clamp(0.0, 1.0);
        let at = |t: usize, p: usize| self.samples[t * self.n_phi + p] as f64;
        at(ti, pi) * (1.0 - u) * (1.0 - v)
            + at(ti + 1, pi) * u * (1.0 - v)
            + at(ti, pi + 1) * (1.0 - u) * v
            + at(ti + 1, pi + 1) * u * v
    }
}

/// Adaptive Simpson quadrature of `f` over `[a, b]`.
fn adaptive_simpson(f: &dyn Fn(f64) -> f64, a: f64, b: f64, epsabs: f64) -> f64 {
    fn simpson(fa: f64, fm: f64, fb: f64, a: f64, b: f64) -> f64 {
        (b - a) / 6.0 * (fa + 4.0 * fm + fb)
    }

    #[allow(clippy::too_many_arguments)]
    fn recurse(
        f: &dyn Fn(f64) -> f64,
        a: f64,
        b: f64,
        fa: f64,
        fm: f64,
        fb: f64,
        whole: f64,
        epsabs: f64,
        depth: u32,
    ) -> f64 {
        let m = 0.5 * (a + b);
        let (lm, rm) = (0.5 * (a + m), 0.5 * (m + b));
        let (flm, frm) = (f(lm), f(rm));
        let left = simpson(fa, flm, fm, a, m);
        let right = simpson(fm, frm, fb, m, b);
        let delta = left + right - whole;
        if (depth >= MIN_DEPTH && delta.abs() < 15.0 * epsabs) || depth >= MAX_DEPTH {
            // Richardson extrapolation of the two estimates
            return left + right + delta / 15.0;
        }
        recurse(f, a, m, fa, flm, fm, left, 0.5 * epsabs, depth + 1)
            + recurse(f, m, b, fm, frm, fb, right, 0.5 * epsabs, depth + 1)
    }

    let m = 0.5 * (a + b);
    let (fa, fm, fb) = (f(a), f(m), f(b));
    recurse(f, a, b, fa, fm, fb, simpson(fa, fm, fb, a, b), epsabs, 0)
}

/// Integrates a polar map to its hemispherical reflectance (or
/// transmittance). Pure and stateless; the result is clipped to the
/// physical bound of 1.
pub fn hemispherical_integral(grid: &AngularGrid, map: &PolarMap) -> f32 {
    debug_assert_eq!(map.n_theta(), grid.n_theta());
    debug_assert_eq!(map.n_phi(), grid.n_phi());
    let integrand: Vec<f32> = grid
        .theta
        .iter()
        .enumerate()
        .flat_map(|(t, theta)| {
            let jacobian = theta.sin() * std::f32::consts::FRAC_1_PI;
            (0..grid.n_phi()).map(move |p| map.value_at(t, p) * jacobian)
        })
        .collect();
    let spline = BilinearGrid::new(grid, &integrand);
    let (theta_lo, theta_hi) = (spline.theta_span.0 as f64, spline.theta_span.1 as f64);
    let (phi_lo, phi_hi) = (spline.phi_span.0 as f64, spline.phi_span.1 as f64);
    let outer = |phi: f64| {
        adaptive_simpson(
            &|theta| spline.eval(theta, phi),
            theta_lo,
            theta_hi,
            QUADRATURE_EPSABS,
        )
    };
    let integral = adaptive_simpson(&outer, phi_lo, phi_hi, QUADRATURE_EPSABS);
    (integral as f32).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        polar::reconstruct_polar_map,
        profile::AngularProfile,
    };
    use approx::assert_abs_diff_eq;
    use lobe_base::{deg, rad};
    use std::f32::consts::FRAC_PI_2;

    /// A phi-independent map `value = f(theta)` on the given grid.
    fn map_of(grid: &AngularGrid, f: impl Fn(f32) -> f32) -> PolarMap {
        let profile = AngularProfile::from_samples(
            (0..1001).map(|i| {
                let t = -FRAC_PI_2 + i as f32 * std::f32::consts::PI / 1000.0;
                (t, f(t.abs()))
            }),
        )
        .unwrap();
        reconstruct_polar_map(&profile, rad!(0.0), rad!(FRAC_PI_2), grid)
    }

    #[test]
    fn lambertian_integrates_to_its_amplitude() {
        let grid = AngularGrid::from_step(deg!(1.0)).unwrap();
        for k in [0.25f32, 0.5, 0.7] {
            let map = map_of(&grid, |t| k * t.cos());
            assert_abs_diff_eq!(hemispherical_integral(&grid, &map), k, epsilon = 0.02);
        }
    }

    #[test]
    fn uniform_map_integrates_to_twice_its_value() {
        // (1/pi) * v * integral(sin) over the hemisphere = 2 v
        let grid = AngularGrid::from_step(deg!(2.0)).unwrap();
        let map = map_of(&grid, |_| 0.3);
        assert_abs_diff_eq!(hemispherical_integral(&grid, &map), 0.6, epsilon = 0.02);
    }

    #[test]
    fn result_is_clipped_to_one() {
        let grid = AngularGrid::from_step(deg!(5.0)).unwrap();
        let map = map_of(&grid, |_| 10.0);
        assert_eq!(hemispherical_integral(&grid, &map), 1.0);
    }

    #[test]
    fn zero_map_integrates_to_zero() {
        let grid = AngularGrid::from_step(deg!(5.0)).unwrap();
        let map = map_of(&grid, |_| 0.0);
        assert_eq!(hemispherical_integral(&grid, &map), 0.0);
    }

    #[test]
    fn resolution_independent_within_tolerance() {
        let coarse = AngularGrid::from_step(deg!(1.0)).unwrap();
        let fine = AngularGrid::from_step(deg!(0.5)).unwrap();
        let a = hemispherical_integral(&coarse, &map_of(&coarse, |t| 0.5 * t.cos()));
        let b = hemispherical_integral(&fine, &map_of(&fine, |t| 0.5 * t.cos()));
        assert_abs_diff_eq!(a, b, epsilon = 0.01);
    }
}
