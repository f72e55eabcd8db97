//! # lobe-bsdf
//!
//! Reconstruction of dense, azimuthally-resolved BSDFs from sparse,
//! rotationally-symmetric angular measurements.
//!
//! A goniometric acquisition gives, per incidence angle and wavelength, a
//! 1D in-plane scan of scattered intensity over the outgoing polar angle.
//! This crate turns such scans into an artifact a light-transport
//! simulator can consume:
//!
//! 1. [`profile`] fits continuous angular profiles per branch
//!    (reflective, and transmissive if measured) for each cell,
//! 2. [`polar`] expands a profile into a dense (theta, phi) map under the
//!    revolution assumption,
//! 3. [`integrate`] reduces a map to its hemispherical reflectance or
//!    transmittance,
//! 4. [`volume`] runs the loop over every cell, assembles the 4D tensors,
//!    validates them, and exposes the immutable [`BsdfVolume`],
//! 5. [`export`] regroups the volume the way the serialization boundary
//!    wants it.
//!
//! The engine is a pure function of its inputs: single build, no global
//! state, no I/O, and deterministic output (the per-cell loop may fan out
//! on a thread pool, but results land in iteration order). Any error
//! aborts the build with no partial result.
//!
//! Two numerical quirks are inherited from the acquisition pipeline this
//! engine replaces and kept deliberately: the degenerate specular point
//! substitutes an angular distance of 1 radian, and the transmissive
//! tensor's incidence axis is reversed for the export format.

#![warn(missing_docs)]

pub mod error;
pub mod export;
pub mod integrate;
pub mod measurement;
pub mod polar;
pub mod profile;
pub mod tensor;
pub mod volume;

pub use error::BsdfError;
pub use export::{spectral_cells, BranchRecord, CellRecord};
pub use measurement::{Branch, MeasurementPoint, MeasurementSet};
pub use polar::AngularGrid;
pub use tensor::{Tensor2, Tensor4};
pub use volume::{BsdfVolume, BsdfVolumeBuilder};
