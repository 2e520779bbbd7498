//! Angle utilities shared by the segment extractor and the component rules.
//!
//! Line orientations are undirected, so everything here works modulo π.

use std::f32::consts::{FRAC_PI_2, PI};

/// Normalizes an angle into the range [0, π).
#[inline]
pub fn normalize_half_pi(angle: f32) -> f32 {
    let mut norm = angle.rem_euclid(PI);
    if norm >= PI {
        norm -= PI;
    }
    if norm >= PI - 1e-6 {
        0.0
    } else {
        norm
    }
}

/// Computes the smallest unsigned angular difference between two angles,
/// treating antipodal directions as equivalent (i.e. π apart → 0).
#[inline]
pub fn angular_difference(a: f32, b: f32) -> f32 {
    let mut diff = (a - b).abs();
    if diff > PI {
        diff = diff.rem_euclid(PI);
    }
    if diff > FRAC_PI_2 {
        PI - diff
    } else {
        diff
    }
}

/// Undirected orientation of a direction vector in degrees, in [0, 180).
#[inline]
pub fn orientation_deg(dir: [f32; 2]) -> f32 {
    normalize_half_pi(dir[1].atan2(dir[0])).to_degrees()
}

/// Deviation in degrees, in [0, 90], between an orientation and a reference
/// orientation (both in degrees, undirected).
#[inline]
pub fn deviation_deg(orientation: f32, reference: f32) -> f32 {
    angular_difference(orientation.to_radians(), reference.to_radians()).to_degrees()
}
