//! Reflection, refraction and Fresnel formulas.
//!
//! Directions are expected to be unit length. Normals may face either way;
//! `refract` and `fresnel` work out which side the ray arrives from.

use crate::Vec3;

/// Mirror `v` about the normal `n`.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Bend `incident` through a surface separating media of index `ior1`
/// (the side the normal points to) and `ior2`.
///
/// Falls back to mirror reflection on total internal reflection, so the
/// result is always a usable direction.
pub fn refract(incident: Vec3, normal: Vec3, ior1: f32, ior2: f32) -> Vec3 {
    let mut n = normal;
    let mut cos_i = incident.dot(n).clamp(-1.0, 1.0);
    let (mut eta_i, mut eta_t) = (ior1, ior2);
    if cos_i < 0.0 {
        cos_i = -cos_i;
    } else {
        std::mem::swap(&mut eta_i, &mut eta_t);
        n = -normal;
    }

    let eta = eta_i / eta_t;
    let k = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
    if k < 0.0 {
        reflect(incident, n)
    } else {
        eta * incident + (eta * cos_i - k.sqrt()) * n
    }
}

/// Unpolarized Fresnel reflectance for a ray crossing from `ior1` into `ior2`.
///
/// Returns 1 on total internal reflection.
pub fn fresnel(incident: Vec3, normal: Vec3, ior1: f32, ior2: f32) -> f32 {
    let cos_i = incident.dot(normal).clamp(-1.0, 1.0);
    let (eta_i, eta_t) = if cos_i > 0.0 { (ior2, ior1) } else { (ior1, ior2) };

    // Snell's law
    let sin_t = eta_i / eta_t * (1.0 - cos_i * cos_i).max(0.0).sqrt();
    if sin_t >= 1.0 {
        return 1.0;
    }

    let cos_t = (1.0 - sin_t * sin_t).max(0.0).sqrt();
    let cos_i = cos_i.abs();
    let rs = (eta_t * cos_i - eta_i * cos_t) / (eta_t * cos_i + eta_i * cos_t);
    let rp = (eta_i * cos_i - eta_t * cos_t) / (eta_i * cos_i + eta_t * cos_t);
    (rs * rs + rp * rp) / 2.0
}

/// Outward normal of a box face from a point in box-local, size-normalized
/// coordinates: the unit axis of the largest-magnitude component, signed.
pub fn box_normal(p: Vec3) -> Vec3 {
    let a = p.abs();
    let signed = |axis: Vec3, c: f32| if c > 0.0 { axis } else { -axis };

    if a.x > a.y {
        if a.x > a.z {
            signed(Vec3::X, p.x)
        } else {
            signed(Vec3::Z, p.z)
        }
    } else if a.y > a.z {
        signed(Vec3::Y, p.y)
    } else {
        signed(Vec3::Z, p.z)
    }
}
