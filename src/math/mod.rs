//! Vector and angle arithmetic shared by the contact classifier

use nalgebra::Vector3;

/// Euclidean distance between two points
pub fn distance(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    (a - b).norm()
}

/// Angle in degrees at `vertex` between the rays towards `p1` and `p3`.
///
/// The cosine is clamped to [-1, 1] before `acos` so nearly collinear
/// points cannot produce NaN. Returns 0 when either ray has zero length.
pub fn angle(p1: &Vector3<f64>, vertex: &Vector3<f64>, p3: &Vector3<f64>) -> f64 {
    let v1 = p1 - vertex;
    let v2 = p3 - vertex;

    let magnitude1 = v1.norm();
    let magnitude2 = v2.norm();
    if magnitude1 == 0.0 || magnitude2 == 0.0 {
        return 0.0;
    }

    let cosine = (v1.dot(&v2) / (magnitude1 * magnitude2)).clamp(-1.0, 1.0);
    cosine.acos().to_degrees()
}
