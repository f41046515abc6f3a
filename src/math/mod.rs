/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Homogeneous 4D vector type, `(x, y, z, w)`.
pub type Vector4 = nalgebra::Vector4<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Returns the component-wise average of two points.
#[must_use]
pub fn midpoint(a: &Point3, b: &Point3) -> Point3 {
    nalgebra::center(a, b)
}

/// Returns the arithmetic mean of a set of points, or `None` for an empty set.
#[must_use]
pub fn centroid<'a>(points: impl IntoIterator<Item = &'a Point3>) -> Option<Point3> {
    let mut sum = Vector3::zeros();
    let mut count = 0_u32;
    for p in points {
        sum += p.coords;
        count += 1;
    }
    if count == 0 {
        return None;
    }
    Some(Point3::from(sum / f64::from(count)))
}
