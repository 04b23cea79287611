/// Reference ellipsoid parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ellipsoid {
    /// Semi-major axis (metres)
    pub a: f64,
    /// Flattening (dimensionless), zero for a sphere
    pub f: f64,
    /// Semi-minor axis: a * (1 - f)
    pub b: f64,
    /// First eccentricity squared: 2f - f^2
    pub e2: f64,
}

impl Ellipsoid {
    pub const fn new(a: f64, f: f64) -> Self {
        Self {
            a,
            f,
            b: a * (1.0 - f),
            e2: 2.0 * f - f * f,
        }
    }

    /// Builds an ellipsoid from its semi-major and semi-minor axes.
    pub fn from_axes(a: f64, b: f64) -> Self {
        Self::new(a, (a - b) / a)
    }

    /// A sphere of the given radius.
    pub const fn sphere(radius: f64) -> Self {
        Self::new(radius, 0.0)
    }

    /// First eccentricity. Not stored since `sqrt` is not available in const context.
    pub fn eccentricity(&self) -> f64 {
        self.e2.sqrt()
    }

    pub fn is_sphere(&self) -> bool {
        self.f == 0.0
    }
}

pub const WGS84: Ellipsoid = Ellipsoid::new(6_378_137.0, 1.0 / 298.257_223_563);
pub const GRS80: Ellipsoid = Ellipsoid::new(6_378_137.0, 1.0 / 298.257_222_101);

/// Sphere of radius equal to the WGS84 semi-major axis.
pub const WGS84_SPHERE: Ellipsoid = Ellipsoid::sphere(6_378_137.0);

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_wgs84_constants() {
        assert_relative_eq!(WGS84.a, 6_378_137.0);
        assert_relative_eq!(WGS84.b, 6_356_752.314_245_179, epsilon = 0.001);
        assert_relative_eq!(WGS84.eccentricity(), 0.081_819_190_842_622, epsilon = 1e-12);
        assert!(!WGS84.is_sphere());
    }

    #[test]
    fn test_grs80_differs_only_in_flattening() {
        assert_eq!(WGS84.a, GRS80.a);
        assert!((WGS84.f - GRS80.f).abs() < 1e-8);
        assert_ne!(WGS84, GRS80);
    }

    #[test]
    fn test_from_axes() {
        let clarke = Ellipsoid::from_axes(6_378_206.4, 6_356_583.8);
        assert_relative_eq!(1.0 / clarke.f, 294.978_698_2, epsilon = 1e-6);
        assert_relative_eq!(clarke.b, 6_356_583.8, epsilon = 1e-6);
    }

    #[test]
    fn test_sphere() {
        assert!(WGS84_SPHERE.is_sphere());
        assert_eq!(WGS84_SPHERE.eccentricity(), 0.0);
        assert_eq!(WGS84_SPHERE.b, WGS84_SPHERE.a);
    }
}
