// Flight path domain models
use serde::Serialize;

/// One polyline vertex in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PathPoint {
    pub lon: f64,
    pub lat: f64,
}

impl PathPoint {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Great-circle initial bearing towards `other`, in `[0, 360)` degrees.
    ///
    /// Non-finite intermediate results (coincident poles, NaN input) read as 0.
    pub fn bearing_to(&self, other: &PathPoint) -> f64 {
        let phi1 = self.lat.to_radians();
        let phi2 = other.lat.to_radians();
        let d_lambda = (other.lon - self.lon).to_radians();

        let east = d_lambda.sin() * phi2.cos();
        let north = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * d_lambda.cos();

        let degrees = east.atan2(north).to_degrees().rem_euclid(360.0);
        if !degrees.is_finite() || degrees >= 360.0 {
            return 0.0;
        }
        degrees
    }

    pub fn lerp(&self, other: &PathPoint, amount: f64) -> PathPoint {
        PathPoint::new(
            self.lon + (other.lon - self.lon) * amount,
            self.lat + (other.lat - self.lat) * amount,
        )
    }
}

/// Signed smallest difference `to - from` between two headings, in `[-180, 180)`
pub fn heading_delta(from: f64, to: f64) -> f64 {
    (to - from + 180.0).rem_euclid(360.0) - 180.0
}
