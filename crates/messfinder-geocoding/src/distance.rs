//! Great-circle distance on a spherical Earth.

/// Mean Earth radius used for all distance computations.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometres between two points given in decimal degrees.
///
/// Symmetric in its two points and exactly zero for identical inputs. Uses the
/// `atan2` form, which has no singularity at the poles or for antipodal points.
pub fn distance_km(lat_a: f64, lng_a: f64, lat_b: f64, lng_b: f64) -> f64 {
    let d_lat = (lat_b - lat_a).to_radians();
    let d_lng = (lng_b - lng_a).to_radians();

    let half_chord = (d_lat / 2.0).sin().powi(2)
        + lat_a.to_radians().cos() * lat_b.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    // rounding can push this a hair outside [0, 1] near antipodes
    let half_chord = half_chord.clamp(0.0, 1.0);

    let central_angle = 2.0 * half_chord.sqrt().atan2((1.0 - half_chord).sqrt());
    EARTH_RADIUS_KM * central_angle
}
