/// Great-circle distance between coordinate pairs
///
/// Haversine formula over a spherical Earth model. Used to attach a
/// kilometer distance to each candidate when the caller supplies a user
/// location, and by the max-distance filter and distance sort.

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometers between two points given in decimal
/// degrees.
///
/// Total function of its inputs: coordinates are not range-validated,
/// callers pass whatever the upstream documents carry.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}
