use crate::track_types::Point;

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Distance in meters between two route points.
///
/// Haversine great-circle distance on a spherical earth; when both points
/// carry elevation, the elevation delta is folded in by Pythagoras so that
/// steep segments measure longer than their map projection.
pub fn distance(a: &Point, b: &Point) -> f64 {
    let ground = haversine(a.lat, a.lon, b.lat, b.lon);
    match (a.ele, b.ele) {
        (Some(ea), Some(eb)) => ground.hypot(eb - ea),
        _ => ground,
    }
}

fn haversine(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let h = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_M * c
}
