use std::cmp::Ordering;

use crate::track_types::Point;

/// Total order on route points by timestamp.
///
/// Points without a timestamp sort before every timestamped point; two
/// points both lacking a timestamp compare equal, so a stable sort keeps
/// them in their stored relative order.
pub fn compare_by_timestamp(a: &Point, b: &Point) -> Ordering {
    match (a.time, b.time) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(ta), Some(tb)) => ta.cmp(&tb),
    }
}
