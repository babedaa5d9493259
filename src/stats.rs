use chrono::{DateTime, Utc};

use crate::geo;
use crate::ordering;
use crate::track_types::{Point, Route};

/// Summary statistics derived from a route's point sequence.
///
/// All fields are rebuilt from scratch on every
/// [`Route::recalculate_stats`] call; `Default` is the neutral state.
/// `average_speed` and `average_pace` stay `None` (rather than holding a
/// computed zero) when their guard condition fails, so "not computable"
/// is distinguishable from "computed as zero".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stats {
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    /// Total distance in meters.
    pub distance: f64,
    /// Signed duration in whole seconds. Negative when the last point's
    /// timestamp precedes the first point's; that is reported as-is.
    pub duration: Option<i64>,
    /// Meters per second. Set only when `duration` is present and non-zero.
    pub average_speed: Option<f64>,
    /// Seconds per kilometer. Set only when `distance` is non-zero.
    pub average_pace: Option<f64>,
    pub min_altitude: Option<f64>,
    pub max_altitude: Option<f64>,
    /// Sum of positive elevation deltas between consecutive points that
    /// both report elevation. Never negative.
    pub cumulative_elevation_gain: f64,
}

impl Stats {
    /// Restore the neutral state. Called at the start of every
    /// recalculation so no field survives from a previous pass.
    pub fn reset(&mut self) {
        *self = Stats::default();
    }
}

impl Route {
    /// Return a copy of the point sequence.
    ///
    /// With `sort_by_timestamp` set, the copy is stable-sorted by
    /// [`ordering::compare_by_timestamp`] (untimed points first); the
    /// stored sequence itself is never reordered by this read.
    pub fn get_points(&self, sort_by_timestamp: bool) -> Vec<Point> {
        let mut points = self.points.clone();
        if sort_by_timestamp {
            points.sort_by(ordering::compare_by_timestamp);
        }
        points
    }

    /// Rebuild `self.stats` from the storage-order point sequence in a
    /// single forward pass, writing each point's `distance_from_prev` as a
    /// side effect.
    ///
    /// Never fails: an empty sequence leaves the stats neutral, and points
    /// missing elevation or a timestamp simply skip the dependent
    /// computations.
    pub fn recalculate_stats(&mut self) {
        let stats = self.stats.get_or_insert_with(Stats::default);
        stats.reset();

        if self.points.is_empty() {
            return;
        }

        stats.started_at = self.points[0].time;
        stats.finished_at = self.points[self.points.len() - 1].time;

        let mut prev_ele: Option<f64> = None;
        for i in 0..self.points.len() {
            let dist = if i == 0 {
                0.0
            } else {
                geo::distance(&self.points[i - 1], &self.points[i])
            };
            self.points[i].distance_from_prev = dist;
            stats.distance += dist;

            if let Some(ele) = self.points[i].ele {
                stats.min_altitude = Some(stats.min_altitude.map_or(ele, |m| m.min(ele)));
                stats.max_altitude = Some(stats.max_altitude.map_or(ele, |m| m.max(ele)));
                if let Some(prev) = prev_ele {
                    let delta = ele - prev;
                    if delta > 0.0 {
                        stats.cumulative_elevation_gain += delta;
                    }
                }
            }
            // Overwritten every iteration: a point without elevation breaks
            // the gain chain instead of bridging across the gap.
            prev_ele = self.points[i].ele;
        }

        if let (Some(started), Some(finished)) = (stats.started_at, stats.finished_at) {
            let duration = (finished - started).num_seconds();
            stats.duration = Some(duration);
            if duration != 0 {
                stats.average_speed = Some(stats.distance / duration as f64);
            }
            if stats.distance != 0.0 {
                stats.average_pace = Some(duration as f64 / (stats.distance / 1000.0));
            }
        }
    }
}
