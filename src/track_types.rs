use chrono::{DateTime, Utc};

use crate::stats::Stats;

/// A single route point (<rtept>).
///
/// Everything except `distance_from_prev` is populated by the parser (or a
/// programmatic builder) and treated as read-only afterwards.
/// `distance_from_prev` is derived: it is written by
/// [`Route::recalculate_stats`] and holds `0.0` until that has run at
/// least once.
#[derive(Debug, Clone)]
pub struct Point {
    pub lat: f64,
    pub lon: f64,
    pub ele: Option<f64>,
    pub time: Option<DateTime<Utc>>,
    pub name: Option<String>,
    pub cmt: Option<String>,
    pub desc: Option<String>,
    pub src: Option<String>,
    pub sym: Option<String>,
    pub point_type: Option<String>,
    pub links: Vec<Link>,
    /// Distance in meters from the previous point in the route, as of the
    /// last stats recalculation. `0.0` for the first point.
    pub distance_from_prev: f64,
}

impl Point {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            ele: None,
            time: None,
            name: None,
            cmt: None,
            desc: None,
            src: None,
            sym: None,
            point_type: None,
            links: Vec::new(),
            distance_from_prev: 0.0,
        }
    }
}

/// A GPX link element.
#[derive(Debug, Clone)]
pub struct Link {
    pub href: String,
    pub text: Option<String>,
    pub link_type: Option<String>,
}

/// One child element of an <extensions> block, captured opaquely as a
/// name/value pair.
#[derive(Debug, Clone)]
pub struct ExtensionField {
    pub name: String,
    pub value: String,
}

/// A GPX route (<rte>): metadata, an append-ordered point sequence, and the
/// stats derived from it.
///
/// `points` is storage order and the single source of truth for
/// recalculation; reordered views are only ever produced as copies by
/// [`Route::get_points`].
#[derive(Debug, Clone, Default)]
pub struct Route {
    pub name: Option<String>,
    pub cmt: Option<String>,
    pub desc: Option<String>,
    pub src: Option<String>,
    pub links: Vec<Link>,
    pub number: Option<u32>,
    pub route_type: Option<String>,
    pub extensions: Vec<ExtensionField>,
    pub points: Vec<Point>,
    /// Created lazily by the first `recalculate_stats` call, reset in place
    /// on every subsequent one. `None` means "never recalculated".
    pub stats: Option<Stats>,
}

impl Route {
    pub fn new() -> Self {
        Self::default()
    }
}
