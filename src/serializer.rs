use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value as JsonValue};

use crate::options::AnalyzeOptions;
use crate::stats::Stats;
use crate::track_types::{ExtensionField, Link, Point, Route};

/// Serialize a route to its key-value tree.
///
/// The key set is fixed (`name, cmt, desc, src, link, number, type,
/// extensions, rtep, stats`): absent scalars render as explicit `null`,
/// collections as arrays (empty when absent). `rtep` holds the points as
/// returned by `Route::get_points`, so the sort flag applies to the output
/// view; the route itself is read-only here.
pub fn route_to_value(route: &Route, opts: &AnalyzeOptions) -> JsonValue {
    let mut map = Map::new();
    map.insert("name".to_string(), string_or_null(&route.name));
    map.insert("cmt".to_string(), string_or_null(&route.cmt));
    map.insert("desc".to_string(), string_or_null(&route.desc));
    map.insert("src".to_string(), string_or_null(&route.src));
    map.insert(
        "link".to_string(),
        JsonValue::Array(route.links.iter().map(link_to_value).collect()),
    );
    map.insert(
        "number".to_string(),
        match route.number {
            Some(n) => JsonValue::Number(n.into()),
            None => JsonValue::Null,
        },
    );
    map.insert("type".to_string(), string_or_null(&route.route_type));
    map.insert(
        "extensions".to_string(),
        JsonValue::Array(route.extensions.iter().map(extension_to_value).collect()),
    );
    map.insert(
        "rtep".to_string(),
        JsonValue::Array(
            route
                .get_points(opts.sort_by_timestamp)
                .iter()
                .map(point_to_value)
                .collect(),
        ),
    );
    map.insert(
        "stats".to_string(),
        match &route.stats {
            Some(stats) => stats_to_value(stats),
            None => JsonValue::Null,
        },
    );
    JsonValue::Object(map)
}

pub fn point_to_value(point: &Point) -> JsonValue {
    let mut map = Map::new();
    map.insert("lat".to_string(), float_value(point.lat));
    map.insert("lon".to_string(), float_value(point.lon));
    map.insert("ele".to_string(), float_or_null(point.ele));
    map.insert("time".to_string(), time_or_null(point.time));
    map.insert("name".to_string(), string_or_null(&point.name));
    map.insert("cmt".to_string(), string_or_null(&point.cmt));
    map.insert("desc".to_string(), string_or_null(&point.desc));
    map.insert("src".to_string(), string_or_null(&point.src));
    map.insert("sym".to_string(), string_or_null(&point.sym));
    map.insert("type".to_string(), string_or_null(&point.point_type));
    map.insert(
        "link".to_string(),
        JsonValue::Array(point.links.iter().map(link_to_value).collect()),
    );
    map.insert(
        "difference".to_string(),
        float_value(point.distance_from_prev),
    );
    JsonValue::Object(map)
}

pub fn stats_to_value(stats: &Stats) -> JsonValue {
    let mut map = Map::new();
    map.insert("distance".to_string(), float_value(stats.distance));
    map.insert(
        "duration".to_string(),
        match stats.duration {
            Some(d) => JsonValue::Number(d.into()),
            None => JsonValue::Null,
        },
    );
    map.insert("avgSpeed".to_string(), float_or_null(stats.average_speed));
    map.insert("avgPace".to_string(), float_or_null(stats.average_pace));
    map.insert("minAltitude".to_string(), float_or_null(stats.min_altitude));
    map.insert("maxAltitude".to_string(), float_or_null(stats.max_altitude));
    map.insert(
        "cumulativeElevationGain".to_string(),
        float_value(stats.cumulative_elevation_gain),
    );
    map.insert("startedAt".to_string(), time_or_null(stats.started_at));
    map.insert("finishedAt".to_string(), time_or_null(stats.finished_at));
    JsonValue::Object(map)
}

fn link_to_value(link: &Link) -> JsonValue {
    let mut map = Map::new();
    map.insert("href".to_string(), JsonValue::String(link.href.clone()));
    map.insert("text".to_string(), string_or_null(&link.text));
    map.insert("type".to_string(), string_or_null(&link.link_type));
    JsonValue::Object(map)
}

fn extension_to_value(ext: &ExtensionField) -> JsonValue {
    let mut map = Map::new();
    map.insert("name".to_string(), JsonValue::String(ext.name.clone()));
    map.insert("value".to_string(), JsonValue::String(ext.value.clone()));
    JsonValue::Object(map)
}

fn string_or_null(value: &Option<String>) -> JsonValue {
    match value {
        Some(v) => JsonValue::String(v.clone()),
        None => JsonValue::Null,
    }
}

fn float_value(v: f64) -> JsonValue {
    // NaN/infinity have no JSON representation; render them as null.
    serde_json::Number::from_f64(v)
        .map(JsonValue::Number)
        .unwrap_or(JsonValue::Null)
}

fn float_or_null(value: Option<f64>) -> JsonValue {
    match value {
        Some(v) => float_value(v),
        None => JsonValue::Null,
    }
}

fn time_or_null(value: Option<DateTime<Utc>>) -> JsonValue {
    match value {
        Some(t) => JsonValue::String(t.to_rfc3339_opts(SecondsFormat::Secs, true)),
        None => JsonValue::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const ROUTE_KEYS: [&str; 10] = [
        "name",
        "cmt",
        "desc",
        "src",
        "link",
        "number",
        "type",
        "extensions",
        "rtep",
        "stats",
    ];

    fn pt(lat: f64, lon: f64, secs: Option<i64>) -> Point {
        let mut p = Point::new(lat, lon);
        p.time = secs.map(|s| Utc.timestamp_opt(s, 0).unwrap());
        p
    }

    #[test]
    fn test_empty_route_has_fixed_key_set() {
        let value = route_to_value(&Route::new(), &AnalyzeOptions::default());
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), ROUTE_KEYS.len());
        for key in ROUTE_KEYS {
            assert!(obj.contains_key(key), "missing key {key}");
        }
        assert!(obj["name"].is_null());
        assert!(obj["number"].is_null());
        assert!(obj["stats"].is_null());
        assert_eq!(obj["link"], JsonValue::Array(vec![]));
        assert_eq!(obj["extensions"], JsonValue::Array(vec![]));
        assert_eq!(obj["rtep"], JsonValue::Array(vec![]));
    }

    #[test]
    fn test_scalar_fields_and_extensions() {
        let mut route = Route::new();
        route.name = Some("Loop".to_string());
        route.number = Some(4);
        route.extensions.push(ExtensionField {
            name: "surface".to_string(),
            value: "gravel".to_string(),
        });
        route.links.push(Link {
            href: "https://example.com".to_string(),
            text: Some("Example".to_string()),
            link_type: None,
        });

        let value = route_to_value(&route, &AnalyzeOptions::default());
        assert_eq!(value["name"], "Loop");
        assert_eq!(value["number"], 4);
        assert_eq!(value["extensions"][0]["name"], "surface");
        assert_eq!(value["extensions"][0]["value"], "gravel");
        assert_eq!(value["link"][0]["href"], "https://example.com");
        assert_eq!(value["link"][0]["text"], "Example");
        assert!(value["link"][0]["type"].is_null());
    }

    #[test]
    fn test_point_serialization() {
        let mut point = pt(35.5, 139.5, Some(1_735_689_600)); // 2025-01-01T00:00:00Z
        point.ele = Some(40.5);
        point.distance_from_prev = 12.25;

        let value = point_to_value(&point);
        assert_eq!(value["lat"], 35.5);
        assert_eq!(value["lon"], 139.5);
        assert_eq!(value["ele"], 40.5);
        assert_eq!(value["time"], "2025-01-01T00:00:00Z");
        assert_eq!(value["difference"], 12.25);
        assert!(value["name"].is_null());
        assert_eq!(value["link"], JsonValue::Array(vec![]));
    }

    #[test]
    fn test_stats_nested_object() {
        let mut route = Route {
            points: vec![pt(46.0, 8.0, Some(0)), pt(46.0, 8.0, Some(20))],
            ..Route::default()
        };
        route.recalculate_stats();

        let value = route_to_value(&route, &AnalyzeOptions::default());
        let stats = &value["stats"];
        assert_eq!(stats["distance"], 0.0);
        assert_eq!(stats["duration"], 20);
        assert_eq!(stats["avgSpeed"], 0.0);
        assert!(stats["avgPace"].is_null());
        assert!(stats["minAltitude"].is_null());
        assert!(stats["maxAltitude"].is_null());
        assert_eq!(stats["cumulativeElevationGain"], 0.0);
        assert_eq!(stats["startedAt"], "1970-01-01T00:00:00Z");
        assert_eq!(stats["finishedAt"], "1970-01-01T00:00:20Z");
    }

    #[test]
    fn test_sort_flag_reorders_output_not_storage() {
        let route = Route {
            points: vec![pt(1.0, 1.0, Some(200)), pt(2.0, 2.0, Some(100))],
            ..Route::default()
        };
        let opts = AnalyzeOptions {
            sort_by_timestamp: true,
        };

        let value = route_to_value(&route, &opts);
        assert_eq!(value["rtep"][0]["lat"], 2.0);
        assert_eq!(value["rtep"][1]["lat"], 1.0);
        // Storage order untouched.
        assert_eq!(route.points[0].lat, 1.0);

        let unsorted = route_to_value(&route, &AnalyzeOptions::default());
        assert_eq!(unsorted["rtep"][0]["lat"], 1.0);
    }
}
