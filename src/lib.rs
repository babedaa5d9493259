pub mod error;
pub mod geo;
pub mod options;
pub mod ordering;
pub mod parser;
pub mod serializer;
pub mod stats;
pub mod track_types;

use wasm_bindgen::prelude::*;

use crate::error::GpxStatsError;
use crate::options::AnalyzeOptions;
use crate::track_types::Route;

/// Parse a GPX string, recalculate stats for every route, and return the
/// serialized routes as a JS array.
#[wasm_bindgen(js_name = analyzeGpx)]
pub fn analyze_gpx(gpx_string: &str, options: JsValue) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let opts = parse_options(options)?;
    let routes = analyze(gpx_string, &opts).map_err(JsValue::from)?;
    serde_wasm_bindgen::to_value(&routes).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Parse a GPX string, recalculate stats for every route, and return the
/// serialized routes as a JSON string.
#[wasm_bindgen(js_name = analyzeGpxString)]
pub fn analyze_gpx_string(gpx_string: &str, options: JsValue) -> Result<String, JsValue> {
    console_error_panic_hook::set_once();

    let opts = parse_options(options)?;
    let routes = analyze(gpx_string, &opts).map_err(JsValue::from)?;
    serde_json::to_string(&routes).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Native entry point backing both wasm exports: parse, recalculate,
/// serialize.
pub fn analyze(
    gpx_string: &str,
    opts: &AnalyzeOptions,
) -> Result<Vec<serde_json::Value>, GpxStatsError> {
    let mut routes: Vec<Route> = parser::parse_gpx(gpx_string)?;
    for route in &mut routes {
        route.recalculate_stats();
    }
    Ok(routes
        .iter()
        .map(|route| serializer::route_to_value(route, opts))
        .collect())
}

fn parse_options(options: JsValue) -> Result<AnalyzeOptions, JsValue> {
    if options.is_undefined() || options.is_null() {
        Ok(AnalyzeOptions::default())
    } else {
        serde_wasm_bindgen::from_value(options).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
