use chrono::{DateTime, Utc};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::GpxStatsError;
use crate::track_types::{ExtensionField, Link, Point, Route};

type Result<T> = std::result::Result<T, GpxStatsError>;

/// Parse a GPX XML string, returning every <rte> element as a Route.
///
/// Waypoints and tracks are ignored; this crate only models routes. The
/// returned routes carry no stats yet (`stats` is `None` until
/// `recalculate_stats` runs).
pub fn parse_gpx(xml: &str) -> Result<Vec<Route>> {
    let mut reader = Reader::from_str(xml);
    let mut routes = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if e.local_name().as_ref() == b"rte" {
                    routes.push(parse_route(&mut reader)?);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(GpxStatsError::XmlParse(e)),
            _ => {}
        }
    }

    Ok(routes)
}

/// Parse a <rte> element and its children.
fn parse_route<'a>(reader: &mut Reader<&'a [u8]>) -> Result<Route> {
    let mut route = Route::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"name" => route.name = Some(read_text_owned(reader, &e)?),
                b"cmt" => route.cmt = Some(read_text_owned(reader, &e)?),
                b"desc" => route.desc = Some(read_text_owned(reader, &e)?),
                b"src" => route.src = Some(read_text_owned(reader, &e)?),
                b"type" => route.route_type = Some(read_text_owned(reader, &e)?),
                b"number" => {
                    let text = read_text_owned(reader, &e)?;
                    route.number = text.trim().parse::<u32>().ok();
                }
                b"link" => route.links.push(parse_link(&e, reader)?),
                b"extensions" => parse_extensions(reader, &mut route.extensions)?,
                b"rtept" => {
                    if let Some(pt) = parse_point(&e, reader)? {
                        route.points.push(pt);
                    }
                }
                _ => {
                    reader
                        .read_to_end(e.name())
                        .map_err(GpxStatsError::XmlParse)?;
                }
            },
            Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"rtept" {
                    if let Ok((lat, lon)) = parse_lat_lon(&e) {
                        route.points.push(Point::new(lat, lon));
                    }
                }
            }
            Ok(Event::End(e)) if e.local_name().as_ref() == b"rte" => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(GpxStatsError::XmlParse(e)),
            _ => {}
        }
    }

    Ok(route)
}

/// Parse a <rtept> element and its children.
/// Called after receiving Event::Start for the point element.
fn parse_point<'a>(
    start: &BytesStart<'a>,
    reader: &mut Reader<&'a [u8]>,
) -> Result<Option<Point>> {
    let (lat, lon) = match parse_lat_lon(start) {
        Ok(coords) => coords,
        Err(_) => {
            // Skip this point if lat/lon are missing or invalid
            reader
                .read_to_end(start.name())
                .map_err(GpxStatsError::XmlParse)?;
            return Ok(None);
        }
    };

    let mut point = Point::new(lat, lon);
    let end_name = start.name().0.to_vec();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"ele" => {
                    let text = read_text_owned(reader, &e)?;
                    point.ele = text.trim().parse::<f64>().ok();
                }
                b"time" => {
                    // Unparseable timestamps degrade to None; stats then
                    // skip the duration-dependent fields for this route.
                    let text = read_text_owned(reader, &e)?;
                    point.time = parse_time(text.trim());
                }
                b"name" => point.name = Some(read_text_owned(reader, &e)?),
                b"cmt" => point.cmt = Some(read_text_owned(reader, &e)?),
                b"desc" => point.desc = Some(read_text_owned(reader, &e)?),
                b"src" => point.src = Some(read_text_owned(reader, &e)?),
                b"sym" => point.sym = Some(read_text_owned(reader, &e)?),
                b"type" => point.point_type = Some(read_text_owned(reader, &e)?),
                b"link" => point.links.push(parse_link(&e, reader)?),
                _ => {
                    reader
                        .read_to_end(e.name())
                        .map_err(GpxStatsError::XmlParse)?;
                }
            },
            Ok(Event::End(e)) if e.name().0 == end_name.as_slice() => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(GpxStatsError::XmlParse(e)),
            _ => {}
        }
    }

    Ok(Some(point))
}

fn parse_time(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse lat/lon attributes from a point element's start tag.
fn parse_lat_lon(e: &BytesStart<'_>) -> Result<(f64, f64)> {
    let mut lat: Option<f64> = None;
    let mut lon: Option<f64> = None;

    for attr_result in e.attributes() {
        let attr = attr_result.map_err(|e| GpxStatsError::XmlParse(e.into()))?;
        let key = attr.key.local_name();
        let val = std::str::from_utf8(&attr.value).unwrap_or_default();
        match key.as_ref() {
            b"lat" => {
                lat = Some(val.parse::<f64>().map_err(|_| {
                    GpxStatsError::InvalidAttribute {
                        element: "rtept",
                        attribute: "lat",
                        value: val.to_string(),
                    }
                })?);
            }
            b"lon" => {
                lon = Some(val.parse::<f64>().map_err(|_| {
                    GpxStatsError::InvalidAttribute {
                        element: "rtept",
                        attribute: "lon",
                        value: val.to_string(),
                    }
                })?);
            }
            _ => {}
        }
    }

    let lat = lat.ok_or(GpxStatsError::MissingAttribute {
        element: "rtept",
        attribute: "lat",
    })?;
    let lon = lon.ok_or(GpxStatsError::MissingAttribute {
        element: "rtept",
        attribute: "lon",
    })?;

    Ok((lat, lon))
}

/// Parse a <link> element.
fn parse_link<'a>(start: &BytesStart<'a>, reader: &mut Reader<&'a [u8]>) -> Result<Link> {
    let mut href = String::new();
    for attr in start.attributes().flatten() {
        if attr.key.local_name().as_ref() == b"href" {
            href = std::str::from_utf8(&attr.value)
                .unwrap_or_default()
                .to_string();
        }
    }

    let mut text: Option<String> = None;
    let mut link_type: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"text" => text = Some(read_text_owned(reader, &e)?),
                b"type" => link_type = Some(read_text_owned(reader, &e)?),
                _ => {
                    reader
                        .read_to_end(e.name())
                        .map_err(GpxStatsError::XmlParse)?;
                }
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"link" => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(GpxStatsError::XmlParse(e)),
            _ => {}
        }
    }

    Ok(Link {
        href,
        text,
        link_type,
    })
}

/// Capture the direct children of an <extensions> block as opaque
/// name/value pairs. Nested markup is flattened to its text content.
fn parse_extensions<'a>(
    reader: &mut Reader<&'a [u8]>,
    out: &mut Vec<ExtensionField>,
) -> Result<()> {
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                let value = read_text_owned(reader, &e)?;
                out.push(ExtensionField {
                    name,
                    value: value.trim().to_string(),
                });
            }
            Ok(Event::Empty(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                out.push(ExtensionField {
                    name,
                    value: String::new(),
                });
            }
            Ok(Event::End(e)) if e.local_name().as_ref() == b"extensions" => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(GpxStatsError::XmlParse(e)),
            _ => {}
        }
    }

    Ok(())
}

/// Read text content of an element as an owned String.
/// Handles regular text, CDATA sections, and entity references (Event::GeneralRef).
fn read_text_owned<'a>(reader: &mut Reader<&'a [u8]>, start: &BytesStart<'_>) -> Result<String> {
    let end_name = start.name().0.to_vec();
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Text(e)) => {
                let raw = std::str::from_utf8(e.as_ref()).unwrap_or_default();
                text.push_str(raw);
            }
            Ok(Event::CData(e)) => {
                let s = std::str::from_utf8(e.as_ref()).unwrap_or_default();
                text.push_str(s);
            }
            Ok(Event::GeneralRef(e)) => {
                // Character references (&#60; &#x3C;) and predefined entities
                if let Ok(Some(ch)) = e.resolve_char_ref() {
                    text.push(ch);
                } else {
                    let name = std::str::from_utf8(e.as_ref()).unwrap_or_default();
                    match name {
                        "amp" => text.push('&'),
                        "lt" => text.push('<'),
                        "gt" => text.push('>'),
                        "quot" => text.push('"'),
                        "apos" => text.push('\''),
                        _ => {}
                    }
                }
            }
            Ok(Event::End(e)) if e.name().0 == end_name.as_slice() => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(GpxStatsError::XmlParse(e)),
            _ => {}
        }
    }

    Ok(text)
}
