//! GPX file generation from raw track points.
//!
//! Produces GPX 1.1 XML that `trackstats::GpxReader` can load back.

use time::format_description::well_known::Rfc3339;
use trackstats::RawTrackPoint;

/// Generates a GPX 1.1 document from raw points.
///
/// The output holds one track with one segment. Missing fields are left out
/// of the XML, so a point without `lat` or `lon` produces a document the
/// reader rejects. `type_code` is written as the track `<type>`.
pub fn generate_gpx(points: &[RawTrackPoint], name: &str, type_code: Option<u32>) -> Vec<u8> {
    let mut gpx = String::new();

    gpx.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    gpx.push('\n');
    gpx.push_str(r#"<gpx version="1.1" creator="trackstats-test-data""#);
    gpx.push_str(r#" xmlns="http://www.topografix.com/GPX/1/1""#);
    gpx.push_str(r#" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance""#);
    gpx.push_str(r#" xsi:schemaLocation="http://www.topografix.com/GPX/1/1 http://www.topografix.com/GPX/1/1/gpx.xsd">"#);
    gpx.push('\n');

    if let Some(ts) = points.first().and_then(|p| p.timestamp) {
        gpx.push_str("  <metadata>\n");
        gpx.push_str(&format!("    <time>{}</time>\n", format_time(ts)));
        gpx.push_str("  </metadata>\n");
    }

    gpx.push_str("  <trk>\n");
    gpx.push_str(&format!("    <name>{}</name>\n", escape_xml(name)));
    if let Some(code) = type_code {
        gpx.push_str(&format!("    <type>{code}</type>\n"));
    }
    gpx.push_str("    <trkseg>\n");

    for point in points {
        gpx.push_str("      <trkpt");
        if let Some(lat) = point.lat {
            gpx.push_str(&format!(r#" lat="{lat:.7}""#));
        }
        if let Some(lon) = point.lon {
            gpx.push_str(&format!(r#" lon="{lon:.7}""#));
        }
        gpx.push_str(">\n");

        if let Some(ele) = point.elevation {
            gpx.push_str(&format!("        <ele>{ele:.2}</ele>\n"));
        }
        if let Some(ts) = point.timestamp {
            gpx.push_str(&format!("        <time>{}</time>\n", format_time(ts)));
        }

        gpx.push_str("      </trkpt>\n");
    }

    gpx.push_str("    </trkseg>\n");
    gpx.push_str("  </trk>\n");
    gpx.push_str("</gpx>\n");

    gpx.into_bytes()
}

fn format_time(ts: time::OffsetDateTime) -> String {
    ts.format(&Rfc3339).unwrap_or_default()
}

/// Escapes XML special characters in a string.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
