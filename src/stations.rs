//! Offline conversion of the fixed-width station index into the JS lookup
//! table consumed by the web client.
//!
//! Input records are exactly 83 characters wide. Comment lines (`!`), blank
//! lines, and the header row (identifier field `ICAO`) are skipped.

use std::io::{BufRead, Write};

use serde::Serialize;
use thiserror::Error;

/// Record width of a valid station line.
const LINE_WIDTH: usize = 83;

#[derive(Debug, Error)]
pub enum StationError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("bad coordinate field {field:?}: {reason}")]
    Coordinate { field: String, reason: String },

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// One reporting station, keyed by its 4-character identifier.
///
/// Field names match what the client's `_StationInfo` table expects.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Station {
    #[serde(rename = "StationId")]
    pub id: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "Latitude")]
    pub latitude: String,
    #[serde(rename = "Longitude")]
    pub longitude: String,
}

/// Parses one fixed-width record. Returns `Ok(None)` for lines that are
/// skipped by design: wrong width, comments, blanks, and the header row.
pub fn parse_line(line: &str) -> Result<Option<Station>, StationError> {
    let bytes = line.as_bytes();
    if bytes.len() != LINE_WIDTH {
        return Ok(None);
    }
    if bytes[0] == b'!' {
        return Ok(None);
    }
    if line.trim().is_empty() {
        return Ok(None);
    }

    let field = |range: std::ops::Range<usize>| -> &str {
        std::str::from_utf8(&bytes[range]).unwrap_or("")
    };

    let state = field(0..2);
    let city = field(3..19);
    let id = field(20..24);
    let latitude = field(39..46);
    let longitude = field(47..54);

    if id.trim().is_empty() || state.trim().is_empty() {
        return Ok(None);
    }
    if id == "ICAO" {
        // header row
        return Ok(None);
    }

    Ok(Some(Station {
        id: id.to_string(),
        city: normalize_city(city),
        state: state.to_string(),
        latitude: degrees_to_decimal(latitude)?,
        longitude: degrees_to_decimal(longitude)?,
    }))
}

/// Converts the whole station file into the `_StationInfo` JS table.
/// Returns the number of stations written.
pub fn convert<R: BufRead, W: Write>(input: R, mut output: W) -> Result<usize, StationError> {
    output.write_all(b"var _StationInfo = {")?;
    let mut count = 0;
    for line in input.lines() {
        let line = line?;
        let Some(station) = parse_line(&line)? else {
            continue;
        };
        let json = serde_json::to_vec(&station)?;
        write!(output, "{}:", station.id)?;
        output.write_all(&json)?;
        output.write_all(b",")?;
        count += 1;
    }
    output.write_all(b"}")?;
    Ok(count)
}

/// Trims, lowercases, and title-cases a city field.
fn normalize_city(city: &str) -> String {
    let lowered = city.trim().to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut boundary = true;
    for c in lowered.chars() {
        if boundary {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        boundary = !c.is_alphanumeric();
    }
    out
}

/// Converts a `"DD MM<hemisphere>"` degree/minute field to signed decimal
/// degrees with two-decimal precision, negative for `S` and `W`.
pub fn degrees_to_decimal(field: &str) -> Result<String, StationError> {
    let err = |reason: &str| StationError::Coordinate {
        field: field.to_string(),
        reason: reason.to_string(),
    };

    let mut parts = field.split_whitespace();
    let degrees: f64 = parts
        .next()
        .ok_or_else(|| err("missing degrees"))?
        .parse()
        .map_err(|_| err("unparseable degrees"))?;

    let rest = parts.next().ok_or_else(|| err("missing minutes"))?;
    if rest.len() < 3 {
        return Err(err("minutes field too short"));
    }
    let minutes: f64 = rest
        .get(..2)
        .ok_or_else(|| err("minutes field malformed"))?
        .parse()
        .map_err(|_| err("unparseable minutes"))?;

    let sign = match rest.as_bytes()[2] {
        b'S' | b'W' => -1.0,
        _ => 1.0,
    };

    let decimal = sign * degrees + minutes / 60.0;
    Ok(format!("{:.2}", decimal as f32))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds an 83-character record with the fields in their real columns.
    fn record(state: &str, city: &str, id: &str, lat: &str, lon: &str) -> String {
        let line = format!(
            "{:<2} {:<16} {:<4}{:<15}{:<7} {:<7}{:<29}",
            state, city, id, "", lat, lon, ""
        );
        assert_eq!(line.len(), 83);
        line
    }

    #[test]
    fn test_degrees_to_decimal_north() {
        assert_eq!(degrees_to_decimal("39 51N").unwrap(), "39.85");
    }

    #[test]
    fn test_degrees_to_decimal_west_is_negative() {
        assert_eq!(degrees_to_decimal("104 39W").unwrap(), "-103.35");
    }

    #[test]
    fn test_degrees_to_decimal_trailing_padding() {
        assert_eq!(degrees_to_decimal("39 51N ").unwrap(), "39.85");
    }

    #[test]
    fn test_degrees_to_decimal_garbage() {
        assert!(degrees_to_decimal("").is_err());
        assert!(degrees_to_decimal("39").is_err());
        assert!(degrees_to_decimal("xx yyN").is_err());
    }

    #[test]
    fn test_parse_full_record() {
        let line = record("CO", "DENVER", "KDEN", "39 51N", "104 39W");
        let station = parse_line(&line).unwrap().unwrap();
        assert_eq!(station.id, "KDEN");
        assert_eq!(station.state, "CO");
        assert_eq!(station.city, "Denver");
        assert_eq!(station.latitude, "39.85");
        assert_eq!(station.longitude, "-103.35");
    }

    #[test]
    fn test_city_is_title_cased() {
        let line = record("NY", "NEW YORK CITY", "KNYC", "40 46N", "073 58W");
        let station = parse_line(&line).unwrap().unwrap();
        assert_eq!(station.city, "New York City");
    }

    #[test]
    fn test_skips_wrong_width_comment_and_blank() {
        assert!(parse_line("short line").unwrap().is_none());
        assert!(parse_line(&format!("!{:<82}", "comment")).unwrap().is_none());
        assert!(parse_line(&" ".repeat(83)).unwrap().is_none());
    }

    #[test]
    fn test_skips_header_row() {
        let line = record("CD", "STATION", "ICAO", "00 00N", "000 00W");
        assert!(parse_line(&line).unwrap().is_none());
    }

    #[test]
    fn test_skips_record_without_station_id() {
        let line = record("CO", "DENVER", "", "39 51N", "104 39W");
        assert!(parse_line(&line).unwrap().is_none());
    }

    #[test]
    fn test_convert_emits_js_table() {
        let input = [
            record("CO", "DENVER", "KDEN", "39 51N", "104 39W"),
            "! a comment line".to_string(),
            record("NY", "NEW YORK CITY", "KNYC", "40 46N", "073 58W"),
        ]
        .join("\n");

        let mut out = Vec::new();
        let count = convert(input.as_bytes(), &mut out).unwrap();
        let js = String::from_utf8(out).unwrap();

        assert_eq!(count, 2);
        assert!(js.starts_with("var _StationInfo = {"));
        assert!(js.ends_with("}"));
        assert!(js.contains(r#"KDEN:{"StationId":"KDEN","City":"Denver","State":"CO","Latitude":"39.85","Longitude":"-103.35"},"#));
        assert!(js.contains(r#"KNYC:{"#));
    }
}
