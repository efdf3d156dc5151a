// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! LOC rdata (RFC 1876).
//!
//! Input accepts the usual presentation shorthand: minutes and seconds may be
//! omitted, the `m` unit suffix is optional, and size and precisions default
//! to 1m, 10000m and 10m. Output always carries every field, seconds with
//! three decimals and the metric fields with two decimals and an `m` suffix,
//! so equivalent spellings encode to the same token.

use super::{number, FieldResult};
use crate::constants::{
    LOC_DEFAULT_HORIZ_PRECISION_METERS, LOC_DEFAULT_SIZE_METERS, LOC_DEFAULT_VERT_PRECISION_METERS,
};
use crate::recordset::RecordData;

/// Lowest altitude representable on the wire (meters)
const MIN_ALTITUDE: f64 = -100_000.0;
/// Highest altitude representable on the wire (meters)
const MAX_ALTITUDE: f64 = 42_849_672.95;
/// Largest size or precision representable on the wire (meters)
const MAX_METRIC: f64 = 90_000_000.0;

struct Coordinate {
    degrees: u32,
    minutes: u32,
    /// Seconds in thousandths, always below 60 000.
    millis: u32,
    hemisphere: char,
}

impl Coordinate {
    fn render(&self) -> String {
        format!(
            "{} {} {}.{:03} {}",
            self.degrees,
            self.minutes,
            self.millis / 1000,
            self.millis % 1000,
            self.hemisphere
        )
    }
}

/// Rounds seconds to milliseconds, carrying a rounded-up 60.000 into the
/// minutes and degrees.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_seconds(degrees: u32, minutes: u32, seconds: f64) -> (u32, u32, u32) {
    // seconds is already checked to lie in [0, 60)
    let mut millis = (seconds * 1000.0).round() as u32;
    let (mut degrees, mut minutes) = (degrees, minutes);
    if millis >= 60_000 {
        millis -= 60_000;
        minutes += 1;
    }
    if minutes >= 60 {
        minutes -= 60;
        degrees += 1;
    }
    (degrees, minutes, millis)
}

/// Consumes `d [m [s]] H` from the front of `fields`.
fn coordinate<'a>(
    fields: &mut impl Iterator<Item = &'a str>,
    hemispheres: [char; 2],
    max_degrees: u32,
) -> FieldResult<Coordinate> {
    let mut numbers = Vec::with_capacity(3);
    let hemisphere = loop {
        let field = fields
            .next()
            .ok_or_else(|| format!("missing hemisphere {}/{}", hemispheres[0], hemispheres[1]))?;
        let upper = field.to_ascii_uppercase();
        if let Some(h) = hemispheres.iter().find(|h| upper == h.to_string()) {
            break *h;
        }
        if numbers.len() == 3 {
            return Err(format!("unexpected field '{field}' in coordinate"));
        }
        numbers.push(field);
    };

    let degrees: u32 = match numbers.first() {
        Some(d) => number(d, "LOC degrees")?,
        None => return Err("LOC coordinate needs degrees".to_string()),
    };
    let minutes: u32 = numbers.get(1).map_or(Ok(0), |m| number(m, "LOC minutes"))?;
    let seconds: f64 = numbers.get(2).map_or(Ok(0.0), |s| number(s, "LOC seconds"))?;

    if degrees > max_degrees {
        return Err(format!("LOC degrees {degrees} exceed {max_degrees}"));
    }
    if minutes >= 60 {
        return Err(format!("LOC minutes {minutes} must be below 60"));
    }
    if !(0.0..60.0).contains(&seconds) {
        return Err(format!("LOC seconds {seconds} must be in [0, 60)"));
    }
    let (degrees, minutes, millis) = round_seconds(degrees, minutes, seconds);
    if degrees > max_degrees || (degrees == max_degrees && (minutes > 0 || millis > 0)) {
        return Err(format!("LOC coordinate exceeds {max_degrees} degrees"));
    }
    Ok(Coordinate {
        degrees,
        minutes,
        millis,
        hemisphere,
    })
}

fn meters(field: Option<&str>, default: f64, what: &str, range: (f64, f64)) -> FieldResult<f64> {
    let value = match field {
        Some(f) => number::<f64>(f.strip_suffix(['m', 'M']).unwrap_or(f), what)?,
        None => default,
    };
    if !(range.0..=range.1).contains(&value) {
        return Err(format!("{what} {value} is out of range"));
    }
    Ok(value)
}

/// Normalizes one LOC presentation string.
fn normalize(value: &str) -> FieldResult<String> {
    let mut fields = value.split_whitespace();
    let latitude = coordinate(&mut fields, ['N', 'S'], 90)?;
    let longitude = coordinate(&mut fields, ['E', 'W'], 180)?;

    let altitude = meters(
        Some(fields.next().ok_or("LOC altitude is required")?),
        0.0,
        "LOC altitude",
        (MIN_ALTITUDE, MAX_ALTITUDE),
    )?;
    let size = meters(fields.next(), LOC_DEFAULT_SIZE_METERS, "LOC size", (0.0, MAX_METRIC))?;
    let horizontal = meters(
        fields.next(),
        LOC_DEFAULT_HORIZ_PRECISION_METERS,
        "LOC horizontal precision",
        (0.0, MAX_METRIC),
    )?;
    let vertical = meters(
        fields.next(),
        LOC_DEFAULT_VERT_PRECISION_METERS,
        "LOC vertical precision",
        (0.0, MAX_METRIC),
    )?;
    if let Some(extra) = fields.next() {
        return Err(format!("unexpected trailing LOC field '{extra}'"));
    }

    Ok(format!(
        "{} {} {altitude:.2}m {size:.2}m {horizontal:.2}m {vertical:.2}m",
        latitude.render(),
        longitude.render()
    ))
}

pub(crate) fn encode(targets: &[String]) -> FieldResult<Vec<String>> {
    targets.iter().map(|t| normalize(t)).collect()
}

pub(crate) fn decode(rdata: &[String]) -> FieldResult<RecordData> {
    Ok(RecordData::LOC {
        target: encode(rdata)?,
    })
}

#[cfg(test)]
#[path = "loc_tests.rs"]
mod loc_tests;
