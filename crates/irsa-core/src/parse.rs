//! Conversions from user-facing angles and positions to Gator parameter text

use crate::error::{IrsaError, Result};
use crate::models::angle::parse_angle;
use crate::models::{AngleUnit, Coordinates, Dimension, PolygonVertex, SkyCoord};

/// An angular size as given by a caller: a typed quantity or free text
#[derive(Debug, Clone, PartialEq)]
pub enum AngleInput {
    Quantity(Dimension),
    Text(String),
}

impl From<Dimension> for AngleInput {
    fn from(dim: Dimension) -> Self {
        AngleInput::Quantity(dim)
    }
}

impl From<&str> for AngleInput {
    fn from(s: &str) -> Self {
        AngleInput::Text(s.to_string())
    }
}

impl From<String> for AngleInput {
    fn from(s: String) -> Self {
        AngleInput::Text(s)
    }
}

/// Normalize a dimension to a unit Gator accepts: arcsec, arcmin or deg.
///
/// Quantities already in one of those units pass through unchanged, other
/// angular units are converted to degrees. Text is parsed as an angle and
/// always comes back in degrees.
pub fn parse_dimension(dim: impl Into<AngleInput>) -> Result<Dimension> {
    match dim.into() {
        AngleInput::Quantity(q) if q.unit.is_sky_unit() => Ok(q),
        AngleInput::Quantity(q) => Ok(q.to(AngleUnit::Deg)),
        AngleInput::Text(text) => parse_angle(&text)
            .map(|angle| angle.to(AngleUnit::Deg))
            .map_err(|_| IrsaError::Units { input: text }),
    }
}

/// Numbers that can be written in decimal-degree form.
///
/// Integers print bare and floats always carry a fractional digit, so
/// `10` renders `10` and `10.0` renders `10.0`.
pub trait DecimalDegrees {
    fn to_decimal_string(&self) -> String;
}

impl DecimalDegrees for f64 {
    fn to_decimal_string(&self) -> String {
        if self.is_finite() && self.fract() == 0.0 && self.abs() < 1e16 {
            format!("{:.1}", self)
        } else {
            format!("{}", self)
        }
    }
}

impl DecimalDegrees for f32 {
    fn to_decimal_string(&self) -> String {
        f64::from(*self).to_decimal_string()
    }
}

macro_rules! integer_decimal_degrees {
    ($($t:ty),*) => {
        $(impl DecimalDegrees for $t {
            fn to_decimal_string(&self) -> String {
                self.to_string()
            }
        })*
    };
}

integer_decimal_degrees!(i32, i64, u32, u64);

/// Render decimal RA/Dec the way Gator parses them: `"<ra> <signed dec>"`
pub fn format_decimal_coords<R: DecimalDegrees, D: DecimalDegrees>(ra: R, dec: D) -> String {
    let dec = dec.to_decimal_string();
    if dec.starts_with('-') || dec.starts_with('+') {
        format!("{} {}", ra.to_decimal_string(), dec)
    } else {
        format!("{} +{}", ra.to_decimal_string(), dec)
    }
}

/// Render a sky position in ICRS decimal degrees
pub fn format_coordinates(coord: &SkyCoord) -> String {
    let icrs = coord.to_icrs();
    format_decimal_coords(icrs.lon, icrs.lat)
}

/// Parse a coordinate string as ICRS and render it for Gator
pub fn parse_coordinates(coordinates: &str) -> Result<String> {
    let coord: SkyCoord = coordinates.parse()?;
    Ok(format_coordinates(&coord))
}

/// Whether the string reads as a sky position rather than an object name
pub fn is_coordinate(s: &str) -> bool {
    s.parse::<SkyCoord>().is_ok()
}

/// Decimal degrees of a (lon, lat) pair
pub fn pair_to_deg(lon: Dimension, lat: Dimension) -> (f64, f64) {
    (lon.degrees(), lat.degrees())
}

/// Value of the `objstr` parameter
pub fn format_objstr(coordinates: &Coordinates) -> String {
    match coordinates {
        Coordinates::Sky(coord) => format_coordinates(coord),
        Coordinates::Name(name) => name.clone(),
    }
}

/// Render one polygon corner as `"<ra> <signed dec>"`
pub fn format_vertex(vertex: &PolygonVertex) -> String {
    match vertex {
        PolygonVertex::Sky(coord) => format_coordinates(coord),
        PolygonVertex::Pair(lon, lat) => {
            let (ra, dec) = pair_to_deg(*lon, *lat);
            format_decimal_coords(ra, dec)
        }
    }
}
