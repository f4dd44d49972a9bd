//! Angular quantities and their string forms.
//!
//! A [`Dimension`] is a value paired with an [`AngleUnit`]. Strings are parsed
//! with [`parse_angle`], which accepts the notations IRSA users tend to type:
//!
//! ```text
//! Decimal with unit:  2arcmin  0.3 rad  10"  1.5'  5h  12.5
//! Letter markers:     5h0m0s   00h42m44.330s   +41d16m07.50s   -5d30m
//! Colon-separated:    45:30:15 (degrees)
//! ```
//!
//! A bare decimal is taken to be degrees.

use crate::error::{IrsaError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Units an angular dimension can be expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleUnit {
    Arcsec,
    Arcmin,
    Deg,
    Rad,
    /// Hour angle, 1h = 15 degrees
    Hour,
}

impl AngleUnit {
    /// How many degrees one of this unit spans
    pub fn degrees_per_unit(&self) -> f64 {
        match self {
            AngleUnit::Arcsec => 1.0 / 3600.0,
            AngleUnit::Arcmin => 1.0 / 60.0,
            AngleUnit::Deg => 1.0,
            AngleUnit::Rad => 180.0 / PI,
            AngleUnit::Hour => 15.0,
        }
    }

    /// Units the Gator service accepts for `radunits`
    pub fn is_sky_unit(&self) -> bool {
        matches!(self, AngleUnit::Arcsec | AngleUnit::Arcmin | AngleUnit::Deg)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AngleUnit::Arcsec => "arcsec",
            AngleUnit::Arcmin => "arcmin",
            AngleUnit::Deg => "deg",
            AngleUnit::Rad => "rad",
            AngleUnit::Hour => "hourangle",
        }
    }
}

impl fmt::Display for AngleUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AngleUnit {
    type Err = IrsaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "arcsec" | "arcsecond" | "arcseconds" | "asec" | "\"" | "''" => Ok(AngleUnit::Arcsec),
            "arcmin" | "arcminute" | "arcminutes" | "amin" | "'" => Ok(AngleUnit::Arcmin),
            "deg" | "degree" | "degrees" | "d" | "°" => Ok(AngleUnit::Deg),
            "rad" | "radian" | "radians" => Ok(AngleUnit::Rad),
            "h" | "hr" | "hour" | "hours" | "hourangle" => Ok(AngleUnit::Hour),
            _ => Err(IrsaError::Units { input: s.to_string() }),
        }
    }
}

/// An angular size or position component with its unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub value: f64,
    pub unit: AngleUnit,
}

impl Dimension {
    pub fn new(value: f64, unit: AngleUnit) -> Self {
        Self { value, unit }
    }

    pub fn arcsec(value: f64) -> Self {
        Self::new(value, AngleUnit::Arcsec)
    }

    pub fn arcmin(value: f64) -> Self {
        Self::new(value, AngleUnit::Arcmin)
    }

    pub fn deg(value: f64) -> Self {
        Self::new(value, AngleUnit::Deg)
    }

    pub fn rad(value: f64) -> Self {
        Self::new(value, AngleUnit::Rad)
    }

    pub fn hours(value: f64) -> Self {
        Self::new(value, AngleUnit::Hour)
    }

    /// Value in decimal degrees
    pub fn degrees(&self) -> f64 {
        self.value * self.unit.degrees_per_unit()
    }

    /// Convert to another unit
    pub fn to(&self, unit: AngleUnit) -> Dimension {
        if unit == self.unit {
            return *self;
        }
        Dimension::new(self.degrees() / unit.degrees_per_unit(), unit)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}

impl FromStr for Dimension {
    type Err = IrsaError;

    fn from_str(s: &str) -> Result<Self> {
        parse_angle(s)
    }
}

static DECIMAL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?x)
        ^\s*
        ([+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)   # value
        \s*
        ([a-zA-Z°"']*)                                # optional unit suffix
        \s*$
        "#,
    )
    .expect("decimal angle regex is valid")
});

static SEXAGESIMAL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?xi)
        ^
        ([+-])?                          # sign applies to the whole angle
        (\d+(?:\.\d*)?)                  # hours or degrees
        ([hd])                           # marker picks HMS or DMS
        (?:(\d+(?:\.\d*)?)(?:m|$))?      # minutes, marker optional when last
        (?:(\d+(?:\.\d*)?)s?)?           # seconds, trailing marker optional
        $
        "#,
    )
    .expect("sexagesimal regex is valid")
});

static COLON_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^([+-])?(\d+):(\d{1,2}):(\d{1,2}(?:\.\d*)?)$"#).expect("colon regex is valid")
});

/// Parse an angle, treating colon-separated values as degrees.
pub fn parse_angle(s: &str) -> Result<Dimension> {
    parse_with_colon_unit(s, AngleUnit::Deg)
}

/// Parse a longitude-like angle, treating colon-separated values as hours.
///
/// Right ascension written `12:34:56` is conventionally in hours.
pub fn parse_ra(s: &str) -> Result<Dimension> {
    parse_with_colon_unit(s, AngleUnit::Hour)
}

fn parse_with_colon_unit(s: &str, colon_unit: AngleUnit) -> Result<Dimension> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(IrsaError::Units { input: s.to_string() });
    }

    if let Some(caps) = DECIMAL_REGEX.captures(trimmed) {
        let value: f64 = caps[1].parse().map_err(|_| IrsaError::Units { input: s.to_string() })?;
        let unit = match caps.get(2).map(|m| m.as_str()) {
            Some(suffix) if !suffix.is_empty() => suffix.parse()?,
            _ => AngleUnit::Deg,
        };
        return Ok(Dimension::new(value, unit));
    }

    let compact = normalize_sexagesimal(trimmed);

    if let Some(caps) = COLON_REGEX.captures(&compact) {
        let total = sexagesimal_total(&caps, s)?;
        return Ok(Dimension::new(total, colon_unit));
    }

    if let Some(caps) = SEXAGESIMAL_REGEX.captures(&compact) {
        let unit = if caps[3].eq_ignore_ascii_case("h") { AngleUnit::Hour } else { AngleUnit::Deg };
        let sign = sign_of(caps.get(1).map(|m| m.as_str()));
        let whole = parse_component(caps.get(2).map(|m| m.as_str()), s)?;
        let minutes = parse_component(caps.get(4).map(|m| m.as_str()), s)?;
        let seconds = parse_component(caps.get(5).map(|m| m.as_str()), s)?;
        check_sexagesimal_range(minutes, seconds, s)?;
        return Ok(Dimension::new(sign * (whole + minutes / 60.0 + seconds / 3600.0), unit));
    }

    Err(IrsaError::Units { input: s.to_string() })
}

fn sexagesimal_total(caps: &regex::Captures, original: &str) -> Result<f64> {
    let sign = sign_of(caps.get(1).map(|m| m.as_str()));
    let whole = parse_component(caps.get(2).map(|m| m.as_str()), original)?;
    let minutes = parse_component(caps.get(3).map(|m| m.as_str()), original)?;
    let seconds = parse_component(caps.get(4).map(|m| m.as_str()), original)?;
    check_sexagesimal_range(minutes, seconds, original)?;
    Ok(sign * (whole + minutes / 60.0 + seconds / 3600.0))
}

/// Minutes and seconds must each be below 60
fn check_sexagesimal_range(minutes: f64, seconds: f64, original: &str) -> Result<()> {
    if minutes >= 60.0 || seconds >= 60.0 {
        return Err(IrsaError::Units { input: original.to_string() });
    }
    Ok(())
}

fn sign_of(sign: Option<&str>) -> f64 {
    if sign == Some("-") {
        -1.0
    } else {
        1.0
    }
}

fn parse_component(component: Option<&str>, original: &str) -> Result<f64> {
    match component {
        None => Ok(0.0),
        Some(text) => text.parse().map_err(|_| IrsaError::Units { input: original.to_string() }),
    }
}

/// Collapse whitespace and symbol markers so `41° 16′ 07.5″` reads as `41d16m07.5s`
fn normalize_sexagesimal(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '°' => 'd',
            '\'' | '′' => 'm',
            '"' | '″' => 's',
            other => other,
        })
        .collect()
}
