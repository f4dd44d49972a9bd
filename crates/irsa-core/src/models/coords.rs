use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::angle::{parse_angle, parse_ra, Dimension};
use crate::error::{IrsaError, Result};

/// ICRS to Galactic rotation (Hipparcos definition).
///
/// Rows map an ICRS unit vector onto the Galactic axes; the transpose maps back.
const ICRS_TO_GALACTIC: [[f64; 3]; 3] = [
    [-0.054_875_560_416_215_4, -0.873_437_090_234_885_0, -0.483_835_015_548_713_2],
    [0.494_109_427_875_583_7, -0.444_829_629_960_011_2, 0.746_982_244_497_218_9],
    [-0.867_666_149_019_004_7, -0.198_076_373_431_201_5, 0.455_983_776_175_066_9],
];

/// Celestial reference frame of a [`SkyCoord`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frame {
    Icrs,
    Galactic,
}

impl FromStr for Frame {
    type Err = IrsaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "icrs" | "equatorial" | "j2000" => Ok(Frame::Icrs),
            "galactic" | "gal" => Ok(Frame::Galactic),
            _ => Err(IrsaError::CoordinateParse {
                input: s.to_string(),
                reason: "unknown frame, use icrs or galactic".to_string(),
            }),
        }
    }
}

/// A position on the sky, longitude and latitude in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkyCoord {
    pub lon: f64,
    pub lat: f64,
    pub frame: Frame,
}

impl SkyCoord {
    /// Equatorial position from right ascension and declination
    pub fn icrs(ra: f64, dec: f64) -> Self {
        Self { lon: ra, lat: dec, frame: Frame::Icrs }
    }

    /// Galactic position from longitude `l` and latitude `b`
    pub fn galactic(l: f64, b: f64) -> Self {
        Self { lon: l, lat: b, frame: Frame::Galactic }
    }

    pub fn from_dimensions(lon: Dimension, lat: Dimension, frame: Frame) -> Self {
        Self { lon: lon.degrees(), lat: lat.degrees(), frame }
    }

    /// Parse `"<lon> <lat>"` in the given frame.
    ///
    /// Accepts two whitespace or comma separated angles (`10.68 41.27`,
    /// `00h42m44.3s +41d16m07.5s`, `0:42:44.3 +41:16:07.5`) or six bare
    /// sexagesimal components (`0 42 44.3 +41 16 7.5`). Colon and bare
    /// sexagesimal longitudes are read as hours in ICRS and as degrees
    /// otherwise.
    pub fn parse_in(s: &str, frame: Frame) -> Result<Self> {
        let parts: Vec<&str> =
            s.split(|c: char| c.is_whitespace() || c == ',').filter(|p| !p.is_empty()).collect();

        let (lon_text, lat_text) = match parts.len() {
            2 => (parts[0].to_string(), parts[1].to_string()),
            6 => (parts[..3].join(":"), parts[3..].join(":")),
            _ => {
                return Err(IrsaError::CoordinateParse {
                    input: s.to_string(),
                    reason: "expected a longitude and a latitude".to_string(),
                })
            }
        };

        let parse_lon = if frame == Frame::Icrs { parse_ra } else { parse_angle };
        let lon = parse_lon(&lon_text).map_err(|e| IrsaError::CoordinateParse {
            input: s.to_string(),
            reason: e.to_string(),
        })?;
        let lat = parse_angle(&lat_text).map_err(|e| IrsaError::CoordinateParse {
            input: s.to_string(),
            reason: e.to_string(),
        })?;

        let coord = Self::from_dimensions(lon, lat, frame);
        if !(-90.0..=90.0).contains(&coord.lat) {
            return Err(IrsaError::CoordinateParse {
                input: s.to_string(),
                reason: format!("latitude {} is outside [-90, 90]", coord.lat),
            });
        }
        Ok(coord)
    }

    /// The same position expressed in ICRS
    pub fn to_icrs(&self) -> SkyCoord {
        match self.frame {
            Frame::Icrs => *self,
            Frame::Galactic => {
                let g = unit_vector(self.lon, self.lat);
                let mut v = [0.0; 3];
                for (i, out) in v.iter_mut().enumerate() {
                    *out = (0..3).map(|j| ICRS_TO_GALACTIC[j][i] * g[j]).sum();
                }
                let (ra, dec) = spherical(v);
                SkyCoord::icrs(ra, dec)
            }
        }
    }

    /// The same position expressed in Galactic coordinates
    pub fn to_galactic(&self) -> SkyCoord {
        match self.frame {
            Frame::Galactic => *self,
            Frame::Icrs => {
                let e = unit_vector(self.lon, self.lat);
                let mut v = [0.0; 3];
                for (i, out) in v.iter_mut().enumerate() {
                    *out = (0..3).map(|j| ICRS_TO_GALACTIC[i][j] * e[j]).sum();
                }
                let (l, b) = spherical(v);
                SkyCoord::galactic(l, b)
            }
        }
    }
}

impl FromStr for SkyCoord {
    type Err = IrsaError;

    /// Strings are interpreted as ICRS
    fn from_str(s: &str) -> Result<Self> {
        SkyCoord::parse_in(s, Frame::Icrs)
    }
}

fn unit_vector(lon_deg: f64, lat_deg: f64) -> [f64; 3] {
    let (lon, lat) = (lon_deg.to_radians(), lat_deg.to_radians());
    [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
}

fn spherical(v: [f64; 3]) -> (f64, f64) {
    let lon = v[1].atan2(v[0]).to_degrees().rem_euclid(360.0);
    let lat = v[2].clamp(-1.0, 1.0).asin().to_degrees();
    (lon, lat)
}

/// Search center: either a sky position or an object name resolved by IRSA
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Coordinates {
    Sky(SkyCoord),
    Name(String),
}

impl Coordinates {
    /// Classify user input: anything that parses as a position is one,
    /// everything else is passed to IRSA as an object name.
    pub fn parse(s: &str) -> Self {
        match s.parse::<SkyCoord>() {
            Ok(coord) => Coordinates::Sky(coord),
            Err(_) => Coordinates::Name(s.trim().to_string()),
        }
    }

    pub fn is_sky(&self) -> bool {
        matches!(self, Coordinates::Sky(_))
    }
}

impl From<SkyCoord> for Coordinates {
    fn from(coord: SkyCoord) -> Self {
        Coordinates::Sky(coord)
    }
}

impl From<&str> for Coordinates {
    fn from(s: &str) -> Self {
        Coordinates::parse(s)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coordinates::Sky(c) => write!(f, "{} {} ({:?})", c.lon, c.lat, c.frame),
            Coordinates::Name(name) => f.write_str(name),
        }
    }
}
