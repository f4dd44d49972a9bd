use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::angle::Dimension;
use super::coords::SkyCoord;
use crate::error::{IrsaError, Result};

/// Search shape understood by the Gator `spatial` parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Spatial {
    Cone,
    Box,
    Polygon,
    #[serde(rename = "All-Sky")]
    AllSky,
}

impl Spatial {
    pub const ALL: [Spatial; 4] = [Spatial::Cone, Spatial::Box, Spatial::Polygon, Spatial::AllSky];

    /// Value sent on the wire; all-sky searches are spelled `NONE`
    pub fn as_param(&self) -> &'static str {
        match self {
            Spatial::Cone => "Cone",
            Spatial::Box => "Box",
            Spatial::Polygon => "Polygon",
            Spatial::AllSky => "NONE",
        }
    }

    /// Name users type to select this shape
    pub fn as_str(&self) -> &'static str {
        match self {
            Spatial::AllSky => "All-Sky",
            other => other.as_param(),
        }
    }
}

impl fmt::Display for Spatial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Spatial {
    type Err = IrsaError;

    /// Matching is exact: `cone` or `All-sky` are rejected.
    fn from_str(s: &str) -> Result<Self> {
        Spatial::ALL
            .into_iter()
            .find(|shape| shape.as_str() == s)
            .ok_or_else(|| IrsaError::InvalidSpatial { value: s.to_string() })
    }
}

/// A polygon corner: a sky position, or a bare (lon, lat) pair read as ICRS
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolygonVertex {
    Sky(SkyCoord),
    Pair(Dimension, Dimension),
}

impl From<SkyCoord> for PolygonVertex {
    fn from(coord: SkyCoord) -> Self {
        PolygonVertex::Sky(coord)
    }
}

impl From<(Dimension, Dimension)> for PolygonVertex {
    fn from((lon, lat): (Dimension, Dimension)) -> Self {
        PolygonVertex::Pair(lon, lat)
    }
}

impl From<(f64, f64)> for PolygonVertex {
    fn from((lon, lat): (f64, f64)) -> Self {
        PolygonVertex::Pair(Dimension::deg(lon), Dimension::deg(lat))
    }
}

impl FromStr for PolygonVertex {
    type Err = IrsaError;

    /// Vertex strings are read as ICRS positions
    fn from_str(s: &str) -> Result<Self> {
        s.parse::<SkyCoord>().map(PolygonVertex::Sky)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_shapes() {
        assert_eq!("Cone".parse::<Spatial>().unwrap(), Spatial::Cone);
        assert_eq!("Box".parse::<Spatial>().unwrap(), Spatial::Box);
        assert_eq!("Polygon".parse::<Spatial>().unwrap(), Spatial::Polygon);
        assert_eq!("All-Sky".parse::<Spatial>().unwrap(), Spatial::AllSky);
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(Spatial::Cone.as_param(), "Cone");
        assert_eq!(Spatial::AllSky.as_param(), "NONE");
        assert_eq!(Spatial::AllSky.to_string(), "All-Sky");
    }

    #[test]
    fn test_shape_matching_is_case_sensitive() {
        for bad in ["cone", "box", "polygon", "all-Sky", "All-sky", "invalid", "blah", ""] {
            let err = bad.parse::<Spatial>().unwrap_err();
            assert!(matches!(err, IrsaError::InvalidSpatial { .. }), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_vertex_from_string() {
        let vertex: PolygonVertex = "10.1 +10.1".parse().unwrap();
        assert_eq!(vertex, PolygonVertex::Sky(SkyCoord::icrs(10.1, 10.1)));

        assert!("10.1".parse::<PolygonVertex>().is_err());
    }
}
