//! Gator request payload construction
//!
//! A [`RegionQuery`] describes what the caller wants; [`parse_spatial`] and
//! [`args_to_payload`] turn it into the flat parameter set of a
//! [`QueryPayload`].

use serde::Serialize;

use crate::error::{IrsaError, Result};
use crate::models::{AngleUnit, Coordinates, Dimension, PolygonVertex, Spatial};
use crate::parse::{format_objstr, format_vertex, parse_dimension, AngleInput, DecimalDegrees};

/// `outfmt` value selecting VOTable output
pub const OUTFMT_VOTABLE: u8 = 3;

/// Default cone radius
pub const DEFAULT_RADIUS: Dimension = Dimension { value: 10.0, unit: AngleUnit::Arcsec };

/// Spatial constraint parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SpatialParams {
    pub spatial: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub objstr: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub radunits: Option<AngleUnit>,

    /// Box edge in arcsec
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub polygon: Option<String>,
}

/// Full parameter set of one Gator query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryPayload {
    pub catalog: String,
    pub outfmt: u8,
    pub outrows: usize,
    pub selcols: String,

    #[serde(flatten)]
    pub spatial: Option<SpatialParams>,
}

impl QueryPayload {
    pub fn with_spatial(mut self, spatial: SpatialParams) -> Self {
        self.spatial = Some(spatial);
        self
    }

    /// Query-string pairs in a stable order
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("catalog", self.catalog.clone()),
            ("outfmt", self.outfmt.to_string()),
            ("outrows", self.outrows.to_string()),
            ("selcols", self.selcols.clone()),
        ];

        if let Some(ref spatial) = self.spatial {
            params.push(("spatial", spatial.spatial.clone()));
            if let Some(ref objstr) = spatial.objstr {
                params.push(("objstr", objstr.clone()));
            }
            if let Some(radius) = spatial.radius {
                params.push(("radius", radius.to_decimal_string()));
            }
            if let Some(radunits) = spatial.radunits {
                params.push(("radunits", radunits.to_string()));
            }
            if let Some(size) = spatial.size {
                params.push(("size", size.to_decimal_string()));
            }
            if let Some(ref polygon) = spatial.polygon {
                params.push(("polygon", polygon.clone()));
            }
        }

        params
    }

    /// Look up one parameter by name
    pub fn get(&self, key: &str) -> Option<String> {
        self.to_params().into_iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }
}

/// Base payload: catalog, VOTable output, row limit and column selection
pub fn args_to_payload(catalog: &str, selcols: Option<&str>, row_limit: usize) -> QueryPayload {
    QueryPayload {
        catalog: catalog.to_string(),
        outfmt: OUTFMT_VOTABLE,
        outrows: row_limit,
        selcols: selcols.unwrap_or_default().to_string(),
        spatial: None,
    }
}

/// Build the spatial part of a payload.
///
/// `spatial` must be exactly `Cone`, `Box`, `Polygon` or `All-Sky`.
pub fn parse_spatial(
    spatial: &str,
    coordinates: Option<&Coordinates>,
    radius: Option<&AngleInput>,
    width: Option<&AngleInput>,
    polygon: &[PolygonVertex],
) -> Result<SpatialParams> {
    let shape: Spatial = spatial.parse()?;
    let mut params = SpatialParams { spatial: shape.as_param().to_string(), ..Default::default() };

    match shape {
        Spatial::AllSky => {}
        Spatial::Cone | Spatial::Box => {
            let coordinates = coordinates.ok_or_else(|| {
                IrsaError::invalid_query(format!("{} search needs coordinates", shape))
            })?;
            params.objstr = Some(format_objstr(coordinates));

            if shape == Spatial::Cone {
                let radius = match radius {
                    Some(r) => parse_dimension(r.clone())?,
                    None => DEFAULT_RADIUS,
                };
                params.radius = Some(radius.value);
                params.radunits = Some(radius.unit);
            } else {
                let width = width
                    .ok_or_else(|| IrsaError::invalid_query("Box search needs a width"))?;
                let width = parse_dimension(width.clone())?;
                params.size = Some(width.to(AngleUnit::Arcsec).value);
            }
        }
        Spatial::Polygon => {
            if polygon.len() < 3 {
                return Err(IrsaError::invalid_query(format!(
                    "Polygon search needs at least 3 vertices, got {}",
                    polygon.len()
                )));
            }
            params.objstr = coordinates.map(format_objstr);
            params.polygon =
                Some(polygon.iter().map(format_vertex).collect::<Vec<_>>().join(","));
        }
    }

    Ok(params)
}

/// A region search against one catalog
#[derive(Debug, Clone)]
pub struct RegionQuery {
    pub catalog: String,
    pub spatial: String,
    pub coordinates: Option<Coordinates>,
    pub radius: AngleInput,
    pub width: Option<AngleInput>,
    pub polygon: Vec<PolygonVertex>,
    pub selcols: Option<String>,
}

impl RegionQuery {
    /// Cone search with the default 10 arcsec radius
    pub fn new(catalog: impl Into<String>) -> Self {
        Self {
            catalog: catalog.into(),
            spatial: Spatial::Cone.as_str().to_string(),
            coordinates: None,
            radius: AngleInput::Quantity(DEFAULT_RADIUS),
            width: None,
            polygon: Vec::new(),
            selcols: None,
        }
    }

    pub fn with_spatial(mut self, spatial: impl Into<String>) -> Self {
        self.spatial = spatial.into();
        self
    }

    pub fn with_coordinates(mut self, coordinates: impl Into<Coordinates>) -> Self {
        self.coordinates = Some(coordinates.into());
        self
    }

    pub fn with_radius(mut self, radius: impl Into<AngleInput>) -> Self {
        self.radius = radius.into();
        self
    }

    pub fn with_width(mut self, width: impl Into<AngleInput>) -> Self {
        self.width = Some(width.into());
        self
    }

    pub fn with_polygon<V: Into<PolygonVertex>>(mut self, vertices: impl IntoIterator<Item = V>) -> Self {
        self.polygon = vertices.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_selcols(mut self, selcols: impl Into<String>) -> Self {
        self.selcols = Some(selcols.into());
        self
    }

    /// Complete payload for this query
    pub fn to_payload(&self, row_limit: usize) -> Result<QueryPayload> {
        if self.catalog.trim().is_empty() {
            return Err(IrsaError::invalid_query("Catalog name is required!"));
        }

        let spatial = parse_spatial(
            &self.spatial,
            self.coordinates.as_ref(),
            Some(&self.radius),
            self.width.as_ref(),
            &self.polygon,
        )?;

        Ok(args_to_payload(&self.catalog, self.selcols.as_deref(), row_limit).with_spatial(spatial))
    }
}
