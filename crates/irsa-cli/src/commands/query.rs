//! Query command implementation

use crate::cli::QueryArgs;
use crate::errors;
use crate::output::OutputWriter;
use crate::output_types::{PayloadOutput, QueryOutput};
use anyhow::{Context, Result};
use irsa_core::config::LayeredConfig;
use irsa_core::models::{Coordinates, Frame, PolygonVertex, SkyCoord, Spatial};
use irsa_core::payload::RegionQuery;
use irsa_core::IrsaClient;

pub fn execute(args: QueryArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let query = build_query(&args)?;
    let client = IrsaClient::from_config(config).context("Failed to create IRSA client")?;

    if args.payload {
        let payload = client.query_region_payload(&query)?;
        let params = payload
            .to_params()
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect();
        let payload_output = PayloadOutput { server: client.server().to_string(), params };

        if output.is_json() {
            output.result(payload_output)?;
        } else {
            output.section("Request Parameters");
            output.kv("URL", &payload_output.server);
            for (key, value) in &payload_output.params {
                output.kv(key, value);
            }
        }
        return Ok(());
    }

    let table = client
        .query_region(&query)
        .with_context(|| format!("Query of catalog '{}' failed", args.catalog))?;

    if output.is_json() {
        output.result(QueryOutput::from_table(&args.catalog, &table))?;
    } else {
        output.section(format!("{} ({} rows)", args.catalog, table.len()));
        output.catalog_table(&table);
        if table.len() >= client.row_limit() {
            output.warning(format!(
                "Result reached the row limit of {}; more rows may match",
                client.row_limit()
            ));
        }
    }

    Ok(())
}

/// Turn command-line arguments into a region query
fn build_query(args: &QueryArgs) -> Result<RegionQuery> {
    let shape: Spatial = args.spatial.parse()?;
    let frame: Frame = args.frame.parse()?;

    let mut query = RegionQuery::new(args.catalog.as_str()).with_spatial(args.spatial.as_str());

    match args.coordinates.as_deref() {
        Some(text) => query = query.with_coordinates(parse_position(text, frame)?),
        None if matches!(shape, Spatial::Cone | Spatial::Box) => {
            return Err(errors::missing_coordinates(shape.as_str()).into());
        }
        None => {}
    }

    if let Some(ref radius) = args.radius {
        query = query.with_radius(radius.as_str());
    }

    if let Some(ref width) = args.width {
        query = query.with_width(width.as_str());
    }

    if !args.polygon.is_empty() {
        let vertices = args
            .polygon
            .iter()
            .map(|vertex| {
                SkyCoord::parse_in(vertex, frame)
                    .map(PolygonVertex::Sky)
                    .with_context(|| format!("Invalid polygon vertex: {}", vertex))
            })
            .collect::<Result<Vec<_>>>()?;
        query = query.with_polygon(vertices);
    }

    if let Some(ref selcols) = args.selcols {
        query = query.with_selcols(selcols.as_str());
    }

    Ok(query)
}

/// ICRS input may be an object name; Galactic input must be a position
fn parse_position(text: &str, frame: Frame) -> Result<Coordinates> {
    match frame {
        Frame::Icrs => Ok(Coordinates::parse(text)),
        Frame::Galactic => {
            let coord = SkyCoord::parse_in(text, Frame::Galactic)
                .with_context(|| format!("Invalid galactic position: {}", text))?;
            Ok(Coordinates::Sky(coord))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use irsa_core::models::Coordinates;

    fn args(catalog: &str, coordinates: Option<&str>) -> QueryArgs {
        QueryArgs {
            catalog: catalog.to_string(),
            coordinates: coordinates.map(str::to_string),
            spatial: "Cone".to_string(),
            frame: "icrs".to_string(),
            radius: None,
            width: None,
            polygon: Vec::new(),
            selcols: None,
            payload: true,
        }
    }

    #[test]
    fn test_build_cone_query() {
        let mut cone = args("fp_psc", Some("m31"));
        cone.radius = Some("2arcmin".to_string());

        let query = build_query(&cone).unwrap();
        assert_eq!(query.coordinates, Some(Coordinates::Name("m31".to_string())));

        let payload = query.to_payload(500).unwrap();
        assert_eq!(payload.get("radunits").as_deref(), Some("deg"));
    }

    #[test]
    fn test_cone_without_position_is_rejected() {
        let err = build_query(&args("fp_psc", None)).unwrap_err();
        assert!(err.downcast_ref::<errors::CliError>().is_some());
    }

    #[test]
    fn test_galactic_polygon() {
        let mut polygon = args("fp_psc", None);
        polygon.spatial = "Polygon".to_string();
        polygon.frame = "galactic".to_string();
        polygon.polygon = vec!["121.0 -21.0".into(), "121.5 -21.0".into(), "121.5 -21.5".into()];

        let query = build_query(&polygon).unwrap();
        assert_eq!(query.polygon.len(), 3);
        assert!(query.to_payload(500).is_ok());
    }

    #[test]
    fn test_unknown_spatial() {
        let mut bad = args("fp_psc", Some("m31"));
        bad.spatial = "cone".to_string();
        let err = build_query(&bad).unwrap_err();
        assert!(err.downcast_ref::<irsa_core::IrsaError>().is_some());
    }
}
