use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// IRSA - Query the NASA/IPAC Infrared Science Archive catalogs
#[derive(Parser, Debug)]
#[command(name = "irsa")]
#[command(about = "Query IRSA Gator catalogs by position", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to ./irsa.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Gator query endpoint
    #[arg(long, global = true, value_name = "URL")]
    pub server: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Maximum number of rows to return
    #[arg(long, global = true, value_name = "ROWS")]
    pub row_limit: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search a catalog around a position or inside a region
    Query(QueryArgs),

    /// List the catalogs available through Gator
    Catalogs(CatalogsArgs),

    /// Show the effective configuration and where each value came from
    Config,
}

#[derive(Parser, Debug)]
pub struct QueryArgs {
    /// Catalog name (e.g., fp_psc)
    pub catalog: String,

    /// Object name or position (e.g., "m31", "00h42m44.3s +41d16m07.5s", "10.68 41.27")
    pub coordinates: Option<String>,

    /// Search shape: Cone, Box, Polygon or All-Sky
    #[arg(long, default_value = "Cone")]
    pub spatial: String,

    /// Frame of the coordinates and polygon vertices (icrs or galactic)
    #[arg(long, default_value = "icrs")]
    pub frame: String,

    /// Cone radius (e.g., "2arcmin", "30arcsec", "0.01d"); defaults to 10 arcsec
    #[arg(long)]
    pub radius: Option<String>,

    /// Box edge length (e.g., "2arcmin")
    #[arg(long)]
    pub width: Option<String>,

    /// Polygon vertex "<lon> <lat>", repeat for each corner
    #[arg(long = "polygon", value_name = "VERTEX")]
    pub polygon: Vec<String>,

    /// Comma separated list of columns to return
    #[arg(long)]
    pub selcols: Option<String>,

    /// Print the request parameters without contacting IRSA
    #[arg(long)]
    pub payload: bool,
}

#[derive(Parser, Debug)]
pub struct CatalogsArgs {
    /// Only show catalogs whose name or description contains this text
    #[arg(long)]
    pub filter: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query_command() {
        let cli = Cli::parse_from([
            "irsa",
            "query",
            "fp_psc",
            "m31",
            "--spatial",
            "Box",
            "--width",
            "2arcmin",
            "--json",
        ]);

        assert!(cli.json);
        match cli.command {
            Commands::Query(args) => {
                assert_eq!(args.catalog, "fp_psc");
                assert_eq!(args.coordinates.as_deref(), Some("m31"));
                assert_eq!(args.spatial, "Box");
                assert_eq!(args.width.as_deref(), Some("2arcmin"));
                assert!(!args.payload);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_repeated_polygon_vertices() {
        let cli = Cli::parse_from([
            "irsa",
            "query",
            "fp_psc",
            "--spatial",
            "Polygon",
            "--polygon",
            "10.1 10.1",
            "--polygon",
            "10.0 10.1",
            "--polygon",
            "10.0 10.0",
        ]);

        match cli.command {
            Commands::Query(args) => assert_eq!(args.polygon.len(), 3),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_overrides() {
        let cli = Cli::parse_from(["irsa", "config", "--row-limit", "20", "--timeout", "5"]);
        assert_eq!(cli.row_limit, Some(20));
        assert_eq!(cli.timeout, Some(5));
        assert!(matches!(cli.command, Commands::Config));
    }
}
