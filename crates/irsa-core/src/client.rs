//! The IRSA Gator client

use std::collections::BTreeMap;
use std::time::Duration;

use crate::config::LayeredConfig;
use crate::error::Result;
use crate::http::HttpTransport;
use crate::models::Table;
use crate::payload::{args_to_payload, QueryPayload, RegionQuery};
use crate::ports::Transport;
use crate::votable::{parse_catalog_list, parse_result};

/// Gator catalog query endpoint
pub const DEFAULT_SERVER: &str = "https://irsa.ipac.caltech.edu/cgi-bin/Gator/nph-query";

/// Gator catalog listing endpoint
pub const DEFAULT_GATOR_LIST_URL: &str = "https://irsa.ipac.caltech.edu/cgi-bin/Gator/nph-scan";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default maximum number of rows returned
pub const DEFAULT_ROW_LIMIT: usize = 500;

/// Client for the IRSA Gator catalog service
pub struct IrsaClient<T: Transport = HttpTransport> {
    /// Catalog query URL
    server: String,

    /// Catalog listing URL
    gator_list_url: String,

    /// `outrows` sent with every query
    row_limit: usize,

    transport: T,
}

impl IrsaClient<HttpTransport> {
    /// Create a client against the public IRSA endpoints
    pub fn new() -> Result<Self> {
        Self::from_config(&LayeredConfig::with_defaults())
    }

    /// Create a client from resolved configuration
    pub fn from_config(config: &LayeredConfig) -> Result<Self> {
        let transport = HttpTransport::new(Duration::from_secs(config.timeout.value))?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> IrsaClient<T> {
    /// Create a client that sends requests through `transport`
    pub fn with_transport(config: &LayeredConfig, transport: T) -> Self {
        Self {
            server: config.server.value.clone(),
            gator_list_url: config.gator_list_url.value.clone(),
            row_limit: config.row_limit.value,
            transport,
        }
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    pub fn row_limit(&self) -> usize {
        self.row_limit
    }

    /// Base payload for `catalog` with this client's row limit
    pub fn args_to_payload(&self, catalog: &str, selcols: Option<&str>) -> QueryPayload {
        args_to_payload(catalog, selcols, self.row_limit)
    }

    /// Build the request parameters without contacting the service
    pub fn query_region_payload(&self, query: &RegionQuery) -> Result<QueryPayload> {
        query.to_payload(self.row_limit)
    }

    /// Send the query and return the raw response document
    pub fn query_region_raw(&self, query: &RegionQuery) -> Result<String> {
        let payload = self.query_region_payload(query)?;
        tracing::info!(
            catalog = %payload.catalog,
            spatial = %query.spatial,
            "Querying IRSA catalog"
        );
        self.transport.get(&self.server, &payload.to_params())
    }

    /// Send the query and parse the result table
    pub fn query_region(&self, query: &RegionQuery) -> Result<Table> {
        let body = self.query_region_raw(query)?;
        parse_result(&body, &query.catalog)
    }

    /// Catalogs available through Gator, name -> description
    pub fn list_catalogs(&self) -> Result<BTreeMap<String, String>> {
        let params = [("mode", "xml".to_string())];
        let body = self.transport.get(&self.gator_list_url, &params)?;
        parse_catalog_list(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IrsaError;
    use crate::models::Dimension;
    use std::sync::Mutex;

    /// Records requests and answers with a fixed body
    struct RecordingTransport {
        body: String,
        requests: Mutex<Vec<(String, Vec<(String, String)>)>>,
    }

    impl RecordingTransport {
        fn new(body: &str) -> Self {
            Self { body: body.to_string(), requests: Mutex::new(Vec::new()) }
        }
    }

    impl Transport for RecordingTransport {
        fn get(&self, url: &str, params: &[(&str, String)]) -> Result<String> {
            let params = params.iter().map(|(k, v)| (k.to_string(), v.clone())).collect();
            self.requests.lock().unwrap().push((url.to_string(), params));
            Ok(self.body.clone())
        }
    }

    const EMPTY_TABLE: &str = r#"<VOTABLE><RESOURCE><TABLE><FIELD name="ra" datatype="double"/>
        <DATA><TABLEDATA/></DATA></TABLE></RESOURCE></VOTABLE>"#;

    #[test]
    fn test_query_region_sends_payload() {
        let client =
            IrsaClient::with_transport(&LayeredConfig::with_defaults(), RecordingTransport::new(EMPTY_TABLE));
        let query = RegionQuery::new("fp_psc")
            .with_coordinates("m31")
            .with_radius(Dimension::arcmin(2.0));

        let table = client.query_region(&query).unwrap();
        assert!(table.is_empty());

        let requests = client.transport.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let (url, params) = &requests[0];
        assert_eq!(url, DEFAULT_SERVER);
        assert!(params.contains(&("objstr".to_string(), "m31".to_string())));
        assert!(params.contains(&("radunits".to_string(), "arcmin".to_string())));
        assert!(params.contains(&("outrows".to_string(), "500".to_string())));
    }

    #[test]
    fn test_invalid_spatial_never_reaches_transport() {
        let client =
            IrsaClient::with_transport(&LayeredConfig::with_defaults(), RecordingTransport::new(EMPTY_TABLE));
        let query = RegionQuery::new("fp_psc").with_spatial("cone").with_coordinates("m31");

        let err = client.query_region(&query).unwrap_err();
        assert!(matches!(err, IrsaError::InvalidSpatial { .. }));
        assert!(client.transport.requests.lock().unwrap().is_empty());
    }

    #[test]
    fn test_list_catalogs_uses_list_url() {
        let body = "<catalogs><catalog><catname>fp_psc</catname><desc>2MASS PSC</desc></catalog></catalogs>";
        let client =
            IrsaClient::with_transport(&LayeredConfig::with_defaults(), RecordingTransport::new(body));

        let catalogs = client.list_catalogs().unwrap();
        assert_eq!(catalogs.get("fp_psc").map(String::as_str), Some("2MASS PSC"));

        let requests = client.transport.requests.lock().unwrap();
        assert_eq!(requests[0].0, DEFAULT_GATOR_LIST_URL);
        assert_eq!(requests[0].1, vec![("mode".to_string(), "xml".to_string())]);
    }
}
