//! Port trait definitions
//!
//! These traits define the interfaces that adapters must implement.

use crate::error::Result;

/// Port for fetching documents from the IRSA web service
pub trait Transport: Send + Sync {
    /// Perform an HTTP GET and return the response body
    ///
    /// # Arguments
    /// * `url` - Endpoint to query
    /// * `params` - Query-string parameters, in order
    fn get(&self, url: &str, params: &[(&str, String)]) -> Result<String>;
}
