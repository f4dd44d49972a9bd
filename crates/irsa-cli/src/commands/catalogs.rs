//! Catalogs command implementation

use crate::cli::CatalogsArgs;
use crate::output::OutputWriter;
use crate::output_types::{CatalogEntry, CatalogsOutput};
use anyhow::{Context, Result};
use irsa_core::config::LayeredConfig;
use irsa_core::IrsaClient;
use std::collections::BTreeMap;

pub fn execute(args: CatalogsArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let client = IrsaClient::from_config(config).context("Failed to create IRSA client")?;
    let catalogs = client.list_catalogs().context("Failed to fetch the IRSA catalog list")?;

    let entries = filter_catalogs(catalogs, args.filter.as_deref());

    if output.is_json() {
        output.result(CatalogsOutput { count: entries.len(), catalogs: entries })?;
    } else {
        output.section("IRSA Catalogs");
        let count = entries.len();
        output.table(entries);
        output.info(format!("{} catalogs", count));
    }

    Ok(())
}

/// Case-insensitive match on name or description
fn filter_catalogs(catalogs: BTreeMap<String, String>, filter: Option<&str>) -> Vec<CatalogEntry> {
    let needle = filter.map(str::to_lowercase);

    catalogs
        .into_iter()
        .filter(|(name, description)| match needle {
            Some(ref needle) => {
                name.to_lowercase().contains(needle) || description.to_lowercase().contains(needle)
            }
            None => true,
        })
        .map(|(name, description)| CatalogEntry { name, description })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_catalogs() {
        let mut catalogs = BTreeMap::new();
        catalogs.insert("fp_psc".to_string(), "2MASS All-Sky Point Source Catalog".to_string());
        catalogs.insert("allwise_p3as_psd".to_string(), "AllWISE Source Catalog".to_string());

        assert_eq!(filter_catalogs(catalogs.clone(), None).len(), 2);

        let matched = filter_catalogs(catalogs.clone(), Some("2mass"));
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].name, "fp_psc");

        assert_eq!(filter_catalogs(catalogs, Some("ALLWISE")).len(), 1);
    }
}
