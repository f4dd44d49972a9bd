use irsa_core::models::{Field, Table};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tabled::Tabled;

/// Output for query command
#[derive(Debug, Serialize)]
pub struct QueryOutput {
    pub catalog: String,
    pub row_count: usize,
    pub fields: Vec<FieldInfo>,
    pub rows: Vec<Map<String, Value>>,
}

#[derive(Debug, Serialize)]
pub struct FieldInfo {
    pub name: String,
    pub datatype: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl From<&Field> for FieldInfo {
    fn from(field: &Field) -> Self {
        Self {
            name: field.name.clone(),
            datatype: field.datatype.clone(),
            unit: field.unit.clone(),
        }
    }
}

impl QueryOutput {
    /// Rows keyed by column name
    pub fn from_table(catalog: &str, table: &Table) -> Self {
        let rows = table
            .rows
            .iter()
            .map(|row| {
                table
                    .fields
                    .iter()
                    .zip(row)
                    .map(|(field, cell)| {
                        let value = serde_json::to_value(cell).unwrap_or(Value::Null);
                        (field.name.clone(), value)
                    })
                    .collect()
            })
            .collect();

        Self {
            catalog: catalog.to_string(),
            row_count: table.len(),
            fields: table.fields.iter().map(FieldInfo::from).collect(),
            rows,
        }
    }
}

/// Output for query command with --payload
#[derive(Debug, Serialize)]
pub struct PayloadOutput {
    pub server: String,
    pub params: BTreeMap<String, String>,
}

/// Output for catalogs command
#[derive(Debug, Serialize)]
pub struct CatalogsOutput {
    pub count: usize,
    pub catalogs: Vec<CatalogEntry>,
}

#[derive(Debug, Serialize, Tabled)]
pub struct CatalogEntry {
    #[tabled(rename = "Catalog")]
    pub name: String,
    #[tabled(rename = "Description")]
    pub description: String,
}

/// One row of `irsa config`
#[derive(Debug, Serialize, Tabled)]
pub struct ConfigEntry {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source")]
    pub source: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use irsa_core::models::Cell;

    #[test]
    fn test_query_output_keys_rows_by_column() {
        let mut table = Table::new(vec![Field::new("ra", "double"), Field::new("designation", "char")]);
        table.rows.push(vec![Cell::Float(10.5), Cell::Text("J0042".to_string())]);
        table.rows.push(vec![Cell::Null, Cell::Text("J0043".to_string())]);

        let output = QueryOutput::from_table("fp_psc", &table);
        assert_eq!(output.row_count, 2);
        assert_eq!(output.fields[0].name, "ra");
        assert_eq!(output.rows[0]["ra"], serde_json::json!(10.5));
        assert_eq!(output.rows[1]["ra"], Value::Null);
        assert_eq!(output.rows[1]["designation"], "J0043");
    }
}
