use serde::{Deserialize, Serialize};
use std::fmt;

/// Column descriptor from a VOTable `FIELD`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub datatype: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub arraysize: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ucd: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Field {
    pub fn new(name: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self { name: name.into(), datatype: datatype.into(), ..Default::default() }
    }

    /// Convert the raw `TD` text of this column into a typed cell.
    ///
    /// Empty text is null. Values that fail to parse as the declared type, or
    /// array-valued numeric columns, are kept as text.
    pub fn typed_cell(&self, raw: &str) -> Cell {
        let text = raw.trim();
        if text.is_empty() {
            return Cell::Null;
        }

        let is_char = matches!(self.datatype.as_str(), "char" | "unicodeChar");
        if !is_char && text.eq_ignore_ascii_case("null") {
            return Cell::Null;
        }

        let is_array = self.arraysize.as_deref().is_some_and(|size| size != "1");
        match self.datatype.as_str() {
            "boolean" if !is_array => match text {
                "T" | "t" | "1" | "true" | "TRUE" => Cell::Boolean(true),
                "F" | "f" | "0" | "false" | "FALSE" => Cell::Boolean(false),
                "?" => Cell::Null,
                other => Cell::Text(other.to_string()),
            },
            "short" | "int" | "long" | "unsignedByte" if !is_array => {
                text.parse().map(Cell::Integer).unwrap_or_else(|_| Cell::Text(text.to_string()))
            }
            "float" | "double" if !is_array => match text.parse::<f64>() {
                Ok(v) if v.is_nan() => Cell::Null,
                Ok(v) => Cell::Float(v),
                Err(_) => Cell::Text(text.to_string()),
            },
            _ => Cell::Text(text.to_string()),
        }
    }
}

/// One table value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Integer(v) => Some(*v as f64),
            Cell::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => f.write_str("--"),
            Cell::Boolean(v) => write!(f, "{}", v),
            Cell::Integer(v) => write!(f, "{}", v),
            Cell::Float(v) => write!(f, "{}", v),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

/// Tabular result of a catalog query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub fields: Vec<Field>,

    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { name: None, fields, rows: Vec::new() }
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Index of a column by name, case-insensitive like IRSA column names
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name.eq_ignore_ascii_case(name))
    }

    /// All values of one column
    pub fn column(&self, name: &str) -> Option<Vec<&Cell>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().filter_map(|row| row.get(idx)).collect())
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&Cell> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)
    }
}
