//! Gator response parsing
//!
//! Gator answers every query with HTTP 200, so failures have to be spotted in
//! the body before it is read as a VOTable. Only the first `TABLE` and only
//! the `TABLEDATA` serialization are decoded.

use once_cell::sync::Lazy;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::Regex;
use std::collections::BTreeMap;

use crate::error::{IrsaError, Result};
use crate::models::{Cell, Field, Table};

static GATOR_ERROR_MSG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"msg\s*=\s*"([^"]*)""#).expect("error message regex is valid"));

/// Check a Gator response for failure messages and parse its table.
///
/// `catalog` is only used to word the error when the catalog is unknown.
pub fn parse_result(body: &str, catalog: &str) -> Result<Table> {
    check_gator_errors(body, catalog)?;

    let table = parse_votable(body)?;
    if table.is_empty() {
        tracing::warn!(catalog, "Query returned no results, so the table will be empty");
    }
    Ok(table)
}

fn check_gator_errors(body: &str, catalog: &str) -> Result<()> {
    if body.contains("The catalog is not on the list") {
        return Err(IrsaError::CatalogNotFound { catalog: catalog.to_string() });
    }

    if body.contains("Either wrong or missing coordinate/object name") {
        return Err(IrsaError::MalformedCoordinates);
    }

    if body.contains("Operation terminated") {
        return Err(IrsaError::LimitExceeded);
    }

    if let Some(pos) = body.find("stat=\"ERROR\"") {
        let message = GATOR_ERROR_MSG
            .captures(&body[pos..])
            .map(|caps| caps[1].trim().to_string())
            .unwrap_or_else(|| body[pos..].lines().next().unwrap_or_default().to_string());
        return Err(IrsaError::Remote(message));
    }

    // Plain-text failures; a VOTable may legitimately contain the word in its data
    if !body.contains("<VOTABLE") && body.contains("ERROR") {
        let message = match GATOR_ERROR_MSG.captures(body) {
            Some(caps) => caps[1].trim().to_string(),
            None => body
                .lines()
                .find(|line| line.contains("ERROR"))
                .unwrap_or_default()
                .trim()
                .to_string(),
        };
        return Err(IrsaError::Remote(message));
    }

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum TextTarget {
    None,
    FieldDescription,
    Cell,
    QueryStatus,
}

/// Parse the first table of a VOTable document
pub fn parse_votable(body: &str) -> Result<Table> {
    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);

    let mut saw_votable = false;
    let mut table: Option<Table> = None;
    let mut row: Option<Vec<Cell>> = None;
    let mut cell_text = String::new();
    let mut target = TextTarget::None;
    let mut status_error: Option<String> = None;
    let mut in_field = false;

    loop {
        let event = reader.read_event().map_err(|e| {
            IrsaError::table_parse(format!(
                "invalid XML at position {}: {}",
                reader.buffer_position(),
                e
            ))
        })?;

        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_empty = matches!(event, Event::Empty(_));
                match e.local_name().as_ref() {
                    b"VOTABLE" => saw_votable = true,
                    b"INFO" if attribute(e, "name")?.as_deref() == Some("QUERY_STATUS") => {
                        if attribute(e, "value")?.as_deref() == Some("ERROR") {
                            status_error = Some(String::new());
                            if !is_empty {
                                target = TextTarget::QueryStatus;
                            }
                        }
                    }
                    b"TABLE" if table.is_none() => {
                        let mut new_table = Table::new(Vec::new());
                        new_table.name = attribute(e, "name")?;
                        table = Some(new_table);
                        if is_empty {
                            break;
                        }
                    }
                    b"FIELD" => {
                        if let Some(ref mut t) = table {
                            t.fields.push(parse_field(e)?);
                            in_field = !is_empty;
                        }
                    }
                    b"DESCRIPTION" if in_field && !is_empty => {
                        target = TextTarget::FieldDescription;
                    }
                    b"BINARY" | b"BINARY2" | b"FITS" => {
                        return Err(IrsaError::table_parse(
                            "only TABLEDATA serialization is supported",
                        ));
                    }
                    b"TR" => {
                        if !is_empty {
                            row = Some(Vec::new());
                        } else if let Some(ref mut t) = table {
                            t.rows.push(Vec::new());
                        }
                    }
                    b"TD" => {
                        if is_empty {
                            push_cell(table.as_ref(), row.as_mut(), "");
                        } else {
                            cell_text.clear();
                            target = TextTarget::Cell;
                        }
                    }
                    _ => {}
                }
            }
            Event::Text(e) => {
                let text = e.unescape().map_err(|e| IrsaError::table_parse(e.to_string()))?;
                append_text(&text, target, &mut table, &mut cell_text, &mut status_error);
            }
            Event::CData(e) => {
                let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                append_text(&text, target, &mut table, &mut cell_text, &mut status_error);
            }
            Event::End(ref e) => match e.local_name().as_ref() {
                b"TD" => {
                    push_cell(table.as_ref(), row.as_mut(), &cell_text);
                    cell_text.clear();
                    target = TextTarget::None;
                }
                b"TR" => {
                    if let (Some(t), Some(r)) = (table.as_mut(), row.take()) {
                        t.rows.push(r);
                    }
                }
                b"FIELD" => in_field = false,
                b"DESCRIPTION" | b"INFO" => target = TextTarget::None,
                b"TABLE" if table.is_some() => break,
                _ => {}
            },
            Event::Eof => {
                if table.is_some() {
                    return Err(IrsaError::table_parse("document ended inside TABLE"));
                }
                break;
            }
            _ => {}
        }
    }

    if let Some(message) = status_error {
        let message = if message.is_empty() { "query failed".to_string() } else { message };
        return Err(IrsaError::Remote(message));
    }

    if !saw_votable {
        return Err(IrsaError::table_parse("response is not a VOTable document"));
    }

    table.ok_or_else(|| IrsaError::table_parse("no TABLE element in response"))
}

fn append_text(
    text: &str,
    target: TextTarget,
    table: &mut Option<Table>,
    cell_text: &mut String,
    status_error: &mut Option<String>,
) {
    match target {
        TextTarget::Cell => cell_text.push_str(text),
        TextTarget::FieldDescription => {
            if let Some(field) = table.as_mut().and_then(|t| t.fields.last_mut()) {
                field.description.get_or_insert_with(String::new).push_str(text);
            }
        }
        TextTarget::QueryStatus => {
            if let Some(message) = status_error.as_mut() {
                message.push_str(text);
            }
        }
        TextTarget::None => {}
    }
}

fn push_cell(table: Option<&Table>, row: Option<&mut Vec<Cell>>, raw: &str) {
    let (Some(table), Some(row)) = (table, row) else {
        return;
    };
    let cell = match table.fields.get(row.len()) {
        Some(field) => field.typed_cell(raw),
        None => Field::default().typed_cell(raw),
    };
    row.push(cell);
}

fn parse_field(e: &BytesStart) -> Result<Field> {
    let name = match attribute(e, "name")? {
        Some(name) => name,
        None => attribute(e, "ID")?.unwrap_or_default(),
    };

    Ok(Field {
        name,
        datatype: attribute(e, "datatype")?.unwrap_or_else(|| "char".to_string()),
        arraysize: attribute(e, "arraysize")?,
        unit: attribute(e, "unit")?,
        ucd: attribute(e, "ucd")?,
        description: None,
    })
}

fn attribute(e: &BytesStart, key: &str) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| IrsaError::table_parse(err.to_string()))?;
        if attr.key.local_name().as_ref() == key.as_bytes() {
            let value =
                attr.unescape_value().map_err(|err| IrsaError::table_parse(err.to_string()))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// Parse the Gator catalog listing (`nph-scan?mode=xml`) into name -> description
pub fn parse_catalog_list(body: &str) -> Result<BTreeMap<String, String>> {
    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);

    let mut catalogs = BTreeMap::new();
    let mut in_catalog = false;
    let mut element: Option<Vec<u8>> = None;
    let mut catname = String::new();
    let mut desc = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = e.local_name().as_ref().to_vec();
                if name == b"catalog" {
                    in_catalog = true;
                    catname.clear();
                    desc.clear();
                } else if in_catalog {
                    element = Some(name);
                }
            }
            Ok(Event::Text(e)) => {
                if let Some(ref name) = element {
                    let text = e.unescape().map_err(|err| IrsaError::table_parse(err.to_string()))?;
                    match name.as_slice() {
                        b"catname" => catname.push_str(text.trim()),
                        b"desc" => desc.push_str(text.trim()),
                        _ => {}
                    }
                }
            }
            Ok(Event::End(e)) => {
                if e.local_name().as_ref() == b"catalog" {
                    if !catname.is_empty() {
                        catalogs.insert(catname.clone(), desc.clone());
                    }
                    in_catalog = false;
                }
                element = None;
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(IrsaError::table_parse(format!("invalid catalog listing: {}", e)));
            }
            _ => {}
        }
    }

    Ok(catalogs)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0"?>
<VOTABLE version="1.3" xmlns="http://www.ivoa.net/xml/VOTable/v1.3">
  <RESOURCE type="results">
    <INFO name="QUERY_STATUS" value="OK"/>
    <TABLE name="fp_psc">
      <FIELD name="ra" datatype="double" unit="deg" ucd="pos.eq.ra;meta.main">
        <DESCRIPTION>right ascension (J2000 decimal deg)</DESCRIPTION>
      </FIELD>
      <FIELD name="dec" datatype="double" unit="deg"/>
      <FIELD name="designation" datatype="char" arraysize="*"/>
      <FIELD name="j_m" datatype="double" unit="mag"/>
      <DATA>
        <TABLEDATA>
          <TR><TD>10.684737</TD><TD>41.269073</TD><TD>00424433+4116085</TD><TD>9.453</TD></TR>
          <TR><TD>10.683</TD><TD>41.2668</TD><TD><![CDATA[00424392+4116004]]></TD><TD/></TR>
        </TABLEDATA>
      </DATA>
    </TABLE>
  </RESOURCE>
</VOTABLE>"#;

    #[test]
    fn test_parse_votable() {
        let table = parse_votable(SAMPLE).unwrap();
        assert_eq!(table.name.as_deref(), Some("fp_psc"));
        assert_eq!(table.column_names(), vec!["ra", "dec", "designation", "j_m"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(0, "ra"), Some(&Cell::Float(10.684737)));
        assert_eq!(table.get(0, "designation"), Some(&Cell::Text("00424433+4116085".to_string())));
        assert_eq!(table.get(1, "designation"), Some(&Cell::Text("00424392+4116004".to_string())));
        assert_eq!(table.get(1, "j_m"), Some(&Cell::Null));
        assert_eq!(
            table.fields[0].description.as_deref(),
            Some("right ascension (J2000 decimal deg)")
        );
        assert_eq!(table.fields[0].unit.as_deref(), Some("deg"));
    }

    #[test]
    fn test_empty_table() {
        let body = r#"<VOTABLE><RESOURCE><TABLE><FIELD name="ra" datatype="double"/>
            <DATA><TABLEDATA></TABLEDATA></DATA></TABLE></RESOURCE></VOTABLE>"#;
        let table = parse_result(body, "fp_psc").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.fields.len(), 1);
    }

    #[test]
    fn test_gator_errors() {
        let err = parse_result("[struct stat=\"ERROR\", msg=\"The catalog is not on the list\"]", "nope")
            .unwrap_err();
        assert!(matches!(err, IrsaError::CatalogNotFound { .. }));

        let err = parse_result("Either wrong or missing coordinate/object name", "fp_psc").unwrap_err();
        assert!(matches!(err, IrsaError::MalformedCoordinates));

        let err = parse_result("Operation terminated: output exceeds limit", "fp_psc").unwrap_err();
        assert!(matches!(err, IrsaError::LimitExceeded));

        let err = parse_result("[struct stat=\"ERROR\", msg=\"Bad radius\"]", "fp_psc").unwrap_err();
        match err {
            IrsaError::Remote(message) => assert_eq!(message, "Bad radius"),
            other => panic!("unexpected error: {other:?}"),
        }

        let body = "<html>\nERROR: Gator could not complete the query (server busy)\n</html>";
        match parse_result(body, "fp_psc").unwrap_err() {
            IrsaError::Remote(message) => {
                assert_eq!(message, "ERROR: Gator could not complete the query (server busy)")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_error_word_inside_votable_data() {
        let body = r#"<VOTABLE><RESOURCE><TABLE><FIELD name="flag" datatype="char"/>
            <DATA><TABLEDATA><TR><TD>ERROR</TD></TR></TABLEDATA></DATA></TABLE></RESOURCE></VOTABLE>"#;
        let table = parse_result(body, "fp_psc").unwrap();
        assert_eq!(table.get(0, "flag"), Some(&Cell::Text("ERROR".to_string())));
    }

    #[test]
    fn test_self_closing_table_is_empty() {
        let body = r#"<VOTABLE><RESOURCE><TABLE name="fp_psc"/></RESOURCE></VOTABLE>"#;
        let table = parse_result(body, "fp_psc").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.name.as_deref(), Some("fp_psc"));
    }

    #[test]
    fn test_query_status_error() {
        let body = r#"<VOTABLE><RESOURCE><INFO name="QUERY_STATUS" value="ERROR">Bad catalog</INFO></RESOURCE></VOTABLE>"#;
        match parse_votable(body).unwrap_err() {
            IrsaError::Remote(message) => assert_eq!(message, "Bad catalog"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_not_a_votable() {
        let err = parse_votable("<html><body>Service unavailable</body></html>").unwrap_err();
        assert!(matches!(err, IrsaError::TableParse { .. }));

        let err = parse_votable("<VOTABLE><TABLE>").unwrap_err();
        assert!(matches!(err, IrsaError::TableParse { .. }));
    }

    #[test]
    fn test_binary_rejected() {
        let body = r#"<VOTABLE><RESOURCE><TABLE><FIELD name="ra" datatype="double"/>
            <DATA><BINARY><STREAM encoding="base64">AAAA</STREAM></BINARY></DATA></TABLE></RESOURCE></VOTABLE>"#;
        assert!(matches!(parse_votable(body).unwrap_err(), IrsaError::TableParse { .. }));
    }

    #[test]
    fn test_parse_catalog_list() {
        let body = r#"<?xml version="1.0"?>
<catalogs>
  <catalog><catname>fp_psc</catname><desc>2MASS All-Sky Point Source Catalog (PSC)</desc></catalog>
  <catalog><catname>allwise_p3as_psd</catname><desc>AllWISE Source Catalog</desc></catalog>
  <catalog><desc>missing name</desc></catalog>
</catalogs>"#;
        let catalogs = parse_catalog_list(body).unwrap();
        assert_eq!(catalogs.len(), 2);
        assert_eq!(catalogs["fp_psc"], "2MASS All-Sky Point Source Catalog (PSC)");
        assert!(catalogs.contains_key("allwise_p3as_psd"));
    }
}
