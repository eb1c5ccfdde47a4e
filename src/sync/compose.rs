//! Read-path translation: fetched rows back into the nested document,
//! restoring documented defaults where no rows exist.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::store::Row;
use crate::store::schema::{
    ADDITIONAL_EXAMPLES, CURL_EXAMPLES, ChildTable, ERROR_RESPONSES, FIELD_ROWS, HEADERS,
    IMPORTANT_NOTES, PRODUCTS, REQUEST_SCHEMAS, RESPONSE_SCHEMAS, SAMPLE_REQUESTS,
    SAMPLE_RESPONSES, VALIDATION_NOTES,
};
use crate::types::{
    AdditionalExample, EndpointDoc, EndpointSummary, FieldRow, HeaderRow, OpaqueJson,
};

/// Reassembles a document from its parent row (name, path, status,
/// description, category, purpose, rank, methods) and the per-table child
/// rows, already fetched in their declared order.
pub(crate) fn compose(
    key: &str,
    parent: &Row,
    children: &HashMap<&'static str, Vec<Row>>,
) -> Result<EndpointDoc> {
    Ok(EndpointDoc {
        key: key.to_string(),
        name: parent.text(0)?.to_string(),
        endpoint_path: parent.text(1)?.to_string(),
        status: parent.text(2)?.to_string(),
        description: parent.text(3)?.to_string(),
        category: parent.text(4)?.to_string(),
        purpose: parent.text(5)?.to_string(),
        rank: parent.integer(6)?,
        methods: methods_from_stored(parent.text(7)?)?,
        request_schema: singleton_payload(rows(children, &REQUEST_SCHEMAS))?,
        response_schema: singleton_payload(rows(children, &RESPONSE_SCHEMAS))?,
        sample_request: singleton_payload(rows(children, &SAMPLE_REQUESTS))?,
        sample_responses: opaque_list(rows(children, &SAMPLE_RESPONSES))?,
        error_responses: opaque_list(rows(children, &ERROR_RESPONSES))?,
        curl_example: curl_command(rows(children, &CURL_EXAMPLES))?,
        validation_notes: string_list(rows(children, &VALIDATION_NOTES))?,
        field_table: field_table(rows(children, &FIELD_ROWS))?,
        products: string_list(rows(children, &PRODUCTS))?,
        important_notes: string_list(rows(children, &IMPORTANT_NOTES))?,
        headers: header_list(rows(children, &HEADERS))?,
        additional_examples: example_list(rows(children, &ADDITIONAL_EXAMPLES))?,
    })
}

fn rows<'a>(children: &'a HashMap<&'static str, Vec<Row>>, table: &ChildTable) -> &'a [Row] {
    children
        .get(table.name)
        .map(|fetched| fetched.as_slice())
        .unwrap_or(&[])
}

/// Summary row: key, name, path, status, description, category, purpose,
/// rank, methods, created_at, updated_at.
pub(crate) fn compose_summary(parent: &Row, products: &[Row]) -> Result<EndpointSummary> {
    Ok(EndpointSummary {
        key: parent.text(0)?.to_string(),
        name: parent.text(1)?.to_string(),
        endpoint_path: parent.text(2)?.to_string(),
        status: parent.text(3)?.to_string(),
        description: parent.text(4)?.to_string(),
        category: parent.text(5)?.to_string(),
        purpose: parent.text(6)?.to_string(),
        rank: parent.integer(7)?,
        methods: methods_from_stored(parent.text(8)?)?,
        products: string_list(products)?,
        created_at: super::parse_datetime(parent.text(9)?),
        updated_at: super::parse_datetime(parent.text(10)?),
    })
}

fn methods_from_stored(raw: &str) -> Result<Vec<String>> {
    serde_json::from_str(raw).map_err(|e| Error::MalformedPayload(e.to_string()))
}

fn singleton_payload(rows: &[Row]) -> Result<OpaqueJson> {
    match rows.first() {
        Some(row) => OpaqueJson::from_stored(row.text(0)?),
        None => Ok(OpaqueJson::default()),
    }
}

fn opaque_list(rows: &[Row]) -> Result<Vec<OpaqueJson>> {
    rows.iter()
        .map(|row| OpaqueJson::from_stored(row.text(0)?))
        .collect()
}

fn curl_command(rows: &[Row]) -> Result<String> {
    match rows.first() {
        Some(row) => Ok(row.text(1)?.to_string()),
        None => Ok(String::new()),
    }
}

fn string_list(rows: &[Row]) -> Result<Vec<String>> {
    rows.iter().map(|row| Ok(row.text(0)?.to_string())).collect()
}

fn field_table(rows: &[Row]) -> Result<Vec<FieldRow>> {
    rows.iter()
        .map(|row| {
            Ok(FieldRow {
                field: row.text(0)?.to_string(),
                field_type: row.text(1)?.to_string(),
                required: row.boolean(2)?,
                description: row.text(3)?.to_string(),
            })
        })
        .collect()
}

fn header_list(rows: &[Row]) -> Result<Vec<HeaderRow>> {
    rows.iter()
        .map(|row| {
            Ok(HeaderRow {
                name: row.text(0)?.to_string(),
                value: row.text(1)?.to_string(),
                description: row.text(2)?.to_string(),
            })
        })
        .collect()
}

fn example_list(rows: &[Row]) -> Result<Vec<AdditionalExample>> {
    rows.iter()
        .map(|row| {
            Ok(AdditionalExample {
                title: row.text(0)?.to_string(),
                data: OpaqueJson::from_stored(row.text(1)?)?,
            })
        })
        .collect()
}
