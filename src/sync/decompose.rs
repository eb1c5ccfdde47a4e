//! Write-path translation: one nested endpoint document into the exact row
//! sets that represent it relationally.

use crate::error::{Error, Result};
use crate::store::SqlValue;
use crate::store::schema::{
    ADDITIONAL_EXAMPLES, CHILD_TABLES, CURL_EXAMPLES, ChildTable, ERROR_RESPONSES, FIELD_ROWS,
    HEADERS, IMPORTANT_NOTES, PRODUCTS, REQUEST_SCHEMAS, RESPONSE_SCHEMAS, SAMPLE_REQUESTS,
    SAMPLE_RESPONSES, VALIDATION_NOTES,
};
use crate::types::{AdditionalExample, EndpointDoc, FieldRow, HeaderRow, OpaqueJson};

/// The relational image of one document.
///
/// `parent` holds the scalar columns in upsert order: name, path, status,
/// description, category, purpose, rank, methods (serialized JSON list).
/// `children` holds, for every catalog table, the rows to insert: payload
/// columns in catalog order, with the zero-based position appended for
/// ordered tables.
#[derive(Debug)]
pub struct DocRows {
    pub parent: Vec<SqlValue>,
    pub children: Vec<(&'static ChildTable, Vec<Vec<SqlValue>>)>,
}

/// Pure translation; no store access. The same document always yields the
/// same row sets. Absent or empty collections yield zero rows rather than
/// placeholder rows.
pub fn decompose(doc: &EndpointDoc) -> Result<DocRows> {
    let methods =
        serde_json::to_string(&doc.methods).map_err(|e| Error::MalformedPayload(e.to_string()))?;

    let parent = vec![
        doc.name.clone().into(),
        doc.endpoint_path.clone().into(),
        doc.status.clone().into(),
        doc.description.clone().into(),
        doc.category.clone().into(),
        doc.purpose.clone().into(),
        doc.rank.into(),
        methods.into(),
    ];

    let children: Vec<(&'static ChildTable, Vec<Vec<SqlValue>>)> = vec![
        (&REQUEST_SCHEMAS, singleton_rows(&doc.request_schema)?),
        (&RESPONSE_SCHEMAS, singleton_rows(&doc.response_schema)?),
        (&SAMPLE_REQUESTS, singleton_rows(&doc.sample_request)?),
        (&SAMPLE_RESPONSES, opaque_list_rows(&doc.sample_responses)?),
        (&ERROR_RESPONSES, opaque_list_rows(&doc.error_responses)?),
        (&CURL_EXAMPLES, curl_rows(&doc.curl_example)),
        (&VALIDATION_NOTES, note_rows(&doc.validation_notes)),
        (&FIELD_ROWS, field_rows(&doc.field_table)),
        (&PRODUCTS, product_rows(&doc.products)),
        (&IMPORTANT_NOTES, note_rows(&doc.important_notes)),
        (&HEADERS, header_rows(&doc.headers)),
        (&ADDITIONAL_EXAMPLES, example_rows(&doc.additional_examples)?),
    ];
    debug_assert_eq!(children.len(), CHILD_TABLES.len());

    Ok(DocRows { parent, children })
}

fn singleton_rows(payload: &OpaqueJson) -> Result<Vec<Vec<SqlValue>>> {
    if payload.is_empty() {
        return Ok(Vec::new());
    }
    Ok(vec![vec![payload.to_stored()?.into()]])
}

fn opaque_list_rows(payloads: &[OpaqueJson]) -> Result<Vec<Vec<SqlValue>>> {
    payloads
        .iter()
        .enumerate()
        .map(|(pos, payload)| Ok(vec![payload.to_stored()?.into(), (pos as i64).into()]))
        .collect()
}

fn curl_rows(command: &str) -> Vec<Vec<SqlValue>> {
    if command.is_empty() {
        return Vec::new();
    }
    vec![vec!["default".into(), command.into()]]
}

fn note_rows(notes: &[String]) -> Vec<Vec<SqlValue>> {
    notes
        .iter()
        .enumerate()
        .map(|(pos, note)| vec![note.as_str().into(), (pos as i64).into()])
        .collect()
}

fn field_rows(rows: &[FieldRow]) -> Vec<Vec<SqlValue>> {
    rows.iter()
        .enumerate()
        .map(|(pos, row)| {
            vec![
                row.field.as_str().into(),
                row.field_type.as_str().into(),
                row.required.into(),
                row.description.as_str().into(),
                (pos as i64).into(),
            ]
        })
        .collect()
}

fn product_rows(products: &[String]) -> Vec<Vec<SqlValue>> {
    products
        .iter()
        .map(|product| vec![product.as_str().into()])
        .collect()
}

fn header_rows(headers: &[HeaderRow]) -> Vec<Vec<SqlValue>> {
    headers
        .iter()
        .enumerate()
        .map(|(pos, header)| {
            vec![
                header.name.as_str().into(),
                header.value.as_str().into(),
                header.description.as_str().into(),
                (pos as i64).into(),
            ]
        })
        .collect()
}

fn example_rows(examples: &[AdditionalExample]) -> Result<Vec<Vec<SqlValue>>> {
    examples
        .iter()
        .enumerate()
        .map(|(pos, example)| {
            Ok(vec![
                example.title.as_str().into(),
                example.data.to_stored()?.into(),
                (pos as i64).into(),
            ])
        })
        .collect()
}
