pub const SCHEMA: &str = r#"
-- One row per documented endpoint; every child table joins on its key
CREATE TABLE IF NOT EXISTS endpoints (
    key TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    path TEXT NOT NULL,
    status TEXT NOT NULL,
    description TEXT NOT NULL,
    category TEXT NOT NULL,
    purpose TEXT NOT NULL,
    rank INTEGER NOT NULL DEFAULT 9999,
    methods TEXT NOT NULL,  -- JSON list of HTTP verbs
    created_at TEXT DEFAULT (datetime('now')),
    updated_at TEXT DEFAULT (datetime('now'))
);

-- Child tables carry no ON DELETE CASCADE; deletes cascade in the engine

CREATE TABLE IF NOT EXISTS endpoint_request_schemas (
    endpoint_key TEXT NOT NULL REFERENCES endpoints(key),
    body TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS endpoint_response_schemas (
    endpoint_key TEXT NOT NULL REFERENCES endpoints(key),
    body TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS endpoint_sample_requests (
    endpoint_key TEXT NOT NULL REFERENCES endpoints(key),
    body TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS endpoint_sample_responses (
    endpoint_key TEXT NOT NULL REFERENCES endpoints(key),
    body TEXT NOT NULL,
    response_order INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS endpoint_error_responses (
    endpoint_key TEXT NOT NULL REFERENCES endpoints(key),
    body TEXT NOT NULL,
    response_order INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS endpoint_curl_examples (
    endpoint_key TEXT NOT NULL REFERENCES endpoints(key),
    environment TEXT NOT NULL DEFAULT 'default',
    command TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS endpoint_validation_notes (
    endpoint_key TEXT NOT NULL REFERENCES endpoints(key),
    note TEXT NOT NULL,
    note_order INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS endpoint_field_rows (
    endpoint_key TEXT NOT NULL REFERENCES endpoints(key),
    field TEXT NOT NULL,
    field_type TEXT NOT NULL,
    required INTEGER NOT NULL DEFAULT 0,
    description TEXT NOT NULL,
    row_order INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS endpoint_products (
    endpoint_key TEXT NOT NULL REFERENCES endpoints(key),
    product TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS endpoint_important_notes (
    endpoint_key TEXT NOT NULL REFERENCES endpoints(key),
    note TEXT NOT NULL,
    note_order INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS endpoint_headers (
    endpoint_key TEXT NOT NULL REFERENCES endpoints(key),
    name TEXT NOT NULL,
    value TEXT NOT NULL,
    description TEXT NOT NULL,
    header_order INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS endpoint_additional_examples (
    endpoint_key TEXT NOT NULL REFERENCES endpoints(key),
    title TEXT NOT NULL,
    body TEXT NOT NULL,
    example_order INTEGER NOT NULL
);

-- Create indexes
CREATE INDEX IF NOT EXISTS idx_request_schemas_key ON endpoint_request_schemas(endpoint_key);
CREATE INDEX IF NOT EXISTS idx_response_schemas_key ON endpoint_response_schemas(endpoint_key);
CREATE INDEX IF NOT EXISTS idx_sample_requests_key ON endpoint_sample_requests(endpoint_key);
CREATE INDEX IF NOT EXISTS idx_sample_responses_key ON endpoint_sample_responses(endpoint_key);
CREATE INDEX IF NOT EXISTS idx_error_responses_key ON endpoint_error_responses(endpoint_key);
CREATE INDEX IF NOT EXISTS idx_curl_examples_key ON endpoint_curl_examples(endpoint_key);
CREATE INDEX IF NOT EXISTS idx_validation_notes_key ON endpoint_validation_notes(endpoint_key);
CREATE INDEX IF NOT EXISTS idx_field_rows_key ON endpoint_field_rows(endpoint_key);
CREATE INDEX IF NOT EXISTS idx_products_key ON endpoint_products(endpoint_key);
CREATE INDEX IF NOT EXISTS idx_important_notes_key ON endpoint_important_notes(endpoint_key);
CREATE INDEX IF NOT EXISTS idx_headers_key ON endpoint_headers(endpoint_key);
CREATE INDEX IF NOT EXISTS idx_additional_examples_key ON endpoint_additional_examples(endpoint_key);
"#;

/// Metadata for one child table of the endpoint projection.
///
/// The decomposer, the composer, and the engine drive all child-table SQL
/// off this catalog. Adding a child concept means adding a table here (and
/// to `SCHEMA`) and teaching the two translators about the new field;
/// nothing else names the table.
#[derive(Debug)]
pub struct ChildTable {
    pub name: &'static str,
    /// Payload columns in declaration order, excluding the endpoint key
    /// and the order column.
    pub columns: &'static [&'static str],
    /// Explicit sequence column for order-preserving concepts.
    pub order_column: Option<&'static str>,
}

pub const REQUEST_SCHEMAS: ChildTable = ChildTable {
    name: "endpoint_request_schemas",
    columns: &["body"],
    order_column: None,
};

pub const RESPONSE_SCHEMAS: ChildTable = ChildTable {
    name: "endpoint_response_schemas",
    columns: &["body"],
    order_column: None,
};

pub const SAMPLE_REQUESTS: ChildTable = ChildTable {
    name: "endpoint_sample_requests",
    columns: &["body"],
    order_column: None,
};

pub const SAMPLE_RESPONSES: ChildTable = ChildTable {
    name: "endpoint_sample_responses",
    columns: &["body"],
    order_column: Some("response_order"),
};

pub const ERROR_RESPONSES: ChildTable = ChildTable {
    name: "endpoint_error_responses",
    columns: &["body"],
    order_column: Some("response_order"),
};

pub const CURL_EXAMPLES: ChildTable = ChildTable {
    name: "endpoint_curl_examples",
    columns: &["environment", "command"],
    order_column: None,
};

pub const VALIDATION_NOTES: ChildTable = ChildTable {
    name: "endpoint_validation_notes",
    columns: &["note"],
    order_column: Some("note_order"),
};

pub const FIELD_ROWS: ChildTable = ChildTable {
    name: "endpoint_field_rows",
    columns: &["field", "field_type", "required", "description"],
    order_column: Some("row_order"),
};

pub const PRODUCTS: ChildTable = ChildTable {
    name: "endpoint_products",
    columns: &["product"],
    order_column: None,
};

pub const IMPORTANT_NOTES: ChildTable = ChildTable {
    name: "endpoint_important_notes",
    columns: &["note"],
    order_column: Some("note_order"),
};

pub const HEADERS: ChildTable = ChildTable {
    name: "endpoint_headers",
    columns: &["name", "value", "description"],
    order_column: Some("header_order"),
};

pub const ADDITIONAL_EXAMPLES: ChildTable = ChildTable {
    name: "endpoint_additional_examples",
    columns: &["title", "body"],
    order_column: Some("example_order"),
};

pub const CHILD_TABLES: &[&ChildTable] = &[
    &REQUEST_SCHEMAS,
    &RESPONSE_SCHEMAS,
    &SAMPLE_REQUESTS,
    &SAMPLE_RESPONSES,
    &ERROR_RESPONSES,
    &CURL_EXAMPLES,
    &VALIDATION_NOTES,
    &FIELD_ROWS,
    &PRODUCTS,
    &IMPORTANT_NOTES,
    &HEADERS,
    &ADDITIONAL_EXAMPLES,
];
