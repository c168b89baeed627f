use serde::Deserialize;
use serde_json::Value;

use crate::Error;

/// Wire shape handed over by a schema source. Field names match the
/// provider's JSON payload and are never used directly by generators;
/// the `entity` module is the canonical model after loading.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawSchema {
    pub tables: Vec<RawTable>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawTable {
    pub table_name: String,
    pub primary_key: String,
    #[serde(default)]
    pub schema: Vec<RawColumn>,
    #[serde(default)]
    pub inbound_foreign_keys: Vec<RawInboundForeignKey>,
    #[serde(default)]
    pub outbound_foreign_keys: Vec<RawOutboundForeignKey>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawColumn {
    pub column_name: String,
    pub data_type: String,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub default_value: Option<Value>,
    #[serde(default)]
    pub is_primary_key: Option<bool>,
    #[serde(default)]
    pub is_foreign_key: bool,
}

/// A foreign key declared from the referenced table's point of view.
/// `referencing_table` can be absent in raw listings; resolution then
/// falls back to inference from the constraint name.
#[derive(Clone, Debug, Deserialize)]
pub struct RawInboundForeignKey {
    pub constraint_name: String,
    #[serde(default)]
    pub referencing_table: Option<String>,
    #[serde(default)]
    pub referencing_column: Option<String>,
    #[serde(default)]
    pub local_referenced_column: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawOutboundForeignKey {
    pub constraint_name: String,
    #[serde(default)]
    pub local_referencing_column: Option<String>,
    #[serde(default)]
    pub referenced_table: Option<String>,
    #[serde(default)]
    pub referenced_column: Option<String>,
}

/// Seam to the external schema source. Live introspection, a static
/// listing and test fixtures all plug in here.
pub trait SchemaProvider {
    fn load(&self) -> Result<RawSchema, Error>;
}

impl SchemaProvider for RawSchema {
    fn load(&self) -> Result<RawSchema, Error> {
        Ok(self.clone())
    }
}

/// Provider over a JSON document in the wire shape above.
#[derive(Clone, Debug)]
pub struct JsonSchemaProvider {
    source: String,
}

impl JsonSchemaProvider {
    pub fn new<S: Into<String>>(source: S) -> Self {
        Self {
            source: source.into(),
        }
    }
}

impl SchemaProvider for JsonSchemaProvider {
    fn load(&self) -> Result<RawSchema, Error> {
        Ok(serde_json::from_str(&self.source)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_shape() {
        let provider = JsonSchemaProvider::new(
            r#"{
                "tables": [
                    {
                        "table_name": "recipe",
                        "primary_key": "id",
                        "schema": [
                            { "column_name": "id", "data_type": "uuid",
                              "options": null, "is_required": true,
                              "default_value": null, "is_primary_key": true,
                              "is_foreign_key": false }
                        ],
                        "inbound_foreign_keys": [],
                        "outbound_foreign_keys": []
                    }
                ]
            }"#,
        );
        let schema = provider.load().unwrap();
        assert_eq!(schema.tables.len(), 1);
        assert_eq!(schema.tables[0].table_name, "recipe");
        assert_eq!(schema.tables[0].schema[0].is_primary_key, Some(true));
    }

    #[test]
    fn malformed_json_is_a_schema_error() {
        let provider = JsonSchemaProvider::new("{ not json");
        assert!(matches!(provider.load(), Err(Error::Schema(_))));
    }
}
