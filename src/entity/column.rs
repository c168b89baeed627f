use serde_json::Value;

use crate::{util::Naming, RawColumn, TypeMap};

/// One column of a table, with its name variants and target type resolved
/// at construction. Owned by its [`Table`](crate::Table) and read-only
/// once the table is initialized.
#[derive(Clone, Debug)]
pub struct Column {
    names: Naming,
    data_type: String,
    target_type: String,
    nullable: bool,
    default_value: Option<Value>,
    primary_key: bool,
    foreign_key: bool,
    enum_values: Option<Vec<String>>,
}

impl Column {
    pub(crate) fn from_raw(raw: &RawColumn, type_map: &TypeMap) -> Self {
        let target_type = type_map
            .get(&raw.data_type)
            .cloned()
            .unwrap_or_else(|| "unknown".to_owned());
        Self {
            names: Naming::of(&raw.column_name),
            data_type: raw.data_type.clone(),
            target_type,
            nullable: !raw.is_required,
            default_value: raw.default_value.clone(),
            primary_key: raw.is_primary_key.unwrap_or(false),
            foreign_key: raw.is_foreign_key,
            enum_values: raw.options.clone(),
        }
    }

    pub fn names(&self) -> &Naming {
        &self.names
    }

    pub fn name(&self) -> &str {
        &self.names.raw
    }

    pub fn data_type(&self) -> &str {
        &self.data_type
    }

    /// Target-language type: the enum union when the column carries an
    /// enumerated value set, otherwise the mapped scalar type.
    pub fn target_type(&self) -> String {
        match &self.enum_values {
            Some(values) if !values.is_empty() => values
                .iter()
                .map(|value| format!("'{value}'"))
                .collect::<Vec<_>>()
                .join(" | "),
            _ => self.target_type.clone(),
        }
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }

    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    pub fn is_foreign_key(&self) -> bool {
        self.foreign_key
    }

    pub fn enum_values(&self) -> Option<&[String]> {
        self.enum_values.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::default_type_map;
    use pretty_assertions::assert_eq;

    fn raw(name: &str, data_type: &str) -> RawColumn {
        RawColumn {
            column_name: name.to_owned(),
            data_type: data_type.to_owned(),
            options: None,
            is_required: true,
            default_value: None,
            is_primary_key: None,
            is_foreign_key: false,
        }
    }

    #[test]
    fn resolves_target_type_from_map() {
        let column = Column::from_raw(&raw("created_at", "timestamptz"), &default_type_map());
        assert_eq!(column.target_type(), "Date");
        assert_eq!(column.names().camel, "createdAt");
        assert!(!column.is_nullable());
    }

    #[test]
    fn unknown_data_type_falls_back() {
        let column = Column::from_raw(&raw("blob", "tsvector"), &default_type_map());
        assert_eq!(column.target_type(), "unknown");
    }

    #[test]
    fn enum_options_become_a_union() {
        let mut raw = raw("status", "text");
        raw.options = Some(vec!["draft".to_owned(), "published".to_owned()]);
        let column = Column::from_raw(&raw, &default_type_map());
        assert_eq!(column.target_type(), "'draft' | 'published'");
    }
}
