use crate::{util::escape_target_keyword, util::Naming, Error, Table, TechSnapshot};

/// One emitted field: name already camel-cased and keyword-escaped, type
/// already in the target language.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldIr {
    pub name: String,
    pub ty: String,
    pub optional: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperationKind {
    Create,
    ReadById,
    Update,
    Delete,
    Upsert,
    AddRelated,
    RemoveRelated,
    SelectParent,
}

/// One named operation of the entity's fixed operation set.
#[derive(Clone, Debug)]
pub struct OperationIr {
    pub kind: OperationKind,
    pub name: String,
    /// Counterpart entity for relation-derived operations.
    pub related: Option<Naming>,
}

/// The structured intermediate representation one (table, snapshot) pair
/// reduces to. Built once, then rendered by each technology's emitter;
/// no emitter re-derives names or types on its own.
#[derive(Clone, Debug)]
pub struct TableIr {
    pub entity: Naming,
    pub primary_key: FieldIr,
    /// Non-foreign-key columns, in schema order.
    pub fields: Vec<FieldIr>,
    /// One optional array field per inbound relation.
    pub collections: Vec<FieldIr>,
    /// One optional reference field per outbound relation.
    pub references: Vec<FieldIr>,
    /// Pascal names of every related entity, deduplicated and ordered,
    /// for cross-artifact type imports.
    pub related_entities: Vec<Naming>,
    pub operations: Vec<OperationIr>,
}

pub(crate) fn build_ir(table: &Table, snapshot: &TechSnapshot) -> Result<TableIr, Error> {
    let fail = |message: String| Error::generation(table.name(), &snapshot.technology, message);

    if table.name().is_empty() {
        return Err(fail("table is missing its table_name".to_owned()));
    }
    let entity = table.names().clone();
    let pascal = entity.pascal.clone();

    let primary_key = match table.primary_key_column() {
        Some(column) => FieldIr {
            name: escape_target_keyword(&column.names().camel),
            ty: column.target_type(),
            optional: false,
        },
        None => {
            return Err(fail(format!(
                "primary key column `{}` not present in schema",
                table.primary_key()
            )))
        }
    };

    let fields = table
        .columns()
        .iter()
        .filter(|column| !column.is_foreign_key())
        .map(|column| FieldIr {
            name: escape_target_keyword(&column.names().camel),
            ty: column.target_type(),
            optional: column.is_nullable(),
        })
        .collect();

    let collections = table
        .inbound_relations()
        .iter()
        .map(|relation| FieldIr {
            name: escape_target_keyword(relation.collection_field()),
            ty: format!("{}[]", relation.counterpart().pascal),
            optional: true,
        })
        .collect();

    let references = table
        .outbound_relations()
        .iter()
        .map(|relation| FieldIr {
            name: escape_target_keyword(relation.reference_field()),
            ty: relation.counterpart().pascal.clone(),
            optional: true,
        })
        .collect();

    let mut related_entities: Vec<Naming> = Vec::new();
    for relation in table
        .inbound_relations()
        .iter()
        .chain(table.outbound_relations())
    {
        if related_entities
            .iter()
            .all(|known| known.raw != relation.counterpart().raw)
        {
            related_entities.push(relation.counterpart().clone());
        }
    }
    related_entities.sort_by(|a, b| a.raw.cmp(&b.raw));

    let mut operations = vec![
        OperationIr {
            kind: OperationKind::Create,
            name: format!("create{pascal}"),
            related: None,
        },
        OperationIr {
            kind: OperationKind::ReadById,
            name: format!("get{pascal}ById"),
            related: None,
        },
        OperationIr {
            kind: OperationKind::Update,
            name: format!("update{pascal}"),
            related: None,
        },
        OperationIr {
            kind: OperationKind::Delete,
            name: format!("delete{pascal}"),
            related: None,
        },
        OperationIr {
            kind: OperationKind::Upsert,
            name: format!("upsert{pascal}"),
            related: None,
        },
    ];
    for relation in table.inbound_relations() {
        let related = relation.counterpart().clone();
        operations.push(OperationIr {
            kind: OperationKind::AddRelated,
            name: format!("add{}To{pascal}", related.pascal),
            related: Some(related.clone()),
        });
        operations.push(OperationIr {
            kind: OperationKind::RemoveRelated,
            name: format!("remove{}From{pascal}", related.pascal),
            related: Some(related),
        });
    }
    for relation in table.outbound_relations() {
        let related = relation.counterpart().clone();
        operations.push(OperationIr {
            kind: OperationKind::SelectParent,
            name: format!("select{}Of{pascal}", related.pascal),
            related: Some(related),
        });
    }

    Ok(TableIr {
        entity,
        primary_key,
        fields,
        collections,
        references,
        related_entities,
        operations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{default_type_map, RawSchema, Registry, Table, TechGenerator};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn keyword_pk_tables() -> BTreeMap<String, Table> {
        let schema: RawSchema = serde_json::from_value(json!({
            "tables": [
                {
                    "table_name": "recipe",
                    "primary_key": "delete",
                    "schema": [
                        { "column_name": "delete", "data_type": "uuid", "is_required": true,
                          "is_primary_key": true, "is_foreign_key": false },
                        { "column_name": "name", "data_type": "text", "is_required": true,
                          "is_foreign_key": false }
                    ]
                }
            ]
        }))
        .unwrap();
        let type_map = default_type_map();
        schema
            .tables
            .iter()
            .map(|raw| (raw.table_name.clone(), Table::from_raw(raw, &type_map)))
            .collect()
    }

    #[test]
    fn keyword_named_primary_key_is_escaped_once_for_all_emitters() {
        let mut tables = keyword_pk_tables();
        crate::resolve_relations(&mut tables);

        let snapshot = Registry::new().resolve("typescript-types").unwrap();
        let ir = build_ir(&tables["recipe"], &snapshot).unwrap();
        assert_eq!(ir.primary_key.name, "delete_");
        // The column list carries the same escaped name.
        assert_eq!(ir.fields[0].name, "delete_");

        let mut generator = TechGenerator::new(&tables["recipe"], snapshot);
        generator.initialize().unwrap();
        let types = generator.emit().unwrap();
        assert!(types.content.contains("delete_: string;"));

        let snapshot = Registry::new().resolve("redux-model").unwrap();
        let mut generator = TechGenerator::new(&tables["recipe"], snapshot);
        generator.initialize().unwrap();
        let model = generator.emit().unwrap();
        assert!(model.content.contains("delete_"));
        assert!(!model.content.contains(".delete]"));
    }
}
