use indoc::formatdoc;

use crate::{Emission, Emitter, Error, TableIr, TechSnapshot};

/// Type declaration for one entity: one field per non-foreign-key column,
/// an optional array field per inbound relation and an optional reference
/// field per outbound relation.
pub(crate) struct TypesEmitter;

impl Emitter for TypesEmitter {
    fn populate(
        &self,
        ir: &TableIr,
        snapshot: &TechSnapshot,
        out: &mut Emission,
    ) -> Result<(), Error> {
        for related in &ir.related_entities {
            out.import(format!(
                "import type {{ {} }} from '{}';",
                related.pascal,
                snapshot.type_import_path(related)
            ));
        }

        let mut lines = Vec::new();
        for field in ir
            .fields
            .iter()
            .chain(ir.references.iter())
            .chain(ir.collections.iter())
        {
            let marker = if field.optional { "?" } else { "" };
            lines.push(format!("  {}{marker}: {};", field.name, field.ty));
        }

        out.block(formatdoc! {"
            export interface {entity} {{
            {fields}
            }}",
            entity = ir.entity.pascal,
            fields = lines.join("\n"),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{default_type_map, RawSchema, Registry, Table, TechGenerator};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn resolved_tables() -> BTreeMap<String, Table> {
        let schema: RawSchema = serde_json::from_value(json!({
            "tables": [
                {
                    "table_name": "recipe",
                    "primary_key": "id",
                    "schema": [
                        { "column_name": "id", "data_type": "uuid", "is_required": true,
                          "is_primary_key": true, "is_foreign_key": false },
                        { "column_name": "name", "data_type": "text", "is_required": true,
                          "is_foreign_key": false }
                    ]
                },
                {
                    "table_name": "recipe_broker",
                    "primary_key": "id",
                    "schema": [
                        { "column_name": "id", "data_type": "uuid", "is_required": true,
                          "is_primary_key": true, "is_foreign_key": false },
                        { "column_name": "recipe", "data_type": "uuid", "is_required": true,
                          "is_foreign_key": true }
                    ],
                    "outbound_foreign_keys": [
                        { "constraint_name": "recipe_broker_recipe_fkey",
                          "local_referencing_column": "recipe",
                          "referenced_table": "recipe",
                          "referenced_column": "id" }
                    ]
                }
            ]
        }))
        .unwrap();
        let type_map = default_type_map();
        let mut tables: BTreeMap<String, Table> = schema
            .tables
            .iter()
            .map(|raw| (raw.table_name.clone(), Table::from_raw(raw, &type_map)))
            .collect();
        crate::resolve_relations(&mut tables);
        tables
    }

    #[test]
    fn entity_with_inbound_relation() {
        let tables = resolved_tables();
        let snapshot = Registry::new().resolve("typescript-types").unwrap();
        let mut generator = TechGenerator::new(&tables["recipe"], snapshot);
        generator.initialize().unwrap();
        let artifact = generator.emit().unwrap();

        assert_eq!(artifact.path, "src/app/types/Recipe.ts");
        assert_eq!(
            artifact.content,
            "import type { RecipeBroker } from '@app/types/RecipeBroker';\n\
             \n\
             export interface Recipe {\n  \
               id: string;\n  \
               name: string;\n  \
               recipeBrokers?: RecipeBroker[];\n\
             }\n"
        );
    }

    #[test]
    fn entity_with_outbound_relation() {
        let tables = resolved_tables();
        let snapshot = Registry::new().resolve("typescript-types").unwrap();
        let mut generator = TechGenerator::new(&tables["recipe_broker"], snapshot);
        generator.initialize().unwrap();
        let artifact = generator.emit().unwrap();

        // The raw foreign-key column is replaced by the typed reference.
        assert_eq!(
            artifact.content,
            "import type { Recipe } from '@app/types/Recipe';\n\
             \n\
             export interface RecipeBroker {\n  \
               id: string;\n  \
               recipe?: Recipe;\n\
             }\n"
        );
    }
}
