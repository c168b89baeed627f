use indoc::formatdoc;

use crate::{Emission, Emitter, Error, OperationKind, TableIr, TechSnapshot};

/// State-container model: normalized state shape, initial state and a
/// reducer with one case per operation of the entity's operation set.
pub(crate) struct ModelEmitter;

impl Emitter for ModelEmitter {
    fn populate(
        &self,
        ir: &TableIr,
        snapshot: &TechSnapshot,
        out: &mut Emission,
    ) -> Result<(), Error> {
        let entity = &ir.entity.pascal;
        let camel = &ir.entity.camel;
        let pk = &ir.primary_key.name;
        let pk_ty = &ir.primary_key.ty;

        out.import(format!(
            "import type {{ {entity} }} from '{}';",
            snapshot.type_import_path(&ir.entity)
        ));
        for related in &ir.related_entities {
            out.import(format!(
                "import type {{ {} }} from '{}';",
                related.pascal,
                snapshot.type_import_path(related)
            ));
        }

        out.block(formatdoc! {"
            export interface {entity}State {{
              byId: Record<string, {entity}>;
              allIds: string[];
            }}"
        });

        out.block(formatdoc! {"
            export const initial{entity}State: {entity}State = {{
              byId: {{}},
              allIds: [],
            }};"
        });

        let mut cases = Vec::new();
        for operation in &ir.operations {
            let action_type = format!("{camel}/{}", operation.name);
            match operation.kind {
                OperationKind::Create | OperationKind::Update | OperationKind::Upsert => {
                    cases.push(formatdoc! {"
                            case '{action_type}': {{
                              const {camel} = action.payload as {entity};
                              return {{
                                byId: {{ ...state.byId, [{camel}.{pk}]: {camel} }},
                                allIds: state.allIds.includes({camel}.{pk})
                                  ? state.allIds
                                  : [...state.allIds, {camel}.{pk}],
                              }};
                            }}"
                    });
                }
                OperationKind::Delete => {
                    cases.push(formatdoc! {"
                            case '{action_type}': {{
                              const id = action.payload as {pk_ty};
                              const {{ [id]: removed, ...byId }} = state.byId;
                              return {{
                                byId,
                                allIds: state.allIds.filter((known) => known !== id),
                              }};
                            }}"
                    });
                }
                OperationKind::ReadById => {
                    // Reads do not change the container.
                    cases.push(formatdoc! {"
                            case '{action_type}':
                              return state;"
                    });
                }
                OperationKind::AddRelated => {
                    let related = operation
                        .related
                        .as_ref()
                        .ok_or_else(|| missing_related(ir, snapshot, &operation.name))?;
                    let collection = related.camel_plural();
                    let related_ty = &related.pascal;
                    cases.push(formatdoc! {"
                            case '{action_type}': {{
                              const {{ {camel}Id, related }} = action.payload as {{
                                {camel}Id: {pk_ty};
                                related: {related_ty};
                              }};
                              const {camel} = state.byId[{camel}Id];
                              if (!{camel}) return state;
                              return {{
                                ...state,
                                byId: {{
                                  ...state.byId,
                                  [{camel}Id]: {{
                                    ...{camel},
                                    {collection}: [...({camel}.{collection} ?? []), related],
                                  }},
                                }},
                              }};
                            }}"
                    });
                }
                OperationKind::RemoveRelated => {
                    let related = operation
                        .related
                        .as_ref()
                        .ok_or_else(|| missing_related(ir, snapshot, &operation.name))?;
                    let collection = related.camel_plural();
                    let related_ty = &related.pascal;
                    cases.push(formatdoc! {"
                            case '{action_type}': {{
                              const {{ {camel}Id, related }} = action.payload as {{
                                {camel}Id: {pk_ty};
                                related: {related_ty};
                              }};
                              const {camel} = state.byId[{camel}Id];
                              if (!{camel}) return state;
                              return {{
                                ...state,
                                byId: {{
                                  ...state.byId,
                                  [{camel}Id]: {{
                                    ...{camel},
                                    {collection}: ({camel}.{collection} ?? []).filter(
                                      (entry) => entry !== related,
                                    ),
                                  }},
                                }},
                              }};
                            }}"
                    });
                }
                OperationKind::SelectParent => {
                    // Parent accessors live in the selectors artifact.
                }
            }
        }

        let cases = cases
            .join("\n")
            .lines()
            .map(|line| {
                if line.is_empty() {
                    line.to_owned()
                } else {
                    format!("    {line}")
                }
            })
            .collect::<Vec<_>>()
            .join("\n");

        out.block(formatdoc! {"
            export function {camel}Reducer(
              state: {entity}State = initial{entity}State,
              action: {{ type: string; payload?: unknown }},
            ): {entity}State {{
              switch (action.type) {{
            {cases}
                default:
                  return state;
              }}
            }}"
        });
        Ok(())
    }
}

fn missing_related(ir: &TableIr, snapshot: &TechSnapshot, operation: &str) -> Error {
    Error::generation(
        &ir.entity.raw,
        &snapshot.technology,
        format!("relation operation `{operation}` has no counterpart entity"),
    )
}

#[cfg(test)]
mod tests {
    use crate::{default_type_map, RawSchema, Registry, Table, TechGenerator};
    use serde_json::json;
    use std::collections::BTreeMap;

    #[test]
    fn reducer_covers_the_operation_set() {
        let schema: RawSchema = serde_json::from_value(json!({
            "tables": [
                {
                    "table_name": "recipe",
                    "primary_key": "id",
                    "schema": [
                        { "column_name": "id", "data_type": "uuid", "is_required": true,
                          "is_primary_key": true, "is_foreign_key": false }
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

        let snapshot = Registry::new().resolve("redux-model").unwrap();
        let mut generator = TechGenerator::new(&tables["recipe"], snapshot);
        generator.initialize().unwrap();
        let artifact = generator.emit().unwrap();

        assert_eq!(artifact.path, "src/app/state/models/recipe.model.ts");
        for expected in [
            "export interface RecipeState {",
            "export const initialRecipeState: RecipeState = {",
            "case 'recipe/createRecipe':",
            "case 'recipe/getRecipeById':",
            "case 'recipe/updateRecipe':",
            "case 'recipe/deleteRecipe':",
            "case 'recipe/upsertRecipe':",
            "case 'recipe/addRecipeBrokerToRecipe':",
            "case 'recipe/removeRecipeBrokerFromRecipe':",
            "recipeBrokers: [...(recipe.recipeBrokers ?? []), related],",
        ] {
            assert!(
                artifact.content.contains(expected),
                "missing `{expected}` in:\n{}",
                artifact.content
            );
        }
    }
}
