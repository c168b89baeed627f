use indoc::formatdoc;

use crate::{Emission, Emitter, Error, OperationKind, TableIr, TechSnapshot};

/// Data-access service: one async function per operation against the
/// entity's REST resource.
pub(crate) struct ServiceEmitter;

impl Emitter for ServiceEmitter {
    fn populate(
        &self,
        ir: &TableIr,
        snapshot: &TechSnapshot,
        out: &mut Emission,
    ) -> Result<(), Error> {
        let entity = &ir.entity.pascal;
        let camel = &ir.entity.camel;
        let snake = &ir.entity.snake;
        let pk = &ir.primary_key.name;
        let pk_ty = &ir.primary_key.ty;

        out.import(format!(
            "import type {{ {entity} }} from '{}';",
            snapshot.type_import_path(&ir.entity)
        ));

        out.block(format!("const {entity_upper}_URL = '/api/{snake}';",
            entity_upper = ir.entity.snake.to_uppercase()));
        let base = format!("{}_URL", ir.entity.snake.to_uppercase());

        for operation in &ir.operations {
            let name = &operation.name;
            let block = match operation.kind {
                OperationKind::Create => formatdoc! {"
                    export async function {name}(payload: {entity}): Promise<{entity}> {{
                      const response = await fetch({base}, {{
                        method: 'POST',
                        headers: {{ 'Content-Type': 'application/json' }},
                        body: JSON.stringify(payload),
                      }});
                      return response.json();
                    }}"
                },
                OperationKind::ReadById => formatdoc! {"
                    export async function {name}(id: {pk_ty}): Promise<{entity}> {{
                      const response = await fetch(`${{{base}}}/${{id}}`);
                      return response.json();
                    }}"
                },
                OperationKind::Update => formatdoc! {"
                    export async function {name}(payload: {entity}): Promise<{entity}> {{
                      const response = await fetch(`${{{base}}}/${{payload.{pk}}}`, {{
                        method: 'PUT',
                        headers: {{ 'Content-Type': 'application/json' }},
                        body: JSON.stringify(payload),
                      }});
                      return response.json();
                    }}"
                },
                OperationKind::Delete => formatdoc! {"
                    export async function {name}(id: {pk_ty}): Promise<void> {{
                      await fetch(`${{{base}}}/${{id}}`, {{ method: 'DELETE' }});
                    }}"
                },
                OperationKind::Upsert => formatdoc! {"
                    export async function {name}(payload: {entity}): Promise<{entity}> {{
                      const response = await fetch({base}, {{
                        method: 'PUT',
                        headers: {{ 'Content-Type': 'application/json' }},
                        body: JSON.stringify(payload),
                      }});
                      return response.json();
                    }}"
                },
                OperationKind::AddRelated => {
                    let related = require_related(ir, snapshot, operation)?;
                    out.import(format!(
                        "import type {{ {} }} from '{}';",
                        related.pascal,
                        snapshot.type_import_path(related)
                    ));
                    formatdoc! {"
                        export async function {name}(
                          {camel}Id: {pk_ty},
                          related: {related_ty},
                        ): Promise<{entity}> {{
                          const response = await fetch(`${{{base}}}/${{{camel}Id}}/{related_path}`, {{
                            method: 'POST',
                            headers: {{ 'Content-Type': 'application/json' }},
                            body: JSON.stringify(related),
                          }});
                          return response.json();
                        }}",
                        related_ty = related.pascal,
                        related_path = related.snake,
                    }
                }
                OperationKind::RemoveRelated => {
                    let related = require_related(ir, snapshot, operation)?;
                    formatdoc! {"
                        export async function {name}(
                          {camel}Id: {pk_ty},
                          relatedId: {pk_ty},
                        ): Promise<void> {{
                          await fetch(`${{{base}}}/${{{camel}Id}}/{related_path}/${{relatedId}}`, {{
                            method: 'DELETE',
                          }});
                        }}",
                        related_path = related.snake,
                    }
                }
                OperationKind::SelectParent => {
                    let related = require_related(ir, snapshot, operation)?;
                    out.import(format!(
                        "import type {{ {} }} from '{}';",
                        related.pascal,
                        snapshot.type_import_path(related)
                    ));
                    formatdoc! {"
                        export async function {name}(id: {pk_ty}): Promise<{related_ty}> {{
                          const response = await fetch(`${{{base}}}/${{id}}/{related_path}`);
                          return response.json();
                        }}",
                        related_ty = related.pascal,
                        related_path = related.snake,
                    }
                }
            };
            out.block(block);
        }
        Ok(())
    }
}

fn require_related<'a>(
    ir: &TableIr,
    snapshot: &TechSnapshot,
    operation: &'a crate::OperationIr,
) -> Result<&'a crate::Naming, Error> {
    operation.related.as_ref().ok_or_else(|| {
        Error::generation(
            &ir.entity.raw,
            &snapshot.technology,
            format!("relation operation `{}` has no counterpart", operation.name),
        )
    })
}

#[cfg(test)]
mod tests {
    use crate::{default_type_map, RawSchema, Registry, Table, TechGenerator};
    use serde_json::json;

    #[test]
    fn service_functions_per_operation() {
        let schema: RawSchema = serde_json::from_value(json!({
            "tables": [{
                "table_name": "recipe",
                "primary_key": "id",
                "schema": [
                    { "column_name": "id", "data_type": "uuid", "is_required": true,
                      "is_primary_key": true, "is_foreign_key": false }
                ]
            }]
        }))
        .unwrap();
        let mut table = Table::from_raw(&schema.tables[0], &default_type_map());
        table.initialize();

        let snapshot = Registry::new().resolve("data-service").unwrap();
        let mut generator = TechGenerator::new(&table, snapshot);
        generator.initialize().unwrap();
        let artifact = generator.emit().unwrap();

        assert_eq!(artifact.path, "src/app/services/recipe.service.ts");
        for expected in [
            "const RECIPE_URL = '/api/recipe';",
            "export async function createRecipe(payload: Recipe): Promise<Recipe> {",
            "export async function getRecipeById(id: string): Promise<Recipe> {",
            "export async function deleteRecipe(id: string): Promise<void> {",
            "export async function upsertRecipe(payload: Recipe): Promise<Recipe> {",
        ] {
            assert!(
                artifact.content.contains(expected),
                "missing `{expected}` in:\n{}",
                artifact.content
            );
        }
    }
}
