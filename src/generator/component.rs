use indoc::formatdoc;

use crate::{Emission, Emitter, Error, TableIr, TechSnapshot};

/// Presentational UI binding listing the entity's scalar fields.
pub(crate) struct ComponentEmitter;

impl Emitter for ComponentEmitter {
    fn populate(
        &self,
        ir: &TableIr,
        snapshot: &TechSnapshot,
        out: &mut Emission,
    ) -> Result<(), Error> {
        let entity = &ir.entity.pascal;
        let camel = &ir.entity.camel;

        out.import(format!(
            "import type {{ {entity} }} from '{}';",
            snapshot.type_import_path(&ir.entity)
        ));

        let rows = ir
            .fields
            .iter()
            .map(|field| {
                format!(
                    "      <dt>{name}</dt>\n      <dd>{{String({camel}.{name} ?? '')}}</dd>",
                    name = field.name
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        out.block(formatdoc! {"
            export interface {entity}ViewProps {{
              {camel}: {entity};
            }}"
        });

        out.block(formatdoc! {"
            export function {entity}View({{ {camel} }}: {entity}ViewProps) {{
              return (
                <dl className=\"{snake}-view\">
            {rows}
                </dl>
              );
            }}",
            snake = ir.entity.snake.replace('_', "-"),
        });
        Ok(())
    }
}
