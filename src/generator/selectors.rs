use indoc::formatdoc;

use crate::{Emission, Emitter, Error, OperationKind, TableIr, TechSnapshot};

/// Read accessors over the entity's state slice: by-id and all-entities
/// selectors, one collection selector per inbound relation and one parent
/// selector per outbound relation.
pub(crate) struct SelectorsEmitter;

impl Emitter for SelectorsEmitter {
    fn populate(
        &self,
        ir: &TableIr,
        snapshot: &TechSnapshot,
        out: &mut Emission,
    ) -> Result<(), Error> {
        let entity = &ir.entity.pascal;
        let camel = &ir.entity.camel;
        let pk_ty = &ir.primary_key.ty;
        let plural = ir.entity.pascal_plural();

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
            type With{entity}State = {{
              {camel}: {{ byId: Record<string, {entity}>; allIds: string[] }};
            }};"
        });

        out.block(formatdoc! {"
            export const select{entity}ById = (
              state: With{entity}State,
              id: {pk_ty},
            ): {entity} | undefined => state.{camel}.byId[id];"
        });

        out.block(formatdoc! {"
            export const selectAll{plural} = (state: With{entity}State): {entity}[] =>
              state.{camel}.allIds.map((id) => state.{camel}.byId[id]);"
        });

        // Collection fields and add-related operations both come from the
        // inbound relation list, in the same order.
        let add_related = ir
            .operations
            .iter()
            .filter(|operation| operation.kind == OperationKind::AddRelated);
        for (field, operation) in ir.collections.iter().zip(add_related) {
            let collection = &field.name;
            let ty = &field.ty;
            let related = operation.related.as_ref().ok_or_else(|| {
                Error::generation(
                    &ir.entity.raw,
                    &snapshot.technology,
                    format!("relation operation `{}` has no counterpart", operation.name),
                )
            })?;
            out.block(formatdoc! {"
                export const select{pascal_collection}Of{entity} = (
                  state: With{entity}State,
                  id: {pk_ty},
                ): {ty} => state.{camel}.byId[id]?.{collection} ?? [];",
                pascal_collection = related.pascal_plural(),
            });
        }

        for operation in &ir.operations {
            if operation.kind != OperationKind::SelectParent {
                continue;
            }
            let related = operation.related.as_ref().ok_or_else(|| {
                Error::generation(
                    &ir.entity.raw,
                    &snapshot.technology,
                    format!("relation operation `{}` has no counterpart", operation.name),
                )
            })?;
            out.block(formatdoc! {"
                export const {name} = (
                  state: With{entity}State,
                  id: {pk_ty},
                ): {related_ty} | undefined => state.{camel}.byId[id]?.{reference};",
                name = operation.name,
                related_ty = related.pascal,
                reference = related.camel,
            });
        }
        Ok(())
    }
}
