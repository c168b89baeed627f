use heck::ToShoutySnakeCase;
use indoc::formatdoc;

use crate::{Emission, Emitter, Error, OperationKind, TableIr, TechSnapshot};

/// Action-type constants and action creators, one pair per operation.
pub(crate) struct ActionsEmitter;

impl Emitter for ActionsEmitter {
    fn populate(
        &self,
        ir: &TableIr,
        snapshot: &TechSnapshot,
        out: &mut Emission,
    ) -> Result<(), Error> {
        let entity = &ir.entity.pascal;
        let camel = &ir.entity.camel;
        let pk_ty = &ir.primary_key.ty;

        out.import(format!(
            "import type {{ {entity} }} from '{}';",
            snapshot.type_import_path(&ir.entity)
        ));

        for operation in &ir.operations {
            let payload_ty = match operation.kind {
                OperationKind::Create | OperationKind::Update | OperationKind::Upsert => {
                    entity.clone()
                }
                OperationKind::ReadById | OperationKind::Delete => pk_ty.clone(),
                OperationKind::AddRelated | OperationKind::RemoveRelated => {
                    let related = operation.related.as_ref().ok_or_else(|| {
                        Error::generation(
                            &ir.entity.raw,
                            &snapshot.technology,
                            format!("relation operation `{}` has no counterpart", operation.name),
                        )
                    })?;
                    out.import(format!(
                        "import type {{ {} }} from '{}';",
                        related.pascal,
                        snapshot.type_import_path(related)
                    ));
                    format!("{{ {camel}Id: {pk_ty}; related: {} }}", related.pascal)
                }
                // Parent access is a selector, not a dispatched action.
                OperationKind::SelectParent => continue,
            };

            let constant = operation.name.to_shouty_snake_case();
            out.block(format!(
                "export const {constant} = '{camel}/{}';",
                operation.name
            ));
            out.block(formatdoc! {"
                export const {name} = (payload: {payload_ty}) =>
                  ({{
                    type: {constant},
                    payload,
                  }}) as const;",
                name = operation.name,
            });
        }
        Ok(())
    }
}
