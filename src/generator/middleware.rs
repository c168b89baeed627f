use indoc::formatdoc;

use crate::{Emission, Emitter, Error, OperationKind, TableIr, TechSnapshot};

/// Store middleware that observes this entity's dispatched operations.
pub(crate) struct MiddlewareEmitter;

impl Emitter for MiddlewareEmitter {
    fn populate(
        &self,
        ir: &TableIr,
        _snapshot: &TechSnapshot,
        out: &mut Emission,
    ) -> Result<(), Error> {
        let camel = &ir.entity.camel;

        let handled = ir
            .operations
            .iter()
            .filter(|operation| operation.kind != OperationKind::SelectParent)
            .map(|operation| format!("  '{camel}/{}',", operation.name))
            .collect::<Vec<_>>()
            .join("\n");

        out.block(formatdoc! {"
            type StoreAction = {{ type: string; payload?: unknown }};

            const handled{entity}Actions = new Set<string>([
            {handled}
            ]);",
            entity = ir.entity.pascal,
        });

        out.block(formatdoc! {"
            export const {camel}Middleware =
              (store: {{ dispatch: (action: StoreAction) => void }}) =>
              (next: (action: StoreAction) => unknown) =>
              (action: StoreAction) => {{
                if (handled{entity}Actions.has(action.type)) {{
                  console.debug('[{camel}]', action.type, action.payload);
                }}
                return next(action);
              }};",
            entity = ir.entity.pascal,
        });
        Ok(())
    }
}
