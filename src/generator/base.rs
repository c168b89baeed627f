use std::collections::BTreeSet;

use tracing::info;

use crate::{
    build_ir, Error, GeneratorKind, Table, TableIr, TechSnapshot,
};

use super::{
    actions::ActionsEmitter, component::ComponentEmitter, middleware::MiddlewareEmitter,
    model::ModelEmitter, selectors::SelectorsEmitter, service::ServiceEmitter, types::TypesEmitter,
};

/// The emitted text for one (table, technology) pair, with the path it
/// belongs at. Persistence is the caller's concern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    pub path: String,
    pub content: String,
}

/// Accumulators a concrete emitter populates: a deduplicated,
/// order-independent import set and an ordered list of code blocks.
#[derive(Debug, Default)]
pub struct Emission {
    imports: BTreeSet<String>,
    blocks: Vec<String>,
}

impl Emission {
    pub fn import<S: Into<String>>(&mut self, statement: S) {
        self.imports.insert(statement.into());
    }

    pub fn block<S: Into<String>>(&mut self, block: S) {
        self.blocks.push(block.into());
    }
}

/// What each concrete generator contributes: given the table's IR and the
/// resolved snapshot, fill the import and block accumulators. Runs only
/// from `TechGenerator::initialize`, never on an uninitialized pair.
pub(crate) trait Emitter {
    fn populate(&self, ir: &TableIr, snapshot: &TechSnapshot, out: &mut Emission)
        -> Result<(), Error>;
}

pub(crate) fn emitter_for(kind: GeneratorKind) -> &'static dyn Emitter {
    match kind {
        GeneratorKind::Types => &TypesEmitter,
        GeneratorKind::Model => &ModelEmitter,
        GeneratorKind::Actions => &ActionsEmitter,
        GeneratorKind::Selectors => &SelectorsEmitter,
        GeneratorKind::Middleware => &MiddlewareEmitter,
        GeneratorKind::Service => &ServiceEmitter,
        GeneratorKind::Component => &ComponentEmitter,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    Constructed,
    Initialized,
    Emitted,
}

/// Per-(table, technology) lifecycle object. `constructed` holds the
/// table and its resolved snapshot; `initialize` reduces the table to its
/// IR and runs the concrete emitter into the accumulators; `emit`
/// concatenates them into the final artifact. Re-initializing on the same
/// inputs resets the accumulators first, so the artifact text comes out
/// byte-identical.
#[derive(Debug)]
pub struct TechGenerator<'a> {
    table: &'a Table,
    snapshot: TechSnapshot,
    stage: Stage,
    ir: Option<TableIr>,
    emission: Emission,
}

impl<'a> TechGenerator<'a> {
    pub fn new(table: &'a Table, snapshot: TechSnapshot) -> Self {
        Self {
            table,
            snapshot,
            stage: Stage::Constructed,
            ir: None,
            emission: Emission::default(),
        }
    }

    pub fn snapshot(&self) -> &TechSnapshot {
        &self.snapshot
    }

    pub fn ir(&self) -> Option<&TableIr> {
        self.ir.as_ref()
    }

    pub fn initialize(&mut self) -> Result<(), Error> {
        self.emission = Emission::default();
        let ir = build_ir(self.table, &self.snapshot)?;
        emitter_for(self.snapshot.kind).populate(&ir, &self.snapshot, &mut self.emission)?;
        self.ir = Some(ir);
        self.stage = Stage::Initialized;
        Ok(())
    }

    /// Concatenate imports and code blocks into the artifact text.
    pub fn emit(&mut self) -> Result<Artifact, Error> {
        if self.stage == Stage::Constructed {
            return Err(Error::generation(
                self.table.name(),
                &self.snapshot.technology,
                "emit called before initialize",
            ));
        }
        let mut sections: Vec<String> = Vec::new();
        if !self.emission.imports.is_empty() {
            sections.push(
                self.emission
                    .imports
                    .iter()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join("\n"),
            );
        }
        sections.extend(self.emission.blocks.iter().cloned());
        let content = format!("{}\n", sections.join("\n\n"));

        let path = self.snapshot.file_path(self.table.names());
        info!(
            table = self.table.name(),
            technology = self.snapshot.technology.as_str(),
            path = path.as_str(),
            "generated artifact"
        );
        self.stage = Stage::Emitted;
        Ok(Artifact { path, content })
    }
}
