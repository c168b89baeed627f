use crate::{
    util::Naming, Column, RawInboundForeignKey, RawOutboundForeignKey, RawTable, Relation,
    RelationDirection, TypeMap,
};

/// One table of the loaded schema. Built from the raw record, then has
/// its relation lists attached by the resolver, then `initialize`d; after
/// that it is read-only and shared by every technology generator.
#[derive(Clone, Debug)]
pub struct Table {
    names: Naming,
    primary_key: String,
    columns: Vec<Column>,
    inbound: Vec<Relation>,
    outbound: Vec<Relation>,
    declared_inbound: Vec<RawInboundForeignKey>,
    declared_outbound: Vec<RawOutboundForeignKey>,
    initialized: bool,
}

impl Table {
    pub(crate) fn from_raw(raw: &RawTable, type_map: &TypeMap) -> Self {
        Self {
            names: Naming::of(&raw.table_name),
            primary_key: raw.primary_key.clone(),
            columns: raw
                .schema
                .iter()
                .map(|column| Column::from_raw(column, type_map))
                .collect(),
            inbound: Vec::new(),
            outbound: Vec::new(),
            declared_inbound: raw.inbound_foreign_keys.clone(),
            declared_outbound: raw.outbound_foreign_keys.clone(),
            initialized: false,
        }
    }

    pub fn names(&self) -> &Naming {
        &self.names
    }

    pub fn name(&self) -> &str {
        &self.names.raw
    }

    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    pub fn primary_key_column(&self) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == self.primary_key)
    }

    /// Columns in schema declaration order. The order carries no business
    /// meaning; it only keeps emitted artifacts deterministic.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn inbound_relations(&self) -> &[Relation] {
        &self.inbound
    }

    pub fn outbound_relations(&self) -> &[Relation] {
        &self.outbound
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub(crate) fn attach(&mut self, relation: Relation) {
        match relation.direction() {
            RelationDirection::Inbound => self.inbound.push(relation),
            RelationDirection::Outbound => self.outbound.push(relation),
        }
    }

    pub(crate) fn take_declared_outbound(&mut self) -> Vec<RawOutboundForeignKey> {
        std::mem::take(&mut self.declared_outbound)
    }

    pub(crate) fn take_declared_inbound(&mut self) -> Vec<RawInboundForeignKey> {
        std::mem::take(&mut self.declared_inbound)
    }

    /// Finalize after relation attachment: order the relation lists so
    /// downstream output is deterministic, then freeze. Idempotent.
    pub(crate) fn initialize(&mut self) {
        let by_edge = |a: &Relation, b: &Relation| {
            (a.counterpart().raw.as_str(), a.constraint_name())
                .cmp(&(b.counterpart().raw.as_str(), b.constraint_name()))
        };
        self.inbound.sort_by(by_edge);
        self.outbound.sort_by(by_edge);
        self.initialized = true;
    }
}
