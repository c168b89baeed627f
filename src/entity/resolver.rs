use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use tracing::warn;

use crate::{Relation, RelationDirection, Table};

/// A foreign key that could not be cross-linked. The relation is dropped;
/// the owning table keeps processing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolutionWarning {
    pub table: String,
    pub constraint: String,
    pub message: String,
}

impl ResolutionWarning {
    fn record(
        warnings: &mut Vec<ResolutionWarning>,
        table: &str,
        constraint: &str,
        message: String,
    ) {
        warn!(table, constraint, "{message}");
        warnings.push(ResolutionWarning {
            table: table.to_owned(),
            constraint: constraint.to_owned(),
            message,
        });
    }
}

impl fmt::Display for ResolutionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "table `{}`, constraint `{}`: {}",
            self.table, self.constraint, self.message
        )
    }
}

/// Cross-link every table's declared foreign keys into symmetric
/// inbound/outbound relation records, in two passes over the registry.
///
/// Pass 1 walks declared outbound keys: each one that names a known
/// referenced table is attached as outbound on the referencing table and
/// mirrored as inbound on the referenced table. Pass 2 walks declared
/// inbound keys that Pass 1 did not cover; a missing referencing-table
/// field is inferred from the token before the first underscore of the
/// constraint name, a known-fragile guess that is only trusted when it
/// names a registered table.
///
/// Malformed or dangling keys are dropped with a warning, never raised.
/// Every table is initialized afterwards, so the registry comes out
/// whole: no partially linked table is ever observable downstream.
pub fn resolve_relations(registry: &mut BTreeMap<String, Table>) -> Vec<ResolutionWarning> {
    let mut warnings = Vec::new();
    let mut linked: BTreeSet<(String, String)> = BTreeSet::new();
    let table_names: Vec<String> = registry.keys().cloned().collect();

    // Pass 1: outbound-driven linking.
    let mut pending_inbound: BTreeMap<String, Vec<Relation>> = BTreeMap::new();
    for name in &table_names {
        let declared = registry
            .get_mut(name)
            .map(Table::take_declared_outbound)
            .unwrap_or_default();
        for fk in declared {
            let (Some(local_column), Some(ref_table), Some(ref_column)) = (
                fk.local_referencing_column.as_deref(),
                fk.referenced_table.as_deref(),
                fk.referenced_column.as_deref(),
            ) else {
                ResolutionWarning::record(
                    &mut warnings,
                    name,
                    &fk.constraint_name,
                    "outbound foreign key is missing a required field".to_owned(),
                );
                continue;
            };
            if !registry.contains_key(ref_table) {
                ResolutionWarning::record(
                    &mut warnings,
                    name,
                    &fk.constraint_name,
                    format!("referenced table `{ref_table}` not found"),
                );
                continue;
            }
            let outbound = Relation::new(
                RelationDirection::Outbound,
                &fk.constraint_name,
                local_column,
                ref_table,
                ref_column,
            );
            let inbound = Relation::new(
                RelationDirection::Inbound,
                &fk.constraint_name,
                ref_column,
                name,
                local_column,
            );
            linked.insert((ref_table.to_owned(), fk.constraint_name.clone()));
            pending_inbound
                .entry(ref_table.to_owned())
                .or_default()
                .push(inbound);
            if let Some(table) = registry.get_mut(name) {
                table.attach(outbound);
            }
        }
    }
    for (name, relations) in pending_inbound {
        if let Some(table) = registry.get_mut(&name) {
            for relation in relations {
                table.attach(relation);
            }
        }
    }

    // Pass 2: reconcile declared inbound keys Pass 1 did not produce.
    for name in &table_names {
        let declared = registry
            .get_mut(name)
            .map(Table::take_declared_inbound)
            .unwrap_or_default();
        for fk in declared {
            if linked.contains(&(name.clone(), fk.constraint_name.clone())) {
                continue;
            }
            let inferred;
            let referencing_table = match fk.referencing_table.as_deref() {
                Some(table) => table,
                None => {
                    // Guess the referencing table from the constraint-name
                    // prefix; only a registry match is trusted.
                    inferred = fk
                        .constraint_name
                        .split('_')
                        .next()
                        .unwrap_or_default()
                        .to_owned();
                    &inferred
                }
            };
            if !registry.contains_key(referencing_table) {
                ResolutionWarning::record(
                    &mut warnings,
                    name,
                    &fk.constraint_name,
                    format!("referencing table `{referencing_table}` not found"),
                );
                continue;
            }
            let (Some(local_column), Some(ref_column)) = (
                fk.local_referenced_column.as_deref(),
                fk.referencing_column.as_deref(),
            ) else {
                ResolutionWarning::record(
                    &mut warnings,
                    name,
                    &fk.constraint_name,
                    "inbound foreign key is missing a required field".to_owned(),
                );
                continue;
            };
            let inbound = Relation::new(
                RelationDirection::Inbound,
                &fk.constraint_name,
                local_column,
                referencing_table,
                ref_column,
            );
            linked.insert((name.clone(), fk.constraint_name.clone()));
            if let Some(table) = registry.get_mut(name) {
                table.attach(inbound);
            }
        }
    }

    for table in registry.values_mut() {
        table.initialize();
    }
    warnings
}
