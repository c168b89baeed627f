use crate::util::Naming;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelationDirection {
    /// Another table's foreign key points at this table.
    Inbound,
    /// This table's foreign key points at another table.
    Outbound,
}

/// One directed foreign-key edge, recorded symmetrically on both tables
/// after resolution: the outbound record on the referencing table and the
/// inbound record on the referenced table describe the same constraint.
#[derive(Clone, Debug)]
pub struct Relation {
    direction: RelationDirection,
    constraint_name: String,
    /// Column on the table this record is attached to.
    local_column: String,
    /// The table on the other end of the edge.
    counterpart_table: Naming,
    counterpart_column: String,
}

impl Relation {
    pub(crate) fn new(
        direction: RelationDirection,
        constraint_name: &str,
        local_column: &str,
        counterpart_table: &str,
        counterpart_column: &str,
    ) -> Self {
        Self {
            direction,
            constraint_name: constraint_name.to_owned(),
            local_column: local_column.to_owned(),
            counterpart_table: Naming::of(counterpart_table),
            counterpart_column: counterpart_column.to_owned(),
        }
    }

    pub fn direction(&self) -> RelationDirection {
        self.direction
    }

    pub fn constraint_name(&self) -> &str {
        &self.constraint_name
    }

    pub fn local_column(&self) -> &str {
        &self.local_column
    }

    pub fn counterpart(&self) -> &Naming {
        &self.counterpart_table
    }

    pub fn counterpart_column(&self) -> &str {
        &self.counterpart_column
    }

    /// Field name for the collection an inbound relation contributes to
    /// the owning entity, e.g. `recipe_broker` inbound on `recipe` yields
    /// `recipeBrokers`.
    pub fn collection_field(&self) -> String {
        self.counterpart_table.camel_plural()
    }

    /// Field name for the reference an outbound relation contributes,
    /// e.g. outbound to `recipe` yields `recipe`.
    pub fn reference_field(&self) -> String {
        self.counterpart_table.camel.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn inbound_collection_field_is_camel_plural() {
        let relation = Relation::new(
            RelationDirection::Inbound,
            "recipe_broker_recipe_fkey",
            "id",
            "recipe_broker",
            "recipe",
        );
        assert_eq!(relation.collection_field(), "recipeBrokers");
        assert_eq!(relation.counterpart().pascal, "RecipeBroker");
    }

    #[test]
    fn outbound_reference_field_is_camel() {
        let relation = Relation::new(
            RelationDirection::Outbound,
            "recipe_broker_recipe_fkey",
            "recipe",
            "recipe",
            "id",
        );
        assert_eq!(relation.reference_field(), "recipe");
    }
}
