use crate::{
    operation::{OperationId, Quantifier},
    predicate::{FieldAccessor, Predicate},
    schema::{
        context::TypeDiscoveryContext,
        definition::{FilterFieldDefinition, FilterInputKind},
    },
};

/// Handles `some`, `all`, `none` and `any` on list filter inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantifierHandler {
    operation: OperationId,
    quantifier: Quantifier,
}

impl QuantifierHandler {
    pub fn new(operation: OperationId) -> Option<Self> {
        operation.quantifier().map(|quantifier| Self {
            operation,
            quantifier,
        })
    }

    pub fn operation(&self) -> OperationId {
        self.operation
    }

    pub fn quantifier(&self) -> Quantifier {
        self.quantifier
    }

    pub fn can_handle(&self, ctx: &TypeDiscoveryContext<'_>, field: &FilterFieldDefinition) -> bool {
        ctx.kind() == FilterInputKind::List && field.operation_id() == Some(self.operation)
    }

    /// Applies `element` to the list at `accessor`. The element predicate is
    /// compiled relative to the list element.
    pub fn handle(&self, accessor: &FieldAccessor, element: Predicate) -> Predicate {
        Predicate::Quantified {
            accessor: accessor.clone(),
            quantifier: self.quantifier,
            predicate: Box::new(element),
        }
    }

    /// `any: true` matches non-empty lists, `any: false` the complement.
    pub fn handle_any(&self, accessor: &FieldAccessor, expected: bool) -> Predicate {
        let non_empty = Predicate::Quantified {
            accessor: accessor.clone(),
            quantifier: Quantifier::Any,
            predicate: Box::new(Predicate::True),
        };
        if expected { non_empty } else { non_empty.negate() }
    }
}
