use crate::{
    operation::{OperationFamily, OperationId},
    predicate::Predicate,
    schema::{context::TypeDiscoveryContext, definition::FilterFieldDefinition},
};

/// Handles `and`, `or` and `not`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombinatorHandler {
    operation: OperationId,
}

impl CombinatorHandler {
    pub const AND: CombinatorHandler = CombinatorHandler {
        operation: OperationId::And,
    };
    pub const OR: CombinatorHandler = CombinatorHandler {
        operation: OperationId::Or,
    };
    pub const NOT: CombinatorHandler = CombinatorHandler {
        operation: OperationId::Not,
    };

    pub fn new(operation: OperationId) -> Option<Self> {
        (operation.family() == OperationFamily::Boolean).then_some(Self { operation })
    }

    pub fn operation(&self) -> OperationId {
        self.operation
    }

    pub fn can_handle(&self, ctx: &TypeDiscoveryContext<'_>, field: &FilterFieldDefinition) -> bool {
        ctx.kind().accepts_combinators() && field.operation_id() == Some(self.operation)
    }

    /// Combines already compiled children. An empty `and` matches everything,
    /// an empty `or` matches nothing, and `not` negates the conjunction of its
    /// children.
    pub fn handle(&self, children: Vec<Predicate>) -> Predicate {
        match self.operation {
            OperationId::Or => Predicate::or(children),
            OperationId::Not => Predicate::and(children).negate(),
            _ => Predicate::and(children),
        }
    }
}
