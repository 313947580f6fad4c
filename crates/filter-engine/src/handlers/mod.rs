pub mod combinator;
pub mod comparison;
pub mod member;
pub mod quantifier;

use crate::{
    error::{SchemaError, SchemaResult},
    operation::OperationId,
    schema::{context::TypeDiscoveryContext, definition::FilterFieldDefinition},
};
use combinator::CombinatorHandler;
use comparison::ComparisonHandler;
use member::MemberHandler;
use model::core::data_type::DataType;
use quantifier::QuantifierHandler;
use std::fmt;

/// What a handler is registered against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerTarget {
    /// Any filter input type that carries `and`/`or`/`not`.
    Boolean,
    /// Operation filter inputs of one runtime type.
    Scalar(DataType),
    /// Member fields of record filters.
    Member,
    /// List filter inputs.
    List,
}

impl HandlerTarget {
    /// Target for the operation filter input of a scalar, looked up by its
    /// schema name (`Int`, `DateTime`, ...).
    pub fn scalar(scalar_name: &str) -> SchemaResult<Self> {
        DataType::from_scalar_name(scalar_name)
            .map(HandlerTarget::Scalar)
            .map_err(|_| SchemaError::UnknownType(scalar_name.to_string()))
    }
}

/// Registry key of a handler: the target it serves and the operation it emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerDescriptor {
    pub target: HandlerTarget,
    pub operation: Option<OperationId>,
}

impl fmt::Display for HandlerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let target = match self.target {
            HandlerTarget::Boolean => "Boolean".to_string(),
            HandlerTarget::Scalar(data_type) => data_type.to_string(),
            HandlerTarget::Member => "Member".to_string(),
            HandlerTarget::List => "List".to_string(),
        };
        match self.operation {
            Some(op) => write!(f, "{target}.{op}"),
            None => f.write_str(&target),
        }
    }
}

/// A filter operation handler. Handlers are stateless; which one serves a
/// field is decided by capability matching when the schema is built.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterHandler {
    Combinator(CombinatorHandler),
    Comparison(ComparisonHandler),
    Member(MemberHandler),
    Quantifier(QuantifierHandler),
}

impl FilterHandler {
    /// Builds the handler a descriptor stands for, if the pairing is valid.
    pub fn from_descriptor(descriptor: HandlerDescriptor) -> Option<Self> {
        match (descriptor.target, descriptor.operation) {
            (HandlerTarget::Boolean, Some(op)) => CombinatorHandler::new(op).map(Self::from),
            (HandlerTarget::Scalar(data_type), Some(op)) => {
                ComparisonHandler::new(op, data_type).map(Self::from)
            }
            (HandlerTarget::List, Some(op)) => QuantifierHandler::new(op).map(Self::from),
            (HandlerTarget::Member, None) => Some(MemberHandler.into()),
            _ => None,
        }
    }

    pub fn can_handle(&self, ctx: &TypeDiscoveryContext<'_>, field: &FilterFieldDefinition) -> bool {
        match self {
            FilterHandler::Combinator(h) => h.can_handle(ctx, field),
            FilterHandler::Comparison(h) => h.can_handle(ctx, field),
            FilterHandler::Member(h) => h.can_handle(ctx, field),
            FilterHandler::Quantifier(h) => h.can_handle(ctx, field),
        }
    }

    pub fn descriptor(&self) -> HandlerDescriptor {
        match self {
            FilterHandler::Combinator(h) => HandlerDescriptor {
                target: HandlerTarget::Boolean,
                operation: Some(h.operation()),
            },
            FilterHandler::Comparison(h) => HandlerDescriptor {
                target: HandlerTarget::Scalar(h.data_type()),
                operation: Some(h.operation()),
            },
            FilterHandler::Member(_) => HandlerDescriptor {
                target: HandlerTarget::Member,
                operation: None,
            },
            FilterHandler::Quantifier(h) => HandlerDescriptor {
                target: HandlerTarget::List,
                operation: Some(h.operation()),
            },
        }
    }
}

impl fmt::Display for FilterHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            FilterHandler::Combinator(_) => "Combinator",
            FilterHandler::Comparison(_) => "Comparison",
            FilterHandler::Member(_) => "Member",
            FilterHandler::Quantifier(_) => "Quantifier",
        };
        write!(f, "{kind}({})", self.descriptor())
    }
}

impl From<CombinatorHandler> for FilterHandler {
    fn from(h: CombinatorHandler) -> Self {
        FilterHandler::Combinator(h)
    }
}

impl From<ComparisonHandler> for FilterHandler {
    fn from(h: ComparisonHandler) -> Self {
        FilterHandler::Comparison(h)
    }
}

impl From<MemberHandler> for FilterHandler {
    fn from(h: MemberHandler) -> Self {
        FilterHandler::Member(h)
    }
}

impl From<QuantifierHandler> for FilterHandler {
    fn from(h: QuantifierHandler) -> Self {
        FilterHandler::Quantifier(h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_descriptor() {
        let handler = FilterHandler::from_descriptor(HandlerDescriptor {
            target: HandlerTarget::Scalar(DataType::Int),
            operation: Some(OperationId::Gt),
        })
        .unwrap();
        assert_eq!(handler.to_string(), "Comparison(Int.gt)");

        let combinator = FilterHandler::from_descriptor(HandlerDescriptor {
            target: HandlerTarget::Boolean,
            operation: Some(OperationId::And),
        });
        assert_eq!(combinator, Some(CombinatorHandler::AND.into()));
    }

    #[test]
    fn test_scalar_target_by_name() {
        assert_eq!(
            HandlerTarget::scalar("DateTime"),
            Ok(HandlerTarget::Scalar(DataType::Timestamp))
        );
        assert_eq!(
            HandlerTarget::scalar("Geometry"),
            Err(SchemaError::UnknownType("Geometry".to_string()))
        );
    }

    #[test]
    fn test_invalid_descriptors() {
        let mismatched = [
            HandlerDescriptor {
                target: HandlerTarget::Boolean,
                operation: Some(OperationId::Eq),
            },
            HandlerDescriptor {
                target: HandlerTarget::Scalar(DataType::Int),
                operation: Some(OperationId::Or),
            },
            HandlerDescriptor {
                target: HandlerTarget::List,
                operation: None,
            },
            HandlerDescriptor {
                target: HandlerTarget::Member,
                operation: Some(OperationId::Eq),
            },
        ];
        for descriptor in mismatched {
            assert!(FilterHandler::from_descriptor(descriptor).is_none(), "{descriptor}");
        }
    }
}
