//! Default filter convention: which operators each runtime type exposes and
//! how the generated operation filter input types are named.

use super::{builder::FilterInputTypeBuilder, definition::FieldType};
use crate::{
    handlers::{
        FilterHandler, combinator::CombinatorHandler, comparison::ComparisonHandler,
        member::MemberHandler, quantifier::QuantifierHandler,
    },
    operation::OperationId,
};
use model::core::data_type::DataType;

const EQUALITY: [OperationId; 4] = [
    OperationId::Eq,
    OperationId::Neq,
    OperationId::In,
    OperationId::Nin,
];

const ORDERING: [OperationId; 8] = [
    OperationId::Gt,
    OperationId::Ngt,
    OperationId::Gte,
    OperationId::Ngte,
    OperationId::Lt,
    OperationId::Nlt,
    OperationId::Lte,
    OperationId::Nlte,
];

const TEXT: [OperationId; 6] = [
    OperationId::Contains,
    OperationId::NContains,
    OperationId::StartsWith,
    OperationId::NStartsWith,
    OperationId::EndsWith,
    OperationId::NEndsWith,
];

/// `IntOperationFilterInput`, `DateTimeOperationFilterInput`, ...
pub fn operation_type_name(data_type: DataType) -> String {
    format!("{}OperationFilterInput", data_type.scalar_name())
}

/// `ListIntOperationFilterInput`, `ListStringOperationFilterInput`, ...
pub fn list_type_name(data_type: DataType) -> String {
    format!("List{}OperationFilterInput", data_type.scalar_name())
}

/// Comparison operators the convention exposes for a runtime type.
pub fn comparisons_for(data_type: DataType) -> Vec<OperationId> {
    if data_type == DataType::Boolean {
        return vec![OperationId::Eq, OperationId::Neq];
    }

    let mut ops = EQUALITY.to_vec();
    if data_type.is_comparable() {
        ops.extend(ORDERING);
    }
    if data_type.is_textual() {
        ops.extend(TEXT);
    }
    ops
}

pub fn operation_type(data_type: DataType) -> FilterInputTypeBuilder {
    let name = operation_type_name(data_type);
    comparisons_for(data_type).into_iter().fold(
        FilterInputTypeBuilder::scalar(&name, data_type).combinators(),
        |ty, op| {
            let operand = match op {
                OperationId::In | OperationId::Nin => FieldType::ScalarList(data_type),
                _ => FieldType::Scalar(data_type),
            };
            ty.operation(op, operand)
        },
    )
}

pub fn list_type(data_type: DataType) -> FilterInputTypeBuilder {
    FilterInputTypeBuilder::list_of(&list_type_name(data_type), &operation_type_name(data_type))
}

/// Handler table matching the types above.
pub fn default_handlers() -> Vec<FilterHandler> {
    let mut handlers: Vec<FilterHandler> = vec![
        CombinatorHandler::AND.into(),
        CombinatorHandler::OR.into(),
        CombinatorHandler::NOT.into(),
        MemberHandler.into(),
    ];

    for quantifier in OperationId::QUANTIFIERS {
        handlers.extend(QuantifierHandler::new(quantifier).map(FilterHandler::from));
    }

    for data_type in DataType::ALL {
        for op in comparisons_for(data_type) {
            handlers.extend(ComparisonHandler::new(op, data_type).map(FilterHandler::from));
        }
    }

    handlers
}
