use crate::{
    argument::FilterArgumentValue,
    error::{CompileError, CompileResult},
    operation::{ComparisonOp, OperationId},
    predicate::{FieldAccessor, Predicate},
    schema::{
        context::TypeDiscoveryContext,
        definition::{FieldType, FilterFieldDefinition, FilterInputKind},
    },
};
use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use model::core::{
    data_type::DataType,
    value::{Value, decimal_from_f64},
};
use tracing::trace;
use uuid::Uuid;

/// Handles one comparison operator for one runtime type, e.g. `gt` on `Int`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComparisonHandler {
    operation: OperationId,
    data_type: DataType,
}

impl ComparisonHandler {
    pub fn new(operation: OperationId, data_type: DataType) -> Option<Self> {
        operation.comparison().map(|_| Self {
            operation,
            data_type,
        })
    }

    pub fn operation(&self) -> OperationId {
        self.operation
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn can_handle(&self, ctx: &TypeDiscoveryContext<'_>, field: &FilterFieldDefinition) -> bool {
        ctx.kind() == FilterInputKind::Scalar(self.data_type)
            && field.operation_id() == Some(self.operation)
            && field.field_type() == &self.operand_type()
    }

    /// The declared type an operation field must carry: a list of the runtime
    /// type for `in`/`nin`, the runtime type itself otherwise.
    pub fn operand_type(&self) -> FieldType {
        match self.operation.comparison() {
            Some((ComparisonOp::In, _)) => FieldType::ScalarList(self.data_type),
            _ => FieldType::Scalar(self.data_type),
        }
    }

    /// Builds the leaf for `accessor <op> operand`, coercing the literal to the
    /// handler's runtime type. Negated operations wrap the positive leaf.
    pub fn handle(
        &self,
        field: &FilterFieldDefinition,
        accessor: &FieldAccessor,
        operand: &FilterArgumentValue,
        case_insensitive: bool,
    ) -> CompileResult<Predicate> {
        let Some((op, negated)) = self.operation.comparison() else {
            return Err(CompileError::InvalidArgument {
                field: field.name().to_string(),
                message: format!("'{}' is not a comparison", self.operation),
            });
        };

        let operand = match op {
            ComparisonOp::In => self.coerce_list(field, operand)?,
            ComparisonOp::Eq => self.coerce_nullable(field, operand)?,
            _ => self.coerce_required(field, operand)?,
        };

        let ignore_case = case_insensitive && op.is_textual();
        let operand = match operand {
            Value::String(s) if ignore_case => Value::String(s.to_lowercase()),
            other => other,
        };

        trace!(field = field.name(), ?op, negated, %operand, "Compiled comparison");

        let leaf = Predicate::Compare {
            accessor: accessor.clone(),
            op,
            operand,
            case_insensitive: ignore_case,
        };
        Ok(if negated { leaf.negate() } else { leaf })
    }

    fn coerce_list(
        &self,
        field: &FilterFieldDefinition,
        operand: &FilterArgumentValue,
    ) -> CompileResult<Value> {
        let items = match operand {
            FilterArgumentValue::List(items) => items.as_slice(),
            FilterArgumentValue::Scalar(Value::Null) => {
                return Err(self.mismatch(field, &format!("[{}]", self.data_type), "null"));
            }
            // A single value stands for a one-element list.
            single @ FilterArgumentValue::Scalar(_) => std::slice::from_ref(single),
            FilterArgumentValue::Object(_) => {
                return Err(self.mismatch(field, &format!("[{}]", self.data_type), "Object"));
            }
        };

        let values = items
            .iter()
            .map(|item| self.coerce_nullable(field, item))
            .collect::<CompileResult<Vec<_>>>()?;
        Ok(Value::Array(values))
    }

    fn coerce_nullable(
        &self,
        field: &FilterFieldDefinition,
        operand: &FilterArgumentValue,
    ) -> CompileResult<Value> {
        match operand {
            FilterArgumentValue::Scalar(Value::Null) => Ok(Value::Null),
            other => self.coerce_required(field, other),
        }
    }

    fn coerce_required(
        &self,
        field: &FilterFieldDefinition,
        operand: &FilterArgumentValue,
    ) -> CompileResult<Value> {
        let expected = self.data_type.scalar_name();
        let FilterArgumentValue::Scalar(value) = operand else {
            return Err(self.mismatch(field, expected, operand.shape()));
        };
        coerce_scalar(self.data_type, value)
            .ok_or_else(|| self.mismatch(field, expected, value.kind_name()))
    }

    fn mismatch(&self, field: &FilterFieldDefinition, expected: &str, found: &str) -> CompileError {
        CompileError::OperandTypeMismatch {
            field: field.name().to_string(),
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}

/// Converts a literal into the representation of `data_type`, widening
/// integers and parsing textual UUIDs and dates. `None` when incompatible.
pub fn coerce_scalar(data_type: DataType, value: &Value) -> Option<Value> {
    match (data_type, value) {
        (DataType::Int, Value::Int(i)) => i32::try_from(*i).ok().map(|_| Value::Int(*i)),
        (DataType::Long, Value::Int(i)) => Some(Value::Int(*i)),
        (DataType::Float, Value::Int(i)) => Some(Value::Float(*i as f64)),
        (DataType::Float, Value::Float(f)) => Some(Value::Float(*f)),
        (DataType::Decimal, Value::Int(i)) => Some(Value::Decimal(BigDecimal::from(*i))),
        (DataType::Decimal, Value::Float(f)) => decimal_from_f64(*f).map(Value::Decimal),
        (DataType::Decimal, Value::Decimal(d)) => Some(Value::Decimal(d.clone())),
        (DataType::Decimal, Value::String(s)) => s.parse::<BigDecimal>().ok().map(Value::Decimal),
        (DataType::String, Value::String(s)) => Some(Value::String(s.clone())),
        (DataType::Boolean, Value::Boolean(b)) => Some(Value::Boolean(*b)),
        (DataType::Uuid, Value::Uuid(u)) => Some(Value::Uuid(*u)),
        (DataType::Uuid, Value::String(s)) => Uuid::parse_str(s).ok().map(Value::Uuid),
        (DataType::Date, Value::Date(d)) => Some(Value::Date(*d)),
        (DataType::Date, Value::String(s)) => {
            NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().map(Value::Date)
        }
        (DataType::Timestamp, Value::Timestamp(t)) => Some(Value::Timestamp(*t)),
        (DataType::Timestamp, Value::String(s)) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|t| Value::Timestamp(t.with_timezone(&Utc))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn field(op: OperationId, data_type: DataType) -> FilterFieldDefinition {
        FilterFieldDefinition::operation(op, FieldType::Scalar(data_type))
    }

    fn age() -> FieldAccessor {
        FieldAccessor::from_path(["age"])
    }

    #[test]
    fn test_new_rejects_non_comparisons() {
        assert!(ComparisonHandler::new(OperationId::Gt, DataType::Int).is_some());
        assert!(ComparisonHandler::new(OperationId::And, DataType::Int).is_none());
        assert!(ComparisonHandler::new(OperationId::Some, DataType::Int).is_none());
    }

    #[test]
    fn test_positive_comparison() {
        let handler = ComparisonHandler::new(OperationId::Gt, DataType::Int).unwrap();
        let predicate = handler
            .handle(
                &field(OperationId::Gt, DataType::Int),
                &age(),
                &FilterArgumentValue::scalar(18),
                false,
            )
            .unwrap();
        assert_eq!(
            predicate,
            Predicate::compare(age(), ComparisonOp::Gt, Value::Int(18))
        );
    }

    #[test]
    fn test_negated_comparison_wraps_positive_leaf() {
        let handler = ComparisonHandler::new(OperationId::Neq, DataType::Int).unwrap();
        let predicate = handler
            .handle(
                &field(OperationId::Neq, DataType::Int),
                &age(),
                &FilterArgumentValue::scalar(18),
                false,
            )
            .unwrap();
        assert_eq!(
            predicate,
            Predicate::compare(age(), ComparisonOp::Eq, Value::Int(18)).negate()
        );
    }

    #[test]
    fn test_string_operand_on_numeric_field_is_rejected() {
        let handler = ComparisonHandler::new(OperationId::Eq, DataType::Int).unwrap();
        let result = handler.handle(
            &field(OperationId::Eq, DataType::Int),
            &age(),
            &FilterArgumentValue::scalar("not-a-number"),
            false,
        );
        assert_eq!(
            result,
            Err(CompileError::OperandTypeMismatch {
                field: "eq".to_string(),
                expected: "Int".to_string(),
                found: "String".to_string(),
            })
        );
    }

    #[test]
    fn test_null_only_allowed_for_equality() {
        let eq = ComparisonHandler::new(OperationId::Eq, DataType::Int).unwrap();
        let predicate = eq
            .handle(
                &field(OperationId::Eq, DataType::Int),
                &age(),
                &FilterArgumentValue::Scalar(Value::Null),
                false,
            )
            .unwrap();
        assert_eq!(predicate, Predicate::compare(age(), ComparisonOp::Eq, Value::Null));

        let gt = ComparisonHandler::new(OperationId::Gt, DataType::Int).unwrap();
        let result = gt.handle(
            &field(OperationId::Gt, DataType::Int),
            &age(),
            &FilterArgumentValue::Scalar(Value::Null),
            false,
        );
        assert!(matches!(result, Err(CompileError::OperandTypeMismatch { .. })));
    }

    #[test]
    fn test_in_requires_every_element_to_coerce() {
        let handler = ComparisonHandler::new(OperationId::In, DataType::Int).unwrap();
        let ok = handler
            .handle(
                &field(OperationId::In, DataType::Int),
                &age(),
                &FilterArgumentValue::List(vec![
                    FilterArgumentValue::scalar(1),
                    FilterArgumentValue::scalar(2),
                ]),
                false,
            )
            .unwrap();
        assert_eq!(
            ok,
            Predicate::compare(
                age(),
                ComparisonOp::In,
                Value::Array(vec![Value::Int(1), Value::Int(2)])
            )
        );

        let bad = handler.handle(
            &field(OperationId::In, DataType::Int),
            &age(),
            &FilterArgumentValue::List(vec![
                FilterArgumentValue::scalar(1),
                FilterArgumentValue::scalar("two"),
            ]),
            false,
        );
        assert!(matches!(bad, Err(CompileError::OperandTypeMismatch { .. })));
    }

    #[test]
    fn test_case_insensitive_text_operand_is_lowered() {
        let handler = ComparisonHandler::new(OperationId::Contains, DataType::String).unwrap();
        let name = FieldAccessor::from_path(["name"]);
        let predicate = handler
            .handle(
                &field(OperationId::Contains, DataType::String),
                &name,
                &FilterArgumentValue::scalar("ANN"),
                true,
            )
            .unwrap();
        assert_eq!(
            predicate,
            Predicate::Compare {
                accessor: name,
                op: ComparisonOp::Contains,
                operand: Value::String("ann".to_string()),
                case_insensitive: true,
            }
        );
    }

    #[test]
    fn test_coerce_scalar() {
        assert_eq!(coerce_scalar(DataType::Float, &Value::Int(2)), Some(Value::Float(2.0)));
        assert_eq!(coerce_scalar(DataType::Int, &Value::Int(i64::MAX)), None);
        assert_eq!(coerce_scalar(DataType::Long, &Value::Int(i64::MAX)), Some(Value::Int(i64::MAX)));
        assert_eq!(
            coerce_scalar(DataType::Decimal, &Value::String("1.25".to_string())),
            Some(Value::Decimal(BigDecimal::from_str("1.25").unwrap()))
        );
        assert!(coerce_scalar(DataType::Uuid, &Value::String("nope".to_string())).is_none());
        assert_eq!(
            coerce_scalar(DataType::Date, &Value::String("2024-02-29".to_string())),
            Some(Value::Date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()))
        );
        assert!(coerce_scalar(DataType::Timestamp, &Value::String("2024-01-01T10:00:00Z".to_string())).is_some());
        assert!(coerce_scalar(DataType::Boolean, &Value::Int(1)).is_none());
    }

    #[test]
    fn test_float_literal_keeps_its_decimal_digits() {
        assert_eq!(
            coerce_scalar(DataType::Decimal, &Value::Float(9.1)),
            Some(Value::Decimal(BigDecimal::from_str("9.1").unwrap()))
        );
    }

    #[test]
    fn test_capability_checks_declared_operand_type() {
        use crate::schema::definition::FilterInputTypeDefinition;

        let eq = ComparisonHandler::new(OperationId::Eq, DataType::Int).unwrap();
        let nin = ComparisonHandler::new(OperationId::Nin, DataType::Int).unwrap();
        let def = FilterInputTypeDefinition::new(
            "IntOperationFilterInput".to_string(),
            FilterInputKind::Scalar(DataType::Int),
            Vec::new(),
        );
        let ctx = TypeDiscoveryContext::new(&def);

        assert!(eq.can_handle(&ctx, &field(OperationId::Eq, DataType::Int)));
        assert!(!eq.can_handle(&ctx, &field(OperationId::Eq, DataType::String)));
        assert!(!nin.can_handle(&ctx, &field(OperationId::Nin, DataType::Int)));
        assert!(nin.can_handle(
            &ctx,
            &FilterFieldDefinition::operation(OperationId::Nin, FieldType::ScalarList(DataType::Int))
        ));
    }
}
