//! In-memory evaluation of compiled predicates against records.

use super::{FieldAccessor, Predicate};
use crate::{
    handlers::comparison::coerce_scalar,
    operation::{ComparisonOp, Quantifier},
};
use model::{
    core::{data_type::DataType, value::Value},
    records::row::RowData,
};
use std::{borrow::Cow, cmp::Ordering};

/// What a predicate is evaluated against: a top-level row, or an element of a
/// list reached through a quantifier.
#[derive(Debug, Clone, Copy)]
enum Scope<'a> {
    Row(&'a RowData),
    Element(&'a Value),
}

impl<'a> Scope<'a> {
    /// Follows `accessor` through nested records. Missing members and explicit
    /// nulls both resolve to `None`.
    fn resolve(self, accessor: &FieldAccessor) -> Option<&'a Value> {
        let path = accessor.path();
        let (mut current, rest) = match self {
            Scope::Element(value) => (value, path),
            Scope::Row(row) => {
                let (first, rest) = path.split_first()?;
                (row.value_ref(first)?, rest)
            }
        };
        for member in rest {
            current = current.as_record()?.value_ref(member)?;
        }
        (!current.is_null()).then_some(current)
    }
}

impl Predicate {
    pub fn matches(&self, row: &RowData) -> bool {
        self.eval(Scope::Row(row))
    }

    /// Evaluates against a bare value, e.g. an element of a scalar list.
    pub fn matches_value(&self, value: &Value) -> bool {
        self.eval(Scope::Element(value))
    }

    pub fn filter_rows<'r>(&self, rows: &'r [RowData]) -> Vec<&'r RowData> {
        rows.iter().filter(|row| self.matches(row)).collect()
    }

    fn eval(&self, scope: Scope<'_>) -> bool {
        match self {
            Predicate::True => true,
            Predicate::False => false,
            Predicate::And(children) => children.iter().all(|c| c.eval(scope)),
            Predicate::Or(children) => children.iter().any(|c| c.eval(scope)),
            Predicate::Not(inner) => !inner.eval(scope),
            Predicate::Compare {
                accessor,
                op,
                operand,
                case_insensitive,
            } => CompareEvaluator {
                value: scope.resolve(accessor),
                operand,
                case_insensitive: *case_insensitive,
            }
            .evaluate(*op),
            Predicate::Quantified {
                accessor,
                quantifier,
                predicate,
            } => {
                let Some(items) = scope.resolve(accessor).and_then(Value::as_array) else {
                    return false;
                };
                let mut elements = items.iter().map(|item| predicate.eval(Scope::Element(item)));
                match quantifier {
                    Quantifier::Some | Quantifier::Any => elements.any(|m| m),
                    Quantifier::All => elements.all(|m| m),
                    Quantifier::None => !elements.any(|m| m),
                }
            }
        }
    }
}

struct CompareEvaluator<'a> {
    value: Option<&'a Value>,
    operand: &'a Value,
    case_insensitive: bool,
}

impl CompareEvaluator<'_> {
    fn evaluate(&self, op: ComparisonOp) -> bool {
        match op {
            ComparisonOp::Eq => self.equals(self.operand),
            ComparisonOp::In => self
                .operand
                .as_array()
                .is_some_and(|items| items.iter().any(|item| self.equals(item))),
            ComparisonOp::Gt => self.ordering().is_some_and(Ordering::is_gt),
            ComparisonOp::Gte => self.ordering().is_some_and(Ordering::is_ge),
            ComparisonOp::Lt => self.ordering().is_some_and(Ordering::is_lt),
            ComparisonOp::Lte => self.ordering().is_some_and(Ordering::is_le),
            ComparisonOp::Contains => self.text(|value, operand| value.contains(operand)),
            ComparisonOp::StartsWith => self.text(|value, operand| value.starts_with(operand)),
            ComparisonOp::EndsWith => self.text(|value, operand| value.ends_with(operand)),
        }
    }

    fn equals(&self, operand: &Value) -> bool {
        match (self.value, operand) {
            (None, Value::Null) => true,
            (None, _) | (Some(_), Value::Null) => false,
            (Some(value), operand) => aligned(value, operand).equal(operand),
        }
    }

    fn ordering(&self) -> Option<Ordering> {
        aligned(self.value?, self.operand).compare(self.operand)
    }

    fn text(&self, test: impl Fn(&str, &str) -> bool) -> bool {
        let (Some(value), Some(operand)) = (self.value.and_then(Value::as_str), self.operand.as_str())
        else {
            return false;
        };
        if self.case_insensitive {
            test(&value.to_lowercase(), &operand.to_lowercase())
        } else {
            test(value, operand)
        }
    }
}

/// Text read from a record stands for a UUID, date, timestamp or decimal when
/// compared against an operand of that type.
fn aligned<'v>(value: &'v Value, operand: &Value) -> Cow<'v, Value> {
    let target = match (value, operand) {
        (Value::String(_), Value::Uuid(_)) => DataType::Uuid,
        (Value::String(_), Value::Date(_)) => DataType::Date,
        (Value::String(_), Value::Timestamp(_)) => DataType::Timestamp,
        (Value::String(_), Value::Decimal(_)) => DataType::Decimal,
        _ => return Cow::Borrowed(value),
    };
    coerce_scalar(target, value).map_or(Cow::Borrowed(value), Cow::Owned)
}
