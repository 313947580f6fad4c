use serde::{Deserialize, Serialize};
use std::fmt;

/// Group an operation belongs to. Identifiers are only meaningful inside their
/// family; a `Some` never appears on a scalar filter input and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationFamily {
    Boolean,
    Comparison,
    List,
}

/// Every operator a filter input field can stand for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OperationId {
    // Boolean combinators
    And,
    Or,
    Not,
    // Comparison
    Eq,
    Neq,
    In,
    Nin,
    Gt,
    Ngt,
    Gte,
    Ngte,
    Lt,
    Nlt,
    Lte,
    Nlte,
    Contains,
    NContains,
    StartsWith,
    NStartsWith,
    EndsWith,
    NEndsWith,
    // List quantifiers
    Some,
    All,
    None,
    Any,
}

/// Positive comparison carried by a predicate leaf. Negated operations are
/// expressed as a `Not` around one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOp {
    Eq,
    In,
    Gt,
    Gte,
    Lt,
    Lte,
    Contains,
    StartsWith,
    EndsWith,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quantifier {
    Some,
    All,
    None,
    Any,
}

impl OperationId {
    pub const QUANTIFIERS: [OperationId; 4] = [
        OperationId::Some,
        OperationId::All,
        OperationId::None,
        OperationId::Any,
    ];

    pub fn family(&self) -> OperationFamily {
        use OperationId::*;
        match self {
            And | Or | Not => OperationFamily::Boolean,
            Some | All | None | Any => OperationFamily::List,
            _ => OperationFamily::Comparison,
        }
    }

    /// Name of the input field this operation is exposed as.
    pub fn field_name(&self) -> &'static str {
        use OperationId::*;
        match self {
            And => "and",
            Or => "or",
            Not => "not",
            Eq => "eq",
            Neq => "neq",
            In => "in",
            Nin => "nin",
            Gt => "gt",
            Ngt => "ngt",
            Gte => "gte",
            Ngte => "ngte",
            Lt => "lt",
            Nlt => "nlt",
            Lte => "lte",
            Nlte => "nlte",
            Contains => "contains",
            NContains => "ncontains",
            StartsWith => "startsWith",
            NStartsWith => "nstartsWith",
            EndsWith => "endsWith",
            NEndsWith => "nendsWith",
            Some => "some",
            All => "all",
            None => "none",
            Any => "any",
        }
    }

    /// Splits a comparison into its positive operator and a negation flag.
    /// `None` for operations outside the comparison family.
    pub fn comparison(&self) -> Option<(ComparisonOp, bool)> {
        use OperationId::*;
        let pair = match self {
            Eq => (ComparisonOp::Eq, false),
            Neq => (ComparisonOp::Eq, true),
            In => (ComparisonOp::In, false),
            Nin => (ComparisonOp::In, true),
            Gt => (ComparisonOp::Gt, false),
            Ngt => (ComparisonOp::Gt, true),
            Gte => (ComparisonOp::Gte, false),
            Ngte => (ComparisonOp::Gte, true),
            Lt => (ComparisonOp::Lt, false),
            Nlt => (ComparisonOp::Lt, true),
            Lte => (ComparisonOp::Lte, false),
            Nlte => (ComparisonOp::Lte, true),
            Contains => (ComparisonOp::Contains, false),
            NContains => (ComparisonOp::Contains, true),
            StartsWith => (ComparisonOp::StartsWith, false),
            NStartsWith => (ComparisonOp::StartsWith, true),
            EndsWith => (ComparisonOp::EndsWith, false),
            NEndsWith => (ComparisonOp::EndsWith, true),
            _ => return Option::None,
        };
        Option::Some(pair)
    }

    pub fn quantifier(&self) -> Option<Quantifier> {
        match self {
            OperationId::Some => Option::Some(Quantifier::Some),
            OperationId::All => Option::Some(Quantifier::All),
            OperationId::None => Option::Some(Quantifier::None),
            OperationId::Any => Option::Some(Quantifier::Any),
            _ => Option::None,
        }
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

impl ComparisonOp {
    pub fn is_textual(&self) -> bool {
        matches!(
            self,
            ComparisonOp::Contains | ComparisonOp::StartsWith | ComparisonOp::EndsWith
        )
    }
}
