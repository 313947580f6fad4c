pub mod eval;
pub mod sql;

use crate::{
    error::LowerError,
    operation::{ComparisonOp, Quantifier},
};
use model::core::value::Value;
use serde::Serialize;
use std::fmt;

/// Member path from the candidate being filtered. Empty when the candidate is
/// itself the compared value, e.g. an element of a scalar list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub struct FieldAccessor(Vec<String>);

impl FieldAccessor {
    pub fn root() -> Self {
        FieldAccessor(Vec::new())
    }

    pub fn from_path<I, S>(path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldAccessor(path.into_iter().map(Into::into).collect())
    }

    pub fn child(&self, member: &str) -> Self {
        let mut path = self.0.clone();
        path.push(member.to_string());
        FieldAccessor(path)
    }

    pub fn path(&self) -> &[String] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            f.write_str("$")
        } else {
            f.write_str(&self.0.join("."))
        }
    }
}

/// The compiled filter. Built by the compiler through the smart constructors
/// below, so `And`/`Or` nodes are always flat and hold at least two children.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Predicate {
    True,
    False,
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    Not(Box<Predicate>),
    Compare {
        accessor: FieldAccessor,
        op: ComparisonOp,
        operand: Value,
        case_insensitive: bool,
    },
    Quantified {
        accessor: FieldAccessor,
        quantifier: Quantifier,
        predicate: Box<Predicate>,
    },
}

impl Predicate {
    pub fn compare(accessor: FieldAccessor, op: ComparisonOp, operand: Value) -> Self {
        Predicate::Compare {
            accessor,
            op,
            operand,
            case_insensitive: false,
        }
    }

    /// Conjunction. `True` children are dropped, a `False` child absorbs the
    /// whole node, nested conjunctions are flattened.
    pub fn and(children: impl IntoIterator<Item = Predicate>) -> Self {
        let mut flat = Vec::new();
        for child in children {
            match child {
                Predicate::True => {}
                Predicate::False => return Predicate::False,
                Predicate::And(nested) => flat.extend(nested),
                other => flat.push(other),
            }
        }
        match flat.len() {
            0 => Predicate::True,
            1 => flat.remove(0),
            _ => Predicate::And(flat),
        }
    }

    /// Disjunction, dual to [`Predicate::and`].
    pub fn or(children: impl IntoIterator<Item = Predicate>) -> Self {
        let mut flat = Vec::new();
        for child in children {
            match child {
                Predicate::False => {}
                Predicate::True => return Predicate::True,
                Predicate::Or(nested) => flat.extend(nested),
                other => flat.push(other),
            }
        }
        match flat.len() {
            0 => Predicate::False,
            1 => flat.remove(0),
            _ => Predicate::Or(flat),
        }
    }

    pub fn negate(self) -> Self {
        match self {
            Predicate::True => Predicate::False,
            Predicate::False => Predicate::True,
            Predicate::Not(inner) => *inner,
            other => Predicate::Not(Box::new(other)),
        }
    }

    pub fn conjoin(self, other: Predicate) -> Self {
        Predicate::and([self, other])
    }

    pub fn disjoin(self, other: Predicate) -> Self {
        Predicate::or([self, other])
    }

    /// Number of nodes in the tree.
    pub fn size(&self) -> usize {
        match self {
            Predicate::True | Predicate::False | Predicate::Compare { .. } => 1,
            Predicate::And(children) | Predicate::Or(children) => {
                1 + children.iter().map(Predicate::size).sum::<usize>()
            }
            Predicate::Not(inner) => 1 + inner.size(),
            Predicate::Quantified { predicate, .. } => 1 + predicate.size(),
        }
    }

    pub fn lower<L: PredicateLowering>(&self, lowering: &L) -> Result<L::Output, LowerError> {
        lowering.lower(self)
    }
}

impl std::ops::Not for Predicate {
    type Output = Predicate;

    fn not(self) -> Self::Output {
        self.negate()
    }
}

/// Turns a compiled predicate into something a backend can execute.
pub trait PredicateLowering {
    type Output;

    fn lower(&self, predicate: &Predicate) -> Result<Self::Output, LowerError>;
}
