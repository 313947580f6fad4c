//! Lowers predicates into parameterised SQL `WHERE` fragments.

use super::{FieldAccessor, Predicate, PredicateLowering};
use crate::{error::LowerError, operation::ComparisonOp};
use model::core::value::Value;
use tracing::trace;

pub trait Dialect: Send + Sync {
    /// Wraps an identifier in the dialect's quotation marks.
    ///
    /// - PostgreSQL uses double quotes: `"my_column"`
    /// - MySQL uses backticks: `` `my_column` ``
    fn quote_identifier(&self, ident: &str) -> String;

    /// Returns the placeholder for the parameter at `index` (zero based).
    ///
    /// - PostgreSQL uses `$1`, `$2`, etc.
    /// - MySQL uses `?`
    fn get_placeholder(&self, index: usize) -> String;

    /// Whether the dialect has a native case-insensitive `ILIKE`.
    fn supports_ilike(&self) -> bool;

    fn name(&self) -> String;
}

#[derive(Debug, Clone)]
pub struct Postgres;

impl Dialect for Postgres {
    fn quote_identifier(&self, ident: &str) -> String {
        format!(r#""{}""#, ident.replace('"', r#""""#))
    }

    fn get_placeholder(&self, index: usize) -> String {
        format!("${}", index + 1)
    }

    fn supports_ilike(&self) -> bool {
        true
    }

    fn name(&self) -> String {
        "PostgreSQL".into()
    }
}

#[derive(Debug, Clone)]
pub struct MySql;

impl Dialect for MySql {
    fn quote_identifier(&self, ident: &str) -> String {
        format!("`{}`", ident.replace('`', "``"))
    }

    fn get_placeholder(&self, _index: usize) -> String {
        "?".into()
    }

    fn supports_ilike(&self) -> bool {
        false
    }

    fn name(&self) -> String {
        "MySQL".into()
    }
}

/// A rendered `WHERE` fragment and the values bound to its placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlFilter {
    pub sql: String,
    pub params: Vec<Value>,
}

/// Accumulates SQL text and parameters while walking a predicate.
struct Renderer<'a> {
    sql: String,
    params: Vec<Value>,
    dialect: &'a dyn Dialect,
}

impl<'a> Renderer<'a> {
    fn new(dialect: &'a dyn Dialect) -> Self {
        Self {
            sql: String::new(),
            params: Vec::new(),
            dialect,
        }
    }

    fn finish(self) -> SqlFilter {
        SqlFilter {
            sql: self.sql,
            params: self.params,
        }
    }

    fn add_param(&mut self, value: Value) {
        self.params.push(value);
        let placeholder = self.dialect.get_placeholder(self.params.len() - 1);
        self.sql.push_str(&placeholder);
    }

    fn push(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }
}

/// SQL backend for compiled predicates.
///
/// Every comparison leaf is kept two-valued: a negated leaf is rendered as
/// `NOT COALESCE(.., FALSE)` so rows with `NULL` columns match a negated
/// operator exactly when they fail the positive one, as in memory.
pub struct SqlLowering<'a> {
    dialect: &'a dyn Dialect,
}

impl<'a> SqlLowering<'a> {
    pub fn new(dialect: &'a dyn Dialect) -> Self {
        Self { dialect }
    }

    fn render(&self, predicate: &Predicate, r: &mut Renderer<'_>) -> Result<(), LowerError> {
        match predicate {
            Predicate::True => r.push("TRUE"),
            Predicate::False => r.push("FALSE"),
            Predicate::And(children) => self.render_junction(children, " AND ", r)?,
            Predicate::Or(children) => self.render_junction(children, " OR ", r)?,
            Predicate::Not(inner) => {
                r.push("NOT COALESCE(");
                self.render(inner, r)?;
                r.push(", FALSE)");
            }
            Predicate::Compare {
                accessor,
                op,
                operand,
                case_insensitive,
            } => {
                let column = self.column(accessor)?;
                self.render_compare(&column, *op, operand, *case_insensitive, r)?;
            }
            Predicate::Quantified {
                accessor,
                quantifier,
                ..
            } => {
                return Err(LowerError::Unsupported(format!(
                    "{quantifier:?} over list '{accessor}' has no {} rendering",
                    self.dialect.name()
                )));
            }
        }
        Ok(())
    }

    fn render_junction(
        &self,
        children: &[Predicate],
        separator: &str,
        r: &mut Renderer<'_>,
    ) -> Result<(), LowerError> {
        r.push("(");
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                r.push(separator);
            }
            self.render(child, r)?;
        }
        r.push(")");
        Ok(())
    }

    fn render_compare(
        &self,
        column: &str,
        op: ComparisonOp,
        operand: &Value,
        case_insensitive: bool,
        r: &mut Renderer<'_>,
    ) -> Result<(), LowerError> {
        match op {
            ComparisonOp::Eq if operand.is_null() => {
                r.push(&format!("{column} IS NULL"));
            }
            ComparisonOp::Eq => self.render_binary(column, "=", operand, r),
            ComparisonOp::Gt => self.render_binary(column, ">", operand, r),
            ComparisonOp::Gte => self.render_binary(column, ">=", operand, r),
            ComparisonOp::Lt => self.render_binary(column, "<", operand, r),
            ComparisonOp::Lte => self.render_binary(column, "<=", operand, r),
            ComparisonOp::In => self.render_in(column, operand, r)?,
            ComparisonOp::Contains | ComparisonOp::StartsWith | ComparisonOp::EndsWith => {
                let Some(text) = operand.as_str() else {
                    return Err(LowerError::Unsupported(format!(
                        "{op:?} on column {column} needs a string operand, got {}",
                        operand.kind_name()
                    )));
                };
                let escaped = escape_like(text);
                let pattern = match op {
                    ComparisonOp::Contains => format!("%{escaped}%"),
                    ComparisonOp::StartsWith => format!("{escaped}%"),
                    _ => format!("%{escaped}"),
                };
                if !case_insensitive {
                    r.push(&format!("{column} LIKE "));
                    r.add_param(Value::String(pattern));
                } else if self.dialect.supports_ilike() {
                    r.push(&format!("{column} ILIKE "));
                    r.add_param(Value::String(pattern));
                } else {
                    r.push(&format!("LOWER({column}) LIKE "));
                    r.add_param(Value::String(pattern.to_lowercase()));
                }
            }
        }
        Ok(())
    }

    fn render_binary(&self, column: &str, sql_op: &str, operand: &Value, r: &mut Renderer<'_>) {
        r.push(&format!("{column} {sql_op} "));
        r.add_param(operand.clone());
    }

    fn render_in(&self, column: &str, operand: &Value, r: &mut Renderer<'_>) -> Result<(), LowerError> {
        let Some(items) = operand.as_array() else {
            return Err(LowerError::Unsupported(format!(
                "IN on column {column} needs a list operand, got {}",
                operand.kind_name()
            )));
        };
        let (nulls, values): (Vec<&Value>, Vec<&Value>) = items.iter().partition(|v| v.is_null());

        let with_null = !nulls.is_empty();
        match (values.is_empty(), with_null) {
            (true, false) => r.push("FALSE"),
            (true, true) => r.push(&format!("{column} IS NULL")),
            (false, with_null) => {
                if with_null {
                    r.push("(");
                }
                r.push(&format!("{column} IN ("));
                for (i, value) in values.into_iter().enumerate() {
                    if i > 0 {
                        r.push(", ");
                    }
                    r.add_param(value.clone());
                }
                r.push(")");
                if with_null {
                    r.push(&format!(" OR {column} IS NULL)"));
                }
            }
        }
        Ok(())
    }

    fn column(&self, accessor: &FieldAccessor) -> Result<String, LowerError> {
        if accessor.is_root() {
            return Err(LowerError::Unsupported(
                "comparison against a list element outside a quantifier".to_string(),
            ));
        }
        Ok(accessor
            .path()
            .iter()
            .map(|member| self.dialect.quote_identifier(member))
            .collect::<Vec<_>>()
            .join("."))
    }
}

impl PredicateLowering for SqlLowering<'_> {
    type Output = SqlFilter;

    fn lower(&self, predicate: &Predicate) -> Result<SqlFilter, LowerError> {
        let mut renderer = Renderer::new(self.dialect);
        self.render(predicate, &mut renderer)?;
        let filter = renderer.finish();
        trace!(dialect = %self.dialect.name(), sql = %filter.sql, params = filter.params.len(), "Lowered predicate");
        Ok(filter)
    }
}

fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
