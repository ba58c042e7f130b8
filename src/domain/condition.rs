//! Condition AST.
//!
//! A condition is either a comparison of a record field against a literal,
//! or a bare field name probed for truthiness.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    Gt,
    Lt,
    Ge,
    Le,
    Eq,
    Ne,
}

impl ComparisonOp {
    /// Operators in recognition order: two-character forms first.
    pub const ALL: [ComparisonOp; 6] = [
        ComparisonOp::Ge,
        ComparisonOp::Le,
        ComparisonOp::Eq,
        ComparisonOp::Ne,
        ComparisonOp::Gt,
        ComparisonOp::Lt,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            ComparisonOp::Gt => ">",
            ComparisonOp::Lt => "<",
            ComparisonOp::Ge => ">=",
            ComparisonOp::Le => "<=",
            ComparisonOp::Eq => "==",
            ComparisonOp::Ne => "!=",
        }
    }

    /// IEEE double comparison. `Eq`/`Ne` are exact.
    pub fn compare(self, left: f64, right: f64) -> bool {
        match self {
            ComparisonOp::Gt => left > right,
            ComparisonOp::Lt => left < right,
            ComparisonOp::Ge => left >= right,
            ComparisonOp::Le => left <= right,
            ComparisonOp::Eq => left == right,
            ComparisonOp::Ne => left != right,
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Compare {
        field: String,
        op: ComparisonOp,
        literal: String,
    },
    Truthy {
        field: String,
    },
}

impl Condition {
    pub fn field(&self) -> &str {
        match self {
            Condition::Compare { field, .. } | Condition::Truthy { field } => field,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Compare { field, op, literal } => write!(f, "{field} {op} {literal}"),
            Condition::Truthy { field } => f.write_str(field),
        }
    }
}
