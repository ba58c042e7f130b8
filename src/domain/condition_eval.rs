//! Condition evaluation against a single record.
//!
//! # Evaluation Semantics
//!
//! - Bare field: absent or null is `false`; booleans and text match only when
//!   they read `true`; numbers match when non-zero
//! - Comparison: the field is looked up by its parsed name. Absent or null is
//!   `false` for every operator, `!=` included
//! - Both sides numeric: IEEE comparison, exact for `==`/`!=`
//! - Otherwise `==`/`!=` compare text case-insensitively; ordering operators
//!   are `false`

use crate::domain::condition::{ComparisonOp, Condition};
use crate::domain::record::Record;
use crate::domain::value::{parse_number, FieldValue};

pub fn evaluate(record: &Record, condition: &Condition) -> bool {
    match condition {
        Condition::Truthy { field } => record.get(field).is_some_and(FieldValue::is_truthy),
        Condition::Compare { field, op, literal } => match record.get(field) {
            None | Some(FieldValue::Null) => false,
            Some(value) => compare_value(value, *op, literal),
        },
    }
}

fn compare_value(value: &FieldValue, op: ComparisonOp, literal: &str) -> bool {
    if let (Some(left), Some(right)) = (value.as_number(), parse_number(literal)) {
        return op.compare(left, right);
    }

    match op {
        ComparisonOp::Eq => value.text_eq_ignore_case(literal),
        ComparisonOp::Ne => !value.text_eq_ignore_case(literal),
        ComparisonOp::Gt | ComparisonOp::Lt | ComparisonOp::Ge | ComparisonOp::Le => false,
    }
}
