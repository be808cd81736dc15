//! Rule evaluation engine.
//!
//! Evaluates a rule tree against one enriched snapshot.
//!
//! # Evaluation Semantics
//!
//! - Comparison: `left` is a field lookup; `right` is a field lookup or a
//!   literal. A missing field or non-finite literal makes the comparison
//!   `false`. `==` and `!=` use exact float equality.
//! - `AND`: Short-circuits on first `false`; empty is `true`
//! - `OR`: Short-circuits on first `true`; empty is `false`
//! - Unknown operators evaluate to `false`

use crate::domain::enrich::Snapshot;
use crate::domain::rule::{ComparisonOperator, LogicalOperator, Operand, Rule};

pub fn evaluate(rule: &Rule, snapshot: &Snapshot) -> bool {
    match rule {
        Rule::Comparison {
            left,
            operator,
            right,
        } => {
            let Some(left_val) = snapshot.get(left) else {
                return false;
            };
            let Some(right_val) = resolve_operand(right, snapshot) else {
                return false;
            };
            compare(*operator, left_val, right_val)
        }
        Rule::Logical {
            operator: LogicalOperator::And,
            children,
        } => {
            for r in children {
                if !evaluate(r, snapshot) {
                    return false;
                }
            }
            true
        }
        Rule::Logical {
            operator: LogicalOperator::Or,
            children,
        } => {
            for r in children {
                if evaluate(r, snapshot) {
                    return true;
                }
            }
            false
        }
        Rule::Logical {
            operator: LogicalOperator::Unknown,
            ..
        } => false,
    }
}

fn resolve_operand(operand: &Operand, snapshot: &Snapshot) -> Option<f64> {
    match operand {
        Operand::Field(name) => snapshot.get(name),
        Operand::Literal(value) => value.is_finite().then_some(*value),
    }
}

fn compare(operator: ComparisonOperator, left: f64, right: f64) -> bool {
    match operator {
        ComparisonOperator::Gt => left > right,
        ComparisonOperator::Lt => left < right,
        ComparisonOperator::Ge => left >= right,
        ComparisonOperator::Le => left <= right,
        ComparisonOperator::Eq => left == right,
        ComparisonOperator::Ne => left != right,
        ComparisonOperator::Unknown => false,
    }
}
