//! Rule tree data structures.
//!
//! A rule is either a comparison between a snapshot field and another field
//! or a literal, or a logical combination of child rules. The JSON shape is
//! `{"type":"comparison","left":"close","operator":">","right":"sma_50"}`
//! and `{"type":"logical","operator":"AND","conditions":[...]}`.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Right-hand side of a comparison: a field name or a numeric literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Operand {
    Field(String),
    Literal(f64),
}

impl From<&str> for Operand {
    fn from(name: &str) -> Self {
        Operand::Field(name.to_string())
    }
}

impl From<f64> for Operand {
    fn from(value: f64) -> Self {
        Operand::Literal(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonOperator {
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    /// Any operator string not listed above. Always evaluates to `false`.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicalOperator {
    And,
    Or,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Rule {
    Comparison {
        left: String,
        operator: ComparisonOperator,
        right: Operand,
    },
    Logical {
        operator: LogicalOperator,
        #[serde(rename = "conditions")]
        children: Vec<Rule>,
    },
}

impl Rule {
    pub fn comparison(left: &str, operator: ComparisonOperator, right: impl Into<Operand>) -> Self {
        Rule::Comparison {
            left: left.to_string(),
            operator,
            right: right.into(),
        }
    }

    pub fn and(children: Vec<Rule>) -> Self {
        Rule::Logical {
            operator: LogicalOperator::And,
            children,
        }
    }

    pub fn or(children: Vec<Rule>) -> Self {
        Rule::Logical {
            operator: LogicalOperator::Or,
            children,
        }
    }

    /// Every snapshot field the rule reads, sorted and deduplicated.
    pub fn field_names(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        self.collect_fields(&mut names);
        names
    }

    fn collect_fields(&self, names: &mut BTreeSet<String>) {
        match self {
            Rule::Comparison { left, right, .. } => {
                names.insert(left.clone());
                if let Operand::Field(right) = right {
                    names.insert(right.clone());
                }
            }
            Rule::Logical { children, .. } => {
                for child in children {
                    child.collect_fields(names);
                }
            }
        }
    }

    /// Nesting depth; a single comparison has depth 1.
    pub fn depth(&self) -> usize {
        match self {
            Rule::Comparison { .. } => 1,
            Rule::Logical { children, .. } => {
                1 + children.iter().map(Rule::depth).max().unwrap_or(0)
            }
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            ComparisonOperator::Gt => ">",
            ComparisonOperator::Lt => "<",
            ComparisonOperator::Ge => ">=",
            ComparisonOperator::Le => "<=",
            ComparisonOperator::Eq => "==",
            ComparisonOperator::Ne => "!=",
            ComparisonOperator::Unknown => "?",
        };
        f.write_str(symbol)
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogicalOperator::And => "AND",
            LogicalOperator::Or => "OR",
            LogicalOperator::Unknown => "?",
        };
        f.write_str(name)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Field(name) => f.write_str(name),
            Operand::Literal(value) => write!(f, "{}", value),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Comparison {
                left,
                operator,
                right,
            } => write!(f, "{} {} {}", left, operator, right),
            Rule::Logical { operator, children } => {
                write!(f, "{}(", operator)?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", child)?;
                }
                f.write_str(")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserialize_comparison_with_field() {
        let rule: Rule = serde_json::from_value(json!({
            "type": "comparison",
            "left": "close",
            "operator": ">",
            "right": "sma_50"
        }))
        .unwrap();

        assert_eq!(
            rule,
            Rule::comparison("close", ComparisonOperator::Gt, "sma_50")
        );
    }

    #[test]
    fn deserialize_comparison_with_integer_literal() {
        let rule: Rule = serde_json::from_value(json!({
            "type": "comparison",
            "left": "rsi",
            "operator": "<=",
            "right": 30
        }))
        .unwrap();

        assert_eq!(rule, Rule::comparison("rsi", ComparisonOperator::Le, 30.0));
    }

    #[test]
    fn deserialize_nested_logical() {
        let rule: Rule = serde_json::from_value(json!({
            "type": "logical",
            "operator": "OR",
            "conditions": [
                {"type": "comparison", "left": "close", "operator": "==", "right": 1.5},
                {"type": "logical", "operator": "AND", "conditions": []}
            ]
        }))
        .unwrap();

        assert_eq!(
            rule,
            Rule::or(vec![
                Rule::comparison("close", ComparisonOperator::Eq, 1.5),
                Rule::and(vec![]),
            ])
        );
    }

    #[test]
    fn unknown_operators_deserialize_to_unknown() {
        let rule: Rule = serde_json::from_value(json!({
            "type": "comparison",
            "left": "close",
            "operator": "=>",
            "right": 1
        }))
        .unwrap();
        assert!(matches!(
            rule,
            Rule::Comparison {
                operator: ComparisonOperator::Unknown,
                ..
            }
        ));

        let rule: Rule = serde_json::from_value(json!({
            "type": "logical",
            "operator": "XOR",
            "conditions": []
        }))
        .unwrap();
        assert!(matches!(
            rule,
            Rule::Logical {
                operator: LogicalOperator::Unknown,
                ..
            }
        ));
    }

    #[test]
    fn unknown_rule_type_is_rejected() {
        let result: Result<Rule, _> = serde_json::from_value(json!({
            "type": "operator",
            "operator": "AND",
            "conditions": []
        }));
        assert!(result.is_err());
    }

    #[test]
    fn serialize_uses_wire_names() {
        let rule = Rule::and(vec![Rule::comparison(
            "close",
            ComparisonOperator::Ne,
            "open",
        )]);
        let value = serde_json::to_value(&rule).unwrap();

        assert_eq!(
            value,
            json!({
                "type": "logical",
                "operator": "AND",
                "conditions": [
                    {"type": "comparison", "left": "close", "operator": "!=", "right": "open"}
                ]
            })
        );
    }

    #[test]
    fn field_names_collects_both_sides() {
        let rule = Rule::and(vec![
            Rule::comparison("close", ComparisonOperator::Gt, "sma_50"),
            Rule::or(vec![
                Rule::comparison("rsi", ComparisonOperator::Lt, 30.0),
                Rule::comparison("close", ComparisonOperator::Lt, "bb_lower"),
            ]),
        ]);

        let names: Vec<String> = rule.field_names().into_iter().collect();
        assert_eq!(names, vec!["bb_lower", "close", "rsi", "sma_50"]);
    }

    #[test]
    fn depth_counts_nesting() {
        let leaf = Rule::comparison("close", ComparisonOperator::Gt, 1.0);
        assert_eq!(leaf.depth(), 1);
        assert_eq!(Rule::and(vec![]).depth(), 1);
        assert_eq!(Rule::or(vec![Rule::and(vec![leaf])]).depth(), 3);
    }

    #[test]
    fn display_reads_like_an_expression() {
        let rule = Rule::and(vec![
            Rule::comparison("close", ComparisonOperator::Gt, "sma_50"),
            Rule::comparison("rsi", ComparisonOperator::Lt, 30.0),
        ]);
        assert_eq!(rule.to_string(), "AND(close > sma_50, rsi < 30)");
    }
}
