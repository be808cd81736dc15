//! Strategy definition: a pair of entry and exit rules.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::rule::Rule;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyRules {
    pub entry: Rule,
    pub exit: Rule,
}

impl StrategyRules {
    pub fn new(entry: Rule, exit: Rule) -> Self {
        Self { entry, exit }
    }

    /// Fields read by either rule.
    pub fn field_names(&self) -> BTreeSet<String> {
        let mut names = self.entry.field_names();
        names.extend(self.exit.field_names());
        names
    }
}

/// A named strategy persisted in the strategy store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredStrategy {
    pub id: String,
    pub name: String,
    pub rules: StrategyRules,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rule::ComparisonOperator;
    use serde_json::json;

    fn sample_rules() -> StrategyRules {
        StrategyRules::new(
            Rule::comparison("close", ComparisonOperator::Gt, "sma_50"),
            Rule::or(vec![
                Rule::comparison("close", ComparisonOperator::Lt, "sma_50"),
                Rule::comparison("rsi", ComparisonOperator::Gt, 70.0),
            ]),
        )
    }

    #[test]
    fn field_names_union() {
        let names: Vec<String> = sample_rules().field_names().into_iter().collect();
        assert_eq!(names, vec!["close", "rsi", "sma_50"]);
    }

    #[test]
    fn rules_from_json() {
        let rules: StrategyRules = serde_json::from_value(json!({
            "entry": {"type": "comparison", "left": "close", "operator": ">", "right": 100},
            "exit": {"type": "comparison", "left": "close", "operator": "<", "right": 90}
        }))
        .unwrap();

        assert_eq!(
            rules.entry,
            Rule::comparison("close", ComparisonOperator::Gt, 100.0)
        );
        assert_eq!(
            rules.exit,
            Rule::comparison("close", ComparisonOperator::Lt, 90.0)
        );
    }

    #[test]
    fn rules_missing_exit_is_rejected() {
        let result: Result<StrategyRules, _> = serde_json::from_value(json!({
            "entry": {"type": "comparison", "left": "close", "operator": ">", "right": 100}
        }));
        assert!(result.is_err());
    }

    #[test]
    fn stored_strategy_round_trip() {
        let stored = StoredStrategy {
            id: "abc".into(),
            name: "Trend".into(),
            rules: sample_rules(),
        };
        let text = serde_json::to_string(&stored).unwrap();
        let back: StoredStrategy = serde_json::from_str(&text).unwrap();
        assert_eq!(back, stored);
    }
}
