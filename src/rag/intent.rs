//! Query intent detection
//!
//! Intents come from an ordered rule table of keyword sets matched as
//! case-insensitive substrings. A query can carry several intents at once.

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryIntent {
    /// Lineup/draft decisions: results are re-ranked by grade then ECR
    Lineup,
    /// Only rookie players are kept
    Rookie,
    /// Schedule or rest-of-season outlook
    Matchup,
}

impl QueryIntent {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lineup => "lineup",
            Self::Rookie => "rookie",
            Self::Matchup => "matchup",
        }
    }
}

impl fmt::Display for QueryIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct IntentRule {
    pub intent: QueryIntent,
    pub keywords: &'static [&'static str],
}

pub const INTENT_RULES: &[IntentRule] = &[
    IntentRule {
        intent: QueryIntent::Lineup,
        keywords: &[
            "lineup", "draft", "pick", "roster", "team", "start", "bench", "flex",
        ],
    },
    IntentRule {
        intent: QueryIntent::Rookie,
        keywords: &["rookie", "rookies", "2025 draft", "first year"],
    },
    IntentRule {
        intent: QueryIntent::Matchup,
        keywords: &[
            "matchup",
            "schedule",
            "season",
            "outlook",
            "ros",
            "rest of season",
            "upcoming",
            "future",
            "games",
            "weeks",
            "look",
            "looking",
        ],
    },
];

/// Intents detected for one query, in rule-table order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntentSet(Vec<QueryIntent>);

impl IntentSet {
    pub fn contains(&self, intent: QueryIntent) -> bool {
        self.0.contains(&intent)
    }

    pub fn is_lineup(&self) -> bool {
        self.contains(QueryIntent::Lineup)
    }

    pub fn is_rookie(&self) -> bool {
        self.contains(QueryIntent::Rookie)
    }

    pub fn is_matchup(&self) -> bool {
        self.contains(QueryIntent::Matchup)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = QueryIntent> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<QueryIntent> for IntentSet {
    fn from_iter<T: IntoIterator<Item = QueryIntent>>(iter: T) -> Self {
        let mut set = Vec::new();
        for intent in iter {
            if !set.contains(&intent) {
                set.push(intent);
            }
        }
        Self(set)
    }
}

impl fmt::Display for IntentSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("general");
        }
        let names: Vec<&str> = self.0.iter().map(|i| i.as_str()).collect();
        f.write_str(&names.join(", "))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct IntentClassifier {
    rules: &'static [IntentRule],
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self {
            rules: INTENT_RULES,
        }
    }
}

impl IntentClassifier {
    pub const fn with_rules(rules: &'static [IntentRule]) -> Self {
        Self { rules }
    }

    pub fn classify(&self, query: &str) -> IntentSet {
        let query = query.to_lowercase();
        self.rules
            .iter()
            .filter(|rule| rule.keywords.iter().any(|k| query.contains(k)))
            .map(|rule| rule.intent)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(q: &str) -> IntentSet {
        IntentClassifier::default().classify(q)
    }

    #[test]
    fn test_lineup_keywords() {
        assert!(classify("Who should I START this week?").is_lineup());
        assert!(classify("best flex option").is_lineup());
        assert!(!classify("Who are the top 5 running backs for PPR leagues?").is_lineup());
    }

    #[test]
    fn test_rookie_keywords() {
        let intents = classify("Which rookies have upside?");
        assert!(intents.is_rookie());
        assert!(!intents.is_lineup());
        assert!(classify("best first year receivers").is_rookie());
    }

    #[test]
    fn test_multiple_intents() {
        let intents = classify("Rookie running backs to draft with a good schedule");
        assert!(intents.is_lineup());
        assert!(intents.is_rookie());
        assert!(intents.is_matchup());
        assert_eq!(intents.to_string(), "lineup, rookie, matchup");
    }

    #[test]
    fn test_empty_query_has_no_intent() {
        let intents = classify("");
        assert!(intents.is_empty());
        assert_eq!(intents.to_string(), "general");
    }

    #[test]
    fn test_custom_rules() {
        const RULES: &[IntentRule] = &[IntentRule {
            intent: QueryIntent::Matchup,
            keywords: &["bye"],
        }];
        let classifier = IntentClassifier::with_rules(RULES);
        assert!(classifier.classify("bye week fill-ins").is_matchup());
        assert!(classifier.classify("start em").is_empty());
    }

    #[test]
    fn test_serializes_as_list() {
        let json = serde_json::to_string(&classify("lineup")).unwrap();
        assert_eq!(json, r#"["lineup"]"#);
    }
}
