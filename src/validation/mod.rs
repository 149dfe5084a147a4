//! Validation Engine
//!
//! Evaluates a declarative rule table against typed form state and collects
//! the complete set of violations, grouped the way they are reported.

pub mod patterns;

use serde::{Deserialize, Serialize};

/// The value shape a rule inspects, extracted from a typed form.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
    List(Vec<String>),
    /// Number of attachments currently held by a file field.
    Count(usize),
}

impl FieldValue {
    /// Emptiness as the `Required` rule sees it.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Flag(b) => !b,
            FieldValue::List(items) => items.iter().all(|s| s.trim().is_empty()),
            FieldValue::Count(n) => *n == 0,
        }
    }

    fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

/// Which named pattern a `Pattern` rule checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    Email,
    MobileNumber,
}

impl PatternKind {
    fn regex(&self) -> &'static regex::Regex {
        match self {
            PatternKind::Email => &*patterns::EMAIL,
            PatternKind::MobileNumber => &*patterns::MOBILE_NUMBER,
        }
    }
}

/// Constraint kinds a field rule can impose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Required,
    NumericOnly,
    AlphaOnly,
    Pattern(PatternKind),
}

/// A single conditional constraint over a typed form `T`.
///
/// Rules are pure: `applies_when` and `value_of` read the form, never
/// mutate it.
pub struct FieldRule<T> {
    /// Stable field key, matching the payload field name.
    pub key: &'static str,
    /// User-facing label used in violation messages.
    pub label: &'static str,
    /// Whether the rule is active for the current form state.
    pub applies_when: fn(&T) -> bool,
    pub kind: RuleKind,
    /// Extracts the checked value from the form.
    pub value_of: fn(&T) -> FieldValue,
}

/// Violation categories, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    MissingRequired,
    FormatInvalid,
    PatternInvalid,
}

/// One failed rule, labeled for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub label: String,
    pub kind: ViolationKind,
}

/// Evaluate every applicable rule and return the full violation set.
///
/// Never stops at the first failure; output is grouped by kind
/// (missing-required, format-invalid, pattern-invalid) and keeps the rule
/// table's order within each group.
pub fn evaluate<T>(form: &T, rules: &[FieldRule<T>]) -> Vec<Violation> {
    let mut violations = Vec::new();

    for rule in rules {
        if !(rule.applies_when)(form) {
            continue;
        }
        let value = (rule.value_of)(form);
        let failed = match rule.kind {
            RuleKind::Required => value.is_empty(),
            RuleKind::NumericOnly => value
                .as_text()
                .map(|s| !s.trim().is_empty() && !patterns::NUMERIC.is_match(s.trim()))
                .unwrap_or(false),
            RuleKind::AlphaOnly => value
                .as_text()
                .map(|s| !s.trim().is_empty() && !patterns::ALPHA.is_match(s.trim()))
                .unwrap_or(false),
            RuleKind::Pattern(pattern) => value
                .as_text()
                .map(|s| !s.trim().is_empty() && !pattern.regex().is_match(s.trim()))
                .unwrap_or(false),
        };

        if failed {
            violations.push(Violation {
                label: rule.label.to_string(),
                kind: match rule.kind {
                    RuleKind::Required => ViolationKind::MissingRequired,
                    RuleKind::NumericOnly | RuleKind::AlphaOnly => ViolationKind::FormatInvalid,
                    RuleKind::Pattern(_) => ViolationKind::PatternInvalid,
                },
            });
        }
    }

    // Stable sort keeps table order inside each group.
    violations.sort_by_key(|v| v.kind);
    violations
}

/// Render the single aggregated message shown for a failed submit intent.
pub fn grouped_message(violations: &[Violation]) -> String {
    let mut sections = Vec::new();

    let labels = |kind: ViolationKind| -> Vec<&str> {
        violations
            .iter()
            .filter(|v| v.kind == kind)
            .map(|v| v.label.as_str())
            .collect()
    };

    let missing = labels(ViolationKind::MissingRequired);
    if !missing.is_empty() {
        sections.push(format!(
            "Please fill out the following: {}.",
            missing.join(", ")
        ));
    }
    let format_bad = labels(ViolationKind::FormatInvalid);
    if !format_bad.is_empty() {
        sections.push(format!(
            "These fields contain invalid characters: {}.",
            format_bad.join(", ")
        ));
    }
    let pattern_bad = labels(ViolationKind::PatternInvalid);
    if !pattern_bad.is_empty() {
        sections.push(format!(
            "These fields are not in a valid format: {}.",
            pattern_bad.join(", ")
        ));
    }

    sections.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sample {
        religion: String,
        other_religion: String,
        zip: String,
        email: String,
    }

    fn rules() -> Vec<FieldRule<Sample>> {
        vec![
            FieldRule {
                key: "religion",
                label: "Religion",
                applies_when: |_| true,
                kind: RuleKind::Required,
                value_of: |f| FieldValue::Text(f.religion.clone()),
            },
            FieldRule {
                key: "other_religion",
                label: "Other Religion",
                applies_when: |f| f.religion == "Others",
                kind: RuleKind::Required,
                value_of: |f| FieldValue::Text(f.other_religion.clone()),
            },
            FieldRule {
                key: "zip",
                label: "Zip Code",
                applies_when: |_| true,
                kind: RuleKind::NumericOnly,
                value_of: |f| FieldValue::Text(f.zip.clone()),
            },
            FieldRule {
                key: "email",
                label: "Email",
                applies_when: |_| true,
                kind: RuleKind::Pattern(PatternKind::Email),
                value_of: |f| FieldValue::Text(f.email.clone()),
            },
        ]
    }

    #[test]
    fn test_sentinel_gated_requirement() {
        let form = Sample {
            religion: "Others".into(),
            other_religion: "".into(),
            zip: "1400".into(),
            email: "a@b.co".into(),
        };
        let violations = evaluate(&form, &rules());
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].label, "Other Religion");
        assert_eq!(violations[0].kind, ViolationKind::MissingRequired);
    }

    #[test]
    fn test_inactive_rule_is_skipped() {
        let form = Sample {
            religion: "Catholic".into(),
            other_religion: "".into(),
            zip: "1400".into(),
            email: "a@b.co".into(),
        };
        assert!(evaluate(&form, &rules()).is_empty());
    }

    #[test]
    fn test_collects_full_set_grouped_by_kind() {
        let form = Sample {
            religion: "".into(),
            other_religion: "".into(),
            zip: "14a0".into(),
            email: "not-an-email".into(),
        };
        let violations = evaluate(&form, &rules());
        assert_eq!(violations.len(), 3);
        assert_eq!(violations[0].kind, ViolationKind::MissingRequired);
        assert_eq!(violations[1].kind, ViolationKind::FormatInvalid);
        assert_eq!(violations[2].kind, ViolationKind::PatternInvalid);
    }

    #[test]
    fn test_format_rules_ignore_empty_values() {
        // An empty optional field only fails Required rules, never format ones.
        let form = Sample {
            religion: "Catholic".into(),
            other_religion: "".into(),
            zip: "".into(),
            email: "".into(),
        };
        assert!(evaluate(&form, &rules()).is_empty());
    }

    #[test]
    fn test_grouped_message_sections() {
        let violations = vec![
            Violation {
                label: "First Name".into(),
                kind: ViolationKind::MissingRequired,
            },
            Violation {
                label: "Zip Code".into(),
                kind: ViolationKind::FormatInvalid,
            },
        ];
        let message = grouped_message(&violations);
        assert!(message.contains("Please fill out the following: First Name."));
        assert!(message.contains("invalid characters: Zip Code."));
    }
}
