use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Raw field values as typed by the user.
pub type FormValues = BTreeMap<String, String>;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$").expect("email pattern compiles")
});

/// One validation rule and the message shown when it fails.
///
/// Every rule except `Required` passes on an empty value, so optional fields
/// are only checked once the user fills them in.
#[derive(Debug, Clone)]
pub enum Rule {
    Required { message: String },
    Pattern { regex: Regex, message: String },
    MinLength { min: usize, message: String },
    /// Inclusive numeric range; non-numeric input fails.
    Range { min: f64, max: f64, message: String },
    /// Exclusive numeric lower bound; non-numeric input fails.
    MinExclusive { bound: f64, message: String },
    OneOf { options: Vec<String>, message: String },
}

impl Rule {
    pub fn required(message: impl Into<String>) -> Self {
        Rule::Required {
            message: message.into(),
        }
    }

    pub fn pattern(regex: Regex, message: impl Into<String>) -> Self {
        Rule::Pattern {
            regex,
            message: message.into(),
        }
    }

    /// RFC-like address: `local@domain.tld`, case-insensitive.
    pub fn email(message: impl Into<String>) -> Self {
        Self::pattern(EMAIL.clone(), message)
    }

    pub fn min_length(min: usize, message: impl Into<String>) -> Self {
        Rule::MinLength {
            min,
            message: message.into(),
        }
    }

    pub fn range(min: f64, max: f64, message: impl Into<String>) -> Self {
        Rule::Range {
            min,
            max,
            message: message.into(),
        }
    }

    pub fn min_exclusive(bound: f64, message: impl Into<String>) -> Self {
        Rule::MinExclusive {
            bound,
            message: message.into(),
        }
    }

    pub fn one_of<I, S>(options: I, message: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Rule::OneOf {
            options: options.into_iter().map(Into::into).collect(),
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Rule::Required { message }
            | Rule::Pattern { message, .. }
            | Rule::MinLength { message, .. }
            | Rule::Range { message, .. }
            | Rule::MinExclusive { message, .. }
            | Rule::OneOf { message, .. } => message,
        }
    }

    pub fn passes(&self, value: &str) -> bool {
        let trimmed = value.trim();
        if let Rule::Required { .. } = self {
            return !trimmed.is_empty();
        }
        if trimmed.is_empty() {
            return true;
        }
        match self {
            Rule::Required { .. } => true,
            Rule::Pattern { regex, .. } => regex.is_match(trimmed),
            Rule::MinLength { min, .. } => value.chars().count() >= *min,
            Rule::Range { min, max, .. } => {
                parse_number(trimmed).is_some_and(|n| n >= *min && n <= *max)
            }
            Rule::MinExclusive { bound, .. } => parse_number(trimmed).is_some_and(|n| n > *bound),
            Rule::OneOf { options, .. } => options.iter().any(|o| o == trimmed),
        }
    }
}

fn parse_number(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|n| n.is_finite())
}

#[derive(Debug, Clone)]
struct FieldRules {
    field: String,
    rules: Vec<Rule>,
}

/// Field name → ordered rules.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    fields: Vec<FieldRules>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the rules for `field`, in priority order.
    pub fn field(mut self, field: impl Into<String>, rules: Vec<Rule>) -> Self {
        self.fields.push(FieldRules {
            field: field.into(),
            rules,
        });
        self
    }

    /// Message of the first rule `value` fails for `field`, if any.
    pub fn check(&self, field: &str, value: &str) -> Option<&str> {
        self.fields
            .iter()
            .filter(|f| f.field == field)
            .flat_map(|f| f.rules.iter())
            .find(|rule| !rule.passes(value))
            .map(Rule::message)
    }

    /// Evaluate every declared field; a missing value counts as empty.
    pub fn validate(&self, values: &FormValues) -> ValidationReport {
        let mut errors = BTreeMap::new();
        for field in &self.fields {
            if errors.contains_key(&field.field) {
                continue;
            }
            let value = values.get(&field.field).map(String::as_str).unwrap_or("");
            if let Some(message) = self.check(&field.field, value) {
                errors.insert(field.field.clone(), message.to_string());
            }
        }
        ValidationReport { errors }
    }
}

/// Per-field error messages. Valid iff empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct ValidationReport {
    errors: BTreeMap<String, String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub(crate) fn remove(&mut self, field: &str) {
        self.errors.remove(field);
    }

    pub(crate) fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.errors.insert(field.to_string(), message.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> FormValues {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn email_pattern() {
        let rules = RuleSet::new().field("email", vec![Rule::email("Correo electrónico inválido")]);

        let report = rules.validate(&values(&[("email", "not-an-email")]));
        assert!(!report.is_valid());
        assert_eq!(report.error("email"), Some("Correo electrónico inválido"));

        let report = rules.validate(&values(&[("email", "a@b.com")]));
        assert!(report.is_valid());
        assert_eq!(report.error("email"), None);
    }

    #[test]
    fn min_length() {
        let rules = RuleSet::new().field("message", vec![Rule::min_length(10, "Muy corto")]);
        assert_eq!(
            rules.validate(&values(&[("message", "hola!")])).error("message"),
            Some("Muy corto")
        );
        assert!(rules.validate(&values(&[("message", "hola, buenas")])).is_valid());
    }

    #[test]
    fn first_declared_rule_wins() {
        let rules = RuleSet::new().field(
            "email",
            vec![Rule::required("Obligatorio"), Rule::email("Inválido")],
        );
        assert_eq!(rules.validate(&FormValues::new()).error("email"), Some("Obligatorio"));
        assert_eq!(rules.validate(&values(&[("email", "x")])).error("email"), Some("Inválido"));
    }

    #[test]
    fn optional_fields_skip_non_required_rules_when_empty() {
        let rules = RuleSet::new().field("year", vec![Rule::range(1900.0, 2024.0, "Año inválido")]);
        assert!(rules.validate(&values(&[("year", "")])).is_valid());
        assert!(rules.validate(&FormValues::new()).is_valid());
        assert!(!rules.validate(&values(&[("year", "1850")])).is_valid());
        assert!(!rules.validate(&values(&[("year", "abc")])).is_valid());
    }

    #[test]
    fn whitespace_does_not_satisfy_required() {
        let rules = RuleSet::new().field("name", vec![Rule::required("Obligatorio")]);
        assert!(!rules.validate(&values(&[("name", "   ")])).is_valid());
    }

    #[test]
    fn min_exclusive_and_one_of() {
        let rules = RuleSet::new()
            .field("price", vec![Rule::min_exclusive(0.0, "Debe ser mayor a 0")])
            .field("kind", vec![Rule::one_of(["sale", "trade"], "Valor inválido")]);

        let report = rules.validate(&values(&[("price", "0"), ("kind", "lease")]));
        assert_eq!(report.len(), 2);

        let report = rules.validate(&values(&[("price", "10"), ("kind", "trade")]));
        assert!(report.is_valid());
    }

    #[test]
    fn each_failing_field_is_reported_independently() {
        let rules = RuleSet::new()
            .field("a", vec![Rule::required("a!")])
            .field("b", vec![Rule::required("b!")])
            .field("c", vec![Rule::required("c!")]);
        let report = rules.validate(&values(&[("b", "ok")]));
        assert_eq!(report.error("a"), Some("a!"));
        assert_eq!(report.error("b"), None);
        assert_eq!(report.error("c"), Some("c!"));
    }
}
