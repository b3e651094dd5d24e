//! Filter predicates evaluated by the store.
//!
//! A [`Filter`] is a conjunction of per-field [`Condition`]s. The builder in
//! [`ListCriteria::to_filter`] only ever adds a clause for a parameter that was
//! given, so dropping a parameter can never shrink a result set.

use serde_json::Value;

use crate::records::{Sex, fields};

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Field equals the value exactly
    Equals(Value),
    /// String field contains the needle, ignoring case
    ContainsIgnoreCase(String),
    /// Integer field within the inclusive bounds; a missing bound is open
    Between { min: Option<i64>, max: Option<i64> },
}

impl Condition {
    pub fn matches(&self, field: Option<&Value>) -> bool {
        let Some(field) = field else {
            return false;
        };

        match self {
            Condition::Equals(expected) => field == expected,
            Condition::ContainsIgnoreCase(needle) => field
                .as_str()
                .is_some_and(|text| text.to_lowercase().contains(&needle.to_lowercase())),
            Condition::Between { min, max } => field.as_i64().is_some_and(|n| {
                min.is_none_or(|min| n >= min) && max.is_none_or(|max| n <= max)
            }),
        }
    }
}

/// Conjunction of field conditions. An empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<(&'static str, Condition)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: &'static str, condition: Condition) -> Self {
        self.clauses.push((field, condition));
        self
    }

    pub fn clauses(&self) -> &[(&'static str, Condition)] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Evaluate against the JSON form of a record
    pub fn matches(&self, document: &Value) -> bool {
        self.clauses
            .iter()
            .all(|(field, condition)| condition.matches(document.get(*field)))
    }
}

/// Exact-match identifier filter; which one applies depends on the collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    Group(String),
    Sequential(i64),
}

/// Typed, already-validated listing filters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListCriteria {
    pub identifier: Option<Identifier>,
    pub sex: Option<Sex>,
    pub name: Option<String>,
    pub min_age: Option<i64>,
    pub max_age: Option<i64>,
}

impl ListCriteria {
    pub fn to_filter(&self) -> Filter {
        let mut filter = Filter::new();

        match &self.identifier {
            Some(Identifier::Group(group_id)) if !group_id.is_empty() => {
                filter = filter.with(fields::GROUP_ID, Condition::Equals(Value::from(group_id.as_str())));
            }
            Some(Identifier::Sequential(id)) => {
                filter = filter.with(fields::SEQUENTIAL_ID, Condition::Equals(Value::from(*id)));
            }
            _ => {}
        }

        if let Some(sex) = self.sex {
            filter = filter.with(fields::SEX, Condition::Equals(Value::from(sex.as_str())));
        }

        if let Some(name) = self.name.as_deref().filter(|name| !name.is_empty()) {
            filter = filter.with(fields::NAME, Condition::ContainsIgnoreCase(name.to_string()));
        }

        if self.min_age.is_some() || self.max_age.is_some() {
            filter = filter.with(
                fields::AGE,
                Condition::Between {
                    min: self.min_age,
                    max: self.max_age,
                },
            );
        }

        filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn member(group: &str, name: &str, age: i64, sex: &str) -> Value {
        json!({ "groupId": group, "name": name, "age": age, "sex": sex })
    }

    #[test]
    fn no_criteria_builds_empty_filter() {
        let filter = ListCriteria::default().to_filter();
        assert!(filter.is_empty());
        assert!(filter.matches(&member("G1", "A", 30, "male")));
    }

    #[test]
    fn empty_strings_add_no_clause() {
        let criteria = ListCriteria {
            identifier: Some(Identifier::Group(String::new())),
            name: Some(String::new()),
            ..Default::default()
        };
        assert!(criteria.to_filter().is_empty());
    }

    #[test]
    fn exact_identifier_and_sex() {
        let filter = ListCriteria {
            identifier: Some(Identifier::Group("G1".to_string())),
            sex: Some(Sex::Female),
            ..Default::default()
        }
        .to_filter();

        assert!(filter.matches(&member("G1", "B", 25, "female")));
        assert!(!filter.matches(&member("G1", "A", 30, "male")));
        assert!(!filter.matches(&member("G10", "B", 25, "female")));
    }

    #[test]
    fn sequential_identifier_is_numeric() {
        let filter = ListCriteria {
            identifier: Some(Identifier::Sequential(201)),
            ..Default::default()
        }
        .to_filter();

        assert_eq!(
            filter.clauses(),
            &[(fields::SEQUENTIAL_ID, Condition::Equals(json!(201)))]
        );
        assert!(filter.matches(&json!({ "sequentialId": 201 })));
        assert!(!filter.matches(&json!({ "sequentialId": "201" })));
    }

    #[test]
    fn name_is_unanchored_and_case_insensitive() {
        let filter = ListCriteria {
            name: Some("ann".to_string()),
            ..Default::default()
        }
        .to_filter();

        assert!(filter.matches(&member("G", "Joanna", 1, "female")));
        assert!(filter.matches(&member("G", "ANN", 1, "female")));
        assert!(!filter.matches(&member("G", "Anton", 1, "male")));
    }

    #[test]
    fn age_bounds() {
        let both = ListCriteria {
            min_age: Some(20),
            max_age: Some(30),
            ..Default::default()
        }
        .to_filter();
        assert!(both.matches(&member("G", "A", 20, "male")));
        assert!(both.matches(&member("G", "A", 30, "male")));
        assert!(!both.matches(&member("G", "A", 31, "male")));
        assert!(!both.matches(&member("G", "A", 19, "male")));

        let lower = ListCriteria {
            min_age: Some(28),
            ..Default::default()
        }
        .to_filter();
        assert!(lower.matches(&member("G", "A", 90, "male")));
        assert!(!lower.matches(&member("G", "B", 25, "female")));

        let upper = ListCriteria {
            max_age: Some(28),
            ..Default::default()
        }
        .to_filter();
        assert!(upper.matches(&member("G", "B", 25, "female")));
        assert!(!upper.matches(&member("G", "A", 30, "male")));
    }

    #[test]
    fn inverted_bounds_match_nothing() {
        let filter = ListCriteria {
            min_age: Some(40),
            max_age: Some(30),
            ..Default::default()
        }
        .to_filter();
        assert!(!filter.matches(&member("G", "A", 35, "male")));
    }

    #[test]
    fn dropping_a_parameter_never_narrows() {
        let records = vec![
            member("G1", "Alice", 30, "female"),
            member("G1", "Bob", 25, "male"),
            member("G2", "Alina", 41, "female"),
            member("G2", "Carl", 17, "other"),
        ];
        let full = ListCriteria {
            identifier: Some(Identifier::Group("G1".to_string())),
            sex: Some(Sex::Female),
            name: Some("al".to_string()),
            min_age: Some(18),
            max_age: Some(35),
        };

        let relaxed = [
            ListCriteria { identifier: None, ..full.clone() },
            ListCriteria { sex: None, ..full.clone() },
            ListCriteria { name: None, ..full.clone() },
            ListCriteria { min_age: None, ..full.clone() },
            ListCriteria { max_age: None, ..full.clone() },
        ];

        let strict = full.to_filter();
        for criteria in relaxed {
            let loose = criteria.to_filter();
            for record in &records {
                if strict.matches(record) {
                    assert!(loose.matches(record), "{criteria:?} dropped {record}");
                }
            }
        }
    }

    #[test]
    fn missing_field_never_matches() {
        let filter = Filter::new().with("phone", Condition::Equals(json!(5)));
        assert!(!filter.matches(&json!({ "name": "A" })));
    }
}
