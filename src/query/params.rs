//! Listing query parameters as they arrive on the URL, and their parsing
//! into a typed [`ListQuery`].

use serde::Deserialize;
use thiserror::Error;

use super::filter::{Identifier, ListCriteria};
use crate::records::Sex;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParamError {
    #[error("{param} must be a base-10 integer, got '{value}'")]
    NotAnInteger { param: &'static str, value: String },
    #[error("{param} must not be negative, got '{value}'")]
    Negative { param: &'static str, value: String },
    #[error("size must be at least 1")]
    ZeroSize,
    #[error("{0}")]
    InvalidSex(String),
}

/// Which exact-match identifier a collection is filtered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    Group,
    Sequential,
}

/// Raw query string. Every value is optional and an empty value counts as absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub page: Option<String>,
    pub size: Option<String>,
    pub group_id: Option<String>,
    pub sequential_id: Option<String>,
    /// Legacy name for whichever identifier the collection uses
    pub wyma_number: Option<String>,
    pub sex: Option<String>,
    pub name: Option<String>,
    pub min_age: Option<String>,
    pub max_age: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub criteria: ListCriteria,
    pub page: Option<u64>,
    pub size: Option<u64>,
}

impl ListQuery {
    /// Page number reported back to the caller; omitted means the first page
    pub fn current_page(&self) -> u64 {
        self.page.unwrap_or(1)
    }
}

impl ListParams {
    pub fn parse(self, kind: IdentifierKind) -> Result<ListQuery, ParamError> {
        let page = parse_unsigned("page", self.page)?;
        let size = parse_unsigned("size", self.size)?;
        if size == Some(0) {
            return Err(ParamError::ZeroSize);
        }

        let identifier = match kind {
            IdentifierKind::Group => present(self.group_id)
                .or_else(|| present(self.wyma_number))
                .map(Identifier::Group),
            IdentifierKind::Sequential => {
                let raw = present(self.sequential_id).or_else(|| present(self.wyma_number));
                parse_signed("sequentialId", raw)?.map(Identifier::Sequential)
            }
        };

        let sex = present(self.sex)
            .map(|raw| raw.parse::<Sex>())
            .transpose()
            .map_err(ParamError::InvalidSex)?;

        Ok(ListQuery {
            criteria: ListCriteria {
                identifier,
                sex,
                name: present(self.name),
                min_age: parse_signed("minAge", self.min_age)?,
                max_age: parse_signed("maxAge", self.max_age)?,
            },
            page,
            size,
        })
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

fn parse_signed(param: &'static str, raw: Option<String>) -> Result<Option<i64>, ParamError> {
    let Some(raw) = present(raw) else {
        return Ok(None);
    };

    raw.trim()
        .parse::<i64>()
        .map(Some)
        .map_err(|_| ParamError::NotAnInteger { param, value: raw })
}

fn parse_unsigned(param: &'static str, raw: Option<String>) -> Result<Option<u64>, ParamError> {
    match parse_signed(param, raw.clone())? {
        Some(n) if n < 0 => Err(ParamError::Negative {
            param,
            value: raw.unwrap_or_default(),
        }),
        Some(n) => Ok(Some(n as u64)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> ListParams {
        let object = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), serde_json::Value::from(*v)))
            .collect();
        serde_json::from_value(serde_json::Value::Object(object)).unwrap()
    }

    #[test]
    fn empty_query() {
        let query = ListParams::default().parse(IdentifierKind::Group).unwrap();
        assert_eq!(query, ListQuery::default());
        assert_eq!(query.current_page(), 1);
    }

    #[test]
    fn full_roster_query() {
        let query = params(&[
            ("page", "2"),
            ("size", "5"),
            ("groupId", "G1"),
            ("sex", "male"),
            ("name", "an"),
            ("minAge", "18"),
            ("maxAge", "65"),
        ])
        .parse(IdentifierKind::Group)
        .unwrap();

        assert_eq!(query.page, Some(2));
        assert_eq!(query.size, Some(5));
        assert_eq!(query.criteria.identifier, Some(Identifier::Group("G1".to_string())));
        assert_eq!(query.criteria.sex, Some(Sex::Male));
        assert_eq!(query.criteria.name.as_deref(), Some("an"));
        assert_eq!(query.criteria.min_age, Some(18));
        assert_eq!(query.criteria.max_age, Some(65));
    }

    #[test]
    fn empty_values_are_absent() {
        let query = params(&[("groupId", ""), ("name", ""), ("minAge", ""), ("page", "")])
            .parse(IdentifierKind::Group)
            .unwrap();
        assert_eq!(query, ListQuery::default());
    }

    #[test]
    fn identifier_follows_collection_kind() {
        let raw = params(&[("groupId", "G1"), ("sequentialId", "204")]);

        let roster = raw.clone().parse(IdentifierKind::Group).unwrap();
        assert_eq!(roster.criteria.identifier, Some(Identifier::Group("G1".to_string())));

        let registration = raw.parse(IdentifierKind::Sequential).unwrap();
        assert_eq!(registration.criteria.identifier, Some(Identifier::Sequential(204)));
    }

    #[test]
    fn legacy_identifier_name() {
        let query = params(&[("wymaNumber", "200")])
            .parse(IdentifierKind::Sequential)
            .unwrap();
        assert_eq!(query.criteria.identifier, Some(Identifier::Sequential(200)));
    }

    #[test]
    fn non_numeric_bounds_are_rejected() {
        let err = params(&[("minAge", "abc")])
            .parse(IdentifierKind::Group)
            .unwrap_err();
        assert_eq!(
            err,
            ParamError::NotAnInteger {
                param: "minAge",
                value: "abc".to_string()
            }
        );

        let err = params(&[("sequentialId", "20x")])
            .parse(IdentifierKind::Sequential)
            .unwrap_err();
        assert!(matches!(err, ParamError::NotAnInteger { param: "sequentialId", .. }));
    }

    #[test]
    fn negative_page_and_zero_size_are_rejected() {
        let err = params(&[("page", "-1")]).parse(IdentifierKind::Group).unwrap_err();
        assert!(matches!(err, ParamError::Negative { param: "page", .. }));

        let err = params(&[("size", "0")]).parse(IdentifierKind::Group).unwrap_err();
        assert_eq!(err, ParamError::ZeroSize);
    }

    #[test]
    fn page_zero_is_allowed() {
        let query = params(&[("page", "0")]).parse(IdentifierKind::Group).unwrap();
        assert_eq!(query.page, Some(0));
        assert_eq!(query.current_page(), 0);
    }

    #[test]
    fn unknown_sex_is_rejected() {
        let err = params(&[("sex", "unknown")]).parse(IdentifierKind::Group).unwrap_err();
        assert!(matches!(err, ParamError::InvalidSex(_)));
    }
}
