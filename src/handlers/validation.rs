use serde::{Deserialize, Deserializer};
use serde_json::{Number, Value};
use thiserror::Error;

use crate::records::{MemberDetails, NewRegistration, RegistrationPatch, RosterMemberPatch, Sex};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("groupId is required")]
    MissingGroupId,
    #[error("members is required")]
    MissingMembers,
    #[error("members must be a list")]
    MembersNotAList,
    #[error("members must contain at least one entry")]
    EmptyMembers,
    #[error("member {index} is invalid: {reason}")]
    InvalidMember { index: usize, reason: String },
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("name must not be blank")]
    BlankName,
    #[error("age must not be negative, got {0}")]
    NegativeAge(i64),
}

/// Body of a roster batch creation, before validation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMembersRequest {
    #[serde(default, alias = "wymaNumber", deserialize_with = "text_or_number")]
    pub group_id: Option<String>,
    #[serde(default)]
    pub members: Option<Value>,
}

/// Group identifiers are text, but older clients send the numeric
/// registration number; both are stored as the same string.
fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum GroupId {
        Text(String),
        Number(Number),
    }

    Ok(Option::<GroupId>::deserialize(deserializer)?.map(|group_id| match group_id {
        GroupId::Text(text) => text,
        GroupId::Number(number) => number.to_string(),
    }))
}

/// Body of a single registration, before validation
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateRegistrationRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub age: Option<i64>,
    #[serde(default)]
    pub phone: Option<i64>,
    #[serde(default)]
    pub sex: Option<Sex>,
}

pub fn validate_members(
    request: CreateMembersRequest,
) -> Result<(String, Vec<MemberDetails>), InputError> {
    let group_id = request
        .group_id
        .filter(|group_id| !group_id.is_empty())
        .ok_or(InputError::MissingGroupId)?;

    let entries = match request.members {
        None | Some(Value::Null) => return Err(InputError::MissingMembers),
        Some(Value::Array(entries)) => entries,
        Some(_) => return Err(InputError::MembersNotAList),
    };

    if entries.is_empty() {
        return Err(InputError::EmptyMembers);
    }

    let mut members = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        let details: MemberDetails = serde_json::from_value(entry)
            .map_err(|err| InputError::InvalidMember {
                index,
                reason: err.to_string(),
            })?;
        validate_person(Some(details.name.as_str()), Some(details.age)).map_err(|err| {
            InputError::InvalidMember {
                index,
                reason: err.to_string(),
            }
        })?;
        members.push(details);
    }

    Ok((group_id, members))
}

pub fn validate_registration(
    request: CreateRegistrationRequest,
) -> Result<NewRegistration, InputError> {
    let name = request
        .name
        .filter(|name| !name.is_empty())
        .ok_or(InputError::MissingField("name"))?;
    let age = request.age.ok_or(InputError::MissingField("age"))?;
    let sex = request.sex.ok_or(InputError::MissingField("sex"))?;

    validate_person(Some(name.as_str()), Some(age))?;

    Ok(NewRegistration {
        name,
        age,
        phone: request.phone,
        sex,
    })
}

pub fn validate_member_patch(patch: &RosterMemberPatch) -> Result<(), InputError> {
    validate_person(patch.name.as_deref(), patch.age)
}

pub fn validate_registration_patch(patch: &RegistrationPatch) -> Result<(), InputError> {
    validate_person(patch.name.as_deref(), patch.age)
}

fn validate_person(name: Option<&str>, age: Option<i64>) -> Result<(), InputError> {
    if name.is_some_and(|name| name.trim().is_empty()) {
        return Err(InputError::BlankName);
    }
    if let Some(age) = age.filter(|age| *age < 0) {
        return Err(InputError::NegativeAge(age));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn members_request(body: Value) -> CreateMembersRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn validate_members_accepts_valid_batch() {
        let (group_id, members) = validate_members(members_request(json!({
            "groupId": "G1",
            "members": [
                { "name": "A", "age": 30, "sex": "male" },
                { "name": "B", "age": 25, "sex": "female" }
            ]
        })))
        .unwrap();

        assert_eq!(group_id, "G1");
        assert_eq!(members.len(), 2);
        assert_eq!(members[1].sex, Sex::Female);
    }

    #[test]
    fn validate_members_accepts_legacy_group_name() {
        let (group_id, _) = validate_members(members_request(json!({
            "wymaNumber": "W-77",
            "members": [{ "name": "A", "age": 30, "sex": "male" }]
        })))
        .unwrap();
        assert_eq!(group_id, "W-77");

        let (group_id, _) = validate_members(members_request(json!({
            "wymaNumber": 200,
            "members": [{ "name": "A", "age": 30, "sex": "male" }]
        })))
        .unwrap();
        assert_eq!(group_id, "200");
    }

    #[test]
    fn numeric_group_id_is_stored_as_text() {
        let (group_id, _) = validate_members(members_request(json!({
            "groupId": 7,
            "members": [{ "name": "A", "age": 30, "sex": "male" }]
        })))
        .unwrap();
        assert_eq!(group_id, "7");

        let rejected = serde_json::from_value::<CreateMembersRequest>(json!({
            "groupId": ["G1"],
            "members": []
        }));
        assert!(rejected.is_err());

        let null_group = members_request(json!({ "groupId": null, "members": [] }));
        assert_eq!(validate_members(null_group).unwrap_err(), InputError::MissingGroupId);
    }

    #[test]
    fn validate_members_rejects_missing_group() {
        let err = validate_members(members_request(json!({
            "members": [{ "name": "A", "age": 30, "sex": "male" }]
        })))
        .unwrap_err();
        assert_eq!(err, InputError::MissingGroupId);

        let err = validate_members(members_request(json!({
            "groupId": "",
            "members": [{ "name": "A", "age": 30, "sex": "male" }]
        })))
        .unwrap_err();
        assert_eq!(err, InputError::MissingGroupId);
    }

    #[test]
    fn validate_members_rejects_bad_member_lists() {
        let missing = validate_members(members_request(json!({ "groupId": "G1" }))).unwrap_err();
        assert_eq!(missing, InputError::MissingMembers);

        let not_list = validate_members(members_request(json!({
            "groupId": "G1",
            "members": { "name": "A" }
        })))
        .unwrap_err();
        assert_eq!(not_list, InputError::MembersNotAList);

        let empty = validate_members(members_request(json!({ "groupId": "G1", "members": [] })))
            .unwrap_err();
        assert_eq!(empty, InputError::EmptyMembers);
    }

    #[test]
    fn validate_members_reports_bad_entry_index() {
        let err = validate_members(members_request(json!({
            "groupId": "G1",
            "members": [
                { "name": "A", "age": 30, "sex": "male" },
                { "name": "B", "age": 25, "sex": "unknown" }
            ]
        })))
        .unwrap_err();
        assert!(matches!(err, InputError::InvalidMember { index: 1, .. }));
    }

    #[test]
    fn validate_registration_requires_fields() {
        let full = CreateRegistrationRequest {
            name: Some("C".to_string()),
            age: Some(40),
            phone: None,
            sex: Some(Sex::Other),
        };
        let registration = validate_registration(full.clone()).unwrap();
        assert_eq!(registration.name, "C");
        assert!(registration.phone.is_none());

        let no_name = CreateRegistrationRequest { name: None, ..full.clone() };
        assert_eq!(validate_registration(no_name).unwrap_err(), InputError::MissingField("name"));

        let no_age = CreateRegistrationRequest { age: None, ..full.clone() };
        assert_eq!(validate_registration(no_age).unwrap_err(), InputError::MissingField("age"));

        let no_sex = CreateRegistrationRequest { sex: None, ..full };
        assert_eq!(validate_registration(no_sex).unwrap_err(), InputError::MissingField("sex"));
    }

    #[test]
    fn patches_check_only_present_fields() {
        assert!(validate_member_patch(&RosterMemberPatch::default()).is_ok());

        let blank = RosterMemberPatch {
            name: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(validate_member_patch(&blank).unwrap_err(), InputError::BlankName);

        let negative = RegistrationPatch {
            age: Some(-3),
            ..Default::default()
        };
        assert_eq!(
            validate_registration_patch(&negative).unwrap_err(),
            InputError::NegativeAge(-3)
        );
    }
}
