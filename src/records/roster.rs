use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Record, Sex, new_record_id};

/// One person on the approved roster.
///
/// `group_member_count` is the size of the batch the record was created in.
/// It is fixed at insertion and is not kept in sync with later deletes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterMember {
    #[serde(rename = "_id")]
    pub id: String,
    pub group_id: String,
    pub group_member_count: i64,
    pub name: String,
    pub age: i64,
    pub sex: Sex,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for RosterMember {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Per-member attributes submitted in a batch
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MemberDetails {
    pub name: String,
    pub age: i64,
    pub sex: Sex,
}

impl RosterMember {
    /// Stamp one batch: every record shares the group identifier and the batch size.
    pub fn batch(group_id: &str, members: Vec<MemberDetails>, now: DateTime<Utc>) -> Vec<Self> {
        let count = members.len() as i64;
        members
            .into_iter()
            .map(|details| RosterMember {
                id: new_record_id(),
                group_id: group_id.to_string(),
                group_member_count: count,
                name: details.name,
                age: details.age,
                sex: details.sex,
                created_at: now,
                updated_at: now,
            })
            .collect()
    }
}

/// Mutable subset of a roster member. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RosterMemberPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<Sex>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(name: &str, age: i64, sex: Sex) -> MemberDetails {
        MemberDetails {
            name: name.to_string(),
            age,
            sex,
        }
    }

    #[test]
    fn batch_stamps_group_and_count() {
        let now = Utc::now();
        let records = RosterMember::batch(
            "G1",
            vec![
                details("A", 30, Sex::Male),
                details("B", 25, Sex::Female),
                details("C", 7, Sex::Other),
            ],
            now,
        );

        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.group_id == "G1"));
        assert!(records.iter().all(|r| r.group_member_count == 3));
        assert_eq!(records[1].name, "B");
        assert_ne!(records[0].id, records[1].id);
    }

    #[test]
    fn serializes_with_store_field_names() {
        let record = RosterMember::batch("G9", vec![details("A", 30, Sex::Male)], Utc::now())
            .remove(0);
        let value = serde_json::to_value(&record).unwrap();

        assert!(value.get("_id").is_some());
        assert_eq!(value["groupId"], "G9");
        assert_eq!(value["groupMemberCount"], 1);
        assert!(value.get("createdAt").is_some());
    }

    #[test]
    fn patch_skips_absent_fields() {
        let patch = RosterMemberPatch {
            age: Some(31),
            ..Default::default()
        };
        let value = serde_json::to_value(&patch).unwrap();

        assert_eq!(value, serde_json::json!({ "age": 31 }));
    }
}
