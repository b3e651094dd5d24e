use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Record, Sex, new_record_id};

/// One self-registered person with an allocated sequential identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    #[serde(rename = "_id")]
    pub id: String,
    pub sequential_id: i64,
    pub name: String,
    pub age: i64,
    #[serde(default)]
    pub phone: Option<i64>,
    pub sex: Sex,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Registration {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewRegistration {
    pub name: String,
    pub age: i64,
    pub phone: Option<i64>,
    pub sex: Sex,
}

impl NewRegistration {
    pub fn into_record(self, sequential_id: i64, now: DateTime<Utc>) -> Registration {
        Registration {
            id: new_record_id(),
            sequential_id,
            name: self.name,
            age: self.age,
            phone: self.phone,
            sex: self.sex,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistrationPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<Sex>,
}
