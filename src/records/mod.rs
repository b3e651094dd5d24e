//! Stored record types for both rosters.
//!
//! Field names on the wire and in the document store follow the camelCase
//! convention of the existing collections (`groupId`, `createdAt`, ...), and
//! the identifier is kept under `_id` as a 24-digit hex ObjectId string.

mod registration;
mod roster;

pub use registration::{NewRegistration, Registration, RegistrationPatch};
pub use roster::{MemberDetails, RosterMember, RosterMemberPatch};

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::fmt;

/// Field names shared by the filter builder, the stores and the records
pub mod fields {
    pub const ID: &str = "_id";
    pub const GROUP_ID: &str = "groupId";
    pub const SEQUENTIAL_ID: &str = "sequentialId";
    pub const NAME: &str = "name";
    pub const AGE: &str = "age";
    pub const SEX: &str = "sex";
    pub const UPDATED_AT: &str = "updatedAt";
}

/// A document owned by one collection of the store.
pub trait Record:
    Serialize + DeserializeOwned + Clone + fmt::Debug + Send + Sync + Unpin + 'static
{
    fn id(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
    Other,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
            Sex::Other => "other",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Sex {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "male" => Ok(Sex::Male),
            "female" => Ok(Sex::Female),
            "other" => Ok(Sex::Other),
            other => Err(format!("sex must be one of male, female, other (got '{other}')")),
        }
    }
}

/// Fresh document identifier, in the same format the document store uses.
pub fn new_record_id() -> String {
    ObjectId::new().to_hex()
}
