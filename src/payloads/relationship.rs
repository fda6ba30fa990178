use serde::{Deserialize, Serialize};

use crate::core::validate::{Rule, Validate, Validator};

/// `{ "data": { "guid": "..." } }`
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Relationship {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<RelationshipData>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RelationshipData {
    #[serde(default)]
    pub guid: String,
}

impl Relationship {
    pub fn to_one(guid: impl Into<String>) -> Self {
        Self {
            data: Some(RelationshipData { guid: guid.into() }),
        }
    }

    /// The referenced GUID; empty only for input that skipped validation.
    pub fn guid(&self) -> &str {
        self.data
            .as_ref()
            .map(|data| data.guid.as_str())
            .unwrap_or_default()
    }
}

impl Validate for Relationship {
    fn validate(&self, v: &mut Validator) {
        v.required("data", self.data.as_ref());
    }
}

impl Validate for RelationshipData {
    fn validate(&self, v: &mut Validator) {
        v.string("guid", &self.guid, &[Rule::NotBlank]);
    }
}
