use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::validate::{KeyRule, Validate, Validator};
use crate::messages;

/// Platform-owned namespace; user labels and annotations may not live under it.
pub const RESERVED_DOMAIN: &str = "cloudfoundry.org";

const KEY_RULES: [KeyRule<'static>; 1] = [KeyRule::ReservedDomain(RESERVED_DOMAIN)];

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

/// A `null` value removes the key; keys not mentioned are left untouched.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MetadataPatch {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, Option<String>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, Option<String>>,
}

impl Validate for Metadata {
    fn validate(&self, v: &mut Validator) {
        v.keys("labels", self.labels.keys().map(String::as_str), &KEY_RULES);
        v.keys(
            "annotations",
            self.annotations.keys().map(String::as_str),
            &KEY_RULES,
        );
    }
}

impl Validate for MetadataPatch {
    fn validate(&self, v: &mut Validator) {
        v.keys("labels", self.labels.keys().map(String::as_str), &KEY_RULES);
        v.keys(
            "annotations",
            self.annotations.keys().map(String::as_str),
            &KEY_RULES,
        );
    }
}

impl Metadata {
    pub fn to_message(&self) -> messages::Metadata {
        messages::Metadata {
            labels: self.labels.clone(),
            annotations: self.annotations.clone(),
        }
    }
}

impl MetadataPatch {
    pub fn to_message(&self) -> messages::MetadataPatch {
        messages::MetadataPatch {
            labels: self.labels.clone(),
            annotations: self.annotations.clone(),
        }
    }
}
