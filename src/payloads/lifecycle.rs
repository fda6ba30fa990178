//! Purpose: Lifecycle payloads (how an app is built and run) for create and patch requests.
//! Exports: `Lifecycle`, `LifecycleData`, `LifecyclePatch`, `LifecycleDataPatch`.
//! Role: Owns the buildpack/docker choice rules and their translation to commands.
//! Invariants: On create, defaulting happens for the whole lifecycle or not at all.
//! Invariants: On patch, only fields actually supplied reach the command.

use serde::{Deserialize, Serialize};

use crate::core::patch::Patch;
use crate::core::validate::{Rule, Validate, Validator};
use crate::messages::{self, LifecycleType};

const TYPE_RULES: [Rule<'static>; 2] = [Rule::NotBlank, Rule::OneOf(&LifecycleType::NAMES)];

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Lifecycle {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<LifecycleData>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LifecycleData {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buildpacks: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub stack: String,
}

impl Validate for Lifecycle {
    fn validate(&self, v: &mut Validator) {
        v.string("type", &self.kind, &TYPE_RULES);
        if self.data.is_none() {
            v.report_at("data", "is required");
        }
    }
}

impl Lifecycle {
    /// Supplied lifecycles pass through as given; docker carries no data.
    pub fn to_message(&self) -> messages::Lifecycle {
        let kind = lifecycle_type(&self.kind);
        let data = match kind {
            LifecycleType::Docker => messages::LifecycleData::default(),
            LifecycleType::Buildpack => self
                .data
                .as_ref()
                .map(|data| messages::LifecycleData {
                    buildpacks: data.buildpacks.clone(),
                    stack: data.stack.clone(),
                })
                .unwrap_or_default(),
        };
        messages::Lifecycle { kind, data }
    }

    /// The lifecycle used when a create request omits one entirely.
    pub fn default_message(default_stack: &str) -> messages::Lifecycle {
        messages::Lifecycle {
            kind: LifecycleType::Buildpack,
            data: messages::LifecycleData {
                buildpacks: Vec::new(),
                stack: default_stack.to_string(),
            },
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LifecyclePatch {
    #[serde(rename = "type", default, skip_serializing_if = "Patch::is_unset")]
    pub kind: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_unset")]
    pub data: Patch<LifecycleDataPatch>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LifecycleDataPatch {
    #[serde(default, skip_serializing_if = "Patch::is_unset")]
    pub buildpacks: Patch<Vec<String>>,
    #[serde(default, skip_serializing_if = "Patch::is_unset")]
    pub stack: Patch<String>,
}

impl Validate for LifecyclePatch {
    fn validate(&self, v: &mut Validator) {
        v.patch_string("type", &self.kind, &TYPE_RULES);
        if !self.data.is_set() {
            v.report_at("data", "is required");
        }
    }
}

impl LifecyclePatch {
    pub fn to_message(&self) -> messages::LifecyclePatch {
        messages::LifecyclePatch {
            kind: self.kind.value().map(|kind| lifecycle_type(kind)),
            data: self.data.value().map(|data| messages::LifecycleDataPatch {
                buildpacks: data.buildpacks.clone(),
                stack: data.stack.clone(),
            }),
        }
    }
}

fn lifecycle_type(value: &str) -> LifecycleType {
    let parsed = LifecycleType::parse(value);
    debug_assert!(
        parsed.is_some(),
        "lifecycle type {value:?} was not validated"
    );
    parsed.unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::{Lifecycle, LifecycleData, LifecycleDataPatch, LifecyclePatch};
    use crate::core::patch::Patch;
    use crate::core::validate::validate;
    use crate::messages::{self, LifecycleType};

    #[test]
    fn empty_lifecycle_reports_type_and_data() {
        let err = validate(&Lifecycle::default()).expect_err("empty");
        let rendered: Vec<String> = err.field_errors().iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["type cannot be blank", "data is required"]);
    }

    #[test]
    fn unknown_type_is_rejected() {
        let lifecycle = Lifecycle {
            kind: "kpack".to_string(),
            data: Some(LifecycleData::default()),
        };
        let err = validate(&lifecycle).expect_err("unknown type");
        assert_eq!(
            err.message(),
            Some("type value must be one of: buildpack, docker")
        );
    }

    #[test]
    fn buildpack_without_stack_passes_stack_through_empty() {
        let lifecycle = Lifecycle {
            kind: "buildpack".to_string(),
            data: Some(LifecycleData {
                buildpacks: vec!["go".to_string()],
                stack: String::new(),
            }),
        };
        assert_eq!(
            lifecycle.to_message(),
            messages::Lifecycle {
                kind: LifecycleType::Buildpack,
                data: messages::LifecycleData {
                    buildpacks: vec!["go".to_string()],
                    stack: String::new(),
                },
            }
        );
    }

    #[test]
    fn patch_with_cleared_data_requires_data() {
        let patch = LifecyclePatch {
            kind: Patch::Set("docker".to_string()),
            data: Patch::Cleared,
        };
        let err = validate(&patch).expect_err("cleared data");
        assert_eq!(err.message(), Some("data is required"));
    }

    #[test]
    fn patch_without_type_leaves_type_unchanged() {
        let patch = LifecyclePatch {
            kind: Patch::Unset,
            data: Patch::Set(LifecycleDataPatch::default()),
        };
        assert!(validate(&patch).is_ok());
        let message = patch.to_message();
        assert_eq!(message.kind, None);
        assert_eq!(message.data, Some(messages::LifecycleDataPatch::default()));
    }
}
