//! Purpose: App create/patch/env-var/current-droplet request bodies.
//! Exports: `AppCreate`, `AppRelationships`, `AppPatch`, `AppPatchEnvVars`, `AppSetCurrentDroplet`,
//! `CreateContext`, `AppScope`.
//! Role: Composes the shared primitives into the app endpoints' rules and commands.
//! Invariants: Env-var keys never collide with platform-injected runtime variables.
//! Invariants: App and space GUIDs for patches come from the caller, never from the body.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::patch::Patch;
use crate::core::translate::ToCommand;
use crate::core::validate::{Format, KeyRule, Rule, Validate, Validator};
use crate::messages::{
    CreateAppMessage, DesiredState, PatchAppEnvVarsMessage, PatchAppMessage,
    SetCurrentDropletMessage,
};
use crate::payloads::lifecycle::{Lifecycle, LifecyclePatch};
use crate::payloads::metadata::{Metadata, MetadataPatch};
use crate::payloads::relationship::Relationship;

static APP_NAME: LazyLock<Format> = LazyLock::new(|| {
    Format::new(
        Regex::new(r"^[A-Za-z0-9_-]+$").expect("static regex"),
        "must consist only of letters, numbers, underscores and dashes",
    )
});

/// Runtime variables the platform injects itself.
const ENV_KEY_RULES: [KeyRule<'static>; 3] = [
    KeyRule::Denied("PORT"),
    KeyRule::DeniedPrefix("VCAP_"),
    KeyRule::DeniedPrefix("VMC_"),
];

/// Out-of-band inputs for app creation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CreateContext {
    pub default_stack: String,
}

/// The app (and its space) addressed by the request URL.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AppScope {
    pub app_guid: String,
    pub space_guid: String,
}

impl AppScope {
    pub fn new(app_guid: impl Into<String>, space_guid: impl Into<String>) -> Self {
        Self {
            app_guid: app_guid.into(),
            space_guid: space_guid.into(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppRelationships {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space: Option<Relationship>,
}

impl Validate for AppRelationships {
    fn validate(&self, v: &mut Validator) {
        v.required("space", self.space.as_ref());
    }
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppCreate {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub environment_variables: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifecycle: Option<Lifecycle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationships: Option<AppRelationships>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Validate for AppCreate {
    fn validate(&self, v: &mut Validator) {
        v.string("name", &self.name, &[Rule::NotBlank, Rule::Matches(&APP_NAME)]);
        v.optional("lifecycle", self.lifecycle.as_ref());
        v.required("relationships", self.relationships.as_ref());
        v.nested("metadata", &self.metadata);
    }
}

impl ToCommand for AppCreate {
    type Context = CreateContext;
    type Command = CreateAppMessage;

    fn to_command(&self, context: &CreateContext) -> CreateAppMessage {
        let lifecycle = match &self.lifecycle {
            Some(lifecycle) => lifecycle.to_message(),
            None => Lifecycle::default_message(&context.default_stack),
        };
        let space_guid = self
            .relationships
            .as_ref()
            .and_then(|relationships| relationships.space.as_ref())
            .map(|space| space.guid().to_string())
            .unwrap_or_default();
        CreateAppMessage {
            name: self.name.clone(),
            space_guid,
            state: DesiredState::Stopped,
            lifecycle,
            environment_variables: self.environment_variables.clone(),
            metadata: self.metadata.to_message(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppPatch {
    #[serde(default, skip_serializing_if = "Patch::is_unset")]
    pub name: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_unset")]
    pub lifecycle: Patch<LifecyclePatch>,
    #[serde(default)]
    pub metadata: MetadataPatch,
}

impl Validate for AppPatch {
    fn validate(&self, v: &mut Validator) {
        v.patch_string("name", &self.name, &[Rule::NotBlank, Rule::Matches(&APP_NAME)]);
        v.patch_object("lifecycle", &self.lifecycle);
        v.nested("metadata", &self.metadata);
    }
}

impl ToCommand for AppPatch {
    type Context = AppScope;
    type Command = PatchAppMessage;

    fn to_command(&self, scope: &AppScope) -> PatchAppMessage {
        PatchAppMessage {
            app_guid: scope.app_guid.clone(),
            space_guid: scope.space_guid.clone(),
            name: self.name.value().cloned(),
            lifecycle: self.lifecycle.value().map(LifecyclePatch::to_message),
            metadata_patch: self.metadata.to_message(),
        }
    }
}

/// `PUT /apps/{guid}/relationships/current_droplet` body.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AppSetCurrentDroplet {
    pub relationship: Relationship,
}

impl Validate for AppSetCurrentDroplet {
    fn validate(&self, v: &mut Validator) {
        self.relationship.validate(v);
    }
}

impl ToCommand for AppSetCurrentDroplet {
    type Context = AppScope;
    type Command = SetCurrentDropletMessage;

    fn to_command(&self, scope: &AppScope) -> SetCurrentDropletMessage {
        SetCurrentDropletMessage {
            app_guid: scope.app_guid.clone(),
            space_guid: scope.space_guid.clone(),
            droplet_guid: self.relationship.guid().to_string(),
        }
    }
}

/// `PATCH /apps/{guid}/environment_variables` body; a `null` value unsets the variable.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppPatchEnvVars {
    #[serde(default)]
    pub var: BTreeMap<String, Value>,
}

impl Validate for AppPatchEnvVars {
    fn validate(&self, v: &mut Validator) {
        v.keys("var", self.var.keys().map(String::as_str), &ENV_KEY_RULES);
        v.field("var", |v| {
            for (key, value) in &self.var {
                if matches!(value, Value::Array(_) | Value::Object(_)) {
                    v.report_at(
                        key,
                        "value must be a string, number, boolean, or null",
                    );
                }
            }
        });
    }
}

impl ToCommand for AppPatchEnvVars {
    type Context = AppScope;
    type Command = PatchAppEnvVarsMessage;

    fn to_command(&self, scope: &AppScope) -> PatchAppEnvVarsMessage {
        let environment_variables = self
            .var
            .iter()
            .map(|(key, value)| (key.clone(), env_value(value)))
            .collect();
        PatchAppEnvVarsMessage {
            app_guid: scope.app_guid.clone(),
            space_guid: scope.space_guid.clone(),
            environment_variables,
        }
    }
}

fn env_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::{AppPatchEnvVars, AppScope, env_value};
    use crate::core::translate::ToCommand;
    use crate::core::validate::validate;
    use serde_json::{Value, json};

    #[test]
    fn env_values_render_scalars_as_strings() {
        assert_eq!(env_value(&Value::Null), None);
        assert_eq!(env_value(&json!("x")), Some("x".to_string()));
        assert_eq!(env_value(&json!(8080)), Some("8080".to_string()));
        assert_eq!(env_value(&json!(true)), Some("true".to_string()));
    }

    #[test]
    fn structured_env_values_are_rejected() {
        let payload: AppPatchEnvVars =
            serde_json::from_value(json!({ "var": { "A": [1], "B": "ok" } })).expect("decode");
        let err = validate(&payload).expect_err("array value");
        assert_eq!(
            err.message(),
            Some("var.A value must be a string, number, boolean, or null")
        );
    }

    #[test]
    fn env_patch_carries_scope_and_deletions() {
        let payload: AppPatchEnvVars =
            serde_json::from_value(json!({ "var": { "A": "1", "B": null } })).expect("decode");
        let message = payload.to_command(&AppScope::new("app", "space"));
        assert_eq!(message.app_guid, "app");
        assert_eq!(message.space_guid, "space");
        assert_eq!(message.environment_variables.get("A"), Some(&Some("1".to_string())));
        assert_eq!(message.environment_variables.get("B"), Some(&None));
    }
}
