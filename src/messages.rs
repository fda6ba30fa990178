//! Purpose: Normalized command objects handed to the repository layer.
//! Exports: list/create/patch command structs, lifecycle and metadata command types, `Command`.
//! Role: Output side of the pipeline; nothing here knows about wire formats or validation.
//! Invariants: Commands are plain data; `Patch::Unset` and `None` always mean "no change".
//! Invariants: Serialized form is for diagnostics only (CLI output), not a wire contract.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::core::patch::Patch;

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Pagination {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u64>,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleType {
    #[default]
    Buildpack,
    Docker,
}

impl LifecycleType {
    pub const NAMES: [&'static str; 2] = ["buildpack", "docker"];

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "buildpack" => Some(LifecycleType::Buildpack),
            "docker" => Some(LifecycleType::Docker),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LifecycleType::Buildpack => "buildpack",
            LifecycleType::Docker => "docker",
        }
    }
}

impl fmt::Display for LifecycleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct LifecycleData {
    pub buildpacks: Vec<String>,
    pub stack: String,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Lifecycle {
    #[serde(rename = "type")]
    pub kind: LifecycleType,
    pub data: LifecycleData,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct LifecycleDataPatch {
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub buildpacks: Patch<Vec<String>>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub stack: Patch<String>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct LifecyclePatch {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<LifecycleType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<LifecycleDataPatch>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Metadata {
    pub labels: BTreeMap<String, String>,
    pub annotations: BTreeMap<String, String>,
}

/// `None` values delete the key; keys not present are left alone.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct MetadataPatch {
    pub labels: BTreeMap<String, Option<String>>,
    pub annotations: BTreeMap<String, Option<String>>,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DesiredState {
    #[default]
    Stopped,
    Started,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ListAppsMessage {
    pub names: Vec<String>,
    pub guids: Vec<String>,
    pub space_guids: Vec<String>,
    pub order_by: String,
    pub label_selector: String,
    pub pagination: Pagination,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ListRoutesMessage {
    pub app_guids: Vec<String>,
    pub order_by: String,
    pub pagination: Pagination,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ListDropletsMessage {
    pub guids: Vec<String>,
    pub app_guids: Vec<String>,
    pub order_by: String,
    pub pagination: Pagination,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ListPackagesMessage {
    pub app_guids: Vec<String>,
    pub order_by: String,
    pub pagination: Pagination,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ListProcessesMessage {
    pub app_guids: Vec<String>,
    pub order_by: String,
    pub pagination: Pagination,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct CreateAppMessage {
    pub name: String,
    pub space_guid: String,
    pub state: DesiredState,
    pub lifecycle: Lifecycle,
    pub environment_variables: BTreeMap<String, String>,
    pub metadata: Metadata,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct PatchAppMessage {
    pub app_guid: String,
    pub space_guid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifecycle: Option<LifecyclePatch>,
    pub metadata_patch: MetadataPatch,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct PatchAppEnvVarsMessage {
    pub app_guid: String,
    pub space_guid: String,
    pub environment_variables: BTreeMap<String, Option<String>>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct SetCurrentDropletMessage {
    pub app_guid: String,
    pub space_guid: String,
    pub droplet_guid: String,
}

/// Every command the pipeline can emit, for sinks that accept more than one kind.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Command {
    ListApps(ListAppsMessage),
    ListRoutes(ListRoutesMessage),
    ListDroplets(ListDropletsMessage),
    ListPackages(ListPackagesMessage),
    ListProcesses(ListProcessesMessage),
    CreateApp(CreateAppMessage),
    PatchApp(PatchAppMessage),
    PatchAppEnvVars(PatchAppEnvVarsMessage),
    SetCurrentDroplet(SetCurrentDropletMessage),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::ListApps(_) => "list_apps",
            Command::ListRoutes(_) => "list_routes",
            Command::ListDroplets(_) => "list_droplets",
            Command::ListPackages(_) => "list_packages",
            Command::ListProcesses(_) => "list_processes",
            Command::CreateApp(_) => "create_app",
            Command::PatchApp(_) => "patch_app",
            Command::PatchAppEnvVars(_) => "patch_app_env_vars",
            Command::SetCurrentDroplet(_) => "set_current_droplet",
        }
    }
}

macro_rules! command_from {
    ($($message:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$message> for Command {
                fn from(message: $message) -> Self {
                    Command::$variant(message)
                }
            }
        )*
    };
}

command_from! {
    ListAppsMessage => ListApps,
    ListRoutesMessage => ListRoutes,
    ListDropletsMessage => ListDroplets,
    ListPackagesMessage => ListPackages,
    ListProcessesMessage => ListProcesses,
    CreateAppMessage => CreateApp,
    PatchAppMessage => PatchApp,
    PatchAppEnvVarsMessage => PatchAppEnvVars,
    SetCurrentDropletMessage => SetCurrentDroplet,
}
