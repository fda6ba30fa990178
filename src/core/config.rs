//! Purpose: Static per-resource configuration consumed by the query decoder and translator.
//! Exports: `QueryResource`, `UnknownParams`, `ResourceConfig`, `ResourceTable`, `PipelineConfig`.
//! Role: Replaces process-wide allow-lists with an explicit table passed in at construction.
//! Invariants: Allow-lists hold bare tokens; the `-` (descending) form is derived, never stored.
//! Invariants: Inconsistent tables are `Config` errors, surfaced before any request is decoded.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

use crate::core::error::{Error, ErrorKind};

pub const DEFAULT_STACK: &str = "cflinuxfs3";

/// List endpoints whose query strings go through the decoder.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryResource {
    Apps,
    AppRoutes,
    AppDroplets,
    AppPackages,
    AppProcesses,
}

impl QueryResource {
    pub const ALL: [QueryResource; 5] = [
        QueryResource::Apps,
        QueryResource::AppRoutes,
        QueryResource::AppDroplets,
        QueryResource::AppPackages,
        QueryResource::AppProcesses,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            QueryResource::Apps => "apps",
            QueryResource::AppRoutes => "app_routes",
            QueryResource::AppDroplets => "app_droplets",
            QueryResource::AppPackages => "app_packages",
            QueryResource::AppProcesses => "app_processes",
        }
    }
}

impl fmt::Display for QueryResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the decoder does with a query key the schema does not declare.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownParams {
    Reject,
    Ignore,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResourceConfig {
    pub order_by: Vec<String>,
    pub unknown_params: UnknownParams,
}

impl ResourceConfig {
    pub fn new<I, S>(order_by: I, unknown_params: UnknownParams) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            order_by: order_by.into_iter().map(Into::into).collect(),
            unknown_params,
        }
    }

    /// Every accepted `order_by` value: each token followed by its descending form.
    pub fn order_by_values(&self) -> Vec<String> {
        self.order_by
            .iter()
            .flat_map(|token| [token.clone(), format!("-{token}")])
            .collect()
    }

    pub fn allows_order_by(&self, value: &str) -> bool {
        let token = value.strip_prefix('-').unwrap_or(value);
        self.order_by.iter().any(|allowed| allowed == token)
    }

    fn validate(&self, resource: QueryResource) -> Result<(), Error> {
        if self.order_by.is_empty() {
            return Err(config_error(resource, "order_by allow-list is empty"));
        }
        let mut seen = BTreeSet::new();
        for token in &self.order_by {
            if token.trim().is_empty() {
                return Err(config_error(
                    resource,
                    "order_by allow-list has a blank token",
                ));
            }
            if token.starts_with('-') {
                return Err(config_error(
                    resource,
                    format!("order_by token {token} must be listed without its '-' prefix"),
                ));
            }
            if !seen.insert(token.as_str()) {
                return Err(config_error(
                    resource,
                    format!("order_by token {token} is listed twice"),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ResourceTable {
    entries: BTreeMap<QueryResource, ResourceConfig>,
}

impl ResourceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in table for the app-scoped list endpoints.
    pub fn standard() -> Self {
        let timestamps = ["created_at", "updated_at"];
        Self::new()
            .with(
                QueryResource::Apps,
                ResourceConfig::new(
                    ["created_at", "updated_at", "name", "state"],
                    UnknownParams::Ignore,
                ),
            )
            .with(
                QueryResource::AppRoutes,
                ResourceConfig::new(timestamps, UnknownParams::Ignore),
            )
            .with(
                QueryResource::AppDroplets,
                ResourceConfig::new(timestamps, UnknownParams::Reject),
            )
            .with(
                QueryResource::AppPackages,
                ResourceConfig::new(timestamps, UnknownParams::Reject),
            )
            .with(
                QueryResource::AppProcesses,
                ResourceConfig::new(timestamps, UnknownParams::Reject),
            )
    }

    pub fn with(mut self, resource: QueryResource, config: ResourceConfig) -> Self {
        self.entries.insert(resource, config);
        self
    }

    pub fn get(&self, resource: QueryResource) -> Result<&ResourceConfig, Error> {
        self.entries.get(&resource).ok_or_else(|| {
            config_error(resource, "no configuration registered")
                .with_hint("Register the resource in the ResourceTable passed to the decoder.")
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (QueryResource, &ResourceConfig)> {
        self.entries
            .iter()
            .map(|(resource, config)| (*resource, config))
    }

    pub fn validate(&self) -> Result<(), Error> {
        for (resource, config) in &self.entries {
            config.validate(*resource)?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PipelineConfig {
    pub default_stack: String,
    pub resources: ResourceTable,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            default_stack: DEFAULT_STACK.to_string(),
            resources: ResourceTable::standard(),
        }
    }
}

impl PipelineConfig {
    pub fn with_default_stack(mut self, stack: impl Into<String>) -> Self {
        self.default_stack = stack.into();
        self
    }

    pub fn with_resources(mut self, resources: ResourceTable) -> Self {
        self.resources = resources;
        self
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.default_stack.trim().is_empty() {
            return Err(Error::new(ErrorKind::Config)
                .with_message("default stack must not be blank")
                .with_hint("Use a stack name like cflinuxfs3."));
        }
        self.resources.validate()
    }
}

fn config_error(resource: QueryResource, message: impl fmt::Display) -> Error {
    Error::new(ErrorKind::Config).with_message(format!("resource {resource}: {message}"))
}

#[cfg(test)]
mod tests {
    use super::{PipelineConfig, QueryResource, ResourceConfig, ResourceTable, UnknownParams};
    use crate::core::error::ErrorKind;

    #[test]
    fn standard_table_is_consistent_and_complete() {
        let table = ResourceTable::standard();
        table.validate().expect("standard table");
        for resource in QueryResource::ALL {
            assert!(table.get(resource).is_ok(), "{resource} missing");
        }
        assert_eq!(
            table
                .get(QueryResource::AppDroplets)
                .expect("droplets")
                .unknown_params,
            UnknownParams::Reject
        );
        assert_eq!(
            table
                .get(QueryResource::Apps)
                .expect("apps")
                .unknown_params,
            UnknownParams::Ignore
        );
    }

    #[test]
    fn order_by_values_include_descending_forms() {
        let config = ResourceConfig::new(["created_at", "name"], UnknownParams::Ignore);
        assert_eq!(
            config.order_by_values(),
            vec!["created_at", "-created_at", "name", "-name"]
        );
        assert!(config.allows_order_by("-name"));
        assert!(!config.allows_order_by("--name"));
        assert!(!config.allows_order_by("state"));
    }

    #[test]
    fn inconsistent_allow_lists_are_config_errors() {
        let cases = [
            ResourceConfig::new(Vec::<String>::new(), UnknownParams::Reject),
            ResourceConfig::new(["created_at", "created_at"], UnknownParams::Reject),
            ResourceConfig::new(["-created_at"], UnknownParams::Reject),
            ResourceConfig::new([" "], UnknownParams::Reject),
        ];
        for config in cases {
            let table = ResourceTable::new().with(QueryResource::AppPackages, config);
            let err = table.validate().expect_err("inconsistent");
            assert_eq!(err.kind(), ErrorKind::Config);
            assert!(err.message().unwrap_or_default().contains("app_packages"));
        }
    }

    #[test]
    fn missing_resource_is_config_error() {
        let err = ResourceTable::new()
            .get(QueryResource::Apps)
            .expect_err("missing");
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn blank_default_stack_is_rejected() {
        let err = PipelineConfig::default()
            .with_default_stack("")
            .validate()
            .expect_err("blank stack");
        assert_eq!(err.kind(), ErrorKind::Config);
    }
}
