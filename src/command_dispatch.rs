//! Purpose: Hold top-level CLI command dispatch for `payloads`.
//! Exports: `dispatch_command`.
//! Role: Keep `main.rs` focused on parse/bootstrap and delegate pipeline execution.
//! Invariants: Each command writes exactly one JSON document to stdout on success.
//! Invariants: Missing URL-derived GUIDs are usage errors, raised before any decoding.

use serde::de::DeserializeOwned;

use payloads::api::{QueryPayload, ToCommand, Validate};
use payloads::payloads::{
    AppCreate, AppDropletsList, AppGuid, AppList, AppPackagesList, AppPatch, AppPatchEnvVars,
    AppProcessList, AppRoutesList, AppScope, AppSetCurrentDroplet,
};

use super::*;

pub(super) fn dispatch_command(command: Command, pipeline: &Pipeline) -> Result<(), Error> {
    match command {
        Command::Query {
            resource,
            query,
            app_guid,
        } => {
            let parent = || {
                required_arg(app_guid.clone(), "--app-guid", resource.resource().as_str())
                    .map(AppGuid::new)
            };
            let value = match resource {
                ResourceArg::Apps => run_query::<AppList>(pipeline, &query, &())?,
                ResourceArg::AppRoutes => {
                    run_query::<AppRoutesList>(pipeline, &query, &parent()?)?
                }
                ResourceArg::AppDroplets => {
                    run_query::<AppDropletsList>(pipeline, &query, &parent()?)?
                }
                ResourceArg::AppPackages => {
                    run_query::<AppPackagesList>(pipeline, &query, &parent()?)?
                }
                ResourceArg::AppProcesses => {
                    run_query::<AppProcessList>(pipeline, &query, &parent()?)?
                }
            };
            emit_json(value);
            Ok(())
        }
        Command::Body {
            payload,
            file,
            app_guid,
            space_guid,
        } => {
            let label = payload
                .to_possible_value()
                .map(|value| value.get_name().to_string())
                .unwrap_or_default();
            let scope = || -> Result<AppScope, Error> {
                Ok(AppScope::new(
                    required_arg(app_guid.clone(), "--app-guid", &label)?,
                    required_arg(space_guid.clone(), "--space-guid", &label)?,
                ))
            };
            let value = match payload {
                PayloadArg::AppCreate => {
                    let body = read_body(file.as_ref())?;
                    run_body::<AppCreate>(pipeline, &body, &pipeline.create_context())?
                }
                PayloadArg::AppPatch => {
                    let scope = scope()?;
                    let body = read_body(file.as_ref())?;
                    run_body::<AppPatch>(pipeline, &body, &scope)?
                }
                PayloadArg::AppPatchEnvVars => {
                    let scope = scope()?;
                    let body = read_body(file.as_ref())?;
                    run_body::<AppPatchEnvVars>(pipeline, &body, &scope)?
                }
                PayloadArg::AppSetCurrentDroplet => {
                    let scope = scope()?;
                    let body = read_body(file.as_ref())?;
                    run_body::<AppSetCurrentDroplet>(pipeline, &body, &scope)?
                }
            };
            emit_json(value);
            Ok(())
        }
        Command::Resources => {
            let config = pipeline.config();
            let resources: Vec<Value> = config
                .resources
                .iter()
                .map(|(resource, entry)| {
                    json!({
                        "resource": resource,
                        "order_by": entry.order_by_values(),
                        "unknown_params": entry.unknown_params,
                    })
                })
                .collect();
            emit_json(json!({
                "default_stack": config.default_stack,
                "resources": resources,
            }));
            Ok(())
        }
    }
}

fn run_query<T>(pipeline: &Pipeline, raw: &str, context: &T::Context) -> Result<Value, Error>
where
    T: QueryPayload + ToCommand,
    T::Command: Into<PipelineCommand>,
{
    let payload: T = pipeline.decode_query_str(raw)?;
    pipeline.submit(&payload, context, &mut EchoSink)
}

fn run_body<T>(pipeline: &Pipeline, body: &[u8], context: &T::Context) -> Result<Value, Error>
where
    T: DeserializeOwned + Validate + ToCommand,
    T::Command: Into<PipelineCommand>,
{
    let payload: T = pipeline.decode_body(body)?;
    pipeline.submit(&payload, context, &mut EchoSink)
}
