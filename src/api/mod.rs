//! Purpose: Define the public Rust API boundary for the payload pipeline.
//! Exports: `Pipeline`, `CommandSink`, and the types callers need to drive it.
//! Role: Ties decode, validate, and translate together behind one configured value.
//! Invariants: Configuration and every list schema are validated once in `Pipeline::new`.
//! Invariants: Decode failures and validation failures keep distinct `ErrorKind`s.
//! Notes: The pipeline holds no mutable state; share one instance across requests.

use serde::de::DeserializeOwned;

use crate::core::error::FieldError;
use crate::core::query::QueryDecoder;
use crate::core::validate::validate;
use crate::json::parse;
use crate::payloads::{AppDropletsList, AppList, AppPackagesList, AppProcessList, AppRoutesList};

pub use crate::core::config::{
    DEFAULT_STACK, PipelineConfig, QueryResource, ResourceConfig, ResourceTable, UnknownParams,
};
pub use crate::core::error::{Error, ErrorKind, to_exit_code, to_http_status};
pub use crate::core::patch::Patch;
pub use crate::core::query::{QueryParams, QueryPayload};
pub use crate::core::translate::ToCommand;
pub use crate::core::validate::Validate;
pub use crate::messages::Command;
pub use crate::payloads::CreateContext;

/// The repository side of the pipeline: accepts translated commands.
pub trait CommandSink {
    type Entity;

    fn submit(&mut self, command: Command) -> Result<Self::Entity, Error>;
}

#[derive(Clone, Debug)]
pub struct Pipeline {
    config: PipelineConfig,
    decoder: QueryDecoder,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self, Error> {
        config.validate()?;
        let decoder = QueryDecoder::new(config.resources.clone())?
            .register::<AppList>()?
            .register::<AppRoutesList>()?
            .register::<AppDropletsList>()?
            .register::<AppPackagesList>()?
            .register::<AppProcessList>()?;
        Ok(Self { config, decoder })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Context for `AppCreate` translation, carrying the configured default stack.
    pub fn create_context(&self) -> CreateContext {
        CreateContext {
            default_stack: self.config.default_stack.clone(),
        }
    }

    pub fn decode_query<T: QueryPayload>(&self, params: &QueryParams) -> Result<T, Error> {
        self.decoder.decode(params)
    }

    pub fn decode_query_str<T: QueryPayload>(&self, raw: &str) -> Result<T, Error> {
        self.decoder.decode_str(raw)
    }

    /// Deserializes a JSON body and runs its rules; only valid payloads are returned.
    pub fn decode_body<T: DeserializeOwned + Validate>(
        &self,
        body: &[u8],
    ) -> Result<T, Error> {
        let payload: T = parse::from_slice(body).map_err(body_error)?;
        if let Err(err) = validate(&payload) {
            let violations = err.field_errors().len();
            tracing::debug!(violations, "request body failed validation");
            return Err(err);
        }
        Ok(payload)
    }

    /// Translates a validated payload and hands the command to `sink`.
    pub fn submit<P, S>(
        &self,
        payload: &P,
        context: &P::Context,
        sink: &mut S,
    ) -> Result<S::Entity, Error>
    where
        P: ToCommand,
        P::Command: Into<Command>,
        S: CommandSink,
    {
        let command = payload.to_command(context).into();
        tracing::trace!(command = command.name(), "submitting command");
        sink.submit(command)
    }
}

fn body_error(err: serde_json::Error) -> Error {
    let category = parse::categorize_error(&err);
    let hint = parse::hint_for_error(&err, "request body");
    tracing::debug!(category = category.label(), "request body failed to decode");
    if category.is_malformed() {
        Error::new(ErrorKind::Decode)
            .with_message(format!("request body is not valid JSON: {err}"))
            .with_hint(hint)
            .with_source(err)
    } else {
        Error::new(ErrorKind::Validation)
            .with_field_errors(vec![FieldError::new(
                "",
                format!("invalid request body: {err}"),
            )])
            .with_hint(hint)
            .with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        CommandSink, Error, ErrorKind, Pipeline, PipelineConfig, ResourceConfig, ResourceTable,
    };
    use crate::api::{QueryResource, UnknownParams};
    use crate::messages::Command;
    use crate::payloads::{AppCreate, AppList};

    fn pipeline() -> Pipeline {
        Pipeline::new(PipelineConfig::default()).expect("standard config")
    }

    struct Recorder(Vec<Command>);

    impl CommandSink for Recorder {
        type Entity = usize;

        fn submit(&mut self, command: Command) -> Result<usize, Error> {
            self.0.push(command);
            Ok(self.0.len())
        }
    }

    #[test]
    fn inconsistent_config_is_rejected_at_construction() {
        let resources = ResourceTable::standard().with(
            QueryResource::Apps,
            ResourceConfig::new(Vec::<String>::new(), UnknownParams::Ignore),
        );
        let err = Pipeline::new(PipelineConfig::default().with_resources(resources))
            .expect_err("empty allow-list");
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn every_list_schema_is_checked_at_construction() {
        let resources = ResourceTable::new().with(
            QueryResource::Apps,
            ResourceConfig::new(["created_at"], UnknownParams::Ignore),
        );
        let err = Pipeline::new(PipelineConfig::default().with_resources(resources))
            .expect_err("routes missing");
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(err.message().unwrap_or_default().contains("app_routes"));
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        let err = pipeline()
            .decode_body::<AppCreate>(br#"{"name":"#)
            .expect_err("truncated");
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert!(err.hint().unwrap_or_default().contains("parse category: eof"));
    }

    #[test]
    fn wrong_shape_is_a_validation_error() {
        let err = pipeline()
            .decode_body::<AppCreate>(br#"{"name":"a","colour":"red"}"#)
            .expect_err("unknown field");
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.message().unwrap_or_default().contains("unknown field `colour`"));
    }

    #[test]
    fn submit_translates_and_forwards() {
        let pipe = pipeline();
        let list: AppList = pipe.decode_query_str("names=a,b").expect("decode");
        let mut sink = Recorder(Vec::new());
        let count = pipe.submit(&list, &(), &mut sink).expect("submit");
        assert_eq!(count, 1);
        match &sink.0[0] {
            Command::ListApps(message) => assert_eq!(message.names, vec!["a", "b"]),
            other => panic!("unexpected command {}", other.name()),
        }
    }
}
