//! Purpose: Decode flat URL query parameters into typed list-filter objects.
//! Exports: `QueryParams`, `FieldSet`, `QueryFields`, `QueryPayload`, `QueryDecoder`.
//! Role: First pipeline stage for list endpoints; runs before any business-rule validation.
//! Invariants: Each payload type declares its fields explicitly; nothing is inferred from names.
//! Invariants: Decoding fails fast; the first offending key (in query order) wins.
//! Invariants: Integer fields stay decimal strings so "absent" remains distinct from zero.

use std::any::{Any, TypeId};
use std::collections::{BTreeSet, HashMap};
use std::num::IntErrorKind;
use std::sync::Arc;

use crate::core::config::{QueryResource, ResourceConfig, ResourceTable, UnknownParams};
use crate::core::error::{Error, ErrorKind};

/// Raw query key/value pairs in the order they were supplied.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Parses an `application/x-www-form-urlencoded` query string (leading `?` optional).
    pub fn parse(raw: &str) -> Self {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        let pairs = url::form_urlencoded::parse(raw.as_bytes())
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        Self { pairs }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    /// First value supplied for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, value)| value.as_str())
    }

    /// Distinct keys in first-occurrence order.
    pub fn keys(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.pairs
            .iter()
            .map(|(key, _)| key.as_str())
            .filter(|key| seen.insert(*key))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum FieldKind {
    Text,
    OrderBy,
    Integer { min: u64, max: Option<u64> },
}

type Assign<T> = Box<dyn Fn(&mut T, String) + Send + Sync>;

struct QueryField<T> {
    name: &'static str,
    kind: FieldKind,
    assign: Assign<T>,
}

impl<T> QueryField<T> {
    fn range_error(&self, min: u64, max: u64) -> Error {
        decode_error(format!(
            "{} value must be between {min} and {max}",
            self.name
        ))
    }

    fn check(&self, value: &str, config: &ResourceConfig) -> Result<(), Error> {
        match self.kind {
            FieldKind::Text => Ok(()),
            FieldKind::OrderBy => {
                if value.is_empty() || config.allows_order_by(value) {
                    Ok(())
                } else {
                    Err(decode_error(format!(
                        "{} value must be one of: {}",
                        self.name,
                        config.order_by_values().join(", ")
                    )))
                }
            }
            FieldKind::Integer { min, max } => {
                if value.is_empty() {
                    return Ok(());
                }
                let parsed = match value.parse::<u64>() {
                    Ok(parsed) => parsed,
                    Err(err) if *err.kind() == IntErrorKind::PosOverflow => {
                        return Err(self.range_error(min, max.unwrap_or(u64::MAX)));
                    }
                    Err(_) => {
                        return Err(decode_error(format!(
                            "{} value must be an integer",
                            self.name
                        )));
                    }
                };
                match max {
                    Some(max) if parsed < min || parsed > max => Err(self.range_error(min, max)),
                    None if parsed < min => Err(decode_error(format!(
                        "{} value must be at least {min}",
                        self.name
                    ))),
                    _ => Ok(()),
                }
            }
        }
    }
}

/// Declarative field table for one query-decodable type.
pub struct FieldSet<T> {
    fields: Vec<QueryField<T>>,
}

impl<T: 'static> FieldSet<T> {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// A string field assigned verbatim.
    pub fn text(self, name: &'static str, assign: fn(&mut T, String)) -> Self {
        self.push(name, FieldKind::Text, Box::new(assign))
    }

    /// A sort field checked against the resource's configured allow-list.
    pub fn order_by(self, name: &'static str, assign: fn(&mut T, String)) -> Self {
        self.push(name, FieldKind::OrderBy, Box::new(assign))
    }

    /// A numeric field kept as its decimal string once it parses within bounds.
    pub fn integer(
        self,
        name: &'static str,
        min: u64,
        max: Option<u64>,
        assign: fn(&mut T, String),
    ) -> Self {
        self.push(name, FieldKind::Integer { min, max }, Box::new(assign))
    }

    /// Flattens a sub-object's fields into this namespace.
    pub fn embed<S: QueryFields>(mut self, project: fn(&mut T) -> &mut S) -> Self {
        for field in S::fields().fields {
            let inner = field.assign;
            self.fields.push(QueryField {
                name: field.name,
                kind: field.kind,
                assign: Box::new(move |target: &mut T, value| inner(project(target), value)),
            });
        }
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|field| field.name).collect()
    }

    fn push(mut self, name: &'static str, kind: FieldKind, assign: Assign<T>) -> Self {
        self.fields.push(QueryField { name, kind, assign });
        self
    }

    fn find(&self, name: &str) -> Option<&QueryField<T>> {
        self.fields.iter().find(|field| field.name == name)
    }

    fn validate(&self, resource: QueryResource) -> Result<(), Error> {
        let mut seen = BTreeSet::new();
        for field in &self.fields {
            if !seen.insert(field.name) {
                return Err(Error::new(ErrorKind::Config).with_message(format!(
                    "resource {resource}: query field {} is declared twice",
                    field.name
                )));
            }
        }
        Ok(())
    }
}

impl<T: 'static> Default for FieldSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A type (or embeddable sub-object) that can be populated from query parameters.
pub trait QueryFields: Default + Sized + 'static {
    fn fields() -> FieldSet<Self>;
}

/// A top-level list filter bound to one configured resource.
pub trait QueryPayload: QueryFields {
    const RESOURCE: QueryResource;
}

/// Decodes query strings for the list-filter types registered with it.
#[derive(Clone, Debug)]
pub struct QueryDecoder {
    resources: ResourceTable,
    schemas: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl QueryDecoder {
    /// Builds a decoder; inconsistent configuration is rejected here, not per request.
    pub fn new(resources: ResourceTable) -> Result<Self, Error> {
        resources.validate()?;
        Ok(Self {
            resources,
            schemas: HashMap::new(),
        })
    }

    /// Builds `T`'s field schema once and checks it against its resource entry.
    pub fn register<T: QueryPayload>(mut self) -> Result<Self, Error> {
        let resource = T::RESOURCE;
        self.resources.get(resource)?;
        let fields = T::fields();
        fields.validate(resource)?;
        tracing::trace!(
            resource = %resource,
            fields = fields.fields.len(),
            "registered query schema"
        );
        self.schemas.insert(TypeId::of::<T>(), Arc::new(fields));
        Ok(self)
    }

    pub fn decode<T: QueryPayload>(&self, params: &QueryParams) -> Result<T, Error> {
        let resource = T::RESOURCE;
        let config = self.resources.get(resource)?;
        let fields = self.schema::<T>()?;

        let mut target = T::default();
        for key in params.keys() {
            let Some(field) = fields.find(key) else {
                match config.unknown_params {
                    UnknownParams::Reject => {
                        tracing::debug!(
                            resource = %resource,
                            key,
                            "rejecting unknown query parameter"
                        );
                        return Err(decode_error(format!("unsupported query parameter: {key}"))
                            .with_hint(format!(
                                "Valid parameters are: {}",
                                fields.names().join(", ")
                            )));
                    }
                    UnknownParams::Ignore => continue,
                }
            };
            let value = params.get(key).unwrap_or_default();
            if let Err(err) = field.check(value, config) {
                tracing::debug!(resource = %resource, key, "query parameter failed to decode");
                return Err(err);
            }
            (field.assign)(&mut target, value.to_string());
        }
        Ok(target)
    }

    pub fn decode_str<T: QueryPayload>(&self, raw: &str) -> Result<T, Error> {
        self.decode(&QueryParams::parse(raw))
    }

    fn schema<T: QueryPayload>(&self) -> Result<&FieldSet<T>, Error> {
        self.schemas
            .get(&TypeId::of::<T>())
            .and_then(|schema| (**schema).downcast_ref::<FieldSet<T>>())
            .ok_or_else(|| {
                Error::new(ErrorKind::Config)
                    .with_message(format!(
                        "resource {}: query type {} is not registered",
                        T::RESOURCE,
                        std::any::type_name::<T>()
                    ))
                    .with_hint("Register the type with QueryDecoder::register before decoding.")
            })
    }
}

fn decode_error(message: String) -> Error {
    Error::new(ErrorKind::Decode).with_message(message)
}
