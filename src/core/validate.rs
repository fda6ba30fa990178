//! Purpose: Rule-driven validation of decoded request objects with aggregated reporting.
//! Exports: `Validate`, `Validator`, `Rule`, `KeyRule`, `Format`, `validate`.
//! Role: Second pipeline stage; runs on fully deserialized objects, never on raw bytes.
//! Invariants: Every violation is collected; validation never stops at the first failure.
//! Invariants: Within one field, rules run in declaration order and the first failure wins.
//! Invariants: Paths are dot-joined field names (`lifecycle.type`); inputs are never mutated.

use std::fmt;

use regex::Regex;

use crate::core::error::{Error, ErrorKind, FieldError};
use crate::core::patch::Patch;

/// A character-class constraint with the message shown when it does not match.
pub struct Format {
    pattern: Regex,
    message: &'static str,
}

impl Format {
    pub fn new(pattern: Regex, message: &'static str) -> Self {
        Self { pattern, message }
    }

    pub fn matches(&self, value: &str) -> bool {
        self.pattern.is_match(value)
    }
}

impl fmt::Debug for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Format")
            .field("pattern", &self.pattern.as_str())
            .finish()
    }
}

/// Constraints on a single string value.
#[derive(Clone, Copy, Debug)]
pub enum Rule<'a> {
    /// Non-empty after trimming whitespace.
    NotBlank,
    /// Skipped for empty values; pair with `NotBlank` when the field is mandatory.
    Matches(&'a Format),
    /// Skipped for empty values.
    OneOf(&'a [&'a str]),
}

impl Rule<'_> {
    fn check(&self, value: &str) -> Option<String> {
        match self {
            Rule::NotBlank => value
                .trim()
                .is_empty()
                .then(|| "cannot be blank".to_string()),
            Rule::Matches(format) => {
                (!value.is_empty() && !format.matches(value)).then(|| format.message.to_string())
            }
            Rule::OneOf(allowed) => (!value.is_empty() && !allowed.contains(&value))
                .then(|| format!("value must be one of: {}", allowed.join(", "))),
        }
    }
}

/// Constraints on the keys of a map field.
#[derive(Clone, Copy, Debug)]
pub enum KeyRule<'a> {
    /// The key's `prefix/` part must not be this domain or one of its subdomains.
    /// Compared ASCII case-insensitively; keys without a `/` have no prefix.
    ReservedDomain(&'a str),
    Denied(&'a str),
    DeniedPrefix(&'a str),
}

impl KeyRule<'_> {
    fn check(&self, key: &str) -> Option<String> {
        match self {
            KeyRule::ReservedDomain(domain) => {
                let (prefix, _) = key.split_once('/')?;
                let prefix = prefix.to_ascii_lowercase();
                let domain_lower = domain.to_ascii_lowercase();
                let reserved = prefix == domain_lower
                    || prefix
                        .strip_suffix(domain_lower.as_str())
                        .is_some_and(|head| head.ends_with('.'));
                reserved.then(|| format!("label/annotation key cannot use the {domain} domain"))
            }
            KeyRule::Denied(denied) => {
                (key == *denied).then(|| format!("value {denied} is not allowed"))
            }
            KeyRule::DeniedPrefix(prefix) => key
                .starts_with(*prefix)
                .then(|| format!("prefix {prefix} is not allowed")),
        }
    }
}

/// Implemented by every request object that carries business rules.
pub trait Validate {
    fn validate(&self, v: &mut Validator);
}

/// Walks an object tree, tracking the current field path and collecting violations.
#[derive(Debug, Default)]
pub struct Validator {
    path: Vec<String>,
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` with `name` appended to the current path.
    pub fn field(&mut self, name: &str, f: impl FnOnce(&mut Self)) {
        self.path.push(name.to_string());
        f(self);
        self.path.pop();
    }

    /// Records a violation at the current path.
    pub fn report(&mut self, message: impl Into<String>) {
        self.errors
            .push(FieldError::new(self.path.join("."), message));
    }

    pub fn report_at(&mut self, name: &str, message: impl Into<String>) {
        self.field(name, |v| v.report(message));
    }

    pub fn nested<T: Validate + ?Sized>(&mut self, name: &str, value: &T) {
        self.field(name, |v| value.validate(v));
    }

    /// Reports "is required" when absent, otherwise validates the value under `name`.
    pub fn required<T: Validate>(&mut self, name: &str, value: Option<&T>) {
        match value {
            Some(value) => self.nested(name, value),
            None => self.report_at(name, "is required"),
        }
    }

    /// Validates a present value; absence is fine.
    pub fn optional<T: Validate>(&mut self, name: &str, value: Option<&T>) {
        if let Some(value) = value {
            self.nested(name, value);
        }
    }

    pub fn string(&mut self, name: &str, value: &str, rules: &[Rule<'_>]) {
        if let Some(message) = rules.iter().find_map(|rule| rule.check(value)) {
            self.report_at(name, message);
        }
    }

    /// Unset means "no change" and passes; cleared fails as blank; set values face `rules`.
    pub fn patch_string(&mut self, name: &str, value: &Patch<String>, rules: &[Rule<'_>]) {
        match value {
            Patch::Unset => {}
            Patch::Cleared => self.report_at(name, "cannot be blank"),
            Patch::Set(value) => self.string(name, value, rules),
        }
    }

    /// Unset passes; cleared fails; set values are validated under `name`.
    pub fn patch_object<T: Validate>(&mut self, name: &str, value: &Patch<T>) {
        match value {
            Patch::Unset => {}
            Patch::Cleared => self.report_at(name, "cannot be null"),
            Patch::Set(value) => self.nested(name, value),
        }
    }

    /// Checks every key against every rule; each distinct message is reported once.
    pub fn keys<'k, I>(&mut self, name: &str, keys: I, rules: &[KeyRule<'_>])
    where
        I: IntoIterator<Item = &'k str>,
    {
        let mut messages: Vec<String> = Vec::new();
        for key in keys {
            for rule in rules {
                if let Some(message) = rule.check(key) {
                    if !messages.contains(&message) {
                        messages.push(message);
                    }
                }
            }
        }
        for message in messages {
            self.report_at(name, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }

    /// `Ok` when nothing was reported, otherwise one aggregated `Validation` error.
    pub fn finish(self) -> Result<(), Error> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(Error::new(ErrorKind::Validation).with_field_errors(self.errors))
        }
    }
}

pub fn validate<T: Validate + ?Sized>(value: &T) -> Result<(), Error> {
    let mut v = Validator::new();
    value.validate(&mut v);
    v.finish()
}

#[cfg(test)]
mod tests {
    use super::{Format, KeyRule, Rule, Validate, Validator, validate};
    use crate::core::error::ErrorKind;
    use crate::core::patch::Patch;
    use regex::Regex;

    struct Inner {
        kind: String,
    }

    impl Validate for Inner {
        fn validate(&self, v: &mut Validator) {
            v.string("type", &self.kind, &[Rule::NotBlank, Rule::OneOf(&["a", "b"])]);
        }
    }

    struct Outer {
        name: String,
        inner: Option<Inner>,
        other: Option<Inner>,
    }

    impl Validate for Outer {
        fn validate(&self, v: &mut Validator) {
            let format = Format::new(Regex::new("^[a-z]+$").expect("regex"), "must be lowercase");
            v.string("name", &self.name, &[Rule::NotBlank, Rule::Matches(&format)]);
            v.required("inner", self.inner.as_ref());
            v.optional("other", self.other.as_ref());
        }
    }

    #[test]
    fn violations_across_fields_are_aggregated_with_paths() {
        let outer = Outer {
            name: " ".to_string(),
            inner: None,
            other: Some(Inner {
                kind: "c".to_string(),
            }),
        };
        let err = validate(&outer).expect_err("invalid");
        assert_eq!(err.kind(), ErrorKind::Validation);
        let rendered: Vec<String> = err.field_errors().iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec![
                "name cannot be blank",
                "inner is required",
                "other.type value must be one of: a, b",
            ]
        );
    }

    #[test]
    fn first_failing_rule_per_field_wins() {
        let outer = Outer {
            name: "ABC".to_string(),
            inner: Some(Inner {
                kind: String::new(),
            }),
            other: None,
        };
        let err = validate(&outer).expect_err("invalid");
        let rendered: Vec<String> = err.field_errors().iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["name must be lowercase", "inner.type cannot be blank"]);
    }

    #[test]
    fn valid_objects_pass() {
        let outer = Outer {
            name: "ok".to_string(),
            inner: Some(Inner {
                kind: "a".to_string(),
            }),
            other: None,
        };
        assert!(validate(&outer).is_ok());
    }

    #[test]
    fn key_rules_check_every_key() {
        let mut v = Validator::new();
        v.keys(
            "labels",
            ["ok", "a.cloudfoundry.org/x", "cloudfoundry.org/y", "PORT", "VCAP_X", "VMC_Y"],
            &[
                KeyRule::ReservedDomain("cloudfoundry.org"),
                KeyRule::Denied("PORT"),
                KeyRule::DeniedPrefix("VCAP_"),
                KeyRule::DeniedPrefix("VMC_"),
            ],
        );
        let rendered: Vec<String> = v.into_errors().iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec![
                "labels label/annotation key cannot use the cloudfoundry.org domain",
                "labels value PORT is not allowed",
                "labels prefix VCAP_ is not allowed",
                "labels prefix VMC_ is not allowed",
            ]
        );
    }

    #[test]
    fn reserved_domain_only_matches_prefix_part() {
        let rule = KeyRule::ReservedDomain("cloudfoundry.org");
        // A key is `[prefix/]name`; only the prefix names a domain, so bare names are free.
        assert!(rule.check("cloudfoundry.org").is_none());
        assert!(rule.check("x.cloudfoundry.org").is_none());
        assert!(rule.check("notcloudfoundry.org/x").is_none());
        assert!(rule.check("example.org/cloudfoundry.org").is_none());
        assert!(rule.check("sub.cloudfoundry.org/x").is_some());
    }

    #[test]
    fn reserved_domain_ignores_case() {
        let rule = KeyRule::ReservedDomain("cloudfoundry.org");
        assert!(rule.check("CloudFoundry.org/x").is_some());
        assert!(rule.check("Sub.CLOUDFOUNDRY.ORG/x").is_some());
    }

    #[test]
    fn patch_strings_distinguish_unset_and_cleared() {
        let mut v = Validator::new();
        v.patch_string("name", &Patch::Unset, &[Rule::NotBlank]);
        assert!(v.is_empty());
        v.patch_string("name", &Patch::Cleared, &[Rule::NotBlank]);
        v.patch_string("stack", &Patch::Set(String::new()), &[Rule::NotBlank]);
        let rendered: Vec<String> = v.into_errors().iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["name cannot be blank", "stack cannot be blank"]);
    }
}
