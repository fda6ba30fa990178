use serde::Serialize;
use std::error::Error as StdError;
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    Internal,
    Usage,
    Decode,
    Validation,
    Config,
    Io,
}

/// One violated rule: where it happened and what went wrong.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

impl FieldError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{} {}", self.path, self.message)
        }
    }
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    hint: Option<String>,
    field_errors: Vec<FieldError>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            hint: None,
            field_errors: Vec::new(),
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    pub fn field_errors(&self) -> &[FieldError] {
        &self.field_errors
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Attaches an aggregate of rule violations; the message becomes their joined text.
    pub fn with_field_errors(mut self, field_errors: Vec<FieldError>) -> Self {
        let joined = field_errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        self.message = Some(joined);
        self.field_errors = field_errors;
        self
    }

    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// True for errors caused by the request itself rather than by setup or I/O.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Usage | ErrorKind::Decode | ErrorKind::Validation
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn StdError + 'static))
    }
}

pub fn to_exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::Internal => 1,
        ErrorKind::Usage => 2,
        ErrorKind::Decode => 3,
        ErrorKind::Validation => 4,
        ErrorKind::Config => 5,
        ErrorKind::Io => 6,
    }
}

/// Status class an HTTP layer should answer with for this kind of failure.
pub fn to_http_status(kind: ErrorKind) -> u16 {
    match kind {
        ErrorKind::Usage | ErrorKind::Decode => 400,
        ErrorKind::Validation => 422,
        ErrorKind::Config | ErrorKind::Io | ErrorKind::Internal => 500,
    }
}

#[cfg(test)]
mod tests {
    use super::{Error, ErrorKind, FieldError, to_exit_code, to_http_status};

    #[test]
    fn exit_code_mapping_is_stable() {
        let cases = [
            (ErrorKind::Internal, 1),
            (ErrorKind::Usage, 2),
            (ErrorKind::Decode, 3),
            (ErrorKind::Validation, 4),
            (ErrorKind::Config, 5),
            (ErrorKind::Io, 6),
        ];

        for (kind, code) in cases {
            assert_eq!(to_exit_code(kind), code);
        }
    }

    #[test]
    fn http_status_separates_malformed_from_unprocessable() {
        assert_eq!(to_http_status(ErrorKind::Decode), 400);
        assert_eq!(to_http_status(ErrorKind::Validation), 422);
        assert_eq!(to_http_status(ErrorKind::Config), 500);
    }

    #[test]
    fn field_errors_join_into_message() {
        let err = Error::new(ErrorKind::Validation).with_field_errors(vec![
            FieldError::new("name", "cannot be blank"),
            FieldError::new("relationships", "is required"),
        ]);
        assert_eq!(
            err.message(),
            Some("name cannot be blank, relationships is required")
        );
        assert_eq!(err.field_errors().len(), 2);
        assert!(err.is_client_error());
        assert_eq!(
            err.to_string(),
            "Validation: name cannot be blank, relationships is required"
        );
    }

    #[test]
    fn pathless_field_error_renders_message_only() {
        let err = FieldError::new("", "data is required");
        assert_eq!(err.to_string(), "data is required");
    }
}
