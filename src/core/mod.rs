// Core modules implementing decoding, validation, translation, and error modeling.
pub mod config;
pub mod error;
pub mod patch;
pub mod query;
pub mod translate;
pub mod validate;
