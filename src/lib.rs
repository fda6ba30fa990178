//! Purpose: Library crate for the app request-payload pipeline and its `payloads` CLI.
//! Exports: `api` (the public boundary), `core`, `payloads`, `messages`.
//! Role: Decode query strings and JSON bodies, validate them, and translate them into commands.
//! Invariants: Every stage is pure and synchronous; no I/O happens outside the CLI binary.
//! Invariants: Configuration is injected through `api::Pipeline`, never read from globals.
pub mod api;
pub mod core;
pub(crate) mod json;
pub mod messages;
pub mod payloads;
