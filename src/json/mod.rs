//! Purpose: Internal JSON parsing boundary shared by the body decode path.
//! Exports: `parse` module with decode helpers used by the API and CLI.
//! Role: Single seam for parser usage so callsites avoid ad hoc decode logic.
//! Invariants: Request bodies are decoded through this module only.

pub(crate) mod parse;
