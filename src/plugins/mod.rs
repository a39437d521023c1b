//! Collaborators the CLI delegates to outside the store engine.

pub mod completions;
pub mod interactive;
pub mod shell;
