//! Domain core for the parlance conversation tutor.
//!
//! Everything in this crate is pure and synchronous: the language and
//! difficulty registry, the scenario/topic catalog, prompt assembly, the
//! turn state machine, coaching verdict parsing and the progress ledger.
//! Network collaborators live in `parlance-llm`; HTTP wiring lives in
//! `parlance-api`.

pub mod catalog;
pub mod coaching;
pub mod error;
pub mod progress;
pub mod prompt;
pub mod registry;
pub mod session;
pub mod turn;
pub mod types;
