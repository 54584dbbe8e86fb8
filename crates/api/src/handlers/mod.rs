//! Request handlers.
//!
//! Each submodule provides async handler functions for one area of the API.
//! Handlers delegate to `parlance_core` for domain logic and to the
//! collaborators in [`AppState`](crate::state::AppState) for upstream calls,
//! mapping errors via [`AppError`](crate::error::AppError).

pub mod catalog;
pub mod conversation;
pub mod progress;
pub mod speech;
