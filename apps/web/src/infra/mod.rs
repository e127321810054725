//! Infrastructure layer: turns configuration into a ready [`AppState`].
//!
//! [`AppState`]: crate::state::app_state::AppState

pub mod state;
