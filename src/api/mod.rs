//! API layer - HTTP endpoints

pub mod admin;
pub mod health;
pub mod public;
pub mod router;
pub mod state;
pub mod types;

pub use router::{create_router, create_router_with_state};
pub use state::AppState;
