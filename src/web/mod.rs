//! Web server module
//!
//! Provides the search page, the JSON output format and the service endpoints.

mod handlers;
mod routes;
mod state;
mod templates;

pub use handlers::{ResultView, SearchParams, SUMMARY_UNAVAILABLE_MESSAGE};
pub use routes::create_router;
pub use state::AppState;
pub use templates::Templates;
