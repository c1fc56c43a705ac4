//! Result types shared by the providers, the orchestrator and the web layer

mod types;

pub use types::*;
