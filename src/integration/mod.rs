pub mod config;
pub mod orchestrator;

pub use config::AppConfig;
pub use orchestrator::{Orchestrator, OrchestratorCommand, OrchestratorEvent, OrchestratorHandle};
