//! Common imports for working with the intake engine.

pub use crate::agent::{Agent, Topology};
pub use crate::config::AppConfig;
pub use crate::error::{Result, VitaeError};
pub use crate::provider::{ModelProvider, ProviderRequest, ProviderResponse};
pub use crate::runner::{SessionRunner, TurnEvent, UserInput};
pub use crate::session::{SessionState, SessionStore};
pub use crate::tools::{Tool, ToolArguments, ToolContext, ToolOutcome};
pub use crate::types::{GenerationSettings, ModelMessage, Role};
