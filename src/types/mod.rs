//! Core types: messages and generation settings.

pub mod generation;
pub mod message;

pub use generation::{FinishReason, GenerationSettings, ResponseFormat};
pub use message::{ContentPart, FileData, ModelMessage, Role, ToolCall, ToolResultPart};
