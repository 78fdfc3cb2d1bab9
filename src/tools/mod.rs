//! Tools: callable actions agents use to read and mutate session state.

pub mod career;
pub mod resume;
pub mod tool;

pub use career::RecordCareerGoal;
pub use resume::{ParseResume, SummarizeJobHistory, UpdateJobHistoryField};
pub use tool::{Tool, ToolArguments, ToolContext, ToolOutcome, ToolParameters};
