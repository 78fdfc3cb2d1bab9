//! Career-goals tool.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::info;

use super::tool::{Tool, ToolArguments, ToolContext, ToolOutcome, ToolParameters};

/// Saves career-goal insights to session state.
///
/// Agglutinative: entries for the same goal type are appended as a list,
/// preserving every insight gathered over the course of the interview.
/// Nothing is ever removed or overwritten.
#[derive(Debug, Default)]
pub struct RecordCareerGoal;

#[async_trait]
impl Tool for RecordCareerGoal {
    fn name(&self) -> &str {
        "record_career_goal"
    }

    fn description(&self) -> &str {
        "Save career goals and aspirations to session state. Entries for the \
         same goal_type accumulate as a list; nothing is replaced."
    }

    fn parameters(&self) -> ToolParameters {
        ToolParameters::object()
            .string(
                "goal_type",
                "The type of goal information (e.g., 'short_term', 'long_term', \
                 'values', 'interests', 'preferences')",
                true,
            )
            .string("details", "The detailed insight to record", true)
            .build()
    }

    async fn execute(&self, args: &ToolArguments, ctx: &mut ToolContext<'_>) -> ToolOutcome {
        let Some(goal_type) = args.get_str("goal_type") else {
            return ToolOutcome::error("Error saving career goals: missing 'goal_type' argument");
        };
        let Some(details) = args.get_str("details") else {
            return ToolOutcome::error("Error saving career goals: missing 'details' argument");
        };

        let goals = ctx.state.career_goals_mut();
        let entries = goals
            .entry(goal_type.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        let Some(list) = entries.as_array_mut() else {
            return ToolOutcome::error(format!(
                "Error saving career goals: existing '{goal_type}' entry is not a list"
            ));
        };
        list.push(json!(details));
        let total = list.len();

        info!(
            session_id = ctx.session_id,
            goal_type, total, "saved career goal"
        );
        ToolOutcome::ok(format!(
            "Successfully added to {goal_type} in career goals (total entries: {total})."
        ))
    }
}
