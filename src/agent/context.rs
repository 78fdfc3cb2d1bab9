//! Request-scoped context injection.
//!
//! Feeds a rendered snapshot of the candidate's background back into model
//! requests, so a model with no persistent memory of prior tool calls still
//! sees the accumulated state.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::session::SessionState;

use super::agent::BeforeModelHook;

const WORK_HISTORY_LIMIT: usize = 5;
const SKILLS_LIMIT: usize = 10;

/// Before-model hook prepending the candidate-background digest to the
/// outgoing system instruction. No-op when `job_history` is absent: the
/// instruction stays byte-identical.
pub fn candidate_background_hook() -> BeforeModelHook {
    Arc::new(|session_id, state, request| {
        let Some(digest) = render_digest(state) else {
            return;
        };
        debug!(session_id, "injecting candidate background context");
        let injection =
            format!("[CONTEXT - Candidate Background]\n{digest}\n\n[END CONTEXT]\n\n");
        let instruction = request.system_instruction.take().unwrap_or_default();
        request.system_instruction = Some(format!("{injection}{instruction}"));
    })
}

/// Bounded textual digest of `job_history`, or `None` when absent.
pub(crate) fn render_digest(state: &SessionState) -> Option<String> {
    let job_history = state.job_history()?;
    let mut lines: Vec<String> = Vec::new();

    if let Some(name) = job_history.get("name").and_then(Value::as_str) {
        lines.push(format!("Candidate: {name}"));
    }

    if let Some(work) = job_history.get("work_history").and_then(Value::as_array) {
        if !work.is_empty() {
            lines.push(format!("\nWork History ({} positions):", work.len()));
            for (i, job) in work.iter().take(WORK_HISTORY_LIMIT).enumerate() {
                let title = job.get("title").and_then(Value::as_str).unwrap_or("N/A");
                let company = job.get("company").and_then(Value::as_str).unwrap_or("N/A");
                let dates = job.get("dates").and_then(Value::as_str).unwrap_or("N/A");
                lines.push(format!("{}. {title} at {company} ({dates})", i + 1));
            }
        }
    }

    if let Some(skills) = job_history.get("skills").and_then(Value::as_array) {
        if !skills.is_empty() {
            let preview: Vec<&str> = skills
                .iter()
                .take(SKILLS_LIMIT)
                .filter_map(Value::as_str)
                .collect();
            lines.push(format!("\nKey Skills: {}", preview.join(", ")));
        }
    }

    Some(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderRequest;
    use crate::types::GenerationSettings;
    use serde_json::json;

    fn request_with_instruction(instruction: &str) -> ProviderRequest {
        ProviderRequest {
            system_instruction: Some(instruction.to_string()),
            messages: Vec::new(),
            settings: GenerationSettings::default(),
            tools: Vec::new(),
        }
    }

    #[test]
    fn absent_history_leaves_instruction_byte_identical() {
        let hook = candidate_background_hook();
        let state = SessionState::new();
        let mut request = request_with_instruction("You are a career counselor.");

        hook("s", &state, &mut request);

        assert_eq!(
            request.system_instruction.as_deref(),
            Some("You are a career counselor.")
        );
    }

    #[test]
    fn present_history_prepends_delimited_digest() {
        let hook = candidate_background_hook();
        let mut state = SessionState::new();
        state.write(
            "job_history",
            json!({
                "name": "Jane Doe",
                "work_history": [
                    {"title": "Engineer", "company": "Acme", "dates": "2020-2024"}
                ],
                "skills": ["Rust", "SQL"],
            }),
        );
        let mut request = request_with_instruction("You are a career counselor.");

        hook("s", &state, &mut request);

        let instruction = request.system_instruction.unwrap();
        assert!(instruction.starts_with("[CONTEXT - Candidate Background]\n"));
        assert!(instruction.contains("Candidate: Jane Doe"));
        assert!(instruction.contains("1. Engineer at Acme (2020-2024)"));
        assert!(instruction.contains("Key Skills: Rust, SQL"));
        assert!(instruction.contains("[END CONTEXT]\n\n"));
        assert!(instruction.ends_with("You are a career counselor."));
    }

    #[test]
    fn digest_caps_work_entries_and_skills() {
        let mut state = SessionState::new();
        let work: Vec<serde_json::Value> = (0..7)
            .map(|i| json!({"title": format!("Role {i}"), "company": "Acme", "dates": "2020"}))
            .collect();
        let skills: Vec<serde_json::Value> = (0..12).map(|i| json!(format!("s{i}"))).collect();
        state.write("job_history", json!({"work_history": work, "skills": skills}));

        let digest = render_digest(&state).unwrap();
        assert!(digest.contains("5. Role 4 at Acme"));
        assert!(!digest.contains("6. Role 5"));
        assert!(digest.contains("s9"));
        assert!(!digest.contains("s10,"));
    }
}
