//! Resume tools: extraction, summary, and field updates.

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::provider::ProviderRequest;
use crate::resume::ResumeData;
use crate::types::{GenerationSettings, ModelMessage};

use super::tool::{Tool, ToolArguments, ToolContext, ToolOutcome, ToolParameters};

// Bounds on the rendered job-history summary.
const WORK_HISTORY_LIMIT: usize = 5;
const SKILLS_LIMIT: usize = 10;
const PUBLICATIONS_LIMIT: usize = 3;
const VOLUNTEERING_LIMIT: usize = 3;
const DESCRIPTION_LIMIT: usize = 200;
const PUBLICATION_DESCRIPTION_LIMIT: usize = 150;

const NO_HISTORY_MESSAGE: &str = "No job history available. The resume hasn't been parsed yet. \
     Please ask the user to provide their resume first.";

/// Renders a bounded, human-readable summary of the parsed resume.
#[derive(Debug, Default)]
pub struct SummarizeJobHistory;

#[async_trait]
impl Tool for SummarizeJobHistory {
    fn name(&self) -> &str {
        "summarize_job_history"
    }

    fn description(&self) -> &str {
        "Retrieve a formatted summary of the user's parsed resume data: contact \
         info, work history, education, skills, publications, and volunteering."
    }

    fn parameters(&self) -> ToolParameters {
        ToolParameters::object().build()
    }

    async fn execute(&self, _args: &ToolArguments, ctx: &mut ToolContext<'_>) -> ToolOutcome {
        let Some(job_history) = ctx.state.job_history() else {
            info!(session_id = ctx.session_id, "no job history in state yet");
            return ToolOutcome::ok(NO_HISTORY_MESSAGE);
        };
        ToolOutcome::ok(render_summary(job_history))
    }
}

/// Render the bounded textual summary of a `job_history` object.
pub(crate) fn render_summary(job_history: &Map<String, Value>) -> String {
    let mut lines: Vec<String> = Vec::new();

    if let Some(name) = field_str(job_history, "name") {
        lines.push(format!("Name: {name}"));
    }
    if let Some(phone) = field_str(job_history, "phone") {
        lines.push(format!("Contact: {phone}"));
    }
    if let Some(address) = field_str(job_history, "address") {
        lines.push(format!("Location: {address}"));
    }

    if let Some(work) = job_history.get("work_history").and_then(Value::as_array) {
        if !work.is_empty() {
            lines.push(format!("\nWork History ({} positions):", work.len()));
            for (i, job) in work.iter().take(WORK_HISTORY_LIMIT).enumerate() {
                if let Some(line) = position_line(i + 1, job) {
                    lines.push(line);
                }
                if let Some(desc) = job.get("description").and_then(Value::as_str) {
                    lines.push(format!("   {}", truncate(desc, DESCRIPTION_LIMIT)));
                }
            }
        }
    }

    if let Some(education) = job_history.get("education").and_then(Value::as_array) {
        if !education.is_empty() {
            lines.push(format!("\nEducation ({} entries):", education.len()));
            for (i, edu) in education.iter().enumerate() {
                let mut parts = Vec::new();
                if let Some(inst) = edu.get("institution").and_then(Value::as_str) {
                    parts.push(inst.to_string());
                }
                if let Some(field) = edu.get("field_of_study").and_then(Value::as_str) {
                    parts.push(format!("- {field}"));
                }
                if let Some(dates) = edu.get("dates").and_then(Value::as_str) {
                    parts.push(format!("({dates})"));
                }
                if !parts.is_empty() {
                    lines.push(format!("{}. {}", i + 1, parts.join(" ")));
                }
            }
        }
    }

    if let Some(skills) = job_history.get("skills").and_then(Value::as_array) {
        if !skills.is_empty() {
            let shown: Vec<&str> = skills
                .iter()
                .take(SKILLS_LIMIT)
                .filter_map(Value::as_str)
                .collect();
            lines.push(format!("\nKey Skills ({} total):", skills.len()));
            lines.push(shown.join(", "));
        }
    }

    if let Some(pubs) = job_history.get("publications").and_then(Value::as_array) {
        if !pubs.is_empty() {
            lines.push(format!("\nPublications ({} entries):", pubs.len()));
            for (i, publication) in pubs.iter().take(PUBLICATIONS_LIMIT).enumerate() {
                let mut parts = Vec::new();
                if let Some(org) = publication.get("organization").and_then(Value::as_str) {
                    parts.push(org.to_string());
                }
                if let Some(dates) = publication.get("dates").and_then(Value::as_str) {
                    parts.push(format!("({dates})"));
                }
                if !parts.is_empty() {
                    lines.push(format!("{}. {}", i + 1, parts.join(" ")));
                }
                if let Some(desc) = publication.get("description").and_then(Value::as_str) {
                    lines.push(format!(
                        "   {}",
                        truncate(desc, PUBLICATION_DESCRIPTION_LIMIT)
                    ));
                }
            }
        }
    }

    if let Some(volunteering) = job_history.get("volunteering").and_then(Value::as_array) {
        if !volunteering.is_empty() {
            lines.push(format!("\nVolunteering ({} entries):", volunteering.len()));
            for (i, entry) in volunteering.iter().take(VOLUNTEERING_LIMIT).enumerate() {
                if let Some(line) = position_line(i + 1, entry) {
                    lines.push(line);
                }
            }
        }
    }

    lines.join("\n")
}

fn field_str<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    obj.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// `"{index}. {title} at {company} ({dates})"`, skipping absent parts.
fn position_line(index: usize, entry: &Value) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(title) = entry.get("title").and_then(Value::as_str) {
        parts.push(title.to_string());
    }
    if let Some(company) = entry.get("company").and_then(Value::as_str) {
        parts.push(format!("at {company}"));
    }
    if let Some(dates) = entry.get("dates").and_then(Value::as_str) {
        parts.push(format!("({dates})"));
    }
    if parts.is_empty() {
        None
    } else {
        Some(format!("{index}. {}", parts.join(" ")))
    }
}

/// Truncate to `limit` characters, appending an ellipsis marker when cut.
pub(crate) fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() > limit {
        let cut: String = text.chars().take(limit).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

/// Updates one field of the parsed resume data.
///
/// The string-typed `value` argument is dual-mode: parsed as JSON when
/// possible (nested structures), stored verbatim otherwise (plain scalars).
/// The parse outcome is explicit in both the typed result and the
/// confirmation text.
#[derive(Debug, Default)]
pub struct UpdateJobHistoryField;

/// Typed result of a field write, before flattening.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FieldWrite {
    pub field: String,
    /// Whether the value parsed as structured JSON.
    pub parsed: bool,
}

impl FieldWrite {
    fn into_outcome(self) -> ToolOutcome {
        let mode = if self.parsed {
            "parsed as structured JSON"
        } else {
            "stored verbatim"
        };
        ToolOutcome::ok(format!(
            "Successfully updated {} in job history ({mode}).",
            self.field
        ))
    }
}

#[async_trait]
impl Tool for UpdateJobHistoryField {
    fn name(&self) -> &str {
        "update_job_history_field"
    }

    fn description(&self) -> &str {
        "Update or add a field in the user's job history (e.g., 'name', 'phone', \
         'skills', 'work_history', 'education'). Use a JSON string for complex \
         values like work_history."
    }

    fn parameters(&self) -> ToolParameters {
        ToolParameters::object()
            .string("field", "The job-history field to update", true)
            .string(
                "value",
                "The new value; JSON for nested structures, plain text otherwise",
                true,
            )
            .build()
    }

    async fn execute(&self, args: &ToolArguments, ctx: &mut ToolContext<'_>) -> ToolOutcome {
        let Some(field) = args.get_str("field") else {
            return ToolOutcome::error("Error updating job history: missing 'field' argument");
        };
        let Some(value) = args.get_str("value") else {
            return ToolOutcome::error("Error updating job history: missing 'value' argument");
        };

        let write = apply_field_write(ctx, field, value);
        info!(
            session_id = ctx.session_id,
            field = %write.field,
            parsed = write.parsed,
            "updated job history field"
        );
        write.into_outcome()
    }
}

pub(crate) fn apply_field_write(ctx: &mut ToolContext<'_>, field: &str, value: &str) -> FieldWrite {
    let job_history = ctx.state.job_history_mut();
    match serde_json::from_str::<Value>(value) {
        Ok(parsed) => {
            job_history.insert(field.to_string(), parsed);
            FieldWrite {
                field: field.to_string(),
                parsed: true,
            }
        }
        Err(_) => {
            job_history.insert(field.to_string(), Value::String(value.to_string()));
            FieldWrite {
                field: field.to_string(),
                parsed: false,
            }
        }
    }
}

/// Extracts structured data from an uploaded resume via a
/// schema-constrained model call and writes it under `job_history`.
#[derive(Debug, Default)]
pub struct ParseResume;

#[async_trait]
impl Tool for ParseResume {
    fn name(&self) -> &str {
        "parse_resume"
    }

    fn description(&self) -> &str {
        "Parse an uploaded resume file and extract structured data (name, \
         contact info, work history, education, skills, publications, \
         volunteering) into session state."
    }

    fn parameters(&self) -> ToolParameters {
        ToolParameters::object()
            .string(
                "file_uri",
                "The URI of the uploaded resume file (e.g., 'files/abc123')",
                true,
            )
            .build()
    }

    async fn execute(&self, args: &ToolArguments, ctx: &mut ToolContext<'_>) -> ToolOutcome {
        let Some(file_uri) = args.get_str("file_uri") else {
            return ToolOutcome::error("Error parsing resume: missing 'file_uri' argument");
        };
        info!(session_id = ctx.session_id, file_uri, "parsing resume");

        let request = ProviderRequest {
            system_instruction: None,
            messages: vec![ModelMessage::user_with_file(
                "Extract all information from this resume document and return it \
                 in structured format.",
                file_uri,
            )],
            settings: GenerationSettings::extraction(ResumeData::response_schema()),
            tools: Vec::new(),
        };

        let response = match ctx.provider.generate(&request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(session_id = ctx.session_id, error = %e, "resume extraction call failed");
                return ToolOutcome::error(format!("Error parsing resume: {e}"));
            }
        };

        let parsed: ResumeData = match serde_json::from_str(&response.text) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(session_id = ctx.session_id, error = %e, "resume extraction returned invalid structure");
                return ToolOutcome::error(format!("Error parsing resume: {e}"));
            }
        };

        let name = parsed.name.clone();
        match serde_json::to_value(&parsed) {
            Ok(value) => ctx.state.write(crate::session::state::JOB_HISTORY, value),
            Err(e) => return ToolOutcome::error(format!("Error parsing resume: {e}")),
        }

        ToolOutcome::ok(format!(
            "Successfully parsed resume for {name}. Data saved to session state \
             under 'job_history'."
        ))
    }
}
