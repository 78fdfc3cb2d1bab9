//! Structured resume data extracted by the model collaborator.

use serde::{Deserialize, Serialize};

/// One work-history (or volunteering) entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkEntry {
    pub title: String,
    pub dates: String,
    pub company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One education entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EducationEntry {
    pub institution: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dates: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_of_study: Option<String>,
}

/// One publication entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PublicationEntry {
    pub organization: String,
    pub dates: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Complete resume data model, persisted under the `job_history` state key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResumeData {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub work_history: Vec<WorkEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<Vec<EducationEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub introduction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publications: Option<Vec<PublicationEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volunteering: Option<Vec<WorkEntry>>,
}

impl ResumeData {
    /// JSON Schema constraining the extraction request's structured output.
    pub fn response_schema() -> serde_json::Value {
        let work_entry = serde_json::json!({
            "type": "object",
            "properties": {
                "title": {"type": "string"},
                "dates": {"type": "string"},
                "company": {"type": "string"},
                "description": {"type": "string"},
            },
            "required": ["title", "dates", "company"],
        });

        serde_json::json!({
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "phone": {"type": "string"},
                "address": {"type": "string"},
                "work_history": {"type": "array", "items": work_entry},
                "skills": {"type": "array", "items": {"type": "string"}},
                "education": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "institution": {"type": "string"},
                            "dates": {"type": "string"},
                            "field_of_study": {"type": "string"},
                        },
                        "required": ["institution"],
                    },
                },
                "introduction": {"type": "string"},
                "publications": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "organization": {"type": "string"},
                            "dates": {"type": "string"},
                            "description": {"type": "string"},
                        },
                        "required": ["organization", "dates"],
                    },
                },
                "volunteering": {"type": "array", "items": work_entry},
            },
            "required": ["name", "phone", "address", "work_history"],
        })
    }
}
