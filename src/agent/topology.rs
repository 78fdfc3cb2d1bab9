//! The concrete delegation topology: one coordinator, two interviewers.

use std::collections::HashMap;
use std::sync::Arc;

use crate::provider::ToolDefinition;
use crate::session::SessionState;
use crate::tools::{ParseResume, RecordCareerGoal, SummarizeJobHistory, UpdateJobHistoryField};

use super::agent::Agent;
use super::context::candidate_background_hook;
use super::trace::StateTrace;

/// Root agent name.
pub const COORDINATOR: &str = "career_coordinator";
/// Job-history interviewer agent name.
pub const RESUME_INTERVIEWER: &str = "resume_interview_agent";
/// Career-goals interviewer agent name.
pub const CAREER_INTERVIEWER: &str = "career_interview_agent";

/// Name of the built-in delegation function exposed to the model.
pub const TRANSFER_TOOL: &str = "transfer_to_agent";

const COORDINATOR_INSTRUCTION: &str = "\
You are the system that connects job-seekers with personalized career support.

**Your workflow:**
1. First, offer to help the user upload their resume and parse it with parse_resume
2. Once the resume is parsed, retrieve job history with summarize_job_history as needed
3. Transfer to specialized agents to conduct interviews

**Components:**
1. parse_resume: Parse the user's uploaded resume file into structured job history data.
2. summarize_job_history: Retrieve and display the user's job history from state.
3. resume_interview_agent: Transfer to this agent for a detailed job history interview. It can update job history information.
4. career_interview_agent: Transfer to this agent for a career goals interview; it only becomes available once job history exists.

**Important rules:**
- Always parse the resume FIRST before conducting interviews
- Only transfer to career_interview_agent AFTER job history exists in state

**Conversation style:**
- Be professional but friendly
- Guide users through the process step-by-step
- Explain what information you're gathering and why";

const RESUME_INTERVIEWER_INSTRUCTION: &str = "\
You are a professional career interviewer conducting a detailed job history interview.

**Your role:**
- Ask follow-up questions about work experiences to gather rich details
- Probe for achievements, responsibilities, and impact in each role
- Clarify gaps in employment or transitions between positions

**Tools available:**
- update_job_history_field: Update or add job history information as you learn new details

**Interview approach:**
- Start by reviewing the existing job history
- Ask open-ended questions to get detailed narratives
- Be conversational and supportive
- When the interview is done, transfer back to career_coordinator";

const CAREER_INTERVIEWER_INSTRUCTION: &str = "\
You are a professional career counselor conducting a career goals interview.

**Your role:**
- Understand the candidate's short-term and long-term career aspirations
- Explore their values, interests, and work preferences

**Tools available:**
- record_career_goal: Save insights about goals, values, interests, and preferences

**Interview approach:**
- Ask thoughtful, open-ended questions
- Save insights frequently with appropriate goal_type categories:
  'short_term', 'long_term', 'values', 'interests', 'preferences'
- When the interview is done, transfer back to career_coordinator

Remember: the candidate's background is provided to you automatically. Use it
to ask relevant follow-up questions.";

/// Why a delegation attempt was refused, or that it may proceed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DelegationDecision {
    Allowed,
    UnknownAgent,
    NotASubAgent,
    /// The target's availability guard rejected the current session state.
    GuardRejected(String),
}

/// One root agent plus its delegation graph.
///
/// The routing precondition on the career interviewer is enforced here
/// mechanically, not just stated in instruction text: a transfer request is
/// checked against [`Topology::can_delegate`] before any agent switch.
pub struct Topology {
    agents: HashMap<String, Agent>,
    root: String,
}

impl Topology {
    /// Build the career-intake topology.
    pub fn career_intake() -> Self {
        let trace = StateTrace::new();

        let coordinator = Agent::new(COORDINATOR, COORDINATOR_INSTRUCTION)
            .with_description(
                "A helpful career assistant that gathers job-seeker information.",
            )
            .with_tool(Arc::new(ParseResume))
            .with_tool(Arc::new(SummarizeJobHistory))
            .with_sub_agent(RESUME_INTERVIEWER)
            .with_sub_agent(CAREER_INTERVIEWER)
            .with_before_model(trace.hook());

        let resume_interviewer = Agent::new(RESUME_INTERVIEWER, RESUME_INTERVIEWER_INSTRUCTION)
            .with_description(
                "Conducts detailed job history interviews to gather comprehensive \
                 career information.",
            )
            .with_tool(Arc::new(UpdateJobHistoryField))
            .with_sub_agent(COORDINATOR);

        let career_interviewer = Agent::new(CAREER_INTERVIEWER, CAREER_INTERVIEWER_INSTRUCTION)
            .with_description(
                "Conducts in-depth career goals interviews to understand aspirations \
                 and preferences.",
            )
            .with_tool(Arc::new(RecordCareerGoal))
            .with_sub_agent(COORDINATOR)
            .with_before_model(candidate_background_hook())
            .with_guard(Arc::new(|state: &SessionState| state.has_job_history()));

        Self::new(COORDINATOR, vec![coordinator, resume_interviewer, career_interviewer])
    }

    /// Build a topology from a root name and its agents.
    pub fn new(root: impl Into<String>, agents: Vec<Agent>) -> Self {
        let root = root.into();
        let agents: HashMap<String, Agent> = agents
            .into_iter()
            .map(|a| (a.name().to_string(), a))
            .collect();
        assert!(agents.contains_key(&root), "root agent must be registered");
        Self { agents, root }
    }

    /// The root agent: sole entry point for a session.
    pub fn root(&self) -> &Agent {
        &self.agents[&self.root]
    }

    /// Look up an agent by name.
    pub fn agent(&self, name: &str) -> Option<&Agent> {
        self.agents.get(name)
    }

    /// Whether `from` may hand the session to `target` right now.
    pub fn can_delegate(
        &self,
        from: &Agent,
        target: &str,
        state: &SessionState,
    ) -> DelegationDecision {
        let Some(target_agent) = self.agents.get(target) else {
            return DelegationDecision::UnknownAgent;
        };
        if !from.sub_agents().iter().any(|name| name == target) {
            return DelegationDecision::NotASubAgent;
        }
        if !target_agent.is_available(state) {
            return DelegationDecision::GuardRejected(format!(
                "{target} is not available yet: job history has not been recorded \
                 for this session"
            ));
        }
        DelegationDecision::Allowed
    }

    /// Function declaration for delegation, listing the agent's sub-agents.
    pub fn transfer_definition(&self, agent: &Agent) -> Option<ToolDefinition> {
        if agent.sub_agents().is_empty() {
            return None;
        }
        let descriptions: Vec<String> = agent
            .sub_agents()
            .iter()
            .filter_map(|name| self.agents.get(name))
            .map(|a| format!("{}: {}", a.name(), a.description()))
            .collect();
        Some(ToolDefinition {
            name: TRANSFER_TOOL.to_string(),
            description: format!(
                "Transfer the conversation to another agent. Available agents:\n{}",
                descriptions.join("\n")
            ),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "agent_name": {
                        "type": "string",
                        "description": "Name of the agent to transfer to",
                        "enum": agent.sub_agents(),
                    }
                },
                "required": ["agent_name"],
            }),
        })
    }
}
