//! End-to-end session runner tests over a scripted provider.

mod common;

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;

use common::{call_response, ScriptedProvider};
use vitae::agent::topology::{CAREER_INTERVIEWER, COORDINATOR, RESUME_INTERVIEWER, TRANSFER_TOOL};
use vitae::agent::Topology;
use vitae::provider::ProviderResponse;
use vitae::runner::{SessionRunner, TurnEvent};
use vitae::session::SessionStore;
use vitae::types::Role;

fn text(response: &str) -> ProviderResponse {
    ProviderResponse::text(response)
}

#[tokio::test]
async fn date_context_is_applied_exactly_once_per_session() {
    let topology = Topology::career_intake();
    let mut store = SessionStore::default_scope();

    let provider = ScriptedProvider::new(vec![text("Hello!")]);
    let mut runner = SessionRunner::new(&topology, &provider, &mut store);
    runner.run("alpha", vec!["hi".into()]).await.unwrap();

    let first_request = &provider.requests()[0];
    let user_text = first_request.messages.last().unwrap().text();
    assert!(user_text.starts_with("[Today's date: "));
    assert!(user_text.ends_with("hi"));

    // A fresh runner over the same store must not annotate again.
    let provider = ScriptedProvider::new(vec![text("Welcome back.")]);
    let mut runner = SessionRunner::new(&topology, &provider, &mut store);
    runner.run("alpha", vec!["back again".into()]).await.unwrap();

    let second_request = &provider.requests()[0];
    let user_text = second_request.messages.last().unwrap().text();
    assert_eq!(user_text, "back again");

    let annotations = second_request
        .messages
        .iter()
        .filter(|m| m.text().contains("[Today's date: "))
        .count();
    assert_eq!(annotations, 1);
}

#[tokio::test]
async fn inputs_are_processed_strictly_in_order() {
    let topology = Topology::career_intake();
    let mut store = SessionStore::default_scope();
    let provider = ScriptedProvider::new(vec![text("first reply"), text("second reply")]);

    let mut runner = SessionRunner::new(&topology, &provider, &mut store);
    let events = runner
        .run("order", vec!["one".into(), "two".into()])
        .await
        .unwrap();

    assert_eq!(
        events,
        vec![
            TurnEvent::Text {
                agent: COORDINATOR.into(),
                text: "first reply".into()
            },
            TurnEvent::Text {
                agent: COORDINATOR.into(),
                text: "second reply".into()
            },
        ]
    );

    // The second request must already carry the completed first exchange.
    let requests = provider.requests();
    let history_texts: Vec<String> = requests[1].messages.iter().map(|m| m.text()).collect();
    assert!(history_texts.iter().any(|t| t == "first reply"));
    assert!(history_texts.last().unwrap().ends_with("two"));
}

#[tokio::test]
async fn coordinator_requests_declare_transfer_tool() {
    let topology = Topology::career_intake();
    let mut store = SessionStore::default_scope();
    let provider = ScriptedProvider::new(vec![text("Hello!")]);

    let mut runner = SessionRunner::new(&topology, &provider, &mut store);
    runner.run("tools", vec!["hi".into()]).await.unwrap();

    let request = &provider.requests()[0];
    let names: Vec<&str> = request.tools.iter().map(|t| t.name.as_str()).collect();
    assert!(names.contains(&"parse_resume"));
    assert!(names.contains(&"summarize_job_history"));
    assert!(names.contains(&TRANSFER_TOOL));
}

#[tokio::test]
async fn summarize_before_parsing_reports_no_history() {
    let topology = Topology::career_intake();
    let mut store = SessionStore::default_scope();
    let provider = ScriptedProvider::new(vec![
        call_response("summarize_job_history", json!({})),
        text("You haven't uploaded a resume yet."),
    ]);

    let mut runner = SessionRunner::new(&topology, &provider, &mut store);
    let events = runner
        .run("empty", vec!["what do you know about me?".into()])
        .await
        .unwrap();

    let result = events.iter().find_map(|e| match e {
        TurnEvent::ToolResult { result, is_error, .. } => Some((result.clone(), *is_error)),
        _ => None,
    });
    let (result, is_error) = result.unwrap();
    assert!(result.starts_with("No job history available."));
    assert!(!is_error);
}

#[tokio::test]
async fn delegation_to_career_agent_is_refused_without_job_history() {
    let topology = Topology::career_intake();
    let mut store = SessionStore::default_scope();
    let provider = ScriptedProvider::new(vec![
        call_response(TRANSFER_TOOL, json!({"agent_name": CAREER_INTERVIEWER})),
        text("Let's parse your resume first."),
    ]);

    let mut runner = SessionRunner::new(&topology, &provider, &mut store);
    let events = runner
        .run("guarded", vec!["let's talk about my goals".into()])
        .await
        .unwrap();

    assert!(events.iter().any(|e| matches!(
        e,
        TurnEvent::DelegationDenied { target, .. } if target == CAREER_INTERVIEWER
    )));
    assert!(!events
        .iter()
        .any(|e| matches!(e, TurnEvent::Delegated { .. })));

    // The refusal flows back to the model as an error-flagged result.
    assert!(events.iter().any(|e| matches!(
        e,
        TurnEvent::ToolResult { name, is_error: true, .. } if name == TRANSFER_TOOL
    )));

    // The coordinator keeps the session.
    let session = store.get("guarded").unwrap();
    assert_eq!(session.active_agent.as_deref(), Some(COORDINATOR));
}

#[tokio::test]
async fn delegation_succeeds_and_injects_candidate_context() {
    let topology = Topology::career_intake();
    let mut store = SessionStore::default_scope();

    // Seed parsed resume data so the guard is satisfied.
    let (session, _) = store.get_or_create("goals");
    session.state.write(
        "job_history",
        json!({
            "name": "Jane Doe",
            "work_history": [
                {"title": "Engineer", "company": "Acme", "dates": "2020-2024"}
            ],
            "skills": ["Rust", "SQL"],
        }),
    );

    let provider = ScriptedProvider::new(vec![
        call_response(TRANSFER_TOOL, json!({"agent_name": CAREER_INTERVIEWER})),
        call_response(
            "record_career_goal",
            json!({"goal_type": "values", "details": "autonomy"}),
        ),
        text("Noted. What motivates you most?"),
    ]);

    let mut runner = SessionRunner::new(&topology, &provider, &mut store);
    let events = runner
        .run("goals", vec!["let's talk about my goals".into()])
        .await
        .unwrap();

    assert!(events.iter().any(|e| matches!(
        e,
        TurnEvent::Delegated { from, to }
            if from == COORDINATOR && to == CAREER_INTERVIEWER
    )));

    // After the hand-off, requests are the career agent's, with the
    // candidate background prepended request-scoped.
    let requests = provider.requests();
    let injected = requests[1].system_instruction.as_deref().unwrap();
    assert!(injected.starts_with("[CONTEXT - Candidate Background]\n"));
    assert!(injected.contains("Candidate: Jane Doe"));
    assert!(injected.contains("1. Engineer at Acme (2020-2024)"));

    // The goal landed in state, and the sub-agent keeps the session.
    let session = store.get("goals").unwrap();
    assert_eq!(
        session.state.career_goals().unwrap()["values"],
        json!(["autonomy"])
    );
    assert_eq!(session.active_agent.as_deref(), Some(CAREER_INTERVIEWER));

    // The next turn is answered by the delegated agent directly.
    let provider = ScriptedProvider::new(vec![text("Tell me more.")]);
    let mut runner = SessionRunner::new(&topology, &provider, &mut store);
    runner.run("goals", vec!["I value autonomy".into()]).await.unwrap();
    let follow_up = &provider.requests()[0];
    assert!(follow_up
        .system_instruction
        .as_deref()
        .unwrap()
        .contains("career counselor"));
}

#[tokio::test]
async fn full_intake_flow_updates_history_and_summarizes_in_order() {
    let topology = Topology::career_intake();
    let mut store = SessionStore::default_scope();

    let work_history = json!([
        {"title": "Engineer", "company": "Acme", "dates": "2020-2024"},
        {"title": "Analyst", "company": "Globex", "dates": "2016-2020"},
    ])
    .to_string();

    let provider = ScriptedProvider::new(vec![
        // Turn 1: coordinator hands off to the resume interviewer, which
        // records the work history and confirms.
        call_response(TRANSFER_TOOL, json!({"agent_name": RESUME_INTERVIEWER})),
        call_response(
            "update_job_history_field",
            json!({"field": "work_history", "value": work_history}),
        ),
        text("I've recorded both positions."),
        // Turn 2: back to the coordinator for a summary.
        call_response(TRANSFER_TOOL, json!({"agent_name": COORDINATOR})),
        call_response("summarize_job_history", json!({})),
        text("Here's what I have on file."),
    ]);

    let mut runner = SessionRunner::new(&topology, &provider, &mut store);
    let events = runner
        .run(
            "intake",
            vec![
                "let me tell you about my jobs".into(),
                "now show me a summary".into(),
            ],
        )
        .await
        .unwrap();

    let field_update = events.iter().find_map(|e| match e {
        TurnEvent::ToolResult { name, result, .. } if name == "update_job_history_field" => {
            Some(result.clone())
        }
        _ => None,
    });
    assert!(field_update.unwrap().contains("parsed as structured JSON"));

    let summary = events
        .iter()
        .find_map(|e| match e {
            TurnEvent::ToolResult { name, result, .. } if name == "summarize_job_history" => {
                Some(result.clone())
            }
            _ => None,
        })
        .unwrap();
    let first = summary.find("1. Engineer at Acme (2020-2024)").unwrap();
    let second = summary.find("2. Analyst at Globex (2016-2020)").unwrap();
    assert!(first < second);

    // Both hand-offs surfaced, in order.
    let delegations: Vec<(&str, &str)> = events
        .iter()
        .filter_map(|e| match e {
            TurnEvent::Delegated { from, to } => Some((from.as_str(), to.as_str())),
            _ => None,
        })
        .collect();
    assert_eq!(
        delegations,
        vec![
            (COORDINATOR, RESUME_INTERVIEWER),
            (RESUME_INTERVIEWER, COORDINATOR),
        ]
    );
}

#[tokio::test]
async fn event_sink_observes_events_as_they_surface() {
    let topology = Topology::career_intake();
    let mut store = SessionStore::default_scope();
    let provider = ScriptedProvider::new(vec![
        call_response("summarize_job_history", json!({})),
        text("Nothing on file yet."),
    ]);

    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
    let sink_seen = seen.clone();
    let mut runner = SessionRunner::new(&topology, &provider, &mut store).with_event_sink(
        Arc::new(move |event| {
            sink_seen.lock().unwrap().push(event.clone());
        }),
    );

    let events = runner.run("sink", vec!["hello".into()]).await.unwrap();
    assert_eq!(*seen.lock().unwrap(), events);
}

#[tokio::test]
async fn unknown_tool_calls_become_soft_errors() {
    let topology = Topology::career_intake();
    let mut store = SessionStore::default_scope();
    let provider = ScriptedProvider::new(vec![
        call_response("rank_job_matches", json!({})),
        text("Sorry, I can't do that yet."),
    ]);

    let mut runner = SessionRunner::new(&topology, &provider, &mut store);
    let events = runner.run("unknown", vec!["match me".into()]).await.unwrap();

    assert!(events.iter().any(|e| matches!(
        e,
        TurnEvent::ToolResult { name, is_error: true, .. } if name == "rank_job_matches"
    )));

    // The conversation still closed with a normal text reply.
    assert!(matches!(events.last().unwrap(), TurnEvent::Text { .. }));

    // The session history records the exchange as user / calls / result / text.
    let session = store.get("unknown").unwrap();
    let roles: Vec<Role> = session.history.iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        vec![Role::User, Role::Assistant, Role::Tool, Role::Assistant]
    );
}
