//! Vitae — conversational career-intake engine.
//!
//! A stateful multi-agent delegation engine: specialized conversational
//! workers (a coordinator and two interviewers) share a single mutable
//! session state, mutate it through tools, and hand control to one another
//! via guarded delegation. Model inference is an external collaborator
//! behind the [`provider::ModelProvider`] trait.
//!
//! # Quick Start
//!
//! ```no_run
//! use vitae::agent::Topology;
//! use vitae::config::AppConfig;
//! use vitae::provider::google::GoogleProvider;
//! use vitae::runner::SessionRunner;
//! use vitae::session::SessionStore;
//!
//! # async fn example() -> vitae::error::Result<()> {
//! let config = AppConfig::from_env();
//! let provider =
//!     GoogleProvider::new(config.model.clone(), config.require_api_key()?.to_string());
//! let topology = Topology::career_intake();
//! let mut store = SessionStore::default_scope();
//!
//! let mut runner = SessionRunner::new(&topology, &provider, &mut store);
//! let events = runner
//!     .run("default", vec!["Hi, I'd like help with my resume.".into()])
//!     .await?;
//! for event in &events {
//!     println!("{event:?}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod config;
pub mod error;
pub mod prelude;
pub mod provider;
pub mod resume;
pub mod runner;
pub mod session;
pub mod tools;
pub mod types;
pub mod util;
