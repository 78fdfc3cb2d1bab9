//! Agents and the delegation topology.

pub mod agent;
pub mod context;
pub mod topology;
pub mod trace;

pub use agent::{Agent, AvailabilityGuard, BeforeModelHook};
pub use topology::{DelegationDecision, Topology};
pub use trace::StateTrace;
