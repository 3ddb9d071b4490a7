// Use cases layer: the authentication check workflow.

pub mod workflow;

pub use workflow::{AuthCheckWorkflow, WorkflowFailure, WorkflowReport, exit_status};
