use std::io;
use thiserror::Error;

// Domain-level errors for the authentication check workflow.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("authentication failed with status {status}: {reason}")]
    Authentication { status: u16, reason: &'static str },
    #[error("sites API responded with status {0}")]
    SitesFetch(u16),
    #[error("guest auth API responded with status {0}")]
    GuestAuth(u16),
    #[error("controller API error: {0}")]
    ControllerApi(String),
    #[error("malformed controller response: {0}")]
    MalformedResponse(String),
    #[error("connection error: {0}")]
    Connection(String),
    #[error("password prompt failed")]
    Prompt(#[source] io::Error),
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ProbeError {
    // Status code reported by the controller, when the failure carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ProbeError::Authentication { status, .. }
            | ProbeError::SitesFetch(status)
            | ProbeError::GuestAuth(status) => Some(*status),
            _ => None,
        }
    }
}
