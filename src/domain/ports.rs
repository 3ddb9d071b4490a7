use async_trait::async_trait;

use crate::domain::entities::{
    Credentials, GuestAuthorization, GuestOutcome, SessionToken, Site, WorkflowState,
};
use crate::domain::errors::ProbeError;

// Port for the controller HTTP surface. The workflow depends on this trait,
// not on the reqwest client.
#[async_trait]
pub trait ControllerApi: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<SessionToken, ProbeError>;
    async fn list_sites(&self, token: &SessionToken) -> Result<Vec<Site>, ProbeError>;
    async fn authorize_guest(
        &self,
        token: &SessionToken,
        site: &str,
        request: &GuestAuthorization,
    ) -> Result<(), ProbeError>;
}

// Port for obtaining the account password.
#[async_trait]
pub trait SecretSource: Send + Sync {
    async fn read_secret(&self) -> Result<String, ProbeError>;
}

// Progress notifications emitted while the workflow runs.
#[derive(Debug)]
pub enum ProgressEvent<'a> {
    Entered(WorkflowState),
    SessionEstablished,
    SitesVerified(&'a [Site]),
    Guest(&'a GuestOutcome),
    Completed,
    Failed {
        state: WorkflowState,
        error: &'a ProbeError,
    },
}

pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: ProgressEvent<'_>);
}
