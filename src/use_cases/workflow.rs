use crate::domain::{
    ControllerApi, Credentials, GuestAuthorization, GuestOutcome, ProbeError, ProgressEvent,
    ProgressReporter, SecretSource, SessionToken, Site, WorkflowState,
};

// Result of a run that reached `Done`.
#[derive(Debug)]
pub struct WorkflowReport {
    pub sites: Vec<Site>,
    pub guest: GuestOutcome,
}

// A run that reached `Failed`, with the step it failed in.
#[derive(Debug)]
pub struct WorkflowFailure {
    pub state: WorkflowState,
    pub error: ProbeError,
}

/// Process exit status for a finished run: 0 when every requested step
/// succeeded, 1 otherwise.
pub fn exit_status(result: &Result<WorkflowReport, WorkflowFailure>) -> u8 {
    match result {
        Ok(_) => 0,
        Err(_) => 1,
    }
}

// Authentication check workflow with injected dependencies.
pub struct AuthCheckWorkflow<A, S, R> {
    pub api: A,
    pub secrets: S,
    pub reporter: R,
    pub username: String,
    pub site: String,
}

impl<A, S, R> AuthCheckWorkflow<A, S, R>
where
    A: ControllerApi,
    S: SecretSource,
    R: ProgressReporter,
{
    // Runs every step in order; the first failure ends the run.
    #[tracing::instrument(
        name = "auth_check",
        skip_all,
        fields(username = %self.username, site = %self.site)
    )]
    pub async fn execute(&self, mac: Option<&str>) -> Result<WorkflowReport, WorkflowFailure> {
        let result = self.run_steps(mac).await;

        match &result {
            Ok(_) => {
                tracing::info!("all steps completed.");
                self.reporter.report(ProgressEvent::Completed);
            }
            Err(failure) => {
                tracing::warn!(
                    state = ?failure.state,
                    status = ?failure.error.status(),
                    error = %failure.error,
                    "workflow failed."
                );
                self.reporter.report(ProgressEvent::Entered(WorkflowState::Failed));
                self.reporter.report(ProgressEvent::Failed {
                    state: failure.state,
                    error: &failure.error,
                });
            }
        }

        result
    }

    async fn run_steps(&self, mac: Option<&str>) -> Result<WorkflowReport, WorkflowFailure> {
        let password = self
            .step(WorkflowState::PromptingPassword, self.secrets.read_secret())
            .await?;
        let credentials = Credentials {
            username: self.username.clone(),
            password,
        };

        let token = self
            .step(WorkflowState::LoggingIn, self.api.login(&credentials))
            .await?;
        drop(credentials);
        self.reporter.report(ProgressEvent::SessionEstablished);

        let sites = self
            .step(WorkflowState::VerifyingSites, self.api.list_sites(&token))
            .await?;
        self.reporter.report(ProgressEvent::SitesVerified(&sites));

        let guest = self
            .step(WorkflowState::AuthorizingGuest, self.authorize_guest(&token, mac))
            .await?;
        self.reporter.report(ProgressEvent::Guest(&guest));

        self.reporter.report(ProgressEvent::Entered(WorkflowState::Done));
        Ok(WorkflowReport { sites, guest })
    }

    // Skips without touching the controller when no hardware address is given.
    async fn authorize_guest(
        &self,
        token: &SessionToken,
        mac: Option<&str>,
    ) -> Result<GuestOutcome, ProbeError> {
        let Some(mac) = mac else {
            tracing::debug!("no hardware address supplied; guest step skipped.");
            return Ok(GuestOutcome::Skipped);
        };

        let request = GuestAuthorization::for_mac(mac);
        self.api.authorize_guest(token, &self.site, &request).await?;

        Ok(GuestOutcome::Authorized {
            mac: request.mac,
        })
    }

    // Enter a state, await its operation, and tag a failure with that state.
    async fn step<T, F>(&self, state: WorkflowState, op: F) -> Result<T, WorkflowFailure>
    where
        F: Future<Output = Result<T, ProbeError>>,
    {
        tracing::debug!(state = ?state, "entering state.");
        self.reporter.report(ProgressEvent::Entered(state));
        op.await.map_err(|error| WorkflowFailure { state, error })
    }
}
