// Domain layer: controller entities, the error taxonomy, and the ports the
// workflow depends on.

mod entities;
mod errors;
mod ports;

// Re-export the domain boundary types and ports.
pub use entities::{
    ControllerEndpoint, Credentials, GUEST_EMAIL, GUEST_MINUTES, GUEST_NAME, GuestAuthorization,
    GuestOutcome, SessionToken, Site, WorkflowState,
};
pub use errors::ProbeError;
pub use ports::{ControllerApi, ProgressEvent, ProgressReporter, SecretSource};
