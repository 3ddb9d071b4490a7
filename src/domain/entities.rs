use std::fmt;

// Fixed guest identity used by the authorization command.
pub const GUEST_MINUTES: u32 = 60;
pub const GUEST_NAME: &str = "Test Guest";
pub const GUEST_EMAIL: &str = "test@example.com";

/// Target controller for a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControllerEndpoint {
    pub host: String,
    pub port: u16,
    // Skip TLS certificate validation when set.
    pub insecure: bool,
}

impl ControllerEndpoint {
    pub fn base_url(&self) -> String {
        format!("https://{}:{}", self.host, self.port)
    }
}

// Login credentials; the password never leaves memory.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Opaque session cookie returned by a successful login.
///
/// Held verbatim and replayed as the `Cookie` header on every later call.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

// Site visible to the authenticated account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Site {
    pub id: String,
    pub name: String,
    pub description: String,
}

// Guest authorization command for one hardware address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuestAuthorization {
    pub mac: String,
    pub minutes: u32,
    pub name: String,
    pub email: String,
}

impl GuestAuthorization {
    pub fn for_mac(mac: impl Into<String>) -> Self {
        Self {
            mac: mac.into(),
            minutes: GUEST_MINUTES,
            name: GUEST_NAME.to_string(),
            email: GUEST_EMAIL.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuestOutcome {
    // No hardware address was supplied.
    Skipped,
    Authorized { mac: String },
}

// Steps of the authentication check, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkflowState {
    PromptingPassword,
    LoggingIn,
    VerifyingSites,
    AuthorizingGuest,
    Done,
    Failed,
}

impl WorkflowState {
    pub fn label(self) -> &'static str {
        match self {
            WorkflowState::PromptingPassword => "prompting for password",
            WorkflowState::LoggingIn => "logging in",
            WorkflowState::VerifyingSites => "verifying sites",
            WorkflowState::AuthorizingGuest => "authorizing guest",
            WorkflowState::Done => "done",
            WorkflowState::Failed => "failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_endpoint_is_formatted_then_base_url_uses_https_host_and_port() {
        let endpoint = ControllerEndpoint {
            host: "controller.local".to_string(),
            port: 8443,
            insecure: true,
        };

        assert_eq!(endpoint.base_url(), "https://controller.local:8443");
    }

    #[test]
    fn when_secrets_are_debug_printed_then_values_are_redacted() {
        let credentials = Credentials {
            username: "admin".to_string(),
            password: "hunter2".to_string(),
        };
        let token = SessionToken::new("unifises=abc123");

        let printed = format!("{credentials:?} {token:?}");

        assert!(printed.contains("admin"));
        assert!(!printed.contains("hunter2"));
        assert!(!printed.contains("abc123"));
    }

    #[test]
    fn when_guest_request_is_built_then_fixed_defaults_are_applied() {
        let request = GuestAuthorization::for_mac("aa:bb:cc:dd:ee:ff");

        assert_eq!(request.mac, "aa:bb:cc:dd:ee:ff");
        assert_eq!(request.minutes, 60);
        assert_eq!(request.name, "Test Guest");
        assert_eq!(request.email, "test@example.com");
    }
}
