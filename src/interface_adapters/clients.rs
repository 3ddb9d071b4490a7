use crate::domain::{ControllerApi, Credentials, GuestAuthorization, ProbeError, SessionToken, Site};
use crate::interface_adapters::protocol::{LoginRequest, StaMgrCommand, parse_envelope, parse_sites};
use async_trait::async_trait;
use reqwest::header::{COOKIE, HeaderMap, HeaderValue, SET_COOKIE};
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use std::error::Error as _;
use std::time::Duration;
use url::Url;

// Transport settings for the controller client.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClientOptions {
    // Accept self-signed or otherwise invalid controller certificates.
    pub insecure: bool,
    // `None` waits for the controller indefinitely.
    pub timeout: Option<Duration>,
}

// Thin wrapper around reqwest for controller API calls.
#[derive(Clone)]
pub struct ControllerClient {
    http: Client,
    base_url: Url,
}

impl ControllerClient {
    pub fn new(base_url: &str, options: ClientOptions) -> Result<Self, ProbeError> {
        let base_url = Url::parse(base_url).map_err(|err| {
            ProbeError::Config(format!("invalid controller url {base_url}: {err}"))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ProbeError::Config(format!(
                "controller url {base_url} cannot carry a path"
            )));
        }

        let mut builder = Client::builder().danger_accept_invalid_certs(options.insecure);
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|err| ProbeError::Config(format!("failed to build http client: {err}")))?;

        Ok(Self { http, base_url })
    }

    // Append path segments to the base URL; each segment is percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ProbeError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ProbeError::Config(format!("controller url {} cannot carry a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn cookie_header(token: &SessionToken) -> Result<HeaderValue, ProbeError> {
        HeaderValue::from_str(token.as_str()).map_err(|err| {
            ProbeError::MalformedResponse(format!("session cookie unusable: {err}"))
        })
    }

    async fn read_body(res: Response) -> Result<String, ProbeError> {
        res.text().await.map_err(transport_error)
    }
}

// Session token from the login response: every `Set-Cookie` value verbatim,
// joined in response order.
pub fn session_token_from_headers(
    headers: &HeaderMap,
) -> Result<Option<SessionToken>, ProbeError> {
    let mut values = Vec::new();
    for value in headers.get_all(SET_COOKIE) {
        let value = value.to_str().map_err(|err| {
            ProbeError::MalformedResponse(format!("set-cookie header is not ascii: {err}"))
        })?;
        values.push(value);
    }

    if values.is_empty() {
        return Ok(None);
    }
    Ok(Some(SessionToken::new(values.join("; "))))
}

// Flatten a reqwest error and its causes into one message.
fn transport_error(err: reqwest::Error) -> ProbeError {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    ProbeError::Connection(message)
}

#[async_trait]
impl ControllerApi for ControllerClient {
    #[tracing::instrument(name = "login", skip_all, fields(username = %credentials.username))]
    async fn login(&self, credentials: &Credentials) -> Result<SessionToken, ProbeError> {
        let url = self.endpoint(&["api", "login"])?;
        let res = self
            .http
            .post(url)
            .json(&LoginRequest {
                username: &credentials.username,
                password: &credentials.password,
            })
            .send()
            .await
            .map_err(transport_error)?;
        let status = res.status();
        tracing::info!(status = status.as_u16(), "login response received.");

        // The login body is never inspected; status and cookie decide.
        if status != StatusCode::OK {
            return Err(ProbeError::Authentication {
                status: status.as_u16(),
                reason: "login rejected",
            });
        }

        let token = session_token_from_headers(res.headers())?;
        tracing::debug!(cookie_present = token.is_some(), "set-cookie inspected.");
        token.ok_or(ProbeError::Authentication {
            status: status.as_u16(),
            reason: "no session cookie returned",
        })
    }

    #[tracing::instrument(name = "list_sites", skip_all)]
    async fn list_sites(&self, token: &SessionToken) -> Result<Vec<Site>, ProbeError> {
        let url = self.endpoint(&["api", "self", "sites"])?;
        let res = self
            .http
            .get(url)
            .header(COOKIE, Self::cookie_header(token)?)
            .send()
            .await
            .map_err(transport_error)?;
        let status = res.status();

        if status != StatusCode::OK {
            tracing::warn!(status = status.as_u16(), "sites request rejected.");
            return Err(ProbeError::SitesFetch(status.as_u16()));
        }

        let sites = parse_sites(&Self::read_body(res).await?)?;
        tracing::info!(count = sites.len(), "sites listed.");
        Ok(sites)
    }

    #[tracing::instrument(
        name = "authorize_guest",
        skip_all,
        fields(site = %site, mac = %request.mac)
    )]
    async fn authorize_guest(
        &self,
        token: &SessionToken,
        site: &str,
        request: &GuestAuthorization,
    ) -> Result<(), ProbeError> {
        let url = self.endpoint(&["api", "s", site, "cmd", "stamgr"])?;
        let res = self
            .http
            .post(url)
            .header(COOKIE, Self::cookie_header(token)?)
            .json(&StaMgrCommand::from(request))
            .send()
            .await
            .map_err(transport_error)?;
        let status = res.status();

        if status != StatusCode::OK {
            tracing::warn!(status = status.as_u16(), "guest authorization rejected.");
            return Err(ProbeError::GuestAuth(status.as_u16()));
        }

        parse_envelope::<Value>(&Self::read_body(res).await?)?.into_data()?;
        tracing::info!("guest authorized.");
        Ok(())
    }
}
