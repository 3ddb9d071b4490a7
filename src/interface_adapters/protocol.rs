use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{GuestAuthorization, ProbeError, Site};

// Command name understood by the station manager endpoint.
pub const AUTHORIZE_GUEST_CMD: &str = "authorize-guest";

#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

// Body posted to `/api/s/{site}/cmd/stamgr`.
#[derive(Serialize)]
pub struct StaMgrCommand<'a> {
    pub cmd: &'static str,
    pub mac: &'a str,
    pub minutes: u32,
    pub name: &'a str,
    pub email: &'a str,
}

impl<'a> From<&'a GuestAuthorization> for StaMgrCommand<'a> {
    fn from(request: &'a GuestAuthorization) -> Self {
        Self {
            cmd: AUTHORIZE_GUEST_CMD,
            mac: &request.mac,
            minutes: request.minutes,
            name: &request.name,
            email: &request.email,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Meta {
    pub rc: String,
    pub msg: Option<String>,
}

// Envelope wrapping every controller API response.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    pub meta: Option<Meta>,
    pub data: Option<T>,
}

#[derive(Debug, Deserialize)]
pub struct SiteDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub desc: String,
}

impl From<SiteDto> for Site {
    fn from(dto: SiteDto) -> Self {
        Site {
            id: dto.id,
            name: dto.name,
            description: dto.desc,
        }
    }
}

impl<T> ApiEnvelope<T> {
    // Application-level success check: `meta.rc` must be "ok".
    pub fn into_data(self) -> Result<Option<T>, ProbeError> {
        match self.meta {
            Some(meta) if meta.rc == "ok" => Ok(self.data),
            Some(meta) => Err(ProbeError::ControllerApi(
                meta.msg.unwrap_or_else(|| "Unknown error".to_string()),
            )),
            None => Err(ProbeError::ControllerApi("Unknown error".to_string())),
        }
    }
}

// Parse a response body into the envelope; anything that is not the expected
// JSON shape is a malformed response.
pub fn parse_envelope<T: DeserializeOwned>(body: &str) -> Result<ApiEnvelope<T>, ProbeError> {
    serde_json::from_str(body).map_err(|err| ProbeError::MalformedResponse(err.to_string()))
}

// `meta.rc` is checked before `data` is decoded as sites.
pub fn parse_sites(body: &str) -> Result<Vec<Site>, ProbeError> {
    let Some(data) = parse_envelope::<Value>(body)?.into_data()? else {
        return Ok(Vec::new());
    };
    let sites = serde_json::from_value::<Vec<SiteDto>>(data)
        .map_err(|err| ProbeError::MalformedResponse(err.to_string()))?;
    Ok(sites.into_iter().map(Site::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn when_sites_are_ok_then_records_are_mapped_in_source_order() {
        let body = json!({
            "meta": { "rc": "ok" },
            "data": [
                { "_id": "s2", "name": "branch", "desc": "Branch office", "role": "admin" },
                { "_id": "s1", "name": "default", "desc": "Default site" }
            ]
        })
        .to_string();

        let sites = parse_sites(&body).expect("expected sites to parse");

        assert_eq!(
            sites,
            vec![
                Site {
                    id: "s2".to_string(),
                    name: "branch".to_string(),
                    description: "Branch office".to_string(),
                },
                Site {
                    id: "s1".to_string(),
                    name: "default".to_string(),
                    description: "Default site".to_string(),
                },
            ]
        );
    }

    #[test]
    fn when_rc_is_error_then_controller_message_is_reported() {
        let body = json!({ "meta": { "rc": "error", "msg": "api.err.LoginRequired" }, "data": [] })
            .to_string();

        let err = parse_sites(&body).expect_err("expected controller error");

        assert!(matches!(err, ProbeError::ControllerApi(msg) if msg == "api.err.LoginRequired"));
    }

    #[test]
    fn when_rc_is_error_and_data_is_not_site_shaped_then_controller_message_wins() {
        let body = json!({
            "meta": { "rc": "error", "msg": "api.err.NoSiteContext" },
            "data": [{ "x": 1 }]
        })
        .to_string();

        let err = parse_sites(&body).expect_err("expected controller error");

        assert!(matches!(err, ProbeError::ControllerApi(msg) if msg == "api.err.NoSiteContext"));
    }

    #[test]
    fn when_rc_is_error_without_message_then_generic_message_is_used() {
        let body = json!({ "meta": { "rc": "error" } }).to_string();

        let err = parse_sites(&body).expect_err("expected controller error");

        assert!(matches!(err, ProbeError::ControllerApi(msg) if msg == "Unknown error"));
    }

    #[test]
    fn when_meta_is_missing_then_generic_controller_error_is_returned() {
        let err = parse_sites(r#"{"data": []}"#).expect_err("expected controller error");

        assert!(matches!(err, ProbeError::ControllerApi(_)));
    }

    #[test]
    fn when_body_is_not_json_then_malformed_response_is_returned() {
        let err = parse_sites("<html>502 Bad Gateway</html>").expect_err("expected parse error");

        assert!(matches!(err, ProbeError::MalformedResponse(_)));
    }

    #[test]
    fn when_site_lacks_id_then_malformed_response_is_returned() {
        let body = json!({ "meta": { "rc": "ok" }, "data": [{ "name": "default" }] }).to_string();

        let err = parse_sites(&body).expect_err("expected parse error");

        assert!(matches!(err, ProbeError::MalformedResponse(_)));
    }

    #[test]
    fn when_data_is_absent_or_desc_missing_then_defaults_apply() {
        assert!(
            parse_sites(r#"{"meta":{"rc":"ok"}}"#)
                .expect("expected empty list")
                .is_empty()
        );

        let sites = parse_sites(r#"{"meta":{"rc":"ok"},"data":[{"_id":"s1","name":"default"}]}"#)
            .expect("expected sites to parse");
        assert_eq!(sites[0].description, "");
    }

    #[test]
    fn when_guest_command_is_serialized_then_wire_fields_match_controller_contract() {
        let request = GuestAuthorization::for_mac("aa:bb:cc:dd:ee:ff");

        let value = serde_json::to_value(StaMgrCommand::from(&request)).expect("serialize");

        assert_eq!(
            value,
            json!({
                "cmd": "authorize-guest",
                "mac": "aa:bb:cc:dd:ee:ff",
                "minutes": 60,
                "name": "Test Guest",
                "email": "test@example.com"
            })
        );
    }

    #[test]
    fn when_guest_response_is_ok_then_data_is_ignored() {
        let envelope = parse_envelope::<Value>(r#"{"meta":{"rc":"ok"},"data":[{"x":1}]}"#)
            .expect("expected envelope");

        assert!(envelope.into_data().is_ok());
    }
}
