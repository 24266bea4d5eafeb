//! HTTP client for the room-creation API

use huddle_core::{display_name, RoomCode};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateRoomRequest<'a> {
    host_name: &'a str,
}

/// Either `{ roomCode }` or `{ error }`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateRoomResponse {
    #[serde(default)]
    room_code: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl CreateRoomResponse {
    fn into_code(self) -> Result<RoomCode> {
        if let Some(error) = self.error {
            return Err(Error::Rejected(error));
        }
        let code = self
            .room_code
            .ok_or_else(|| Error::Protocol("Response has neither roomCode nor error".into()))?;
        Ok(RoomCode::parse(&code)?)
    }
}

pub struct RoomsApi {
    client: reqwest::Client,
    base_url: String,
}

impl RoomsApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Create a room hosted by `host_name` and return its code
    pub async fn create_room(&self, host_name: &str) -> Result<RoomCode> {
        let host_name = display_name(host_name)?;
        let url = format!("{}/api/rooms/create", self.base_url);
        let resp = self
            .client
            .post(&url)
            .json(&CreateRoomRequest {
                host_name: &host_name,
            })
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        // Error bodies may still carry `{ error }`; prefer that message
        let parsed = serde_json::from_str::<CreateRoomResponse>(&body);
        if !status.is_success() {
            let message = parsed
                .ok()
                .and_then(|r| r.error)
                .unwrap_or(body);
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed = parsed.map_err(|e| Error::Protocol(format!("Invalid JSON: {}", e)))?;
        let code = parsed.into_code()?;
        info!(room = %code, "Room created");
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(json: &str) -> CreateRoomResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_response_with_code() {
        let code = response(r#"{"roomCode":"ab12"}"#).into_code().unwrap();
        assert_eq!(code.as_str(), "AB12");
    }

    #[test]
    fn test_response_with_error() {
        let err = response(r#"{"error":"Server busy"}"#).into_code().unwrap_err();
        assert!(matches!(err, Error::Rejected(msg) if msg == "Server busy"));
    }

    #[test]
    fn test_empty_response_is_protocol_error() {
        assert!(matches!(response("{}").into_code(), Err(Error::Protocol(_))));
    }

    #[test]
    fn test_request_shape() {
        let body = serde_json::to_value(CreateRoomRequest { host_name: "Ann" }).unwrap();
        assert_eq!(body, serde_json::json!({ "hostName": "Ann" }));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let api = RoomsApi::new("http://localhost:3000/");
        assert_eq!(api.base_url, "http://localhost:3000");
    }

    #[tokio::test]
    async fn test_blank_host_name_rejected_before_request() {
        let api = RoomsApi::new("http://127.0.0.1:9");
        let err = api.create_room("  ").await.unwrap_err();
        assert!(matches!(err, Error::Core(_)));
    }
}
