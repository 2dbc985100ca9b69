//! Blocking REST client for the registration service.
//!
//! Endpoints:
//! - `POST {base}/auth/register` with a [`RegisterUserDto`]
//! - `GET {base}/auth/users` returning a list of [`User`]s
//!
//! The [`UserDirectory`] trait lets the application run against a fake
//! service in tests.
//!
use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};

pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Registration payload. `fullName` is omitted when not provided.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserDto {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

/// A registered user as listed by the service.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    pub created_at: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Option<BTreeMap<String, Vec<String>>>,
}

/// Operations the application needs from the registration service.
pub trait UserDirectory {
    fn register_user(&self, dto: &RegisterUserDto) -> ApiResult<RegisterResponse>;
    fn list_users(&self) -> ApiResult<Vec<User>>;
}

pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> ApiResult<Self> {
        let http = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl UserDirectory for ApiClient {
    fn register_user(&self, dto: &RegisterUserDto) -> ApiResult<RegisterResponse> {
        tracing::info!(email = %dto.email, "registering user");
        let res = self.http.post(self.url("/auth/register")).json(dto).send()?;
        handle_response(res)
    }

    fn list_users(&self) -> ApiResult<Vec<User>> {
        tracing::info!("listing users");
        let res = self
            .http
            .get(self.url("/auth/users"))
            .header(CACHE_CONTROL, "no-store")
            .send()?;
        handle_response(res)
    }
}

fn handle_response<T: DeserializeOwned + Default>(res: Response) -> ApiResult<T> {
    let status = res.status().as_u16();
    let is_json = res
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("application/json"));
    let body = res.bytes()?;
    parse_response(status, is_json, &body)
}

/// Turn a status line and body into a value or an [`ApiError`].
///
/// Successful non-JSON bodies yield `T::default()`.
pub fn parse_response<T: DeserializeOwned + Default>(
    status: u16,
    is_json: bool,
    body: &[u8],
) -> ApiResult<T> {
    if !(200..300).contains(&status) {
        let (message, field_errors) = if is_json {
            let err: ErrorBody = serde_json::from_slice(body)?;
            (err.message, err.errors.unwrap_or_default())
        } else {
            (Some(format!("HTTP error! status: {status}")), BTreeMap::new())
        };
        tracing::warn!(status, ?message, "request rejected");
        return Err(ApiError::Rejected {
            status,
            message,
            field_errors,
        });
    }
    if is_json {
        Ok(serde_json::from_slice(body)?)
    } else {
        Ok(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dto_omits_missing_full_name() {
        let dto = RegisterUserDto {
            email: "a@b.co".into(),
            password: "secret1".into(),
            full_name: None,
        };
        let json = serde_json::to_string(&dto).unwrap();
        assert_eq!(json, r#"{"email":"a@b.co","password":"secret1"}"#);

        let dto = RegisterUserDto {
            full_name: Some("Ada".into()),
            ..dto
        };
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["fullName"], "Ada");
    }

    #[test]
    fn users_decode_from_camel_case() {
        let body = br#"[
            {"id":"1","email":"a@b.co","fullName":"Ada","createdAt":"2025-01-05T15:04:00Z"},
            {"id":"2","email":"c@d.io","createdAt":"2025-02-01T00:00:00Z"}
        ]"#;
        let users: Vec<User> = parse_response(200, true, body).unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].full_name.as_deref(), Some("Ada"));
        assert_eq!(users[1].full_name, None);
        assert_eq!(users[1].created_at, "2025-02-01T00:00:00Z");
    }

    #[test]
    fn json_rejection_carries_message_and_field_errors() {
        let body = br#"{"message":"Validation failed","errors":{"email":["taken"]}}"#;
        let err = parse_response::<RegisterResponse>(400, true, body).unwrap_err();
        match err {
            ApiError::Rejected {
                status,
                message,
                field_errors,
            } => {
                assert_eq!(status, 400);
                assert_eq!(message.as_deref(), Some("Validation failed"));
                assert_eq!(field_errors["email"], vec!["taken".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn plain_rejection_reports_status() {
        let err = parse_response::<Vec<User>>(502, false, b"Bad Gateway").unwrap_err();
        assert_eq!(err.to_string(), "HTTP error! status: 502");
    }

    #[test]
    fn non_json_success_is_default() {
        let res: RegisterResponse = parse_response(201, false, b"").unwrap();
        assert_eq!(res, RegisterResponse::default());
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client = ApiClient::new("http://localhost:3000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000");
        assert_eq!(client.url("/auth/users"), "http://localhost:3000/auth/users");
    }
}
