// SPDX-License-Identifier: GPL-2.0-or-later
//
// The request handler: one invocation in, one response out.
use std::collections::{BTreeMap, HashMap};

use http::StatusCode;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error as ThisError;
use tracing::{info, instrument};

use crate::api::{self, CreateSound, ErrorMessage, PlaySound, Plays, DEFAULT_EMOJI};
use crate::db::{Catalog, NewSound};

pub const ALLOWED_METHODS: &str = "GET, POST, PUT, OPTIONS";
pub const ALLOWED_HEADERS: &str = "Content-Type";
/// How long, in seconds, browsers may cache the preflight answer.
pub const PREFLIGHT_MAX_AGE: &str = "86400";

/// An invocation as delivered by the function platform.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Upper-case HTTP method; the platform omits it for plain GETs.
    #[serde(default = "default_method")]
    pub http_method: String,
    /// The raw request body, expected to hold JSON for POST and PUT.
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub query_string_parameters: Option<HashMap<String, String>>,
}

fn default_method() -> String {
    "GET".to_string()
}

impl Event {
    pub fn new(method: impl Into<String>, body: Option<String>) -> Self {
        Self {
            http_method: method.into(),
            body,
            query_string_parameters: None,
        }
    }
}

/// The response handed back to the function platform.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
    /// Always false; every body is UTF-8 text.
    pub is_base64_encoded: bool,
}

impl Response {
    /// The answer to a CORS preflight request.
    pub fn preflight() -> Self {
        let headers = [
            ("Access-Control-Allow-Origin", "*"),
            ("Access-Control-Allow-Methods", ALLOWED_METHODS),
            ("Access-Control-Allow-Headers", ALLOWED_HEADERS),
            ("Access-Control-Max-Age", PREFLIGHT_MAX_AGE),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            status_code: StatusCode::OK.as_u16(),
            headers,
            body: String::new(),
            is_base64_encoded: false,
        }
    }

    /// A JSON response carrying the headers every non-preflight response has.
    pub fn json<T: Serialize>(status: StatusCode, body: &T) -> Result<Self, crate::Error> {
        let headers = [
            ("Content-Type", "application/json"),
            ("Access-Control-Allow-Origin", "*"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Ok(Self {
            status_code: status.as_u16(),
            headers,
            body: serde_json::to_string(body)?,
            is_base64_encoded: false,
        })
    }

    pub fn error(status: StatusCode, message: impl Into<String>) -> Result<Self, crate::Error> {
        Self::json(status, &ErrorMessage::new(message))
    }
}

/// Reasons a request is refused with a 400 before any database work happens.
#[derive(ThisError, Debug)]
pub enum ValidationError {
    #[error("name and audio_url are required")]
    MissingSoundFields,
    #[error("id is required")]
    MissingId,
    #[error("request body is not valid: {0}")]
    MalformedBody(#[from] serde_json::Error),
    #[error("request body must be a JSON object")]
    NotAnObject,
}

/// A request after its method and body have been checked.
#[derive(Debug, PartialEq, Eq)]
pub enum Request {
    Preflight,
    List,
    Create(NewSound),
    Play { id: i32 },
    /// Any method this endpoint doesn't serve.
    Unsupported(String),
}

impl Request {
    pub fn parse(event: &Event) -> Result<Self, ValidationError> {
        match event.http_method.as_str() {
            "OPTIONS" => Ok(Request::Preflight),
            "GET" => Ok(Request::List),
            "POST" => {
                let body: CreateSound = parse_body(event.body.as_deref())?;
                Ok(Request::Create(body.try_into()?))
            }
            "PUT" => {
                let body: PlaySound = parse_body(event.body.as_deref())?;
                match body.id {
                    // Zero never names a row, so it counts as a missing id.
                    Some(id) if id != 0 => Ok(Request::Play { id }),
                    _ => Err(ValidationError::MissingId),
                }
            }
            other => Ok(Request::Unsupported(other.to_string())),
        }
    }
}

/// Absent and blank bodies are read as an empty object. Anything else must be a JSON object;
/// arrays would otherwise fill the fields positionally.
fn parse_body<T: DeserializeOwned + Default>(body: Option<&str>) -> Result<T, ValidationError> {
    let body = match body {
        Some(body) if !body.trim().is_empty() => body,
        _ => return Ok(T::default()),
    };
    match serde_json::from_str::<Value>(body)? {
        value @ Value::Object(_) => Ok(serde_json::from_value(value)?),
        _ => Err(ValidationError::NotAnObject),
    }
}

impl TryFrom<CreateSound> for NewSound {
    type Error = ValidationError;

    fn try_from(body: CreateSound) -> Result<Self, Self::Error> {
        let name = body.name.filter(|name| !name.is_empty());
        let audio_url = body.audio_url.filter(|url| !url.is_empty());
        match (name, audio_url) {
            (Some(name), Some(audio_url)) => Ok(NewSound {
                name,
                emoji: body.emoji.unwrap_or_else(|| DEFAULT_EMOJI.to_string()),
                audio_url,
            }),
            _ => Err(ValidationError::MissingSoundFields),
        }
    }
}

/// Handle a single invocation.
///
/// Client errors (400, 404, 405) come back as `Ok` responses. An `Err` means the backend
/// failed; it is not turned into a response here and is left to the caller to report.
#[instrument(skip_all, fields(method = %event.http_method))]
pub async fn handle<C>(catalog: &C, event: &Event) -> Result<Response, crate::Error>
where
    C: Catalog + ?Sized,
{
    let request = match Request::parse(event) {
        Ok(request) => request,
        Err(err) => {
            info!(%err, "Rejecting invalid request");
            return Response::error(StatusCode::BAD_REQUEST, err.to_string());
        }
    };

    match request {
        Request::Preflight => Ok(Response::preflight()),
        Request::List => {
            let sounds = catalog
                .list()
                .await?
                .into_iter()
                .map(api::Sound::from)
                .collect::<Vec<_>>();
            Response::json(StatusCode::OK, &sounds)
        }
        Request::Create(sound) => {
            let sound: api::Sound = catalog.create(sound).await?.into();
            Response::json(StatusCode::CREATED, &sound)
        }
        Request::Play { id } => match catalog.play(id).await? {
            Some(plays) => Response::json(StatusCode::OK, &Plays { plays }),
            None => {
                info!(id, "No sound to mark as played");
                Response::error(StatusCode::NOT_FOUND, "Sound not found")
            }
        },
        Request::Unsupported(method) => {
            info!(%method, "Method not allowed");
            Response::error(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
        }
    }
}
