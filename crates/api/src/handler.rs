//! Request handler
//!
//! Adapts gateway-style events (optional body text, possibly base64) to the
//! engine and renders results as status + JSON body pairs. Internal failures
//! never leak details to the client; they are logged with the request id and
//! answered with a generic message.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use quickstats_core::Error;
use quickstats_engine::StatsEngine;
use tracing::{error, info};
use uuid::Uuid;

use crate::wire::{ErrorReply, UpdateBody, UpdateReply};

/// Incoming gateway event
#[derive(Debug, Clone, Default)]
pub struct Event {
    /// Raw request body, when one was sent
    pub body: Option<String>,
    /// Whether `body` is base64-encoded
    pub is_base64_encoded: bool,
}

impl Event {
    /// Event carrying a plain-text body
    pub fn with_body(body: impl Into<String>) -> Self {
        Event {
            body: Some(body.into()),
            is_base64_encoded: false,
        }
    }

    /// Event carrying a base64-encoded body
    pub fn with_base64_body(body: impl Into<String>) -> Self {
        Event {
            body: Some(body.into()),
            is_base64_encoded: true,
        }
    }
}

/// Outgoing response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// HTTP status code
    pub status: u16,
    /// JSON body text
    pub body: String,
}

impl Response {
    fn ok(reply: &UpdateReply) -> Self {
        Response {
            status: 200,
            body: serde_json::to_string(reply).unwrap_or_else(|_| {
                // Reply types always serialize; this guards a future field.
                "{\"ok\":true}".to_string()
            }),
        }
    }

    fn fail(status: u16, message: &str) -> Self {
        Response {
            status,
            body: serde_json::to_string(&ErrorReply::new(message))
                .unwrap_or_else(|_| "{\"ok\":false,\"error\":\"Internal error\"}".to_string()),
        }
    }
}

/// Stateless handler over an engine
pub struct Handler {
    engine: StatsEngine,
}

impl Handler {
    /// Build a handler
    pub fn new(engine: StatsEngine) -> Self {
        Handler { engine }
    }

    /// Handle one event; never returns an error, failures become responses
    ///
    /// `request_id` is taken from the invocation context when available,
    /// otherwise a fresh one is generated so every log line stays
    /// correlatable.
    pub fn handle(&self, event: &Event, request_id: Option<&str>) -> Response {
        let request_id = request_id
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let request = match decode_body(event).and_then(UpdateBody::into_request) {
            Ok(request) => request,
            Err(err) => return self.render_error(&request_id, "<unknown>", &err),
        };
        let app_name = request.app_name.clone();

        match self.engine.apply(&request) {
            Ok(outcome) => {
                info!(
                    target: "quickstats::api",
                    request_id = %request_id,
                    app = %app_name,
                    dry_run = outcome.dry_run,
                    "update ok"
                );
                Response::ok(&UpdateReply::from(outcome))
            }
            Err(err) => self.render_error(&request_id, &app_name, &err),
        }
    }

    fn render_error(&self, request_id: &str, app_name: &str, err: &Error) -> Response {
        let status = match err {
            Error::Malformed(_) | Error::Validation(_) => 400,
            Error::NotFound(_) => 404,
            Error::Conflict { .. } => 409,
            Error::Storage(_) | Error::Corruption(_) => 500,
        };
        if status == 500 {
            error!(
                target: "quickstats::api",
                request_id = %request_id,
                app = %app_name,
                error = %err,
                "update failed"
            );
            return Response::fail(500, "Internal error");
        }
        info!(
            target: "quickstats::api",
            request_id = %request_id,
            app = %app_name,
            status,
            error = %err,
            "update rejected"
        );
        Response::fail(status, &err.to_string())
    }
}

/// Decode the event body into an [`UpdateBody`]
fn decode_body(event: &Event) -> quickstats_core::Result<UpdateBody> {
    let Some(raw) = event.body.as_deref() else {
        return Err(Error::malformed("Missing body"));
    };

    let text = if event.is_base64_encoded {
        let bytes = BASE64
            .decode(raw.trim())
            .map_err(|_| Error::malformed("Body is not valid base64"))?;
        String::from_utf8(bytes).map_err(|_| Error::malformed("Body is not valid base64"))?
    } else {
        raw.to_string()
    };

    serde_json::from_str(&text).map_err(|_| Error::malformed("Body is not valid JSON"))
}
