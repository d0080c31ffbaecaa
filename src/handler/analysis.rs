//! Analysis endpoint adapter
//!
//! Reads the request text and language tag, calls the engine on the blocking
//! pool and maps its answer to `200`/`400`. Any other engine failure is
//! returned as an error for the hosting server to deal with.

use super::{BodyError, HandlerError, HttpResponse};
use crate::engine::{Analyzer, EngineError};
use crate::http;
use crate::logger;
use http_body_util::BodyExt;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderMap, CONTENT_LANGUAGE, CONTENT_LENGTH};
use hyper::{Request, StatusCode};
use std::sync::Arc;

/// Per-server analysis settings
#[derive(Debug, Clone)]
pub struct AnalysisSettings {
    /// Language tag used when the request has no `Content-Language`
    pub default_language: String,
    pub max_body_size: u64,
}

/// Engine answer as seen by the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutcome {
    Success(String),
    Failure(String),
}

impl AnalysisOutcome {
    /// Split an engine result into client-facing outcomes and unexpected failures
    pub fn from_engine(result: Result<String, EngineError>) -> Result<Self, EngineError> {
        match result {
            Ok(text) => Ok(Self::Success(text)),
            Err(EngineError::Validation(message)) => Ok(Self::Failure(message)),
            Err(e) => Err(e),
        }
    }

    pub fn into_response(self) -> HttpResponse {
        match self {
            Self::Success(text) => http::build_text_response(StatusCode::OK, text),
            Self::Failure(message) => http::build_text_response(StatusCode::BAD_REQUEST, message),
        }
    }
}

/// Language tag from `Content-Language`, lower-cased
pub fn language_tag(headers: &HeaderMap, default: &str) -> String {
    headers
        .get(CONTENT_LANGUAGE)
        .map_or_else(
            || default.to_string(),
            |v| String::from_utf8_lossy(v.as_bytes()).into_owned(),
        )
        .to_lowercase()
}

/// Declared body length; a missing header means an empty body
pub fn declared_length(headers: &HeaderMap) -> Result<u64, String> {
    let Some(value) = headers.get(CONTENT_LENGTH) else {
        return Ok(0);
    };
    value
        .to_str()
        .ok()
        .and_then(|s| s.trim().parse::<u64>().ok())
        .ok_or_else(|| "Invalid Content-Length header".to_string())
}

/// Read the whole body stream, keeping only the first `length` bytes
///
/// Anything past `length` is discarded frame by frame; a stream longer
/// than declared is not an error.
async fn read_body<B>(body: B, length: u64) -> Result<Bytes, HandlerError>
where
    B: Body<Data = Bytes> + Send,
    B::Error: Into<BodyError>,
{
    let wanted = usize::try_from(length).unwrap_or(usize::MAX);
    let mut kept = Vec::with_capacity(wanted);
    let mut body = std::pin::pin!(body);

    while let Some(frame) = body.frame().await {
        let frame = frame.map_err(|e| HandlerError::Body(e.into()))?;
        if let Ok(data) = frame.into_data() {
            let room = wanted - kept.len();
            kept.extend_from_slice(&data[..data.len().min(room)]);
        }
    }
    Ok(Bytes::from(kept))
}

/// Handle a request to the analysis endpoint
pub async fn handle<B>(
    req: Request<B>,
    engine: &Arc<dyn Analyzer>,
    settings: &AnalysisSettings,
) -> Result<HttpResponse, HandlerError>
where
    B: Body<Data = Bytes> + Send,
    B::Error: Into<BodyError>,
{
    let language = language_tag(req.headers(), &settings.default_language);

    let length = match declared_length(req.headers()) {
        Ok(n) => n,
        Err(message) => {
            logger::log_warning(&message);
            return Ok(http::build_text_response(StatusCode::BAD_REQUEST, message));
        }
    };
    if length > settings.max_body_size {
        logger::log_warning(&format!(
            "Request body too large: {length} bytes (max: {})",
            settings.max_body_size
        ));
        return Ok(http::build_413_response());
    }

    let text = read_body(req.into_body(), length).await?;

    let engine = Arc::clone(engine);
    let result = tokio::task::spawn_blocking(move || engine.analyze(&text, &language)).await?;

    Ok(AnalysisOutcome::from_engine(result)?.into_response())
}
