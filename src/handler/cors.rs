//! Cross-origin access control
//!
//! `with_cors` wraps a handler: preflight requests are answered directly,
//! every other response gets the access-control headers appended after the
//! ones the inner handler set.

use super::{Handler, HandlerError, HttpResponse};
use crate::http;
use hyper::header::{
    HeaderMap, HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN,
};
use hyper::{Method, Request, StatusCode};

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_HEADERS: &str =
    "Origin, X-Requested-With, Content-Type, Content-Language, Accept, Accept-Language";
pub const ALLOW_METHODS: &str = "GET, POST, OPTIONS";

/// Handler decorated with the access-control policy
#[derive(Debug)]
pub struct Cors<H> {
    inner: H,
}

/// Wrap `inner` with the access-control policy
pub const fn with_cors<H>(inner: H) -> Cors<H> {
    Cors { inner }
}

/// Append the three access-control headers, keeping existing ones
fn append_cors_headers(headers: &mut HeaderMap) {
    headers.append(
        ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(ALLOW_ORIGIN),
    );
    headers.append(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    headers.append(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
}

/// Build the preflight (OPTIONS) response
pub fn build_preflight_response() -> HttpResponse {
    let mut resp = http::build_empty_response(StatusCode::OK);
    append_cors_headers(resp.headers_mut());
    resp
}

impl<B, H> Handler<B> for Cors<H>
where
    H: Handler<B>,
{
    async fn handle(&self, req: Request<B>) -> Result<HttpResponse, HandlerError> {
        if req.method() == Method::OPTIONS {
            return Ok(build_preflight_response());
        }

        let mut resp = self.inner.handle(req).await?;
        append_cors_headers(resp.headers_mut());
        Ok(resp)
    }
}
