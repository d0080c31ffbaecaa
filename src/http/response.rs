//! HTTP response building module
//!
//! Provides builders for the status code responses the service emits.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{CONTENT_LENGTH, CONTENT_TYPE, LOCATION};
use hyper::{Response, StatusCode};

/// Content type of analysis results and validation messages
pub const TEXT_PLAIN_UTF8: &str = "text/plain; charset=utf-8";

/// Build a response with no headers and an empty body
pub fn build_empty_response(status: StatusCode) -> Response<Full<Bytes>> {
    let mut resp = Response::new(Full::new(Bytes::new()));
    *resp.status_mut() = status;
    resp
}

/// Build 404 Not Found response (empty body)
pub fn build_404_response() -> Response<Full<Bytes>> {
    build_empty_response(StatusCode::NOT_FOUND)
}

/// Build 500 Internal Server Error response (empty body)
pub fn build_500_response() -> Response<Full<Bytes>> {
    build_empty_response(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Build 303 See Other response
pub fn build_see_other_response(target: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::SEE_OTHER)
        .header(LOCATION, target)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("303", &e);
            build_500_response()
        })
}

/// Build a `text/plain; charset=utf-8` response with exact Content-Length
pub fn build_text_response(status: StatusCode, text: String) -> Response<Full<Bytes>> {
    let content_length = text.len();

    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, TEXT_PLAIN_UTF8)
        .header(CONTENT_LENGTH, content_length)
        .body(Full::new(Bytes::from(text)))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            build_500_response()
        })
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> Response<Full<Bytes>> {
    build_text_response(
        StatusCode::PAYLOAD_TOO_LARGE,
        "413 Payload Too Large".to_string(),
    )
}

/// Build 200 response carrying a static file verbatim
pub fn build_file_response(data: Vec<u8>, content_type: &str) -> Response<Full<Bytes>> {
    let content_length = data.len();

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, content_length)
        .body(Full::new(Bytes::from(data)))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            build_500_response()
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_bytes(resp: Response<Full<Bytes>>) -> Bytes {
        resp.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn test_404_has_no_headers() {
        let resp = build_404_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(resp.headers().is_empty());
        assert!(body_bytes(resp).await.is_empty());
    }

    #[tokio::test]
    async fn test_see_other() {
        let resp = build_see_other_response("/v1/swagger/index.html");
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers()[LOCATION], "/v1/swagger/index.html");
        assert_eq!(resp.headers().len(), 1);
        assert!(body_bytes(resp).await.is_empty());
    }

    #[tokio::test]
    async fn test_text_length_counts_bytes() {
        // 'é' is two bytes in UTF-8
        let resp = build_text_response(StatusCode::OK, "café".to_string());
        assert_eq!(resp.headers()[CONTENT_TYPE], TEXT_PLAIN_UTF8);
        assert_eq!(resp.headers()[CONTENT_LENGTH], "5");
        assert_eq!(body_bytes(resp).await, Bytes::from("café"));
    }

    #[tokio::test]
    async fn test_file_response_is_binary_safe() {
        let data = vec![0x89, b'P', b'N', b'G', 0x00, 0xff];
        let resp = build_file_response(data.clone(), "image/png");
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_LENGTH], "6");
        assert_eq!(body_bytes(resp).await.as_ref(), data.as_slice());
    }
}
