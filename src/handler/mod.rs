//! Request handler module
//!
//! The handler chain is built once at startup: `with_cors(Router)`. Each layer
//! implements [`Handler`], so composition is static and needs no boxing.

pub mod analysis;
pub mod cors;
pub mod router;
pub mod static_files;

use crate::engine::EngineError;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Request, Response};
use std::future::Future;
use thiserror::Error;

pub use analysis::{AnalysisOutcome, AnalysisSettings};
pub use cors::{with_cors, Cors};
pub use router::Router;
pub use static_files::{AssetError, StaticAssets};

/// Response type produced by every handler
pub type HttpResponse = Response<Full<Bytes>>;

/// Boxed error accepted from request bodies
pub type BodyError = Box<dyn std::error::Error + Send + Sync>;

/// The composed application handler
pub type App = Cors<Router>;

/// Failures the handler chain does not turn into a response itself
///
/// The hosting server answers these with `500 Internal Server Error`.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("analysis engine failed: {0}")]
    Engine(#[from] EngineError),

    #[error("failed to read request body: {0}")]
    Body(BodyError),

    #[error("analysis task did not complete: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Something that turns a request into a response
pub trait Handler<B> {
    fn handle(&self, req: Request<B>)
        -> impl Future<Output = Result<HttpResponse, HandlerError>>;
}

#[cfg(test)]
mod tests {
    //! End-to-end behavior of the composed `with_cors(Router)` chain.

    use super::*;
    use crate::engine::mock::{MockAnalyzer, MockReply};
    use crate::engine::Analyzer;
    use http_body_util::BodyExt;
    use hyper::header::{CONTENT_LENGTH, CONTENT_TYPE, LOCATION};
    use hyper::{Method, StatusCode};
    use std::sync::Arc;

    struct Fixture {
        app: App,
        engine: Arc<MockAnalyzer>,
        _docs: tempfile::TempDir,
    }

    fn fixture(reply: MockReply) -> Fixture {
        let docs = tempfile::tempdir().unwrap();
        std::fs::write(docs.path().join("index.html"), "<html>swagger</html>").unwrap();
        std::fs::write(docs.path().join("my file.js"), "let x;").unwrap();
        std::fs::create_dir(docs.path().join("images")).unwrap();
        std::fs::write(docs.path().join("images/logo.png"), [0x89, b'P', 0x00, 0xff]).unwrap();

        let engine = Arc::new(MockAnalyzer::new(reply));
        let analyzer: Arc<dyn Analyzer> = engine.clone();
        let router = Router::new(
            analyzer,
            StaticAssets::new(docs.path()),
            AnalysisSettings {
                default_language: "en".to_string(),
                max_body_size: 1024,
            },
        );

        Fixture {
            app: with_cors(router),
            engine,
            _docs: docs,
        }
    }

    fn request(method: Method, path: &str, body: &'static str) -> Request<Full<Bytes>> {
        Request::builder()
            .method(method)
            .uri(path)
            .header(CONTENT_LENGTH, body.len())
            .body(Full::new(Bytes::from(body)))
            .unwrap()
    }

    fn header_names(resp: &HttpResponse) -> Vec<String> {
        resp.headers()
            .iter()
            .map(|(name, _)| name.as_str().to_string())
            .collect()
    }

    fn assert_cors_last(resp: &HttpResponse) {
        let names = header_names(resp);
        assert!(names.len() >= 3, "{names:?}");
        assert_eq!(
            names[names.len() - 3..],
            [
                "access-control-allow-origin",
                "access-control-allow-headers",
                "access-control-allow-methods"
            ]
        );
    }

    async fn body(resp: HttpResponse) -> Bytes {
        resp.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn test_preflight_on_any_path() {
        let fx = fixture(MockReply::Result("unused".to_string()));
        for path in ["/", "/v1/parsey-universal-full", "/nowhere", "/v1/swagger/x.js"] {
            let resp = fx.app.handle(request(Method::OPTIONS, path, "")).await.unwrap();
            assert_eq!(resp.status(), StatusCode::OK);
            assert_eq!(resp.headers().len(), 3);
            assert_cors_last(&resp);
        }
        assert!(fx.engine.calls().is_empty());
    }

    #[tokio::test]
    async fn test_redirect_aliases() {
        let fx = fixture(MockReply::Result("unused".to_string()));
        for path in ["/", "/v1", "/v1/swagger"] {
            let resp = fx.app.handle(request(Method::GET, path, "")).await.unwrap();
            assert_eq!(resp.status(), StatusCode::SEE_OTHER);
            assert_eq!(resp.headers()[LOCATION], "/v1/swagger/index.html");
            assert_cors_last(&resp);
            assert!(body(resp).await.is_empty());
        }
    }

    #[tokio::test]
    async fn test_analysis_success() {
        let conllu = "1\tBob\tBob\tPROPN\t_\t_\t2\tnsubj\t_\t_\n";
        let fx = fixture(MockReply::Result(conllu.to_string()));

        let resp = fx
            .app
            .handle(request(Method::POST, "/v1/parsey-universal-full", "Bob runs."))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], "text/plain; charset=utf-8");
        assert_eq!(resp.headers()[CONTENT_LENGTH], conllu.len().to_string().as_str());
        assert_cors_last(&resp);
        assert_eq!(body(resp).await, Bytes::from(conllu));

        assert_eq!(fx.engine.calls(), vec![(b"Bob runs.".to_vec(), "en".to_string())]);
    }

    #[tokio::test]
    async fn test_analysis_validation_error() {
        let message = "Unsupported language: xx";
        let fx = fixture(MockReply::Validation(message.to_string()));

        let mut req = request(Method::POST, "/v1/parsey-universal-full", "Hallo");
        req.headers_mut()
            .insert("content-language", "XX".parse().unwrap());
        let resp = fx.app.handle(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(resp.headers()[CONTENT_LENGTH], message.len().to_string().as_str());
        assert_cors_last(&resp);
        assert_eq!(body(resp).await, Bytes::from(message));
        assert_eq!(fx.engine.calls()[0].1, "xx");
    }

    #[tokio::test]
    async fn test_undeclared_oversized_body_still_analyzed() {
        let fx = fixture(MockReply::Result("done".to_string()));
        let req = Request::builder()
            .method(Method::POST)
            .uri("/v1/parsey-universal-full")
            .body(Full::new(Bytes::from(vec![b'x'; 2000])))
            .unwrap();

        let resp = fx.app.handle(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_cors_last(&resp);
        assert_eq!(body(resp).await, Bytes::from("done"));
        assert_eq!(fx.engine.calls(), vec![(Vec::new(), "en".to_string())]);
    }

    #[tokio::test]
    async fn test_unexpected_engine_failure_propagates() {
        let fx = fixture(MockReply::Crash);
        let err = fx
            .app
            .handle(request(Method::POST, "/v1/parsey-universal-full", "text"))
            .await
            .unwrap_err();
        assert!(matches!(err, HandlerError::Engine(_)));
    }

    #[tokio::test]
    async fn test_static_file() {
        let fx = fixture(MockReply::Result("unused".to_string()));

        let resp = fx
            .app
            .handle(request(Method::GET, "/v1/swagger/images/logo.png", ""))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_LENGTH], "4");
        assert_cors_last(&resp);
        assert_eq!(body(resp).await.as_ref(), [0x89, b'P', 0x00, 0xff]);
    }

    #[tokio::test]
    async fn test_static_file_with_encoded_name() {
        let fx = fixture(MockReply::Result("unused".to_string()));

        let resp = fx
            .app
            .handle(request(Method::GET, "/v1/swagger/my%20file.js", ""))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_LENGTH], "6");
        assert_cors_last(&resp);
        assert_eq!(body(resp).await, Bytes::from("let x;"));
    }

    #[tokio::test]
    async fn test_encoded_analysis_path() {
        let fx = fixture(MockReply::Result("ok".to_string()));
        let resp = fx
            .app
            .handle(request(Method::POST, "/v1/parsey%2Duniversal-full", "Hi"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(fx.engine.calls(), vec![(b"Hi".to_vec(), "en".to_string())]);
    }

    #[tokio::test]
    async fn test_static_traversal_is_not_found() {
        let fx = fixture(MockReply::Result("unused".to_string()));
        for path in [
            "/v1/swagger/../../etc/passwd",
            "/v1/swagger/../../../../../etc/passwd",
            "/v1/swagger/images/../../../etc/passwd",
            "/v1/swagger/%2e%2e/%2e%2e/etc/passwd",
            "/v1/swagger/images%2F..%2F..%2F..%2Fetc/passwd",
        ] {
            let resp = fx.app.handle(request(Method::GET, path, "")).await.unwrap();
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{path}");
        }
    }

    #[tokio::test]
    async fn test_missing_file_and_unknown_route() {
        let fx = fixture(MockReply::Result("unused".to_string()));
        for path in ["/v1/swagger/missing.js", "/v1/swagger/images", "/v2/anything"] {
            let resp = fx.app.handle(request(Method::GET, path, "")).await.unwrap();
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{path}");
            assert!(resp.headers().get(LOCATION).is_none());
            assert_eq!(resp.headers().len(), 3);
            assert_cors_last(&resp);
            assert!(body(resp).await.is_empty());
        }
    }
}
