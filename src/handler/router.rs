//! Request routing dispatch module
//!
//! Innermost handler: resolves the route for the request path and hands the
//! request to the analysis adapter, the redirect builder or the static
//! asset resolver.

use super::analysis::{self, AnalysisSettings};
use super::static_files::{self, StaticAssets};
use super::{BodyError, Handler, HandlerError, HttpResponse};
use crate::config::Config;
use crate::engine::Analyzer;
use crate::http;
use crate::routing::Route;
use hyper::body::{Body, Bytes};
use hyper::Request;
use std::sync::Arc;

/// Path-based dispatcher
pub struct Router {
    engine: Arc<dyn Analyzer>,
    assets: StaticAssets,
    settings: AnalysisSettings,
}

impl Router {
    pub const fn new(
        engine: Arc<dyn Analyzer>,
        assets: StaticAssets,
        settings: AnalysisSettings,
    ) -> Self {
        Self {
            engine,
            assets,
            settings,
        }
    }

    pub fn from_config(config: &Config, engine: Arc<dyn Analyzer>) -> Self {
        Self::new(
            engine,
            StaticAssets::new(&config.docs.root),
            AnalysisSettings {
                default_language: config.engine.default_language.clone(),
                max_body_size: config.http.max_body_size,
            },
        )
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("assets", &self.assets)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl<B> Handler<B> for Router
where
    B: Body<Data = Bytes> + Send,
    B::Error: Into<BodyError>,
{
    async fn handle(&self, req: Request<B>) -> Result<HttpResponse, HandlerError> {
        match Route::resolve(req.uri().path()) {
            Route::Analysis => analysis::handle(req, &self.engine, &self.settings).await,
            Route::Redirect(target) => Ok(http::build_see_other_response(target)),
            Route::StaticFile(sub_path) => Ok(static_files::serve(&self.assets, &sub_path).await),
            Route::NotFound => Ok(http::build_404_response()),
        }
    }
}
