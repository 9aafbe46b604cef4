use std::sync::Arc;

use tracing::info;

use crate::{
    config::{AppConfig, ResolverConfig, UpstreamConfig},
    server::services::{episode_services::EpisodeService, link_services::LinkService},
    upstream::{AllAnimeClient, DynUpstreamClient},
};

use super::{episode_services::DynEpisodeService, link_services::DynLinkService};

/// everything the handlers need, cloned into each request through an Extension
#[derive(Clone)]
pub struct AppServices {
    pub episodes: DynEpisodeService,
    pub upstream: DynUpstreamClient,
    pub config: Arc<AppConfig>,
}

impl AppServices {
    pub fn new(config: Arc<AppConfig>) -> Self {
        info!("starting services...");

        let client = AllAnimeClient::new(UpstreamConfig::from(config.as_ref()));
        let upstream = Arc::new(client) as DynUpstreamClient;

        Self::with_upstream(config, upstream)
    }

    /// same wiring but with the upstream swapped out, tests use this with a mock client
    pub fn with_upstream(config: Arc<AppConfig>, upstream: DynUpstreamClient) -> Self {
        let resolver_config = ResolverConfig::from(config.as_ref());

        let links = Arc::new(LinkService::new(
            upstream.clone(),
            resolver_config.base_host.clone(),
        )) as DynLinkService;

        let episodes = Arc::new(EpisodeService::new(
            upstream.clone(),
            links,
            resolver_config,
        )) as DynEpisodeService;

        info!("services ok");

        Self {
            episodes,
            upstream,
            config,
        }
    }
}
