use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use tracing::{debug, warn};

use crate::{
    server::utils::{locator_utils::LocatorDecoder, playlist_utils::PlaylistParser},
    upstream::{
        DynUpstreamClient,
        episode::{ClockLink, ClockResponse, StreamCandidate},
    },
};

pub type DynLinkService = Arc<dyn LinkServiceTrait + Send + Sync>;

/// format tag for a single playable file, it's also used as the candidate label
pub const DIRECT_FORMAT: &str = "Mp4";
/// format tag for a master playlist that needs a second fetch
pub const ADAPTIVE_FORMAT: &str = "Hls";

#[automock]
#[async_trait]
pub trait LinkServiceTrait {
    /// turn one decoded provider locator into stream candidates
    ///
    /// never errors, a provider that is down or answers with something unexpected just gives back
    /// an empty list
    async fn fetch_links(&self, provider_name: &str, decoded_locator: &str) -> Vec<StreamCandidate>;
}

pub struct LinkService {
    upstream: DynUpstreamClient,
    base_host: String,
}

impl LinkService {
    pub fn new(upstream: DynUpstreamClient, base_host: String) -> Self {
        Self {
            upstream,
            base_host,
        }
    }

    async fn expand_playlist(
        &self,
        provider_name: &str,
        playlist_url: &str,
    ) -> Vec<StreamCandidate> {
        match self.upstream.fetch_playlist(playlist_url).await {
            Ok(text) => PlaylistParser::parse_master(&text),
            Err(e) => {
                warn!("{}: failed to fetch playlist {}: {}", provider_name, playlist_url, e);
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl LinkServiceTrait for LinkService {
    async fn fetch_links(
        &self,
        provider_name: &str,
        decoded_locator: &str,
    ) -> Vec<StreamCandidate> {
        let url = LocatorDecoder::to_url(decoded_locator, &self.base_host);
        debug!("fetching provider {} at {}", provider_name, url);

        let body = match self.upstream.fetch_provider(&url).await {
            Ok(body) => body,
            Err(e) => {
                warn!("{}: provider request failed: {}", provider_name, e);
                return Vec::new();
            }
        };

        let clock: ClockResponse = match serde_json::from_str(&body) {
            Ok(clock) => clock,
            Err(e) => {
                debug!("{}: response is not a link descriptor: {}", provider_name, e);
                return Vec::new();
            }
        };

        // only the first link is ever used, the rest are usually mirrors of it
        let Some(first) = clock.links.into_iter().next() else {
            debug!("{}: descriptor has no links", provider_name);
            return Vec::new();
        };

        let first: ClockLink = match serde_json::from_value(first) {
            Ok(link) => link,
            Err(e) => {
                debug!("{}: first link is malformed: {}", provider_name, e);
                return Vec::new();
            }
        };

        let candidates = match first.resolution_str.as_str() {
            DIRECT_FORMAT => vec![StreamCandidate::new(DIRECT_FORMAT, first.link)],
            ADAPTIVE_FORMAT => self.expand_playlist(provider_name, &first.link).await,
            other => {
                debug!("{}: unsupported format tag {}", provider_name, other);
                Vec::new()
            }
        };

        debug!("{}: {} candidates", provider_name, candidates.len());
        candidates
    }
}
