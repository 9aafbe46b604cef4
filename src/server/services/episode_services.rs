// episode index and the resolve loop, the actual link work lives in link_services
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use mockall::automock;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    config::ResolverConfig,
    server::{
        error::{AppResult, Error},
        services::link_services::DynLinkService,
        utils::{
            locator_utils::LocatorDecoder,
            provider_utils::{EpisodeListScanner, ProviderExtractor},
            quality_utils::QualitySelector,
            retry_utils::{RetryPolicy, retry_attempts},
        },
    },
    upstream::{
        DynUpstreamClient,
        episode::{
            AttemptFailure, EpisodeRequest, ProviderDescriptor, Resolution, StreamCandidate,
            TranslationMode,
        },
    },
};

pub type DynEpisodeService = Arc<dyn EpisodeServiceTrait + Send + Sync>;

/// this provider never hands back anything playable so it's skipped outright
pub const EXCLUDED_PROVIDER: &str = "Yt-mp4";

const EPISODES_QUERY: &str =
    "query ($showId: String!) { show( _id: $showId ) { _id availableEpisodesDetail }}";

const EPISODE_SOURCES_QUERY: &str = "query ($showId: String!, $translationType: VaildTranslationTypeEnumType!, $episodeString: String!) { episode(showId: $showId translationType: $translationType episodeString: $episodeString) { episodeString sourceUrls }}";

#[automock]
#[async_trait]
pub trait EpisodeServiceTrait {
    /// sorted episode numbers available for a show in the given mode
    async fn list_episodes(&self, show_id: &str, mode: TranslationMode) -> AppResult<Vec<u32>>;

    /// one pass over every provider of an episode, returns the sorted candidate set
    async fn collect_candidates(
        &self,
        request: &EpisodeRequest,
    ) -> Result<Vec<StreamCandidate>, AttemptFailure>;

    /// resolve a single playable url, retrying whole attempts until one works or the budget runs
    /// out. only bad input is an error, running out of attempts is a `Resolution::NotFound`
    async fn resolve(
        &self,
        request: &EpisodeRequest,
        cancel: &CancellationToken,
    ) -> AppResult<Resolution>;
}

pub struct EpisodeService {
    upstream: DynUpstreamClient,
    links: DynLinkService,
    config: ResolverConfig,
}

impl EpisodeService {
    pub fn new(upstream: DynUpstreamClient, links: DynLinkService, config: ResolverConfig) -> Self {
        Self {
            upstream,
            links,
            config,
        }
    }

    fn validate_show_id(show_id: &str) -> AppResult<()> {
        if show_id.trim().is_empty() {
            return Err(Error::BadRequest("show id must not be empty".to_string()));
        }
        Ok(())
    }

    fn validate(request: &EpisodeRequest) -> AppResult<()> {
        Self::validate_show_id(&request.show_id)?;
        if request.episode == 0 {
            return Err(Error::BadRequest("episode must be at least 1".to_string()));
        }
        Ok(())
    }

    async fn fetch_provider(&self, provider: &ProviderDescriptor) -> Vec<StreamCandidate> {
        let decoded = LocatorDecoder::decode(&provider.obfuscated_locator);
        debug!("decoded {} locator: {}", provider.name, decoded);
        self.links.fetch_links(&provider.name, &decoded).await
    }

    async fn run_attempt(
        &self,
        request: &EpisodeRequest,
    ) -> Result<StreamCandidate, AttemptFailure> {
        let candidates = self.collect_candidates(request).await?;

        QualitySelector::select(&candidates, &request.quality)
            .cloned()
            .ok_or(AttemptFailure::NoCandidates)
    }
}

#[async_trait]
impl EpisodeServiceTrait for EpisodeService {
    async fn list_episodes(&self, show_id: &str, mode: TranslationMode) -> AppResult<Vec<u32>> {
        Self::validate_show_id(show_id)?;

        let variables = json!({ "showId": show_id }).to_string();
        let raw = self.upstream.graphql(&variables, EPISODES_QUERY).await?;

        Ok(EpisodeListScanner::scan(&raw, mode))
    }

    async fn collect_candidates(
        &self,
        request: &EpisodeRequest,
    ) -> Result<Vec<StreamCandidate>, AttemptFailure> {
        let variables = json!({
            "showId": request.show_id,
            "translationType": request.mode.as_str(),
            "episodeString": request.episode.to_string(),
        })
        .to_string();

        let raw = self
            .upstream
            .graphql(&variables, EPISODE_SOURCES_QUERY)
            .await
            .map_err(|e| AttemptFailure::MetadataUnavailable(e.to_string()))?;

        let providers = ProviderExtractor::extract(&raw);
        if providers.is_empty() {
            return Err(AttemptFailure::NoProviders);
        }

        let usable: Vec<&ProviderDescriptor> = providers
            .iter()
            .filter(|p| p.name != EXCLUDED_PROVIDER)
            .collect();

        // join_all hands results back in input order, so both branches concatenate in provider
        // order before the sort
        let per_provider: Vec<Vec<StreamCandidate>> = if self.config.sequential_providers {
            let mut results = Vec::with_capacity(usable.len());
            for provider in &usable {
                results.push(self.fetch_provider(provider).await);
            }
            results
        } else {
            join_all(usable.iter().map(|p| self.fetch_provider(p))).await
        };

        let mut candidates: Vec<StreamCandidate> = per_provider.into_iter().flatten().collect();
        QualitySelector::sort(&mut candidates);

        debug!(
            "collected {} candidates from {} providers",
            candidates.len(),
            usable.len()
        );
        Ok(candidates)
    }

    async fn resolve(
        &self,
        request: &EpisodeRequest,
        cancel: &CancellationToken,
    ) -> AppResult<Resolution> {
        Self::validate(request)?;

        info!(
            "resolving episode {} of {} ({})",
            request.episode, request.show_id, request.mode
        );

        // the deadline is a child so an outer cancel still reaches the loop. the timer is polled
        // from this future and goes away with it when the request is dropped
        let deadline = cancel.child_token();
        let policy = RetryPolicy::new(self.config.max_attempts, self.config.retry_delay);
        let attempts = retry_attempts(policy, &deadline, |_| self.run_attempt(request));
        tokio::pin!(attempts);

        let resolution = tokio::select! {
            resolution = &mut attempts => resolution,
            _ = tokio::time::sleep(self.config.resolve_timeout) => {
                debug!("resolve deadline of {:?} reached", self.config.resolve_timeout);
                deadline.cancel();
                attempts.await
            }
        };

        match &resolution {
            Resolution::Resolved { stream, attempts } => info!(
                "resolved episode {} of {} to {} after {} attempts",
                request.episode, request.show_id, stream.label, attempts
            ),
            Resolution::NotFound { reason, attempts } => warn!(
                "episode {} of {} not found after {} attempts: {}",
                request.episode, request.show_id, attempts, reason
            ),
        }

        Ok(resolution)
    }
}
