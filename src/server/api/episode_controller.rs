use axum::{
    Extension, Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{
    server::{
        dtos::episode_dto::{
            EpisodesQuery, EpisodesResponse, StreamNotFoundResponse, StreamQuery, StreamResponse,
        },
        error::{AppResult, Error},
        extractors::{ValidatedPath, ValidatedQuery},
        services::app_services::AppServices,
    },
    upstream::episode::{EpisodeRequest, Quality, Resolution},
};

pub struct EpisodeController;

impl EpisodeController {
    pub fn app() -> Router {
        Router::new()
            .route("/{show_id}/episodes", get(Self::list_episodes))
            .route(
                "/{show_id}/episodes/{episode}/stream",
                get(Self::resolve_stream),
            )
    }

    async fn list_episodes(
        Extension(services): Extension<AppServices>,
        ValidatedPath(show_id): ValidatedPath<String>,
        ValidatedQuery(query): ValidatedQuery<EpisodesQuery>,
    ) -> AppResult<Json<EpisodesResponse>> {
        let mode = query.mode.unwrap_or_default();
        debug!("listing {} episodes for {}", mode, show_id);

        let episodes = services.episodes.list_episodes(&show_id, mode).await?;
        if episodes.is_empty() {
            return Err(Error::NotFound(format!("no {} episodes for {}", mode, show_id)));
        }

        Ok(Json(EpisodesResponse {
            show_id,
            mode,
            episodes,
        }))
    }

    async fn resolve_stream(
        Extension(services): Extension<AppServices>,
        ValidatedPath((show_id, episode)): ValidatedPath<(String, u32)>,
        ValidatedQuery(query): ValidatedQuery<StreamQuery>,
    ) -> AppResult<Response> {
        let quality = query
            .quality
            .as_deref()
            .unwrap_or(&services.config.default_quality);

        let request = EpisodeRequest {
            show_id,
            episode,
            mode: query.mode.unwrap_or_default(),
            quality: Quality::parse(quality),
        };

        // a disconnect drops this whole future, the token only parents the resolve deadline
        let cancel = CancellationToken::new();

        let response = match services.episodes.resolve(&request, &cancel).await? {
            Resolution::Resolved { stream, attempts } => (
                StatusCode::OK,
                Json(StreamResponse {
                    url: stream.url,
                    label: stream.label,
                    attempts,
                }),
            )
                .into_response(),
            Resolution::NotFound { reason, attempts } => (
                StatusCode::NOT_FOUND,
                Json(StreamNotFoundResponse { reason, attempts }),
            )
                .into_response(),
        };

        Ok(response)
    }
}
