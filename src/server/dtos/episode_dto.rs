use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::upstream::episode::{AttemptFailure, TranslationMode};

#[derive(Debug, Deserialize, Validate)]
pub struct EpisodesQuery {
    pub mode: Option<TranslationMode>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct StreamQuery {
    pub mode: Option<TranslationMode>,

    // best, worst or a label prefix like 1080 / Mp4
    #[validate(length(min = 1, max = 16))]
    pub quality: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EpisodesResponse {
    pub show_id: String,
    pub mode: TranslationMode,
    pub episodes: Vec<u32>,
}

#[derive(Debug, Serialize)]
pub struct StreamResponse {
    pub url: String,
    pub label: String,
    pub attempts: u32,
}

#[derive(Debug, Serialize)]
pub struct StreamNotFoundResponse {
    #[serde(flatten)]
    pub reason: AttemptFailure,
    pub attempts: u32,
}
