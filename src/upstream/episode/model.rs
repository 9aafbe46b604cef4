use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// everything in here lives for one request and is dropped afterwards, nothing gets stored
///
/// the clock types mirror the json that the provider locators return once they've been decoded,
/// the rest is what moves between the extractor, the link fetcher and the quality selector

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationMode {
    #[default]
    Sub,
    Dub,
}

impl TranslationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TranslationMode::Sub => "sub",
            TranslationMode::Dub => "dub",
        }
    }
}

impl fmt::Display for TranslationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TranslationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sub" => Ok(TranslationMode::Sub),
            "dub" => Ok(TranslationMode::Dub),
            other => Err(format!("unknown translation mode '{}'", other)),
        }
    }
}

/// quality policy, anything that isn't best or worst is treated as a label prefix like "1080" or
/// "Mp4"
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Quality {
    #[default]
    Best,
    Worst,
    Prefix(String),
}

impl Quality {
    pub fn parse(value: &str) -> Self {
        match value {
            "best" => Quality::Best,
            "worst" => Quality::Worst,
            prefix => Quality::Prefix(prefix.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderDescriptor {
    pub name: String,
    pub obfuscated_locator: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamCandidate {
    pub label: String,
    pub url: String,
}

impl StreamCandidate {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EpisodeRequest {
    pub show_id: String,
    pub episode: u32,
    pub mode: TranslationMode,
    pub quality: Quality,
}

/// why a single attempt came back empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum AttemptFailure {
    /// the episode query itself failed (network, status or unreadable body)
    MetadataUnavailable(String),
    NoProviders,
    NoCandidates,
    /// deadline hit or the caller went away while we were waiting to retry
    Cancelled,
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptFailure::MetadataUnavailable(e) => {
                write!(f, "episode metadata unavailable: {}", e)
            }
            AttemptFailure::NoProviders => f.write_str("no providers found for this episode"),
            AttemptFailure::NoCandidates => f.write_str("no provider returned a playable link"),
            AttemptFailure::Cancelled => f.write_str("resolution was cancelled"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved {
        stream: StreamCandidate,
        attempts: u32,
    },
    NotFound {
        reason: AttemptFailure,
        attempts: u32,
    },
}

// shapes returned by a decoded clock.json locator, only the first link is ever looked at

/// entries stay untyped, the mirrors after the first one are often missing fields and must not
/// take the whole response down with them
#[derive(Debug, Clone, Deserialize)]
pub struct ClockResponse {
    pub links: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClockLink {
    pub link: String,
    #[serde(rename = "resolutionStr")]
    pub resolution_str: String,
}
