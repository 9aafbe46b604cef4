use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::upstream::episode::{ProviderDescriptor, TranslationMode};

// the sourceUrls field isn't reliably well formed json so these work on the flattened text
// instead of a parsed tree. `.` doesn't cross newlines which keeps a url paired with the name from
// the same object once braces have been turned into line breaks
static PROVIDER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"sourceUrl":"--([^"]+)".*?sourceName":"([^"]+)""#)
        .expect("provider pattern should compile")
});

static SUB_EPISODES_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"sub":\[(.*?)\]"#).expect("episode pattern should compile"));

static DUB_EPISODES_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"dub":\[(.*?)\]"#).expect("episode pattern should compile"));

pub struct ProviderExtractor;

impl ProviderExtractor {
    /// pull (name, obfuscated locator) pairs out of a raw episode query response
    ///
    /// rules:
    /// - `{` and `}` become line breaks
    /// - the `\u002F` escape becomes `/` and every remaining backslash is dropped
    /// - each `sourceUrl":"--<locator>"` followed on the same line by `sourceName":"<name>"` is one
    ///   provider, the `--` prefix is not part of the locator
    ///
    /// nothing is filtered or deduplicated here, results come back in the order they show up
    pub fn extract(raw_response: &str) -> Vec<ProviderDescriptor> {
        let flattened = Self::flatten(raw_response);

        let providers: Vec<ProviderDescriptor> = PROVIDER_PATTERN
            .captures_iter(&flattened)
            .map(|caps| ProviderDescriptor {
                name: caps[2].to_string(),
                obfuscated_locator: caps[1].to_string(),
            })
            .collect();

        debug!("extracted {} providers", providers.len());
        providers
    }

    fn flatten(raw: &str) -> String {
        raw.replace(['{', '}'], "\n")
            .replace("\\u002F", "/")
            .replace('\\', "")
    }
}

pub struct EpisodeListScanner;

impl EpisodeListScanner {
    /// scrape the episode numbers for a mode out of an availableEpisodesDetail response, returns
    /// them sorted and deduplicated. anything that isn't a whole number (e.g. "12.5") is skipped
    pub fn scan(raw_response: &str, mode: TranslationMode) -> Vec<u32> {
        let pattern = match mode {
            TranslationMode::Sub => &SUB_EPISODES_PATTERN,
            TranslationMode::Dub => &DUB_EPISODES_PATTERN,
        };

        let Some(caps) = pattern.captures(raw_response) else {
            debug!("no {} episode list in response", mode);
            return Vec::new();
        };

        let mut episodes: Vec<u32> = caps[1]
            .split(',')
            .map(|entry| entry.replace('"', ""))
            .filter_map(|entry| entry.trim().parse::<u32>().ok())
            .collect();

        episodes.sort_unstable();
        episodes.dedup();

        debug!("found {} {} episodes", episodes.len(), mode);
        episodes
    }
}
