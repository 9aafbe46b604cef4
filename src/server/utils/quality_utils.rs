use tracing::debug;

use crate::upstream::episode::{Quality, StreamCandidate};

pub struct QualitySelector;

impl QualitySelector {
    /// order the aggregated candidates by label, descending, comparing labels as plain strings
    ///
    /// this is intentionally not numeric: "720" > "480" > "1080". the sort is stable so equal
    /// labels keep the order the providers were processed in
    pub fn sort(candidates: &mut [StreamCandidate]) {
        candidates.sort_by(|a, b| b.label.cmp(&a.label));
    }

    /// pick one candidate out of an already sorted list
    pub fn select<'a>(
        candidates: &'a [StreamCandidate],
        quality: &Quality,
    ) -> Option<&'a StreamCandidate> {
        let first = candidates.first()?;

        let selected = match quality {
            Quality::Best => first,
            Quality::Worst => candidates
                .iter()
                .rev()
                .find(|c| c.label.starts_with(|ch: char| ch.is_ascii_digit()))
                .unwrap_or(first),
            Quality::Prefix(prefix) => candidates
                .iter()
                .find(|c| c.label.starts_with(prefix.as_str()))
                .unwrap_or(first),
        };

        debug!("selected {} > {}", selected.label, selected.url);
        Some(selected)
    }
}
