use tracing::debug;

use crate::upstream::episode::StreamCandidate;

const STREAM_INF_TAG: &str = "#EXT-X-STREAM-INF:";

/// wixmp serves the variants through a repackaging host, dropping it from the path gives back a
/// url the origin answers directly
const REPACKAGER_FRAGMENT: &str = "repackager.wixmp.com/";

pub struct PlaylistParser;

impl PlaylistParser {
    /// turn a master playlist into one candidate per variant, labelled by the height of its
    /// RESOLUTION attribute. declarations without a resolution or without a following line are
    /// skipped
    pub fn parse_master(text: &str) -> Vec<StreamCandidate> {
        let lines: Vec<&str> = text.lines().collect();
        let mut candidates = Vec::new();

        for (i, line) in lines.iter().enumerate() {
            let Some(attributes) = line.strip_prefix(STREAM_INF_TAG) else {
                continue;
            };

            let Some(height) = Self::resolution_height(attributes) else {
                debug!("stream declaration without a resolution: {}", line);
                continue;
            };

            let Some(media_url) = lines.get(i + 1) else {
                continue;
            };

            candidates.push(StreamCandidate::new(height, Self::base_url(media_url.trim())));
        }

        debug!("parsed {} variants from playlist", candidates.len());
        candidates
    }

    /// `RESOLUTION=1920x1080` -> `1080`
    fn resolution_height(attributes: &str) -> Option<&str> {
        attributes
            .split(',')
            .find_map(|attr| attr.strip_prefix("RESOLUTION="))
            .and_then(|resolution| resolution.split_once('x'))
            .map(|(_, height)| height)
    }

    /// cut the file name off the variant url and strip the repackager host
    fn base_url(media_url: &str) -> String {
        let base = media_url
            .rsplit_once('/')
            .map(|(base, _)| base)
            .unwrap_or(media_url);

        base.replace(REPACKAGER_FRAGMENT, "")
    }
}
