use resolver::server::utils::provider_utils::{EpisodeListScanner, ProviderExtractor};
use resolver::upstream::episode::TranslationMode;

const TWO_PROVIDERS: &str = r#"{"data":{"episode":{"episodeString":"1","sourceUrls":[{"sourceUrl":"--175948514e4c4f57","priority":7.9,"sourceName":"Default","type":"iframe","className":"","streamerId":"allanime"},{"sourceUrl":"--504c4c484b0217","priority":8,"sourceName":"Yt-mp4","type":"player","className":"","streamerId":"allanime"}]}}}"#;

#[test]
fn extract_providers_in_appearance_order() {
    let providers = ProviderExtractor::extract(TWO_PROVIDERS);

    assert_eq!(providers.len(), 2);
    assert_eq!(providers[0].name, "Default");
    assert_eq!(providers[0].obfuscated_locator, "175948514e4c4f57");
    // extraction doesn't filter anything out
    assert_eq!(providers[1].name, "Yt-mp4");
    assert_eq!(providers[1].obfuscated_locator, "504c4c484b0217");
}

#[test]
fn undo_escaping_before_matching() {
    let raw = r#"{"sourceUrls":[{\"sourceUrl\":\"--17\u002F5948\",\"sourceName\":\"Sak\"}]}"#;
    let providers = ProviderExtractor::extract(raw);

    assert_eq!(providers.len(), 1);
    assert_eq!(providers[0].name, "Sak");
    assert_eq!(providers[0].obfuscated_locator, "17/5948");
}

#[test]
fn keep_duplicates() {
    let raw = r#"[{"sourceUrl":"--79","sourceName":"Default"},{"sourceUrl":"--79","sourceName":"Default"}]"#;
    assert_eq!(ProviderExtractor::extract(raw).len(), 2);
}

#[test]
fn return_nothing_when_there_are_no_providers() {
    assert!(ProviderExtractor::extract(r#"{"data":{"episode":null}}"#).is_empty());
    assert!(ProviderExtractor::extract("").is_empty());
    // a url without the -- prefix isn't obfuscated and isn't picked up
    assert!(
        ProviderExtractor::extract(r#"{"sourceUrl":"https://x","sourceName":"Ok"}"#).is_empty()
    );
}

const EPISODE_DETAIL: &str = r#"{"data":{"show":{"_id":"ReooPAxPMsHM4KPMY","availableEpisodesDetail":{"sub":["12","11","10","2","1"],"dub":["2","1","1"],"raw":[]}}}}"#;

#[test]
fn scan_episodes_sorted_per_mode() {
    assert_eq!(
        EpisodeListScanner::scan(EPISODE_DETAIL, TranslationMode::Sub),
        vec![1, 2, 10, 11, 12]
    );
    assert_eq!(
        EpisodeListScanner::scan(EPISODE_DETAIL, TranslationMode::Dub),
        vec![1, 2]
    );
}

#[test]
fn skip_episodes_that_are_not_whole_numbers() {
    let raw = r#"{"availableEpisodesDetail":{"sub":["3","2.5","2","1"]}}"#;
    assert_eq!(
        EpisodeListScanner::scan(raw, TranslationMode::Sub),
        vec![1, 2, 3]
    );
}

#[test]
fn scan_nothing_when_mode_is_missing() {
    let raw = r#"{"availableEpisodesDetail":{"sub":["1"]}}"#;
    assert!(EpisodeListScanner::scan(raw, TranslationMode::Dub).is_empty());
    assert!(EpisodeListScanner::scan(r#"{"sub":[]}"#, TranslationMode::Sub).is_empty());
}
