pub mod locator_utils;
pub mod playlist_utils;
pub mod provider_utils;
pub mod quality_utils;
pub mod retry_utils;
