pub mod app_services;
pub mod episode_services;
pub mod link_services;

pub use episode_services::DynEpisodeService;
pub use link_services::DynLinkService;
