pub mod episode_controller;
pub mod health_controller;

pub use episode_controller::EpisodeController;
