pub mod episode_dto;
pub mod health_dto;
