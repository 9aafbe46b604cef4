pub mod allanime_client;
pub mod episode;

pub use allanime_client::*;
