mod path_extractor;
mod validation_extractor;

pub use path_extractor::*;
pub use validation_extractor::*;
