// Domain layer: film/entity models and the API port. No HTTP or runtime dependencies here.

pub mod model;
pub mod ports;
