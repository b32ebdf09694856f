// Domain layer: vessel/port models, status filtering and the ports (interfaces) the pipeline is built on.

pub mod filter;
pub mod model;
pub mod ports;
