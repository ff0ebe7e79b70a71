// Domain layer: core models and ports (interfaces). No HTTP or HTML dependencies here.

pub mod model;
pub mod ports;
