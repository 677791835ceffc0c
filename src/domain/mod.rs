// Domain layer: content model, load-time validation rules and ports (interfaces).

pub mod model;
pub mod ports;
pub mod validation;
