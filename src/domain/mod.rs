// Domain layer: entity model and the two backend port traits. No I/O here.

pub mod model;
pub mod ports;
