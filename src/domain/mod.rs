// Domain layer: household input types and ports. No I/O here.

pub mod model;
pub mod ports;
