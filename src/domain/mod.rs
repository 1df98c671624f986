// Domain layer: plate and template models plus the ports the pipeline talks through.

pub mod model;
pub mod ports;
