// Adapters layer: conversions between on-disk formats and the domain model.

pub mod tabular;
