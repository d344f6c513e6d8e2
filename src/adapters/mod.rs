// Adapters layer: concrete port implementations for the two backends.

pub mod relational;
pub mod sparql;
