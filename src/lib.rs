pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::relational::SqliteProcessStore;
pub use crate::adapters::sparql::SparqlMetadataStore;
pub use crate::config::MashupConfig;
pub use crate::core::{AdvancedMashup, BasicMashup};
pub use crate::domain::model::{
    Activity, ActivityKind, CulturalHeritageObject, Entity, ObjectKind, Person,
};
pub use crate::domain::ports::{MetadataQuery, ProcessQuery};
pub use crate::utils::error::{MashupError, Result};
