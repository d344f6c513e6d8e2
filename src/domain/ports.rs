use crate::utils::error::Result;
use async_trait::async_trait;

/// Flat result row describing a person.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PersonRow {
    pub id: String,
    pub name: String,
}

/// Flat result row describing an object. `kind` is the raw class tag as the
/// backend declares it; the engine parses it into [`ObjectKind`] and rejects
/// anything outside the closed set.
///
/// [`ObjectKind`]: crate::domain::model::ObjectKind
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectRow {
    pub id: String,
    pub kind: String,
    pub title: String,
    pub owner: String,
    pub place: String,
    pub date: Option<String>,
}

/// Union row returned by the by-id lookup. Person rows carry `name`, object
/// rows carry the rest; the engine decides which side applies from the id
/// syntax, not from the row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct EntityRow {
    pub id: String,
    pub name: Option<String>,
    pub kind: Option<String>,
    pub title: Option<String>,
    pub owner: Option<String>,
    pub place: Option<String>,
    pub date: Option<String>,
}

/// Flat result row describing one workflow activity. Optional fields are an
/// explicit `None`, never an empty sentinel string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActivityRow {
    pub activity_id: String,
    pub institute: String,
    pub person: Option<String>,
    pub tools: Vec<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub object_id: String,
    pub technique: Option<String>,
}

/// Query capability of a graph-store backend holding object metadata and
/// authorship. Implementations own their connection, retry and timeout
/// policy; the engine only fans out and merges.
#[async_trait]
pub trait MetadataQuery: Send + Sync {
    async fn by_id(&self, id: &str) -> Result<Vec<EntityRow>>;
    async fn all_people(&self) -> Result<Vec<PersonRow>>;
    async fn all_objects(&self) -> Result<Vec<ObjectRow>>;
    async fn authors_of(&self, object_id: &str) -> Result<Vec<PersonRow>>;
    async fn objects_authored_by(&self, person_id: &str) -> Result<Vec<ObjectRow>>;
}

/// Query capability of a tabular-store backend holding activity records.
/// Partial-name and date filters are applied by the backend; the engine
/// passes them through verbatim.
#[async_trait]
pub trait ProcessQuery: Send + Sync {
    async fn all_activities(&self) -> Result<Vec<ActivityRow>>;
    async fn by_responsible_institution(&self, partial: &str) -> Result<Vec<ActivityRow>>;
    async fn by_responsible_person(&self, partial: &str) -> Result<Vec<ActivityRow>>;
    async fn using_tool(&self, partial: &str) -> Result<Vec<ActivityRow>>;
    async fn started_after(&self, date: &str) -> Result<Vec<ActivityRow>>;
    async fn ended_before(&self, date: &str) -> Result<Vec<ActivityRow>>;
    async fn acquisitions_by_technique(&self, partial: &str) -> Result<Vec<ActivityRow>>;
}
