use crate::domain::model::{
    is_person_id, Activity, ActivityKind, CulturalHeritageObject, Entity, ObjectKind, Person,
};
use crate::domain::ports::{ActivityRow, EntityRow, MetadataQuery, ObjectRow, ProcessQuery};
use crate::utils::error::Result;
use std::collections::HashSet;
use std::sync::Arc;

/// Which backend operation an activity query fans out to. Filter arguments
/// travel to the ports verbatim; the engine never matches substrings or
/// date ranges itself.
#[derive(Clone, Copy)]
enum ProcessCall<'a> {
    All,
    ByInstitution(&'a str),
    ByPerson(&'a str),
    UsingTool(&'a str),
    StartedAfter(&'a str),
    EndedBefore(&'a str),
    ByTechnique(&'a str),
}

/// Federation engine over any number of registered metadata and process
/// query ports. Every call fans out to all ports of the relevant kind in
/// registration order, merges the rows, deduplicates, and rebuilds typed
/// entities from scratch. Nothing is cached between calls.
#[derive(Default)]
pub struct BasicMashup {
    metadata_sources: Vec<Arc<dyn MetadataQuery>>,
    process_sources: Vec<Arc<dyn ProcessQuery>>,
}

impl BasicMashup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a metadata port. Order is preserved: earlier ports win when
    /// rows disagree. Anything that is not a `MetadataQuery` is rejected at
    /// compile time.
    pub fn add_metadata_source(&mut self, source: Arc<dyn MetadataQuery>) {
        self.metadata_sources.push(source);
    }

    pub fn add_process_source(&mut self, source: Arc<dyn ProcessQuery>) {
        self.process_sources.push(source);
    }

    pub fn clear_metadata_sources(&mut self) {
        self.metadata_sources.clear();
    }

    pub fn clear_process_sources(&mut self) {
        self.process_sources.clear();
    }

    pub fn metadata_source_count(&self) -> usize {
        self.metadata_sources.len()
    }

    pub fn process_source_count(&self) -> usize {
        self.process_sources.len()
    }

    /// Resolves one identifier against every metadata port. Ids carrying an
    /// authority prefix name a person, anything else an object. `Ok(None)`
    /// means no port knows the id; it is not an error. When ports disagree
    /// the first-seen row wins, fields are never merged across rows.
    pub async fn entity_by_id(&self, id: &str) -> Result<Option<Entity>> {
        let mut rows: Vec<EntityRow> = Vec::new();
        for source in &self.metadata_sources {
            rows.extend(source.by_id(id).await?);
        }

        let Some(first) = rows.first() else {
            return Ok(None);
        };

        if is_person_id(id) {
            let name = first.name.clone().unwrap_or_default();
            return Ok(Some(Entity::Person(Person::new(id, name)?)));
        }

        // Author lists are not inline in object rows; a second federated
        // lookup fills them.
        let authors = self.authors_of_object(id).await?;
        let kind: ObjectKind = first.kind.as_deref().unwrap_or("").parse()?;
        let object = CulturalHeritageObject::new(
            kind,
            id,
            first.title.clone().unwrap_or_default(),
            first.owner.clone().unwrap_or_default(),
            first.place.clone().unwrap_or_default(),
            first.date.clone(),
            authors,
        )?;
        Ok(Some(Entity::Object(object)))
    }

    /// All known people across every metadata port. Zero registered ports
    /// yields an empty vec, deliberately not `None`.
    pub async fn all_people(&self) -> Result<Vec<Person>> {
        let mut seen = HashSet::new();
        let mut people = Vec::new();
        for source in &self.metadata_sources {
            for row in source.all_people().await? {
                if seen.insert(row.clone()) {
                    people.push(Person::new(row.id, row.name)?);
                }
            }
        }
        Ok(people)
    }

    pub async fn all_objects(&self) -> Result<Vec<CulturalHeritageObject>> {
        let rows = self.federated_object_rows(None).await?;
        self.build_objects(rows).await
    }

    pub async fn authors_of_object(&self, object_id: &str) -> Result<Vec<Person>> {
        let mut seen = HashSet::new();
        let mut authors = Vec::new();
        for source in &self.metadata_sources {
            for row in source.authors_of(object_id).await? {
                if seen.insert(row.clone()) {
                    authors.push(Person::new(row.id, row.name)?);
                }
            }
        }
        Ok(authors)
    }

    pub async fn objects_authored_by(&self, person_id: &str) -> Result<Vec<CulturalHeritageObject>> {
        let rows = self.federated_object_rows(Some(person_id)).await?;
        self.build_objects(rows).await
    }

    pub async fn all_activities(&self) -> Result<Vec<Activity>> {
        let rows = self.federated_activity_rows(ProcessCall::All).await?;
        self.build_activities(rows).await
    }

    pub async fn activities_by_responsible_institution(&self, partial: &str) -> Result<Vec<Activity>> {
        let rows = self
            .federated_activity_rows(ProcessCall::ByInstitution(partial))
            .await?;
        self.build_activities(rows).await
    }

    pub async fn activities_by_responsible_person(&self, partial: &str) -> Result<Vec<Activity>> {
        let rows = self
            .federated_activity_rows(ProcessCall::ByPerson(partial))
            .await?;
        self.build_activities(rows).await
    }

    pub async fn activities_using_tool(&self, partial: &str) -> Result<Vec<Activity>> {
        let rows = self
            .federated_activity_rows(ProcessCall::UsingTool(partial))
            .await?;
        self.build_activities(rows).await
    }

    pub async fn activities_started_after(&self, date: &str) -> Result<Vec<Activity>> {
        let rows = self
            .federated_activity_rows(ProcessCall::StartedAfter(date))
            .await?;
        self.build_activities(rows).await
    }

    pub async fn activities_ended_before(&self, date: &str) -> Result<Vec<Activity>> {
        let rows = self
            .federated_activity_rows(ProcessCall::EndedBefore(date))
            .await?;
        self.build_activities(rows).await
    }

    pub async fn acquisitions_by_technique(&self, partial: &str) -> Result<Vec<Activity>> {
        let rows = self
            .federated_activity_rows(ProcessCall::ByTechnique(partial))
            .await?;
        self.build_activities(rows).await
    }

    /// Fans an object query out to all metadata ports and deduplicates full
    /// rows, preserving first-seen order.
    async fn federated_object_rows(&self, authored_by: Option<&str>) -> Result<Vec<ObjectRow>> {
        let mut seen = HashSet::new();
        let mut rows = Vec::new();
        for source in &self.metadata_sources {
            let batch = match authored_by {
                Some(person_id) => source.objects_authored_by(person_id).await?,
                None => source.all_objects().await?,
            };
            for row in batch {
                if seen.insert(row.clone()) {
                    rows.push(row);
                }
            }
        }
        Ok(rows)
    }

    /// Rebuilds objects from deduplicated rows: drop later rows with an
    /// already-seen id, then issue one federated authors lookup per object.
    /// The N+1 is inherent to the source schema, which keeps author lists
    /// out of the object rows.
    async fn build_objects(&self, rows: Vec<ObjectRow>) -> Result<Vec<CulturalHeritageObject>> {
        let mut seen_ids = HashSet::new();
        let mut objects = Vec::new();
        for row in rows {
            if !seen_ids.insert(row.id.clone()) {
                continue;
            }
            let authors = self.authors_of_object(&row.id).await?;
            let kind: ObjectKind = row.kind.parse()?;
            objects.push(CulturalHeritageObject::new(
                kind, row.id, row.title, row.owner, row.place, row.date, authors,
            )?);
        }
        Ok(objects)
    }

    async fn federated_activity_rows(&self, call: ProcessCall<'_>) -> Result<Vec<ActivityRow>> {
        let mut seen = HashSet::new();
        let mut rows = Vec::new();
        for source in &self.process_sources {
            let batch = match call {
                ProcessCall::All => source.all_activities().await?,
                ProcessCall::ByInstitution(partial) => {
                    source.by_responsible_institution(partial).await?
                }
                ProcessCall::ByPerson(partial) => source.by_responsible_person(partial).await?,
                ProcessCall::UsingTool(partial) => source.using_tool(partial).await?,
                ProcessCall::StartedAfter(date) => source.started_after(date).await?,
                ProcessCall::EndedBefore(date) => source.ended_before(date).await?,
                ProcessCall::ByTechnique(partial) => {
                    source.acquisitions_by_technique(partial).await?
                }
            };
            for row in batch {
                if seen.insert(row.clone()) {
                    rows.push(row);
                }
            }
        }
        Ok(rows)
    }

    /// Rebuilds activities from deduplicated rows. Rows whose object cannot
    /// be resolved (dangling references) and rows with an unrecognized kind
    /// prefix are dropped from the result, not surfaced as errors.
    async fn build_activities(&self, rows: Vec<ActivityRow>) -> Result<Vec<Activity>> {
        let mut activities = Vec::new();
        for row in rows {
            let object = match self.entity_by_id(&row.object_id).await? {
                Some(Entity::Object(object)) => object,
                Some(Entity::Person(_)) | None => {
                    tracing::debug!(
                        activity_id = %row.activity_id,
                        object_id = %row.object_id,
                        "dropping activity with dangling object reference"
                    );
                    continue;
                }
            };

            let kind = match ActivityKind::from_activity_id(&row.activity_id) {
                Ok(kind) => kind,
                Err(e) => {
                    tracing::warn!(activity_id = %row.activity_id, error = %e, "dropping malformed activity row");
                    continue;
                }
            };

            // Acquisitions take the technique from the row (empty marker when
            // the backend had none); every other kind ignores the column.
            let technique = match kind {
                ActivityKind::Acquisition => Some(row.technique.unwrap_or_default()),
                _ => None,
            };

            activities.push(Activity::new(
                kind,
                object,
                row.institute,
                row.person,
                row.start,
                row.end,
                row.tools,
                technique,
            )?);
        }
        Ok(activities)
    }
}
