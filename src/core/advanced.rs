use crate::core::mashup::BasicMashup;
use crate::domain::model::{Activity, ActivityKind, CulturalHeritageObject, Person};
use crate::utils::error::{MashupError, Result};
use chrono::NaiveDate;
use std::collections::HashSet;
use std::ops::{Deref, DerefMut};

const ISO_DATE: &str = "%Y-%m-%d";

fn parse_iso_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, ISO_DATE).map_err(|_| MashupError::InvalidDate {
        value: value.to_string(),
    })
}

/// Keeps each object the first time its id appears, in activity order.
fn project_objects(activities: Vec<Activity>) -> Vec<CulturalHeritageObject> {
    let mut seen = HashSet::new();
    let mut objects = Vec::new();
    for activity in activities {
        let object = activity.refers_to();
        if seen.insert(object.id().to_string()) {
            objects.push(object.clone());
        }
    }
    objects
}

/// Extends [`BasicMashup`] with cross-source queries that join activity
/// results to metadata results on object id. All joins happen in memory;
/// the backends never see each other.
#[derive(Default)]
pub struct AdvancedMashup {
    basic: BasicMashup,
}

impl AdvancedMashup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activities performed on any object authored by `person_id`.
    /// An in-memory hash join on object id.
    pub async fn activities_on_objects_authored_by(&self, person_id: &str) -> Result<Vec<Activity>> {
        let object_ids: HashSet<String> = self
            .basic
            .objects_authored_by(person_id)
            .await?
            .into_iter()
            .map(|o| o.id().to_string())
            .collect();

        let activities = self.basic.all_activities().await?;
        Ok(activities
            .into_iter()
            .filter(|a| object_ids.contains(a.refers_to().id()))
            .collect())
    }

    pub async fn objects_handled_by_responsible_person(
        &self,
        partial: &str,
    ) -> Result<Vec<CulturalHeritageObject>> {
        let activities = self.basic.activities_by_responsible_person(partial).await?;
        Ok(project_objects(activities))
    }

    pub async fn objects_handled_by_responsible_institution(
        &self,
        partial: &str,
    ) -> Result<Vec<CulturalHeritageObject>> {
        let activities = self
            .basic
            .activities_by_responsible_institution(partial)
            .await?;
        Ok(project_objects(activities))
    }

    /// Authors of objects whose acquisition started on or after `start` and
    /// ended on or before `end`. Acquisitions without a parseable end date
    /// are excluded, not errors; an unparseable *argument* is an error.
    /// Authors are deduplicated by id, keeping the first occurrence across
    /// objects.
    pub async fn authors_of_objects_acquired_in_time_frame(
        &self,
        start: &str,
        end: &str,
    ) -> Result<Vec<Person>> {
        parse_iso_date(start)?;
        let end_bound = parse_iso_date(end)?;

        let started = self.basic.activities_started_after(start).await?;

        let mut seen_objects = HashSet::new();
        let mut object_ids = Vec::new();
        for activity in &started {
            if activity.kind() != ActivityKind::Acquisition {
                continue;
            }
            let Some(end_raw) = activity.end_date() else {
                continue;
            };
            let Ok(end_date) = NaiveDate::parse_from_str(end_raw, ISO_DATE) else {
                tracing::debug!(end = %end_raw, "excluding acquisition with unparseable end date");
                continue;
            };
            if end_date <= end_bound && seen_objects.insert(activity.refers_to().id().to_string())
            {
                object_ids.push(activity.refers_to().id().to_string());
            }
        }

        let mut seen_authors = HashSet::new();
        let mut authors = Vec::new();
        for object_id in &object_ids {
            for author in self.basic.authors_of_object(object_id).await? {
                if seen_authors.insert(author.id().to_string()) {
                    authors.push(author);
                }
            }
        }
        Ok(authors)
    }
}

impl Deref for AdvancedMashup {
    type Target = BasicMashup;

    fn deref(&self) -> &Self::Target {
        &self.basic
    }
}

impl DerefMut for AdvancedMashup {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.basic
    }
}

impl From<BasicMashup> for AdvancedMashup {
    fn from(basic: BasicMashup) -> Self {
        Self { basic }
    }
}
