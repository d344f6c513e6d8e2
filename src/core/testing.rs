//! In-memory ports for engine tests. Filters mimic the real backends:
//! substring matching for partial names, lexicographic comparison for ISO
//! dates.

use crate::domain::model::is_person_id;
use crate::domain::ports::{
    ActivityRow, EntityRow, MetadataQuery, ObjectRow, PersonRow, ProcessQuery,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;

pub fn person_row(id: &str, name: &str) -> PersonRow {
    PersonRow {
        id: id.to_string(),
        name: name.to_string(),
    }
}

pub fn object_row(id: &str, kind: &str, title: &str) -> ObjectRow {
    ObjectRow {
        id: id.to_string(),
        kind: kind.to_string(),
        title: title.to_string(),
        owner: "University of Bologna".to_string(),
        place: "Bologna".to_string(),
        date: None,
    }
}

pub fn activity_row(activity_id: &str, object_id: &str) -> ActivityRow {
    ActivityRow {
        activity_id: activity_id.to_string(),
        institute: "Heritage Lab".to_string(),
        person: None,
        tools: vec![],
        start: None,
        end: None,
        object_id: object_id.to_string(),
        technique: None,
    }
}

pub fn acquisition_row(activity_id: &str, object_id: &str, technique: &str) -> ActivityRow {
    let mut row = activity_row(activity_id, object_id);
    row.technique = Some(technique.to_string());
    row
}

#[derive(Default, Clone)]
pub struct MemoryMetadata {
    pub people: Vec<PersonRow>,
    pub objects: Vec<ObjectRow>,
    pub authorship: HashMap<String, Vec<PersonRow>>,
}

impl MemoryMetadata {
    /// Records `author` as an author of `object_id`.
    pub fn link(&mut self, object_id: &str, author: PersonRow) {
        self.authorship
            .entry(object_id.to_string())
            .or_default()
            .push(author);
    }
}

#[async_trait]
impl MetadataQuery for MemoryMetadata {
    async fn by_id(&self, id: &str) -> Result<Vec<EntityRow>> {
        if is_person_id(id) {
            Ok(self
                .people
                .iter()
                .filter(|p| p.id == id)
                .map(|p| EntityRow {
                    id: p.id.clone(),
                    name: Some(p.name.clone()),
                    ..EntityRow::default()
                })
                .collect())
        } else {
            Ok(self
                .objects
                .iter()
                .filter(|o| o.id == id)
                .map(|o| EntityRow {
                    id: o.id.clone(),
                    name: None,
                    kind: Some(o.kind.clone()),
                    title: Some(o.title.clone()),
                    owner: Some(o.owner.clone()),
                    place: Some(o.place.clone()),
                    date: o.date.clone(),
                })
                .collect())
        }
    }

    async fn all_people(&self) -> Result<Vec<PersonRow>> {
        Ok(self.people.clone())
    }

    async fn all_objects(&self) -> Result<Vec<ObjectRow>> {
        Ok(self.objects.clone())
    }

    async fn authors_of(&self, object_id: &str) -> Result<Vec<PersonRow>> {
        Ok(self.authorship.get(object_id).cloned().unwrap_or_default())
    }

    async fn objects_authored_by(&self, person_id: &str) -> Result<Vec<ObjectRow>> {
        Ok(self
            .objects
            .iter()
            .filter(|o| {
                self.authorship
                    .get(&o.id)
                    .is_some_and(|authors| authors.iter().any(|a| a.id == person_id))
            })
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub struct MemoryProcess {
    pub rows: Vec<ActivityRow>,
}

impl MemoryProcess {
    fn filtered<F>(&self, predicate: F) -> Result<Vec<ActivityRow>>
    where
        F: Fn(&ActivityRow) -> bool,
    {
        Ok(self.rows.iter().filter(|r| predicate(r)).cloned().collect())
    }
}

#[async_trait]
impl ProcessQuery for MemoryProcess {
    async fn all_activities(&self) -> Result<Vec<ActivityRow>> {
        Ok(self.rows.clone())
    }

    async fn by_responsible_institution(&self, partial: &str) -> Result<Vec<ActivityRow>> {
        self.filtered(|r| r.institute.contains(partial))
    }

    async fn by_responsible_person(&self, partial: &str) -> Result<Vec<ActivityRow>> {
        self.filtered(|r| r.person.as_deref().is_some_and(|p| p.contains(partial)))
    }

    async fn using_tool(&self, partial: &str) -> Result<Vec<ActivityRow>> {
        self.filtered(|r| r.tools.iter().any(|t| t.contains(partial)))
    }

    async fn started_after(&self, date: &str) -> Result<Vec<ActivityRow>> {
        self.filtered(|r| r.start.as_deref().is_some_and(|s| s >= date))
    }

    async fn ended_before(&self, date: &str) -> Result<Vec<ActivityRow>> {
        self.filtered(|r| r.end.as_deref().is_some_and(|e| e <= date))
    }

    async fn acquisitions_by_technique(&self, partial: &str) -> Result<Vec<ActivityRow>> {
        self.filtered(|r| {
            r.activity_id.starts_with("acquisition")
                && r.technique.as_deref().is_some_and(|t| t.contains(partial))
        })
    }
}
