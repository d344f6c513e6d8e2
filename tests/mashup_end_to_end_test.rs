//! Full-stack scenario: a real SQLite process port plus an in-memory
//! metadata port registered on the advanced engine.

use async_trait::async_trait;
use heritage_mashup::domain::ports::{EntityRow, MetadataQuery, ObjectRow, PersonRow};
use heritage_mashup::{ActivityKind, AdvancedMashup, Result, SqliteProcessStore};
use std::io::Write;
use std::sync::Arc;

struct StaticMetadata {
    objects: Vec<ObjectRow>,
    authors: Vec<(String, PersonRow)>,
}

impl StaticMetadata {
    fn sample() -> Self {
        Self {
            objects: vec![
                ObjectRow {
                    id: "5".to_string(),
                    kind: "Painting".to_string(),
                    title: "Night Watch".to_string(),
                    owner: "Rijksmuseum".to_string(),
                    place: "Amsterdam".to_string(),
                    date: Some("1642".to_string()),
                },
                ObjectRow {
                    id: "7".to_string(),
                    kind: "Herbarium".to_string(),
                    title: "Flora Danica".to_string(),
                    owner: "Botanical Institute".to_string(),
                    place: "Copenhagen".to_string(),
                    date: None,
                },
            ],
            authors: vec![(
                "5".to_string(),
                PersonRow {
                    id: "A1".to_string(),
                    name: "Rembrandt".to_string(),
                },
            )],
        }
    }
}

#[async_trait]
impl MetadataQuery for StaticMetadata {
    async fn by_id(&self, id: &str) -> Result<Vec<EntityRow>> {
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

    async fn all_people(&self) -> Result<Vec<PersonRow>> {
        Ok(self.authors.iter().map(|(_, p)| p.clone()).collect())
    }

    async fn all_objects(&self) -> Result<Vec<ObjectRow>> {
        Ok(self.objects.clone())
    }

    async fn authors_of(&self, object_id: &str) -> Result<Vec<PersonRow>> {
        Ok(self
            .authors
            .iter()
            .filter(|(id, _)| id == object_id)
            .map(|(_, p)| p.clone())
            .collect())
    }

    async fn objects_authored_by(&self, person_id: &str) -> Result<Vec<ObjectRow>> {
        let ids: Vec<&str> = self
            .authors
            .iter()
            .filter(|(_, p)| p.id == person_id)
            .map(|(id, _)| id.as_str())
            .collect();
        Ok(self
            .objects
            .iter()
            .filter(|o| ids.contains(&o.id.as_str()))
            .cloned()
            .collect())
    }
}

const PROCESS_JSON: &str = r#"[
  {
    "object id": "5",
    "acquisition": {
      "responsible institute": "Heritage Council",
      "technique": "X-ray",
      "start date": "2016-01-01",
      "end date": "2016-06-01"
    }
  },
  {
    "object id": "99",
    "processing": {
      "responsible institute": "Heritage Lab",
      "start date": "2016-07-01",
      "end date": "2016-07-02"
    }
  }
]"#;

fn mashup_under_test() -> AdvancedMashup {
    let mut file = tempfile::Builder::new()
        .suffix(".json")
        .tempfile()
        .unwrap();
    file.write_all(PROCESS_JSON.as_bytes()).unwrap();

    let process = SqliteProcessStore::open_in_memory().unwrap();
    let inserted = process.ingest_json(file.path().to_str().unwrap()).unwrap();
    assert_eq!(inserted, 2);

    let mut mashup = AdvancedMashup::new();
    mashup.add_metadata_source(Arc::new(StaticMetadata::sample()));
    mashup.add_process_source(Arc::new(process));
    mashup
}

#[tokio::test]
async fn dangling_references_reduce_the_result_by_one() {
    let mashup = mashup_under_test();
    // Two raw rows in the database, but object "99" resolves nowhere.
    let activities = mashup.all_activities().await.unwrap();
    assert_eq!(activities.len(), 1);
    assert_eq!(activities[0].kind(), ActivityKind::Acquisition);
    assert_eq!(activities[0].refers_to().id(), "5");
    assert_eq!(activities[0].refers_to().authors()[0].name(), "Rembrandt");
}

#[tokio::test]
async fn acquired_in_time_frame_joins_across_both_stores() {
    let mashup = mashup_under_test();
    let authors = mashup
        .authors_of_objects_acquired_in_time_frame("2015-01-01", "2017-01-01")
        .await
        .unwrap();
    assert_eq!(authors.len(), 1);
    assert_eq!(authors[0].id(), "A1");
}

#[tokio::test]
async fn activities_on_authored_objects_joins_on_object_id() {
    let mashup = mashup_under_test();
    let activities = mashup.activities_on_objects_authored_by("A1").await.unwrap();
    assert_eq!(activities.len(), 1);
    assert_eq!(activities[0].refers_to().id(), "5");

    let none = mashup.activities_on_objects_authored_by("A2").await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn handled_objects_project_and_deduplicate() {
    let mashup = mashup_under_test();
    let objects = mashup
        .objects_handled_by_responsible_institution("Council")
        .await
        .unwrap();
    assert_eq!(objects.len(), 1);
    assert_eq!(objects[0].title(), "Night Watch");
}
