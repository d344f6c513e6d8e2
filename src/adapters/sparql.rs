//! Graph-store adapter: a SPARQL 1.1 endpoint (e.g. Blazegraph) queried over
//! HTTP. Results come back as `application/sparql-results+json`; ingestion
//! pushes the metadata CSV as one `INSERT DATA` update.

use crate::domain::model::{is_person_id, ObjectKind};
use crate::domain::ports::{EntityRow, MetadataQuery, ObjectRow, PersonRow};
use crate::utils::error::{MashupError, Result};
use crate::utils::validation::{validate_endpoint_url, validate_file_extension};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use url::Url;

const BASE: &str = "https://w3id.org/heritage-mashup/";

const PREFIXES: &str = "\
PREFIX cls: <https://w3id.org/heritage-mashup/classes/>
PREFIX attr: <https://w3id.org/heritage-mashup/attributes/>
PREFIX rel: <https://w3id.org/heritage-mashup/relations/>
";

#[derive(Debug, Deserialize)]
struct SelectResponse {
    results: SelectResults,
}

#[derive(Debug, Deserialize)]
struct SelectResults {
    bindings: Vec<HashMap<String, Term>>,
}

#[derive(Debug, Deserialize)]
struct Term {
    value: String,
}

/// IRIs are stored with the identifier as the last path segment; everything
/// before it is vocabulary noise.
fn local_name(value: &str) -> &str {
    value.rsplit('/').next().unwrap_or(value)
}

fn literal(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

fn entity_iri(local: &str) -> String {
    format!("<{}entities/{}>", BASE, local)
}

/// The CSV labels kinds as space-separated words ("nautical chart"); the
/// graph and the engine use the CamelCase tag.
fn kind_from_label(label: &str) -> Result<ObjectKind> {
    if let Ok(kind) = label.parse::<ObjectKind>() {
        return Ok(kind);
    }
    let camel: String = label
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect();
    camel.parse()
}

/// Author cells look like `Name (VIAF:123)`, multiple authors separated by
/// `;`. Cells that do not follow the pattern are skipped.
fn parse_author_cell(cell: &str) -> Vec<(String, String)> {
    let mut authors = Vec::new();
    for part in cell.split(';') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        match (part.rfind('('), part.ends_with(')')) {
            (Some(open), true) if open + 1 < part.len() - 1 => {
                let name = part[..open].trim().to_string();
                let id = part[open + 1..part.len() - 1].trim().to_string();
                if !name.is_empty() && !id.is_empty() {
                    authors.push((name, id));
                    continue;
                }
                tracing::warn!(cell = %part, "skipping malformed author cell");
            }
            _ => tracing::warn!(cell = %part, "skipping malformed author cell"),
        }
    }
    authors
}

#[derive(Debug, Deserialize)]
struct MetadataRecord {
    #[serde(rename = "Id")]
    id: String,
    #[serde(rename = "Type")]
    kind: String,
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Date", default)]
    date: Option<String>,
    #[serde(rename = "Author", default)]
    author: Option<String>,
    #[serde(rename = "Owner")]
    owner: String,
    #[serde(rename = "Place")]
    place: String,
}

/// Metadata port backed by a SPARQL endpoint.
pub struct SparqlMetadataStore {
    endpoint: Url,
    client: Client,
}

impl SparqlMetadataStore {
    pub fn new(endpoint: &str) -> Result<Self> {
        let endpoint = validate_endpoint_url("metadata endpoint", endpoint)?;
        Ok(Self {
            endpoint,
            client: Client::new(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn select(&self, query: &str) -> Result<Vec<HashMap<String, String>>> {
        tracing::debug!(endpoint = %self.endpoint, "running SPARQL SELECT");
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::ACCEPT, "application/sparql-results+json")
            .form(&[("query", query)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MashupError::SparqlError {
                message: format!("SELECT failed with status {}", response.status()),
            });
        }

        let body: SelectResponse = response.json().await?;
        Ok(body
            .results
            .bindings
            .into_iter()
            .map(|binding| {
                binding
                    .into_iter()
                    .map(|(variable, term)| (variable, term.value))
                    .collect()
            })
            .collect())
    }

    async fn update(&self, update: &str) -> Result<()> {
        tracing::debug!(endpoint = %self.endpoint, "running SPARQL UPDATE");
        let response = self
            .client
            .post(self.endpoint.clone())
            .form(&[("update", update)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MashupError::SparqlError {
                message: format!("UPDATE failed with status {}", response.status()),
            });
        }
        Ok(())
    }

    /// Loads the metadata CSV and pushes every record to the endpoint as one
    /// `INSERT DATA` update. Returns the number of object records pushed.
    pub async fn ingest_csv(&self, path: &str) -> Result<usize> {
        validate_file_extension("metadata csv", path, "csv")?;

        let mut reader = csv::Reader::from_path(path)?;
        let mut triples = String::new();
        let mut seen_people = HashSet::new();
        let mut count = 0usize;

        for record in reader.deserialize() {
            let record: MetadataRecord = record?;
            let kind = kind_from_label(&record.kind)?;
            let object = entity_iri(&format!("obj-{}", record.id));

            triples.push_str(&format!(
                "{object} a cls:{kind} ;\n  attr:id {id} ;\n  attr:title {title} ;\n  attr:owner {owner} ;\n  attr:place {place} ",
                object = object,
                kind = kind.tag(),
                id = literal(&record.id),
                title = literal(&record.title),
                owner = literal(&record.owner),
                place = literal(&record.place),
            ));
            if let Some(date) = record.date.as_deref().filter(|d| !d.is_empty()) {
                triples.push_str(&format!(";\n  attr:date {} ", literal(date)));
            }

            let authors = record
                .author
                .as_deref()
                .map(parse_author_cell)
                .unwrap_or_default();
            for (_, person_id) in &authors {
                triples.push_str(&format!(";\n  rel:author {} ", entity_iri(person_id)));
            }
            triples.push_str(".\n");

            for (name, person_id) in authors {
                if seen_people.insert(person_id.clone()) {
                    triples.push_str(&format!(
                        "{person} a cls:Person ;\n  attr:id {id} ;\n  attr:name {name} .\n",
                        person = entity_iri(&person_id),
                        id = literal(&person_id),
                        name = literal(&name),
                    ));
                }
            }
            count += 1;
        }

        let update = format!("{}INSERT DATA {{\n{}}}", PREFIXES, triples);
        self.update(&update).await?;
        tracing::info!(records = count, "metadata CSV pushed to endpoint");
        Ok(count)
    }
}

#[async_trait]
impl MetadataQuery for SparqlMetadataStore {
    async fn by_id(&self, id: &str) -> Result<Vec<EntityRow>> {
        if is_person_id(id) {
            let query = format!(
                "{prefixes}SELECT ?name WHERE {{ ?person a cls:Person ; attr:id {id} ; attr:name ?name . }}",
                prefixes = PREFIXES,
                id = literal(id),
            );
            let rows = self.select(&query).await?;
            return Ok(rows
                .into_iter()
                .map(|mut row| EntityRow {
                    id: id.to_string(),
                    name: row.remove("name"),
                    ..EntityRow::default()
                })
                .collect());
        }

        let query = format!(
            "{prefixes}SELECT ?type ?title ?owner ?place ?date WHERE {{
  ?object a ?type ;
    attr:id {id} ;
    attr:title ?title ;
    attr:owner ?owner ;
    attr:place ?place .
  OPTIONAL {{ ?object attr:date ?date }}
}}",
            prefixes = PREFIXES,
            id = literal(id),
        );
        let rows = self.select(&query).await?;
        Ok(rows
            .into_iter()
            .map(|mut row| EntityRow {
                id: id.to_string(),
                name: None,
                kind: row.remove("type").map(|t| local_name(&t).to_string()),
                title: row.remove("title"),
                owner: row.remove("owner"),
                place: row.remove("place"),
                date: row.remove("date"),
            })
            .collect())
    }

    async fn all_people(&self) -> Result<Vec<PersonRow>> {
        let query = format!(
            "{prefixes}SELECT ?id ?name WHERE {{ ?person a cls:Person ; attr:id ?id ; attr:name ?name . }} ORDER BY ?id",
            prefixes = PREFIXES,
        );
        let rows = self.select(&query).await?;
        Ok(rows
            .into_iter()
            .map(|mut row| PersonRow {
                id: row.remove("id").unwrap_or_default(),
                name: row.remove("name").unwrap_or_default(),
            })
            .collect())
    }

    async fn all_objects(&self) -> Result<Vec<ObjectRow>> {
        let query = format!(
            "{prefixes}SELECT ?id ?type ?title ?owner ?place ?date WHERE {{
  ?object a ?type ;
    attr:id ?id ;
    attr:title ?title ;
    attr:owner ?owner ;
    attr:place ?place .
  OPTIONAL {{ ?object attr:date ?date }}
}} ORDER BY ?id",
            prefixes = PREFIXES,
        );
        let rows = self.select(&query).await?;
        Ok(rows.into_iter().map(object_row_from_binding).collect())
    }

    async fn authors_of(&self, object_id: &str) -> Result<Vec<PersonRow>> {
        let query = format!(
            "{prefixes}SELECT ?id ?name WHERE {{
  ?object attr:id {object_id} ;
    rel:author ?author .
  ?author attr:id ?id ;
    attr:name ?name .
}} ORDER BY ?id",
            prefixes = PREFIXES,
            object_id = literal(object_id),
        );
        let rows = self.select(&query).await?;
        Ok(rows
            .into_iter()
            .map(|mut row| PersonRow {
                id: row.remove("id").unwrap_or_default(),
                name: row.remove("name").unwrap_or_default(),
            })
            .collect())
    }

    async fn objects_authored_by(&self, person_id: &str) -> Result<Vec<ObjectRow>> {
        let query = format!(
            "{prefixes}SELECT ?id ?type ?title ?owner ?place ?date WHERE {{
  ?person a cls:Person ;
    attr:id {person_id} .
  ?object rel:author ?person ;
    a ?type ;
    attr:id ?id ;
    attr:title ?title ;
    attr:owner ?owner ;
    attr:place ?place .
  OPTIONAL {{ ?object attr:date ?date }}
}} ORDER BY ?id",
            prefixes = PREFIXES,
            person_id = literal(person_id),
        );
        let rows = self.select(&query).await?;
        Ok(rows.into_iter().map(object_row_from_binding).collect())
    }
}

fn object_row_from_binding(mut row: HashMap<String, String>) -> ObjectRow {
    ObjectRow {
        id: row.remove("id").unwrap_or_default(),
        kind: row
            .remove("type")
            .map(|t| local_name(&t).to_string())
            .unwrap_or_default(),
        title: row.remove("title").unwrap_or_default(),
        owner: row.remove("owner").unwrap_or_default(),
        place: row.remove("place").unwrap_or_default(),
        date: row.remove("date"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_name_strips_iri_path() {
        assert_eq!(
            local_name("https://w3id.org/heritage-mashup/classes/Painting"),
            "Painting"
        );
        assert_eq!(local_name("Painting"), "Painting");
    }

    #[test]
    fn literal_escapes_quotes_and_backslashes() {
        assert_eq!(literal(r#"a "quoted" \ title"#), r#""a \"quoted\" \\ title""#);
    }

    #[test]
    fn kind_labels_accept_both_spellings() {
        assert_eq!(kind_from_label("NauticalChart").unwrap(), ObjectKind::NauticalChart);
        assert_eq!(kind_from_label("nautical chart").unwrap(), ObjectKind::NauticalChart);
        assert_eq!(kind_from_label("printed volume").unwrap(), ObjectKind::PrintedVolume);
        assert!(kind_from_label("sculpture").is_err());
    }

    #[test]
    fn author_cells_split_on_semicolons() {
        let authors =
            parse_author_cell("Ada Lovelace (VIAF:78822798); Carl Linnaeus (VIAF:34594376)");
        assert_eq!(
            authors,
            vec![
                ("Ada Lovelace".to_string(), "VIAF:78822798".to_string()),
                ("Carl Linnaeus".to_string(), "VIAF:34594376".to_string()),
            ]
        );
    }

    #[test]
    fn malformed_author_cells_are_skipped() {
        assert!(parse_author_cell("").is_empty());
        assert!(parse_author_cell("no id here").is_empty());
        assert!(parse_author_cell("()").is_empty());
    }

    #[test]
    fn endpoint_must_be_http() {
        assert!(SparqlMetadataStore::new("ftp://triples.example").is_err());
        assert!(SparqlMetadataStore::new("http://127.0.0.1:9999/blazegraph/sparql").is_ok());
    }
}
