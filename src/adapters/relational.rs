//! Tabular-store adapter: one SQLite table per activity kind, queried with
//! `UNION ALL` selects. Partial-name filters become parameterized `LIKE`
//! patterns; date filters compare ISO strings, which order correctly as
//! text. Ingestion reads the process JSON and assigns synthetic
//! `<kind>-<n>` activity ids, continuing from whatever the table already
//! holds.

use crate::domain::model::ActivityKind;
use crate::domain::ports::{ActivityRow, ProcessQuery};
use crate::utils::error::{MashupError, Result};
use crate::utils::validation::{validate_db_path, validate_file_extension};
use async_trait::async_trait;
use rusqlite::{params, Connection};
use serde::Deserialize;
use std::sync::Mutex;

const ROW_COLUMNS: &str =
    "activity_id, responsible_institute, responsible_person, tool, start_date, end_date, object_id";

fn join_tools(tools: &[String]) -> Option<String> {
    if tools.is_empty() {
        None
    } else {
        Some(tools.join(", "))
    }
}

fn split_tools(joined: &str) -> Vec<String> {
    joined
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Empty strings in the source JSON mean "absent".
fn normalize(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ToolField {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Deserialize)]
struct ActivityBlock {
    #[serde(rename = "responsible institute", default)]
    institute: Option<String>,
    #[serde(rename = "responsible person", default)]
    person: Option<String>,
    #[serde(default)]
    technique: Option<String>,
    #[serde(default)]
    tool: Option<ToolField>,
    #[serde(rename = "start date", default)]
    start: Option<String>,
    #[serde(rename = "end date", default)]
    end: Option<String>,
}

impl ActivityBlock {
    fn tools(&self) -> Vec<String> {
        match &self.tool {
            Some(ToolField::One(tool)) if !tool.trim().is_empty() => vec![tool.clone()],
            Some(ToolField::One(_)) | None => vec![],
            Some(ToolField::Many(tools)) => tools
                .iter()
                .filter(|t| !t.trim().is_empty())
                .cloned()
                .collect(),
        }
    }
}

/// One document per digitized object, one block per workflow step.
#[derive(Debug, Deserialize)]
struct ProcessDocument {
    #[serde(rename = "object id", default)]
    object_id: Option<String>,
    #[serde(default)]
    acquisition: Option<ActivityBlock>,
    #[serde(default)]
    processing: Option<ActivityBlock>,
    #[serde(default)]
    modelling: Option<ActivityBlock>,
    #[serde(default)]
    optimising: Option<ActivityBlock>,
    #[serde(default)]
    exporting: Option<ActivityBlock>,
}

impl ProcessDocument {
    fn block(&self, kind: ActivityKind) -> Option<&ActivityBlock> {
        match kind {
            ActivityKind::Acquisition => self.acquisition.as_ref(),
            ActivityKind::Processing => self.processing.as_ref(),
            ActivityKind::Modelling => self.modelling.as_ref(),
            ActivityKind::Optimising => self.optimising.as_ref(),
            ActivityKind::Exporting => self.exporting.as_ref(),
        }
    }
}

/// Process port backed by a SQLite database.
pub struct SqliteProcessStore {
    conn: Mutex<Connection>,
}

impl SqliteProcessStore {
    pub fn open(path: &str) -> Result<Self> {
        validate_db_path("process db", path)?;
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        for kind in ActivityKind::ALL {
            let technique_column = if kind == ActivityKind::Acquisition {
                ",\n  technique TEXT"
            } else {
                ""
            };
            conn.execute_batch(&format!(
                "CREATE TABLE IF NOT EXISTS {table} (
  activity_id TEXT PRIMARY KEY,
  responsible_institute TEXT NOT NULL,
  responsible_person TEXT,
  tool TEXT,
  start_date TEXT,
  end_date TEXT,
  object_id TEXT NOT NULL{technique_column}
);",
                table = kind.tag(),
                technique_column = technique_column,
            ))?;
        }
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| MashupError::ProcessingError {
            message: "SQLite connection mutex poisoned".to_string(),
        })
    }

    /// `UNION ALL` over the five tables. Only the acquisition table has a
    /// technique column; the rest select NULL to keep the shape uniform.
    fn union_select(filter: Option<&str>) -> String {
        let where_clause = filter.map(|f| format!("\nWHERE {}", f)).unwrap_or_default();
        ActivityKind::ALL
            .iter()
            .map(|kind| {
                let technique = if *kind == ActivityKind::Acquisition {
                    "technique"
                } else {
                    "NULL AS technique"
                };
                format!(
                    "SELECT {columns}, {technique}\nFROM {table}{where_clause}",
                    columns = ROW_COLUMNS,
                    technique = technique,
                    table = kind.tag(),
                    where_clause = where_clause,
                )
            })
            .collect::<Vec<_>>()
            .join("\nUNION ALL\n")
    }

    fn query_rows(&self, sql: &str, param: Option<&str>) -> Result<Vec<ActivityRow>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql)?;

        fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ActivityRow> {
            Ok(ActivityRow {
                activity_id: row.get(0)?,
                institute: row.get(1)?,
                person: row.get(2)?,
                tools: row
                    .get::<_, Option<String>>(3)?
                    .map(|joined| split_tools(&joined))
                    .unwrap_or_default(),
                start: row.get(4)?,
                end: row.get(5)?,
                object_id: row.get(6)?,
                technique: row.get(7)?,
            })
        }

        let rows = match param {
            Some(value) => stmt
                .query_map(params![value], map_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?,
            None => stmt
                .query_map([], map_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?,
        };
        Ok(rows)
    }

    fn table_len(conn: &Connection, kind: ActivityKind) -> Result<usize> {
        let count: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", kind.tag()),
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Loads the process JSON and appends every activity block to its table.
    /// Returns the number of activity rows inserted. A document without an
    /// explicit object id maps to its 1-based position in the array.
    pub fn ingest_json(&self, path: &str) -> Result<usize> {
        validate_file_extension("process json", path, "json")?;
        let raw = std::fs::read_to_string(path)?;
        let documents: Vec<ProcessDocument> = serde_json::from_str(&raw)?;

        let conn = self.lock()?;
        let mut inserted = 0usize;

        for kind in ActivityKind::ALL {
            let mut next_index = Self::table_len(&conn, kind)?;
            for (position, document) in documents.iter().enumerate() {
                let Some(block) = document.block(kind) else {
                    continue;
                };
                let activity_id = format!("{}-{}", kind.tag(), next_index);
                let object_id = document
                    .object_id
                    .clone()
                    .unwrap_or_else(|| (position + 1).to_string());
                let tools = block.tools();

                if kind == ActivityKind::Acquisition {
                    conn.execute(
                        &format!(
                            "INSERT INTO {} ({}, technique) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                            kind.tag(),
                            ROW_COLUMNS
                        ),
                        params![
                            activity_id,
                            block.institute.clone().unwrap_or_default(),
                            normalize(block.person.clone()),
                            join_tools(&tools),
                            normalize(block.start.clone()),
                            normalize(block.end.clone()),
                            object_id,
                            normalize(block.technique.clone()),
                        ],
                    )?;
                } else {
                    conn.execute(
                        &format!(
                            "INSERT INTO {} ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                            kind.tag(),
                            ROW_COLUMNS
                        ),
                        params![
                            activity_id,
                            block.institute.clone().unwrap_or_default(),
                            normalize(block.person.clone()),
                            join_tools(&tools),
                            normalize(block.start.clone()),
                            normalize(block.end.clone()),
                            object_id,
                        ],
                    )?;
                }
                next_index += 1;
                inserted += 1;
            }
        }

        tracing::info!(rows = inserted, "process JSON pushed to database");
        Ok(inserted)
    }
}

#[async_trait]
impl ProcessQuery for SqliteProcessStore {
    async fn all_activities(&self) -> Result<Vec<ActivityRow>> {
        self.query_rows(&Self::union_select(None), None)
    }

    async fn by_responsible_institution(&self, partial: &str) -> Result<Vec<ActivityRow>> {
        let sql = Self::union_select(Some("responsible_institute LIKE '%' || ?1 || '%'"));
        self.query_rows(&sql, Some(partial))
    }

    async fn by_responsible_person(&self, partial: &str) -> Result<Vec<ActivityRow>> {
        let sql = Self::union_select(Some("responsible_person LIKE '%' || ?1 || '%'"));
        self.query_rows(&sql, Some(partial))
    }

    async fn using_tool(&self, partial: &str) -> Result<Vec<ActivityRow>> {
        let sql = Self::union_select(Some("tool LIKE '%' || ?1 || '%'"));
        self.query_rows(&sql, Some(partial))
    }

    async fn started_after(&self, date: &str) -> Result<Vec<ActivityRow>> {
        let sql = Self::union_select(Some("start_date IS NOT NULL AND start_date >= ?1"));
        self.query_rows(&sql, Some(date))
    }

    async fn ended_before(&self, date: &str) -> Result<Vec<ActivityRow>> {
        let sql = Self::union_select(Some("end_date IS NOT NULL AND end_date <= ?1"));
        self.query_rows(&sql, Some(date))
    }

    async fn acquisitions_by_technique(&self, partial: &str) -> Result<Vec<ActivityRow>> {
        let sql = format!(
            "SELECT {columns}, technique\nFROM acquisition\nWHERE technique LIKE '%' || ?1 || '%'",
            columns = ROW_COLUMNS
        );
        self.query_rows(&sql, Some(partial))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tools_round_trip_through_comma_join() {
        let tools = vec!["3D scanner".to_string(), "turntable".to_string()];
        let joined = join_tools(&tools).unwrap();
        assert_eq!(split_tools(&joined), tools);
        assert_eq!(join_tools(&[]), None);
        assert!(split_tools("").is_empty());
    }

    #[test]
    fn union_select_covers_all_five_tables() {
        let sql = SqliteProcessStore::union_select(None);
        for kind in ActivityKind::ALL {
            assert!(sql.contains(&format!("FROM {}", kind.tag())));
        }
        assert_eq!(sql.matches("UNION ALL").count(), 4);
        assert_eq!(sql.matches("NULL AS technique").count(), 4);
    }

    #[test]
    fn normalize_turns_blank_strings_into_none() {
        assert_eq!(normalize(Some("  ".to_string())), None);
        assert_eq!(normalize(Some(String::new())), None);
        assert_eq!(normalize(Some("x".to_string())), Some("x".to_string()));
        assert_eq!(normalize(None), None);
    }

    #[test]
    fn db_path_is_validated_before_open() {
        assert!(SqliteProcessStore::open("activities.txt").is_err());
    }
}
