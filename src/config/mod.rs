#[cfg(feature = "cli")]
pub mod cli;

use crate::utils::error::Result;
use crate::utils::validation::{
    validate_db_path, validate_endpoint_url, validate_file_extension, Validate,
};
use serde::{Deserialize, Serialize};

/// Which backends to register and what, if anything, to ingest first.
/// Loadable from a TOML file; the CLI layers its flags on top.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MashupConfig {
    #[serde(default)]
    pub metadata_endpoints: Vec<String>,
    #[serde(default)]
    pub process_dbs: Vec<String>,
    #[serde(default)]
    pub metadata_csv: Option<String>,
    #[serde(default)]
    pub process_json: Option<String>,
}

impl MashupConfig {
    pub fn from_toml_file(path: &str) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }
}

impl Validate for MashupConfig {
    fn validate(&self) -> Result<()> {
        for endpoint in &self.metadata_endpoints {
            validate_endpoint_url("metadata_endpoints", endpoint)?;
        }
        for db in &self.process_dbs {
            validate_db_path("process_dbs", db)?;
        }
        if let Some(csv) = &self.metadata_csv {
            validate_file_extension("metadata_csv", csv, "csv")?;
        }
        if let Some(json) = &self.process_json {
            validate_file_extension("process_json", json, "json")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_full_toml_config() {
        let config: MashupConfig = toml::from_str(
            r#"
            metadata_endpoints = ["http://127.0.0.1:9999/blazegraph/sparql"]
            process_dbs = ["relational.db"]
            metadata_csv = "data/meta.csv"
            process_json = "data/process.json"
            "#,
        )
        .unwrap();
        assert_eq!(config.metadata_endpoints.len(), 1);
        assert_eq!(config.process_dbs, vec!["relational.db"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let config: MashupConfig = toml::from_str("").unwrap();
        assert!(config.metadata_endpoints.is_empty());
        assert!(config.metadata_csv.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validation_flags_bad_values() {
        let config = MashupConfig {
            metadata_endpoints: vec!["ftp://nope".to_string()],
            ..MashupConfig::default()
        };
        assert!(config.validate().is_err());

        let config = MashupConfig {
            process_dbs: vec!["activities.csv".to_string()],
            ..MashupConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
