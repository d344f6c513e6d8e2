use crate::config::MashupConfig;
use crate::utils::error::Result;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "heritage-mashup")]
#[command(about = "Federated queries over heritage digitization backends")]
pub struct CliConfig {
    /// SPARQL endpoint holding object metadata; repeatable.
    #[arg(long = "metadata-endpoint")]
    pub metadata_endpoints: Vec<String>,

    /// SQLite database holding activity records; repeatable.
    #[arg(long = "process-db")]
    pub process_dbs: Vec<String>,

    /// Metadata CSV to push to the first endpoint before querying.
    #[arg(long)]
    pub metadata_csv: Option<String>,

    /// Process JSON to push to the first database before querying.
    #[arg(long)]
    pub process_json: Option<String>,

    /// TOML file carrying the same settings; flags win over the file.
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// File values first, command-line values appended or overriding.
    pub fn resolve(self) -> Result<MashupConfig> {
        let mut config = match &self.config {
            Some(path) => MashupConfig::from_toml_file(path)?,
            None => MashupConfig::default(),
        };
        config.metadata_endpoints.extend(self.metadata_endpoints);
        config.process_dbs.extend(self.process_dbs);
        if self.metadata_csv.is_some() {
            config.metadata_csv = self.metadata_csv;
        }
        if self.process_json.is_some() {
            config.process_json = self.process_json;
        }
        Ok(config)
    }
}
