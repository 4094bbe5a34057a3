use crate::error::MobilityError;
use crate::template::ChartTemplate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_INDEX_URL: &str = "https://www.google.com/covid19/mobility/";

/// Prefix of the environment variables read by [`load_config`].
pub const ENV_PREFIX: &str = "MOBILITY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectorConfig {
    /// Page listing the report PDFs.
    pub index_url: String,
    /// Where reports are downloaded to and read from.
    pub download_folder: PathBuf,
    /// Fetch reports before extracting them.
    pub download: bool,
    /// Keep reports that already exist in `download_folder`.
    pub skip_downloaded: bool,
    pub template: ChartTemplate,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        ConnectorConfig {
            index_url: DEFAULT_INDEX_URL.to_string(),
            download_folder: PathBuf::from("mobility_reports"),
            download: true,
            skip_downloaded: true,
            template: ChartTemplate::default(),
        }
    }
}

/// Load the connector configuration.
///
/// Sources, later ones winning: built-in defaults, the TOML file at `path`
/// (if given; a missing file is an error), then `MOBILITY_*` environment
/// variables with `__` separating nested keys, e.g.
/// `MOBILITY_TEMPLATE__PAIRING=strict`.
pub fn load_config(path: Option<&Path>) -> Result<ConnectorConfig, MobilityError> {
    load_config_with(path, environment())
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}

fn load_config_with(
    path: Option<&Path>,
    env: config::Environment,
) -> Result<ConnectorConfig, MobilityError> {
    let mut builder = config::Config::builder()
        .add_source(config::Config::try_from(&ConnectorConfig::default())?);

    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path).format(config::FileFormat::Toml));
    }

    let settings = builder.add_source(env).build()?;
    Ok(settings.try_deserialize()?)
}
