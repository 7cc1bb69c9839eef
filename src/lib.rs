#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
// #![deny(clippy::all)]
// #![warn(clippy::pedantic)]
#![warn(clippy::all)]
pub mod cli;
pub mod idx;
pub mod index_set;
pub mod value;

use std::{fs::File, path::Path};

use color_eyre::{Report, Section};
use eyre::WrapErr;
use log::LevelFilter;
use serde::{Deserialize, Serialize};

use cli::{input::CollectionSpec, LogFormat};

pub use idx::{Idx, IdxError, IdxRecord, PlainIdx, Subs, VarIdx, Variance};
pub use index_set::{
    find_free_and_dummy, index_set_difference, is_dummy_pair, sort_indices, FreeDummy, IndexList,
};
pub use value::IndexValue;

const fn _default_log_level() -> LevelFilter {
    LevelFilter::Info
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralSettings {
    #[serde(default = "_default_log_level")]
    pub log_level: LevelFilter,
    #[serde(default)]
    pub log_format: LogFormat,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        GeneralSettings {
            log_level: _default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

/// Contents of a run card: logging options and the index collections to work on.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(rename = "General")]
    #[serde(default)]
    pub general: GeneralSettings,
    #[serde(rename = "Collections")]
    #[serde(default)]
    pub collections: Vec<CollectionSpec>,
}

impl Settings {
    pub fn from_file(filename: &Path) -> Result<Settings, Report> {
        let f = File::open(filename)
            .wrap_err_with(|| format!("Could not open run card {}", filename.display()))
            .suggestion("Does the path exist?")?;
        serde_yaml::from_reader(f)
            .wrap_err("Could not parse run card")
            .suggestion("Is it a correct yaml file")
    }
}
