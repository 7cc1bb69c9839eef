use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::Report;
use colored::Colorize;
use itertools::Itertools;
use log::{debug, LevelFilter};
use serde::{Deserialize, Serialize};

use crate::{
    idx::Idx,
    index_set::{find_free_and_dummy, index_set_difference, sort_indices},
    Settings,
};

pub mod input;
pub mod state;

#[derive(Parser, Debug)]
#[command(name = "idxalgebra", version, about)]
#[command(next_line_help = true)]
pub struct Cli {
    /// Path to the run card listing the index collections
    #[arg(short = 'c', long, default_value = "./indices.yaml")]
    pub card: PathBuf,

    /// Log level, overrides the run card
    #[arg(short = 'l', long)]
    pub level: Option<LevelFilter>,

    /// Log format, overrides the run card
    #[arg(short, long, value_enum)]
    pub format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Split collections into free and dummy indices
    Classify {
        /// Only this collection
        name: Option<String>,
    },
    /// Print collections in canonical order
    Sort {
        /// Only this collection
        name: Option<String>,
    },
    /// Indices of one collection that do not occur in another
    Difference { left: String, right: String },
}

#[repr(usize)]
#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Debug,
    Hash,
    Default,
    ValueEnum,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Long,
    Short,
    Min,
    None,
}

fn show(indices: &[Idx]) -> String {
    if indices.is_empty() {
        "-".to_string()
    } else {
        indices.iter().join(" ")
    }
}

impl Cli {
    pub fn run(self) -> Result<(), Report> {
        let settings = Settings::from_file(&self.card)?;
        state::setup_log(
            self.level.unwrap_or(settings.general.log_level),
            self.format.unwrap_or(settings.general.log_format),
        )?;
        debug!(
            "Loaded {} collections from {}",
            settings.collections.len(),
            self.card.display()
        );

        match &self.command {
            Commands::Classify { name } => {
                for collection in settings.selected(name.as_deref())? {
                    let indices = collection.build()?;
                    let res = find_free_and_dummy(&indices);
                    println!(
                        "{}: free {} | dummy {}",
                        collection.name.bold(),
                        show(&res.free).green(),
                        show(&res.dummy).blue()
                    );
                }
            }
            Commands::Sort { name } => {
                for collection in settings.selected(name.as_deref())? {
                    let mut indices = collection.build()?;
                    sort_indices(&mut indices);
                    println!("{}: {}", collection.name.bold(), show(&indices));
                }
            }
            Commands::Difference { left, right } => {
                let a = settings.collection(left)?.build()?;
                let b = settings.collection(right)?.build()?;
                println!(
                    "{} \\ {}: {}",
                    left.bold(),
                    right.bold(),
                    show(&index_set_difference(&a, &b))
                );
            }
        }
        Ok(())
    }
}
