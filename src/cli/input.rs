use serde::{Deserialize, Serialize};
use symbolica::{atom::Atom, try_parse};
use thiserror::Error;

use crate::{
    idx::{Idx, IdxError, Variance},
    Settings,
};

#[derive(Error, Debug)]
pub enum InputError {
    #[error("index {position} of collection '{collection}' is invalid")]
    Index {
        collection: String,
        position: usize,
        #[source]
        source: IdxError,
    },
    #[error("index {position} of collection '{collection}': cannot parse expression: {reason}")]
    Parse {
        collection: String,
        position: usize,
        reason: String,
    },
    #[error("no collection named '{0}' in the run card")]
    UnknownCollection(String),
}

/// One index as written in a run card. Without a variance the index is plain.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct IndexSpec {
    pub value: String,
    pub dim: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variance: Option<Variance>,
}

impl IndexSpec {
    /// `collection` and `position` locate the entry in error reports.
    pub fn build(&self, collection: &str, position: usize) -> Result<Idx, InputError> {
        let parse = |input: &str| -> Result<Atom, InputError> {
            try_parse!(input).map_err(|reason| InputError::Parse {
                collection: collection.to_string(),
                position,
                reason,
            })
        };
        let value = parse(&self.value)?;
        let dim = parse(&self.dim)?;

        match self.variance {
            Some(variance) => Idx::variant(value, dim, variance),
            None => Idx::new(value, dim),
        }
        .map_err(|source| InputError::Index {
            collection: collection.to_string(),
            position,
            source,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CollectionSpec {
    pub name: String,
    #[serde(default)]
    pub indices: Vec<IndexSpec>,
}

impl CollectionSpec {
    pub fn build(&self) -> Result<Vec<Idx>, InputError> {
        self.indices
            .iter()
            .enumerate()
            .map(|(position, spec)| spec.build(&self.name, position))
            .collect()
    }
}

impl Settings {
    pub fn collection(&self, name: &str) -> Result<&CollectionSpec, InputError> {
        self.collections
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| InputError::UnknownCollection(name.to_string()))
    }

    /// The named collection, or all of them.
    pub fn selected(&self, name: Option<&str>) -> Result<Vec<&CollectionSpec>, InputError> {
        match name {
            Some(name) => Ok(vec![self.collection(name)?]),
            None => Ok(self.collections.iter().collect()),
        }
    }
}
