use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::fund::Fund;

/// Dataset problems that stop a run before any scoring happens.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read fund dataset at {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("fund dataset is not a valid JSON array of fund records: {0}")]
    Unparsable(#[from] serde_json::Error),

    #[error("fund record #{index} has no name")]
    MissingName { index: usize },
}

/// Read-only, ordered collection of funds loaded once per invocation.
#[derive(Debug, Clone, Default)]
pub struct FundDataset {
    funds: Vec<Fund>,
}

impl FundDataset {
    /// Load and validate a dataset file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The content is not a JSON array of objects
    /// - Any record has a missing or blank `name`
    pub fn load(path: &Path) -> Result<Self, InputError> {
        let content = fs::read_to_string(path).map_err(|source| InputError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let dataset = Self::from_json(&content)?;
        tracing::debug!(path = %path.display(), funds = dataset.len(), "loaded fund dataset");
        Ok(dataset)
    }

    pub fn from_json(json: &str) -> Result<Self, InputError> {
        let funds: Vec<Fund> = serde_json::from_str(json)?;
        Self::from_funds(funds)
    }

    /// Validate records and wrap them. Record order is preserved; it is the tie-break
    /// order for equal scores.
    pub fn from_funds(mut funds: Vec<Fund>) -> Result<Self, InputError> {
        let mut seen = HashSet::new();
        for (index, fund) in funds.iter_mut().enumerate() {
            let trimmed = fund.name.trim();
            if trimmed.is_empty() {
                return Err(InputError::MissingName { index });
            }
            if trimmed.len() != fund.name.len() {
                fund.name = trimmed.to_string();
            }
            if !seen.insert(fund.name.to_lowercase()) {
                tracing::warn!(fund = %fund.name, index, "duplicate fund name in dataset");
            }
        }
        Ok(Self { funds })
    }

    pub fn funds(&self) -> &[Fund] {
        &self.funds
    }

    pub fn len(&self) -> usize {
        self.funds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.funds.is_empty()
    }
}
