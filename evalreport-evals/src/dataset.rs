//! Test data for evaluation suites.

use crate::error::{EvalError, EvalResult};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A single-turn RAG sample.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RagSample {
    /// Question sent to the chatbot.
    pub user_input: String,
    /// Expected answer.
    #[serde(default)]
    pub reference: String,
    /// Context chunks the reference was derived from.
    #[serde(default)]
    pub reference_contexts: Vec<String>,
    /// Generator that produced the sample.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synthesizer_name: Option<String>,
}

/// An ordered list of samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset<Inputs> {
    /// Dataset name.
    pub name: Option<String>,
    /// Samples in file order.
    pub samples: Vec<Inputs>,
}

impl<Inputs> Dataset<Inputs> {
    /// Create a new empty dataset.
    pub fn new() -> Self {
        Self {
            name: None,
            samples: Vec::new(),
        }
    }

    /// Set the dataset name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Add a sample.
    pub fn sample(mut self, sample: Inputs) -> Self {
        self.samples.push(sample);
        self
    }

    /// Add multiple samples.
    pub fn samples(mut self, samples: impl IntoIterator<Item = Inputs>) -> Self {
        self.samples.extend(samples);
        self
    }

    /// Get the number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Take first N samples.
    pub fn take(&self, n: usize) -> Self
    where
        Inputs: Clone,
    {
        Self {
            name: self.name.clone(),
            samples: self.samples.iter().take(n).cloned().collect(),
        }
    }
}

impl<Inputs> Default for Dataset<Inputs> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Inputs: DeserializeOwned> Dataset<Inputs> {
    /// Load from a JSON file holding an array of records.
    pub fn from_json(path: impl AsRef<Path>) -> EvalResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| EvalError::dataset_load(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(content: &str) -> EvalResult<Self> {
        let samples =
            serde_json::from_str(content).map_err(|e| EvalError::Serialization(e.to_string()))?;
        Ok(Self {
            name: None,
            samples,
        })
    }

    /// Load from a YAML file holding a sequence of records.
    pub fn from_yaml(path: impl AsRef<Path>) -> EvalResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| EvalError::dataset_load(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml_str(&content)
    }

    /// Load from a YAML string.
    pub fn from_yaml_str(content: &str) -> EvalResult<Self> {
        let samples = serde_yaml::from_str(content).map_err(|e| EvalError::Yaml(e.to_string()))?;
        Ok(Self {
            name: None,
            samples,
        })
    }

    /// Load the dataset of a feature from `<root>/dataset/<feature>/<feature>_dataset.json`.
    pub fn load_feature(root: impl AsRef<Path>, feature: &str) -> EvalResult<Self> {
        let path = feature_path(root, feature);
        tracing::debug!(feature, path = %path.display(), "Loading dataset");
        Ok(Self::from_json(&path)?.with_name(feature))
    }
}

impl<Inputs: Serialize> Dataset<Inputs> {
    /// Serialize to a JSON string.
    pub fn to_json_string(&self) -> EvalResult<String> {
        serde_json::to_string_pretty(&self.samples)
            .map_err(|e| EvalError::Serialization(e.to_string()))
    }

    /// Save to a JSON file.
    pub fn to_json(&self, path: impl AsRef<Path>) -> EvalResult<()> {
        let content = self.to_json_string()?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }
}

/// Location of a feature's dataset file under `root`.
pub fn feature_path(root: impl AsRef<Path>, feature: &str) -> PathBuf {
    root.as_ref()
        .join("dataset")
        .join(feature)
        .join(format!("{}_dataset.json", feature))
}
