use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use regex::Regex;
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;

const DEFAULT_TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read model {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode model {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid token pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("model shape mismatch: {0}")]
    Shape(String),
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ModelError> {
    let raw = fs::read_to_string(path).map_err(|source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ModelError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Fitted attributes of a count vectorizer.
#[derive(Debug, Clone, Deserialize)]
pub struct VectorizerArtifact {
    pub vocabulary: HashMap<String, usize>,
    #[serde(default = "default_lowercase")]
    pub lowercase: bool,
    #[serde(default = "default_token_pattern")]
    pub token_pattern: String,
    #[serde(default)]
    pub binary: bool,
}

fn default_lowercase() -> bool {
    true
}

fn default_token_pattern() -> String {
    DEFAULT_TOKEN_PATTERN.to_string()
}

/// Bag-of-words vectorizer over a fixed vocabulary.
#[derive(Debug, Clone)]
pub struct CountVectorizer {
    vocabulary: HashMap<String, usize>,
    lowercase: bool,
    binary: bool,
    pattern: Regex,
}

impl CountVectorizer {
    pub fn from_artifact(artifact: VectorizerArtifact) -> Result<Self, ModelError> {
        let width = artifact.vocabulary.len();
        let mut seen = vec![false; width];
        for (term, &column) in &artifact.vocabulary {
            if column >= width || std::mem::replace(&mut seen[column], true) {
                return Err(ModelError::Shape(format!(
                    "term {term:?} has column {column} in a vocabulary of {width}"
                )));
            }
        }

        Ok(Self {
            pattern: Regex::new(&artifact.token_pattern)?,
            vocabulary: artifact.vocabulary,
            lowercase: artifact.lowercase,
            binary: artifact.binary,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ModelError> {
        Self::from_artifact(read_json(path)?)
    }

    pub fn width(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn transform(&self, text: &str) -> Vec<f64> {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        let mut features = vec![0.0; self.width()];
        for term in self.pattern.find_iter(&text) {
            if let Some(&column) = self.vocabulary.get(term.as_str()) {
                if self.binary {
                    features[column] = 1.0;
                } else {
                    features[column] += 1.0;
                }
            }
        }
        features
    }
}

/// Fitted multinomial Naive Bayes model.
#[derive(Debug, Clone, Deserialize)]
pub struct MultinomialNb {
    classes: Vec<String>,
    class_log_prior: Vec<f64>,
    /// One row per class, one column per vocabulary term.
    feature_log_prob: Vec<Vec<f64>>,
}

impl MultinomialNb {
    pub fn new(
        classes: Vec<String>,
        class_log_prior: Vec<f64>,
        feature_log_prob: Vec<Vec<f64>>,
    ) -> Self {
        Self {
            classes,
            class_log_prior,
            feature_log_prob,
        }
    }

    pub fn load(path: &Path) -> Result<Self, ModelError> {
        read_json(path)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn validate(&self, width: usize) -> Result<(), ModelError> {
        let n_classes = self.classes.len();
        if n_classes == 0 {
            return Err(ModelError::Shape("model has no classes".into()));
        }
        if self.class_log_prior.len() != n_classes || self.feature_log_prob.len() != n_classes {
            return Err(ModelError::Shape(format!(
                "{n_classes} classes but {} priors and {} feature rows",
                self.class_log_prior.len(),
                self.feature_log_prob.len()
            )));
        }
        if let Some(row) = self.feature_log_prob.iter().find(|row| row.len() != width) {
            return Err(ModelError::Shape(format!(
                "feature row has {} columns, vectorizer produces {width}",
                row.len()
            )));
        }
        Ok(())
    }

    pub fn joint_log_likelihood(&self, features: &[f64]) -> Vec<f64> {
        self.class_log_prior
            .iter()
            .zip(&self.feature_log_prob)
            .map(|(prior, row)| {
                prior
                    + row
                        .iter()
                        .zip(features)
                        .map(|(log_prob, count)| log_prob * count)
                        .sum::<f64>()
            })
            .collect()
    }

    /// Most likely class; the earliest class wins ties.
    pub fn predict(&self, features: &[f64]) -> Option<&str> {
        let scores = self.joint_log_likelihood(features);
        let mut best: Option<(usize, f64)> = None;
        for (idx, score) in scores.into_iter().enumerate() {
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((idx, score));
            }
        }
        best.map(|(idx, _)| self.classes[idx].as_str())
    }
}
