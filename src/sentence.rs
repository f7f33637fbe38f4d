use include_dir::{include_dir, Dir};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{DojoError, Result};

static SENTENCE_DIR: Dir = include_dir!("src/sentences");

const BUILTIN_FILE: &str = "default.json";

/// A practice sentence. Field names follow the stored sentence list
/// (`sentence`, `add_user_id`); `text` and `owner_id` are accepted as well.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Sentence {
    pub id: i64,
    #[serde(rename = "sentence", alias = "text")]
    pub text: String,
    pub tag: String,
    #[serde(rename = "add_user_id", alias = "owner_id", default)]
    pub owner_id: Option<i64>,
}

impl Sentence {
    pub fn new(id: i64, text: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            tag: tag.into(),
            owner_id: None,
        }
    }
}

/// Ordered, read-only, never-empty list of sentences
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentenceSet {
    sentences: Vec<Sentence>,
}

impl SentenceSet {
    pub fn new(sentences: Vec<Sentence>) -> Result<Self> {
        if sentences.is_empty() {
            return Err(DojoError::EmptySentenceSet);
        }
        Ok(Self { sentences })
    }

    /// The sentence list compiled into the binary
    pub fn builtin() -> Result<Self> {
        let file = SENTENCE_DIR.get_file(BUILTIN_FILE).ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "builtin sentence list missing")
        })?;
        let contents = file.contents_utf8().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, "builtin sentence list is not utf-8")
        })?;
        Self::from_json(contents)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let sentences: Vec<Sentence> = serde_json::from_str(json)?;
        Self::new(sentences)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        tracing::debug!("loaded sentence list from {}", path.as_ref().display());
        Self::from_json(&contents)
    }

    /// Sentences carrying `tag`, compared case-insensitively
    pub fn with_tag(&self, tag: &str) -> Result<Self> {
        let wanted = tag.to_lowercase();
        let filtered: Vec<Sentence> = self
            .sentences
            .iter()
            .filter(|s| s.tag.to_lowercase() == wanted)
            .cloned()
            .collect();

        if filtered.is_empty() {
            return Err(DojoError::UnknownTag(tag.to_string()));
        }
        Ok(Self {
            sentences: filtered,
        })
    }

    /// Distinct tags in first-appearance order
    pub fn tags(&self) -> Vec<&str> {
        self.sentences.iter().map(|s| s.tag.as_str()).unique().collect()
    }

    pub fn get(&self, idx: usize) -> Option<&Sentence> {
        self.sentences.get(idx)
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sentence> {
        self.sentences.iter()
    }
}
