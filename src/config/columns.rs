//! Column map for classification tables

use serde::{Deserialize, Serialize};

/// Names of the table columns holding the three match roles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    /// Column with the id of the first image
    pub entity_a: String,
    /// Column with the id of the second image
    pub entity_b: String,
    /// Column holding 1 when the first image was judged more complex
    pub outcome_for_a: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            entity_a: "image_id_0".to_string(),
            entity_b: "image_id_1".to_string(),
            outcome_for_a: "image0_more_complex_image1".to_string(),
        }
    }
}

impl ColumnMap {
    pub fn new(
        entity_a: impl Into<String>,
        entity_b: impl Into<String>,
        outcome_for_a: impl Into<String>,
    ) -> Self {
        Self {
            entity_a: entity_a.into(),
            entity_b: entity_b.into(),
            outcome_for_a: outcome_for_a.into(),
        }
    }

    /// Column names in role order
    pub fn names(&self) -> [&str; 3] {
        [&self.entity_a, &self.entity_b, &self.outcome_for_a]
    }
}
