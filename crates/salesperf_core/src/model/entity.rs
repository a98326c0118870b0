//! Entity records and the normalized key used to join them
//!
//! Volume and Amount arrive as separate datasets whose display names can drift
//! independently (merge rules append a marker, upstream casing differs). Every
//! join and set operation in the engine goes through [`EntityKey`].

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::safe_math::value_at;

/// Suffix appended to the display name of a merged entity
pub const MERGE_MARKER: char = '*';

/// Normalized entity identity: trimmed, lower-cased, merge marker stripped
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityKey(String);

impl EntityKey {
    pub fn new(name: &str) -> Self {
        let stripped = name.trim().trim_end_matches(MERGE_MARKER).trim_end();
        Self(stripped.to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntityKey {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One product group or customer row of a single metric dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub name: String,
    #[serde(alias = "raw_values", alias = "rawValues")]
    pub values: Vec<f64>,
}

impl EntityRecord {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn key(&self) -> EntityKey {
        EntityKey::new(&self.name)
    }
}

/// An entity with its Volume and Amount rows joined by key
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub key: EntityKey,
    /// Display name, taken from the Volume dataset when present
    pub name: String,
    pub volume: Vec<f64>,
    /// Empty when the Amount dataset has no row for this entity
    pub amount: Vec<f64>,
}

impl Entity {
    pub fn volume_at(&self, index: Option<usize>) -> f64 {
        value_at(&self.volume, index)
    }

    pub fn amount_at(&self, index: Option<usize>) -> f64 {
        value_at(&self.amount, index)
    }
}

/// Add `values` into `target` element-wise, growing it if needed
pub(crate) fn accumulate(target: &mut Vec<f64>, values: &[f64]) {
    if target.len() < values.len() {
        target.resize(values.len(), 0.0);
    }
    for (slot, value) in target.iter_mut().zip(values) {
        if value.is_finite() {
            *slot += value;
        }
    }
}

/// Non-finite cells of a fresh row read as 0, matching later summed rows
fn seeded(values: &[f64]) -> Vec<f64> {
    let mut row = Vec::with_capacity(values.len());
    accumulate(&mut row, values);
    row
}

/// Join Volume and Amount datasets by [`EntityKey`].
///
/// Volume order defines entity order. Amount rows without a Volume
/// counterpart are appended with an empty volume row. Rows sharing a key
/// within one dataset are summed.
pub fn join_datasets(volume: &[EntityRecord], amount: &[EntityRecord]) -> Vec<Entity> {
    let mut positions: FxHashMap<EntityKey, usize> = FxHashMap::default();
    let mut entities: Vec<Entity> = Vec::with_capacity(volume.len());

    for record in volume {
        let key = record.key();
        match positions.get(&key) {
            Some(&i) => {
                tracing::debug!(entity = %key, "summing duplicate volume row");
                accumulate(&mut entities[i].volume, &record.values);
            }
            None => {
                positions.insert(key.clone(), entities.len());
                entities.push(Entity {
                    key,
                    name: record.name.trim().to_string(),
                    volume: seeded(&record.values),
                    amount: Vec::new(),
                });
            }
        }
    }

    for record in amount {
        let key = record.key();
        match positions.get(&key) {
            Some(&i) => accumulate(&mut entities[i].amount, &record.values),
            None => {
                tracing::debug!(entity = %key, "amount row has no volume counterpart");
                positions.insert(key.clone(), entities.len());
                entities.push(Entity {
                    key,
                    name: record.name.trim().to_string(),
                    volume: Vec::new(),
                    amount: seeded(&record.values),
                });
            }
        }
    }

    entities
}
