//! Monster stat tables.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Placeholder in sprite path patterns replaced by the animation letter.
pub const ANIMATION_PLACEHOLDER: &str = "%c";

/// Static properties of one monster type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterData {
    pub name: String,
    /// Sprite path with `%c` standing for the animation letter.
    pub sprite_path: String,
    pub sound_path: String,
    pub level: i32,
    pub min_hp: i32,
    pub max_hp: i32,
    pub armour_class: i32,
    pub to_hit: i32,
    pub min_damage: i32,
    pub max_damage: i32,
    pub experience: u32,
}

/// Looks monster types up by name.
pub trait MonsterDataProvider {
    fn monster(&self, name: &str) -> Option<&MonsterData>;
}

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("monster '{0}' is defined twice")]
    Duplicate(String),
    #[error("monster '{name}': {reason}")]
    Invalid { name: String, reason: String },
}

/// Monster table loaded from JSON: an array of [`MonsterData`].
#[derive(Debug, Clone, Default)]
pub struct MonsterTable {
    monsters: BTreeMap<String, MonsterData>,
}

impl MonsterTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, DataError> {
        let entries: Vec<MonsterData> = serde_json::from_str(json)?;
        let mut table = Self::new();
        for entry in entries {
            table.insert(entry)?;
        }
        tracing::debug!(monsters = table.len(), "monster table loaded");
        Ok(table)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn insert(&mut self, data: MonsterData) -> Result<(), DataError> {
        validate(&data)?;
        if self.monsters.contains_key(&data.name) {
            return Err(DataError::Duplicate(data.name));
        }
        self.monsters.insert(data.name.clone(), data);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.monsters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monsters.is_empty()
    }

    /// Monster names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.monsters.keys().map(String::as_str)
    }
}

impl MonsterDataProvider for MonsterTable {
    fn monster(&self, name: &str) -> Option<&MonsterData> {
        self.monsters.get(name)
    }
}

fn validate(data: &MonsterData) -> Result<(), DataError> {
    let invalid = |reason: &str| DataError::Invalid {
        name: data.name.clone(),
        reason: reason.to_owned(),
    };
    if data.min_hp > data.max_hp {
        return Err(invalid("min_hp exceeds max_hp"));
    }
    if data.min_damage > data.max_damage {
        return Err(invalid("min_damage exceeds max_damage"));
    }
    if !data.sprite_path.contains(ANIMATION_PLACEHOLDER) {
        return Err(invalid("sprite_path has no %c placeholder"));
    }
    Ok(())
}
