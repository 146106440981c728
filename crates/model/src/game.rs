//! Storefront game entries.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Kind of storefront entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameKind {
    #[serde(rename = "Game")]
    Game,
    #[serde(rename = "DLC")]
    Dlc,
}

impl GameKind {
    /// Returns the on-disk spelling (`"Game"` or `"DLC"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            GameKind::Game => "Game",
            GameKind::Dlc => "DLC",
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Game" => Ok(GameKind::Game),
            "DLC" => Ok(GameKind::Dlc),
            other => Err(ModelError::UnknownKind(other.to_string())),
        }
    }
}

/// A single storefront entry.
///
/// Equality is structural: two games are equal when id, name and kind all
/// match. Every decoded game goes through [`Game::from_fields`], so the id is
/// never empty and both strings are trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawGame")]
pub struct Game {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: GameKind,
}

/// Wire shape of a game before validation.
#[derive(Deserialize)]
struct RawGame {
    id: String,
    name: String,
    #[serde(rename = "type")]
    kind: String,
}

impl TryFrom<RawGame> for Game {
    type Error = ModelError;

    fn try_from(raw: RawGame) -> Result<Self, Self::Error> {
        Game::from_fields(&raw.id, &raw.name, &raw.kind)
    }
}

impl Game {
    /// Creates a game, trimming `id` and `name`.
    pub fn new(id: &str, name: &str, kind: GameKind) -> Result<Self, ModelError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(ModelError::EmptyId);
        }
        Ok(Self {
            id: id.to_string(),
            name: name.trim().to_string(),
            kind,
        })
    }

    /// Creates a game from raw positional string fields.
    pub fn from_fields(id: &str, name: &str, kind: &str) -> Result<Self, ModelError> {
        Game::new(id, name, kind.parse()?)
    }

    /// Returns the `{"id", "name", "type"}` mapping.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id,
            "name": self.name,
            "type": self.kind.as_str(),
        })
    }

    /// Decodes a game from a JSON mapping.
    ///
    /// Fails with [`ModelError::Malformed`] if a key is missing, has the
    /// wrong type, or carries an invalid value.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, ModelError> {
        Ok(Game::deserialize(value)?)
    }

    /// Flattens the game into `[id, name, type]` for tabular display.
    pub fn to_row(&self) -> [String; 3] {
        [
            self.id.clone(),
            self.name.clone(),
            self.kind.as_str().to_string(),
        ]
    }

    /// Decodes a flat `id, name, type, id, name, type, …` sequence.
    ///
    /// Every three consecutive values form one game. A trailing remainder of
    /// one or two values is ignored.
    pub fn from_table_list<S: AsRef<str>>(values: &[S]) -> Result<Vec<Game>, ModelError> {
        let chunks = values.chunks_exact(3);
        if !chunks.remainder().is_empty() {
            tracing::debug!(
                len = values.len(),
                ignored = chunks.remainder().len(),
                "table list is not a multiple of three, ignoring trailing values"
            );
        }

        chunks
            .map(|row| Game::from_fields(row[0].as_ref(), row[1].as_ref(), row[2].as_ref()))
            .collect()
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ID: {}", self.id)?;
        writeln!(f, "Name: {}", self.name)?;
        writeln!(f, "Type: {}", self.kind)
    }
}
