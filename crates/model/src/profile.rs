//! Named, ordered game lists.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::game::Game;

/// A named list of games. List order is the AppList file order.
///
/// Two profiles are equal when their names match, regardless of contents.
///
/// When decoding, an entry that is not a valid game is dropped with a
/// warning instead of failing the whole profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    #[serde(deserialize_with = "valid_games")]
    pub games: Vec<Game>,
}

fn valid_games<'de, D>(deserializer: D) -> Result<Vec<Game>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let entries = Vec::<serde_json::Value>::deserialize(deserializer)?;
    Ok(entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match Game::deserialize(&entry) {
            Ok(game) => Some(game),
            Err(e) => {
                tracing::warn!(index, entry = %entry, error = %e, "dropping invalid game entry");
                None
            }
        })
        .collect())
}

/// Selects a game to remove from a profile.
#[derive(Debug, Clone, Copy)]
pub enum GameSelector<'a> {
    /// Structural match on id, name and kind.
    Game(&'a Game),
    /// First game whose display name matches.
    Name(&'a str),
}

impl<'a> From<&'a Game> for GameSelector<'a> {
    fn from(game: &'a Game) -> Self {
        GameSelector::Game(game)
    }
}

impl<'a> From<&'a str> for GameSelector<'a> {
    fn from(name: &'a str) -> Self {
        GameSelector::Name(name)
    }
}

impl GameSelector<'_> {
    fn matches(&self, game: &Game) -> bool {
        match self {
            GameSelector::Game(target) => *target == game,
            GameSelector::Name(name) => game.name == *name,
        }
    }
}

impl Profile {
    /// Creates an empty profile.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            games: Vec::new(),
        }
    }

    /// Creates a profile that owns the given games.
    pub fn with_games(name: impl Into<String>, games: Vec<Game>) -> Self {
        Self {
            name: name.into(),
            games,
        }
    }

    /// Appends a game at the end of the list.
    pub fn add_game(&mut self, game: Game) {
        self.games.push(game);
    }

    /// Removes the first game matching `selector` and returns it.
    ///
    /// Several games may share a display name; removal by name only takes
    /// the first one in list order.
    pub fn remove_game<'a>(&mut self, selector: impl Into<GameSelector<'a>>) -> Option<Game> {
        let selector = selector.into();
        let index = self.games.iter().position(|g| selector.matches(g))?;
        Some(self.games.remove(index))
    }

    /// Returns the profile document as a JSON value.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name,
            "games": self.games.iter().map(Game::to_json).collect::<Vec<_>>(),
        })
    }

    /// Decodes a profile document.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, ModelError> {
        Ok(Profile::deserialize(value)?)
    }
}

impl PartialEq for Profile {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Profile {}
