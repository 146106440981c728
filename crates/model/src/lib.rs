//! Entity model shared by every GLR Manager crate.
//!
//! - [`Game`]: one storefront entry (base game or DLC) identified by its app id.
//! - [`Profile`]: a named, ordered list of games; the unit that gets applied
//!   to the loader's AppList.
//! - [`Config`]: flat user preferences persisted as `config.json`.
//!
//! All three are plain values with JSON (de)serialization; persistence lives
//! in `glr-config` and `glr-profiles`.

pub mod config;
pub mod error;
pub mod game;
pub mod profile;

pub use config::{CURRENT_VERSION, Config};
pub use error::ModelError;
pub use game::{Game, GameKind};
pub use profile::{GameSelector, Profile};
