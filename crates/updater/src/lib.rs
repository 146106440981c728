//! Update coordination.
//!
//! At startup the manager may hand control to an external updater. The
//! updater drops replacement files as `new_<name>` next to the originals and
//! restarts the manager with `-PostUpdate`, which swaps them into place.

mod error;
mod updater;

pub use error::UpdateError;
pub use updater::{
    NO_UPDATE_FLAG, PENDING_PREFIX, POST_UPDATE_FLAG, UPDATER_EXE, UpdateCheck, UpdateFlags,
    Updater,
};
