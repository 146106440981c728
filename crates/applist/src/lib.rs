//! AppList materialization.
//!
//! GreenLuma reads the games to unlock from `AppList/<n>.txt`, one app id
//! per file, numbered from zero. The directory lives next to the manager
//! executable.

mod error;
mod writer;

pub use error::AppListError;
pub use writer::{APPLIST_DIR_NAME, AppListWriter};
