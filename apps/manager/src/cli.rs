//! Command line parsing.

use glr_updater::{NO_UPDATE_FLAG, POST_UPDATE_FLAG, UpdateFlags};

pub const USAGE: &str = "\
usage: glr-manager [-NoUpdate] [-PostUpdate] <command>

commands:
  profiles                          list profiles
  show <profile>                    list the games of a profile
  create <name>                     create an empty profile
  remove <name>                     delete a profile
  search <query> [--into <profile>] search the catalog, optionally adding results
  dlc <store-url>                   list the DLC of a store page
  apply [profile]                   write a profile to the AppList
  applist                           print the current AppList ids";

/// A manager command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Profiles,
    Show(String),
    Create(String),
    Remove(String),
    Search { query: String, into: Option<String> },
    Dlc(String),
    /// `None` applies the last used profile.
    Apply(Option<String>),
    AppList,
}

/// Parsed invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub flags: UpdateFlags,
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageError(pub String);

impl std::fmt::Display for UsageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\n\n{USAGE}", self.0)
    }
}

impl std::error::Error for UsageError {}

/// Parses the arguments after the program name.
pub fn parse<I, S>(args: I) -> Result<Invocation, UsageError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let args: Vec<String> = args.into_iter().map(Into::into).collect();
    let flags = UpdateFlags::from_args(&args);
    let mut rest = args
        .into_iter()
        .filter(|a| a != NO_UPDATE_FLAG && a != POST_UPDATE_FLAG);

    let Some(name) = rest.next() else {
        return Ok(Invocation {
            flags,
            command: None,
        });
    };

    let mut required = |what: &str| {
        rest.next()
            .ok_or_else(|| UsageError(format!("{name}: missing {what}")))
    };
    let command = match name.as_str() {
        "profiles" => Command::Profiles,
        "show" => Command::Show(required("profile name")?),
        "create" => Command::Create(required("profile name")?),
        "remove" => Command::Remove(required("profile name")?),
        "dlc" => Command::Dlc(required("store URL")?),
        "apply" => Command::Apply(rest.next()),
        "applist" => Command::AppList,
        "search" => {
            let query = required("query")?;
            let into = match rest.next().as_deref() {
                None => None,
                Some("--into") => Some(
                    rest.next()
                        .ok_or_else(|| UsageError("search: --into needs a profile".into()))?,
                ),
                Some(other) => return Err(UsageError(format!("search: unexpected {other:?}"))),
            };
            Command::Search { query, into }
        }
        other => return Err(UsageError(format!("unknown command {other:?}"))),
    };

    Ok(Invocation {
        flags,
        command: Some(command),
    })
}
