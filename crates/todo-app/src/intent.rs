use std::str::FromStr;

use thiserror::Error;

use todo_core::QueryChange;
use todo_model::{DraftField, ModelError, SortKey, SortOrder, TaskPriority, TaskStatus};

/// One user action, parsed from a command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Open the form in create mode.
    New,
    /// Open the form on the card with this 1-based number.
    Edit(usize),
    Delete(usize),
    Set(DraftField, String),
    Save,
    Cancel,
    Query(QueryChange),
    Down(usize),
    Up(usize),
    Refresh,
    Renew,
    Login,
    Signup,
    Logout,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntentError {
    #[error("empty command")]
    Empty,
    #[error("unknown command: '{0}' (try `help`)")]
    Unknown(String),
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
    #[error("expected a card number, got '{0}'")]
    InvalidNumber(String),
    #[error(transparent)]
    Model(#[from] ModelError),
}

pub const HELP: &str = "\
commands:
  new                     open the create form
  edit N | delete N       act on card N
  set FIELD VALUE         title, description, status, priority, deadline
  save | cancel           submit or close the form
  priority low|medium|high|all
  status todo|in_progress|done|all
  sort creation_date|deadline|status|priority|none
  order asc|desc
  down [N] | up [N]       scroll the list
  refresh | renew         reload tasks | renew the session
  login | signup | logout
  help | quit";

impl FromStr for Intent {
    type Err = IntentError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (cmd, rest) = match line.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (line, ""),
        };

        let intent = match cmd.to_ascii_lowercase().as_str() {
            "" => return Err(IntentError::Empty),
            "new" | "create" => Intent::New,
            "edit" => Intent::Edit(card_number(rest, "edit")?),
            "delete" | "rm" => Intent::Delete(card_number(rest, "delete")?),
            "set" => {
                let (field, value) = rest
                    .split_once(char::is_whitespace)
                    .unwrap_or((rest, ""));
                if field.is_empty() {
                    return Err(IntentError::MissingArgument("set"));
                }
                Intent::Set(field.parse()?, value.trim().to_string())
            }
            "save" => Intent::Save,
            "cancel" => Intent::Cancel,
            "priority" => Intent::Query(QueryChange::Priority(filter(rest, "priority")?)),
            "status" => Intent::Query(QueryChange::Status(filter(rest, "status")?)),
            "sort" => Intent::Query(QueryChange::Sort(filter(rest, "sort")?)),
            "order" => Intent::Query(QueryChange::Order(required::<SortOrder>(rest, "order")?)),
            "down" | "j" => Intent::Down(step(rest)?),
            "up" | "k" => Intent::Up(step(rest)?),
            "refresh" | "reload" => Intent::Refresh,
            "renew" => Intent::Renew,
            "login" => Intent::Login,
            "signup" => Intent::Signup,
            "logout" => Intent::Logout,
            "help" | "?" => Intent::Help,
            "quit" | "exit" | "q" => Intent::Quit,
            _ => return Err(IntentError::Unknown(cmd.to_string())),
        };
        Ok(intent)
    }
}

fn card_number(arg: &str, cmd: &'static str) -> Result<usize, IntentError> {
    if arg.is_empty() {
        return Err(IntentError::MissingArgument(cmd));
    }
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(IntentError::InvalidNumber(arg.to_string())),
    }
}

fn step(arg: &str) -> Result<usize, IntentError> {
    if arg.is_empty() {
        return Ok(1);
    }
    arg.parse()
        .map_err(|_| IntentError::InvalidNumber(arg.to_string()))
}

fn required<T>(arg: &str, cmd: &'static str) -> Result<T, IntentError>
where
    T: FromStr<Err = ModelError>,
{
    if arg.is_empty() {
        return Err(IntentError::MissingArgument(cmd));
    }
    Ok(arg.parse()?)
}

/// `all`, `any` and `none` clear the filter.
fn filter<T>(arg: &str, cmd: &'static str) -> Result<Option<T>, IntentError>
where
    T: FromStr<Err = ModelError>,
{
    match arg.to_ascii_lowercase().as_str() {
        "all" | "any" | "none" => Ok(None),
        _ => required(arg, cmd).map(Some),
    }
}
