/// Infrastructure error type.
///
/// Adapter crates map their specific errors into this type so the bot core can
/// handle transport/config failures consistently.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// User-facing poll conditions.
///
/// None of these are fatal: the `Display` text is relayed to the chat verbatim.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PollError {
    #[error("There is no poll.")]
    NoPollExists,

    #[error("The poll '{title}' already exists.")]
    PollAlreadyExists { title: String },

    #[error("The poll is currently running.")]
    PollAlreadyActive,

    #[error("Use !poll option <option> to add options.")]
    InsufficientOptions,

    #[error("There is no active poll. Use !poll start to start the poll.")]
    PollNotActive,

    #[error("Please choose a number between 1 to {count}")]
    IndexOutOfRange { count: usize },

    #[error("You have already voted.")]
    DuplicateVote,

    /// Malformed or missing command arguments (adapter level).
    #[error("{0}")]
    InvalidArgument(String),
}
