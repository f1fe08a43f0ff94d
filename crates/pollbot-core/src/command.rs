use std::sync::OnceLock;

use regex::Regex;

use crate::{
    errors::PollError,
    store::{PollResult, PollStore},
};

pub const USAGE: &str = "Usage: !poll <command> [arg...]

Poll.

Commands:

!poll show
    Show the poll
!poll new <title>
    Create a new poll
!poll remove
    Remove the poll
!poll option <option>
    Add an option to the poll
!poll start
    Start the poll
!poll end
    Stop the currently running poll
!poll vote <index>
    Vote for the currently running poll";

fn trigger() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // `!poll`, or Telegram style `/poll` and `/poll@botname`.
    RE.get_or_init(|| Regex::new(r"^\s*[!/]poll(?:@\w+)?(?:\s|$)").expect("valid regex"))
}

/// True when `text` is addressed to the poll plugin.
pub fn is_poll_command(text: &str) -> bool {
    trigger().is_match(text)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PollCommand {
    Show,
    New { title: String },
    Remove,
    AddOption { text: String },
    Start,
    End,
    Vote { index: i64 },
}

impl PollCommand {
    /// Parse a full `!poll ...` message. Errors carry the usage/help text.
    pub fn parse(text: &str) -> Result<Self, PollError> {
        let argv: Vec<&str> = text.split_whitespace().collect();
        if argv.len() < 2 {
            return Err(PollError::InvalidArgument(USAGE.to_string()));
        }

        let rest = || argv[2..].join(" ");
        let usage = |s: &str| PollError::InvalidArgument(format!("Usage: !poll {s}"));

        match argv[1] {
            "show" => Ok(Self::Show),
            "new" if argv.len() < 3 => Err(usage("new <title>")),
            "new" => Ok(Self::New { title: rest() }),
            "remove" => Ok(Self::Remove),
            "option" if argv.len() < 3 => Err(usage("option <option>")),
            "option" => Ok(Self::AddOption { text: rest() }),
            "start" => Ok(Self::Start),
            "end" => Ok(Self::End),
            "vote" if argv.len() < 3 => Err(usage("vote <index>")),
            "vote" => argv[2]
                .parse::<i64>()
                .map(|index| Self::Vote { index })
                .map_err(|_| {
                    PollError::InvalidArgument(
                        "Please vote using the numerical index of the option.".to_string(),
                    )
                }),
            _ => Err(PollError::InvalidArgument(format!(
                "Wrong command.\n{USAGE}"
            ))),
        }
    }

    /// Short name used in logs and the audit trail.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Show => "show",
            Self::New { .. } => "new",
            Self::Remove => "remove",
            Self::AddOption { .. } => "option",
            Self::Start => "start",
            Self::End => "end",
            Self::Vote { .. } => "vote",
        }
    }

    pub fn execute(&self, store: &PollStore, room_id: &str, user_id: &str) -> PollResult {
        match self {
            Self::Show => store.show(room_id),
            Self::New { title } => store.new_poll(room_id, title),
            Self::Remove => store.remove(room_id),
            Self::AddOption { text } => store.add_option(room_id, text),
            Self::Start => store.start(room_id),
            Self::End => store.end(room_id),
            Self::Vote { index } => store.vote(room_id, user_id, *index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigger_matches_bang_and_slash_forms() {
        assert!(is_poll_command("!poll"));
        assert!(is_poll_command("  !poll show"));
        assert!(is_poll_command("/poll vote 2"));
        assert!(is_poll_command("/poll@pizza_bot show"));
        assert!(!is_poll_command("!polling"));
        assert!(!is_poll_command("hello !poll"));
    }

    #[test]
    fn joins_multi_word_arguments() {
        assert_eq!(
            PollCommand::parse("!poll new Best   Pizza ever").unwrap(),
            PollCommand::New {
                title: "Best Pizza ever".to_string()
            }
        );
        assert_eq!(
            PollCommand::parse("!poll option Extra cheese").unwrap(),
            PollCommand::AddOption {
                text: "Extra cheese".to_string()
            }
        );
    }

    #[test]
    fn bare_trigger_returns_usage() {
        assert_eq!(
            PollCommand::parse("!poll"),
            Err(PollError::InvalidArgument(USAGE.to_string()))
        );
    }

    #[test]
    fn missing_arguments_return_subcommand_usage() {
        let err = PollCommand::parse("!poll new").unwrap_err();
        assert_eq!(err.to_string(), "Usage: !poll new <title>");
        let err = PollCommand::parse("!poll vote").unwrap_err();
        assert_eq!(err.to_string(), "Usage: !poll vote <index>");
    }

    #[test]
    fn non_numeric_vote_index_is_rejected_without_a_vote() {
        let err = PollCommand::parse("!poll vote two").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Please vote using the numerical index of the option."
        );
    }

    #[test]
    fn negative_vote_index_parses_and_is_range_checked_later() {
        assert_eq!(
            PollCommand::parse("!poll vote -1").unwrap(),
            PollCommand::Vote { index: -1 }
        );
    }

    #[test]
    fn unknown_subcommand_includes_usage() {
        let err = PollCommand::parse("!poll frobnicate").unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("Wrong command.\n"));
        assert!(msg.ends_with(USAGE));
    }

    #[test]
    fn execute_routes_to_store() {
        let store = PollStore::new();
        let new = PollCommand::parse("!poll new Lunch").unwrap();
        assert!(new.execute(&store, "r", "u").is_ok());
        assert_eq!(
            PollCommand::Show.execute(&store, "r", "u").unwrap(),
            "Poll (Inactive):\nLunch\n"
        );
    }
}
