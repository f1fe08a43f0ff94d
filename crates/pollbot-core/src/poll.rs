use std::collections::HashSet;

use crate::errors::PollError;

/// One selectable choice within a poll.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PollOption {
    pub text: String,
    pub votes: u32,
}

impl PollOption {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            votes: 0,
        }
    }
}

/// Lifecycle stage of a poll that exists.
///
/// A room without a poll has no entry at all; an ended poll is removed, so
/// there is no "finished" stage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PollStage {
    /// Options are being assembled; votes are rejected.
    Created,
    /// Voting is open. Each user id appears at most once.
    Active { voters: HashSet<String> },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Poll {
    pub title: String,
    pub options: Vec<PollOption>,
    pub stage: PollStage,
}

impl Poll {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            options: Vec::new(),
            stage: PollStage::Created,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.stage, PollStage::Active { .. })
    }

    pub fn add_option(&mut self, text: impl Into<String>) -> &PollOption {
        self.options.push(PollOption::new(text));
        &self.options[self.options.len() - 1]
    }

    /// Open voting. Requires at least two options; not re-checked afterwards.
    pub fn start(&mut self) -> Result<(), PollError> {
        if self.is_active() {
            return Err(PollError::PollAlreadyActive);
        }
        if self.options.len() < 2 {
            return Err(PollError::InsufficientOptions);
        }
        self.stage = PollStage::Active {
            voters: HashSet::new(),
        };
        Ok(())
    }

    /// Record a vote for the 1-based `index`. Nothing is mutated on error.
    pub fn vote(&mut self, user_id: &str, index: i64) -> Result<(), PollError> {
        let PollStage::Active { voters } = &mut self.stage else {
            return Err(PollError::PollNotActive);
        };

        let count = self.options.len();
        let slot = usize::try_from(index)
            .ok()
            .filter(|i| (1..=count).contains(i))
            .ok_or(PollError::IndexOutOfRange { count })?;

        if voters.contains(user_id) {
            return Err(PollError::DuplicateVote);
        }

        self.options[slot - 1].votes += 1;
        voters.insert(user_id.to_string());
        Ok(())
    }

    pub fn voter_count(&self) -> usize {
        match &self.stage {
            PollStage::Created => 0,
            PollStage::Active { voters } => voters.len(),
        }
    }

    /// Title followed by one ` <idx>. <text> (<n> votes)` line per option.
    pub fn render(&self) -> String {
        let lines: String = self
            .options
            .iter()
            .enumerate()
            .map(|(i, o)| format!(" {}. {} ({} votes)\n", i + 1, o.text, o.votes))
            .collect();
        format!("{}\n{}", self.title, lines.trim_matches('\n'))
    }
}
