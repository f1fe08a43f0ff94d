use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

use crate::{
    errors::PollError,
    poll::{Poll, PollStage},
};

pub type PollResult = std::result::Result<String, PollError>;

/// In-memory registry of polls keyed by room id.
///
/// Every operation holds the single store lock for its whole read-modify-write,
/// so concurrent votes never lose updates or slip past the duplicate check.
/// State lives only as long as the process.
#[derive(Debug, Default)]
pub struct PollStore {
    polls: Mutex<HashMap<String, Poll>>,
}

impl PollStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Poll>> {
        // Mutations are applied only after all checks pass, so a poisoned map
        // is still consistent.
        self.polls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of rooms that currently have a poll.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn show(&self, room_id: &str) -> PollResult {
        let polls = self.lock();
        let poll = polls.get(room_id).ok_or(PollError::NoPollExists)?;

        let status = match poll.stage {
            PollStage::Created => " (Inactive)",
            PollStage::Active { .. } => "",
        };
        Ok(format!("Poll{status}:\n{}", poll.render()))
    }

    pub fn new_poll(&self, room_id: &str, title: &str) -> PollResult {
        let mut polls = self.lock();
        if let Some(existing) = polls.get(room_id) {
            return Err(PollError::PollAlreadyExists {
                title: existing.title.clone(),
            });
        }

        polls.insert(room_id.to_string(), Poll::new(title));
        tracing::debug!(room = room_id, title, "poll created");

        Ok(format!(
            "Poll '{title}' created.\nUse !poll option <option> to add options."
        ))
    }

    /// Delete the room's poll whatever its stage.
    pub fn remove(&self, room_id: &str) -> PollResult {
        let mut polls = self.lock();
        polls.remove(room_id).ok_or(PollError::NoPollExists)?;
        tracing::debug!(room = room_id, "poll removed");
        Ok("Poll removed.".to_string())
    }

    /// Options may be appended in any stage, including while voting is open.
    pub fn add_option(&self, room_id: &str, text: &str) -> PollResult {
        let mut polls = self.lock();
        let poll = polls.get_mut(room_id).ok_or(PollError::NoPollExists)?;
        let option = poll.add_option(text);
        Ok(format!("Added option: {}", option.text))
    }

    pub fn start(&self, room_id: &str) -> PollResult {
        let mut polls = self.lock();
        let poll = polls.get_mut(room_id).ok_or(PollError::NoPollExists)?;
        poll.start()?;
        tracing::debug!(room = room_id, options = poll.options.len(), "poll started");
        Ok(format!("Poll:\n{}", poll.render()))
    }

    /// `index` is 1-based, as shown to users.
    pub fn vote(&self, room_id: &str, user_id: &str, index: i64) -> PollResult {
        let mut polls = self.lock();
        let poll = polls.get_mut(room_id).ok_or(PollError::NoPollExists)?;
        poll.vote(user_id, index)?;
        Ok(format!("Poll:\n{}", poll.render()))
    }

    /// Close voting and drop the poll, returning the final tally.
    pub fn end(&self, room_id: &str) -> PollResult {
        let mut polls = self.lock();
        match polls.get(room_id) {
            None => return Err(PollError::NoPollExists),
            Some(poll) if !poll.is_active() => return Err(PollError::PollNotActive),
            Some(_) => {}
        }

        let poll = polls.remove(room_id).ok_or(PollError::NoPollExists)?;
        tracing::debug!(room = room_id, voters = poll.voter_count(), "poll ended");
        Ok(format!("Poll finished, final results:\n{}", poll.render()))
    }
}
