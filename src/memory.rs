// src/memory.rs
//! In-memory `PollStore`.
//!
//! All state sits behind one mutex. A vote's uniqueness check and its insert
//! happen under the same lock acquisition, which gives the same guarantee as
//! the `votes_user_poll_key` constraint in Postgres. The option ownership
//! check mirrors the `votes_option_fkey` foreign key.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::models::{NewVote, OptionTally, Poll, PollOption, Vote};
use crate::store::{PollStore, StoreError};

#[derive(Default)]
struct Tables {
    polls: Vec<Poll>,
    options: Vec<PollOption>,
    votes: Vec<Vote>,
    voted: HashSet<(String, i64)>,
}

#[derive(Default)]
pub struct InMemoryPollStore {
    tables: Mutex<Tables>,
}

impl InMemoryPollStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        // Nothing below panics between pushes, so a poisoned guard is still consistent.
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl PollStore for InMemoryPollStore {
    async fn create_poll(&self, question: &str, options: &[String]) -> Result<i64, StoreError> {
        let mut tables = self.lock();

        let poll_id = tables.polls.len() as i64 + 1;
        tables.polls.push(Poll {
            id: poll_id,
            question: question.to_string(),
        });

        for text in options {
            let option_id = tables.options.len() as i64 + 1;
            tables.options.push(PollOption {
                id: option_id,
                text: text.clone(),
                poll_id,
            });
        }

        Ok(poll_id)
    }

    async fn find_poll(&self, poll_id: i64) -> Result<Option<Poll>, StoreError> {
        Ok(self.lock().polls.iter().find(|p| p.id == poll_id).cloned())
    }

    async fn find_option(
        &self,
        poll_id: i64,
        option_id: i64,
    ) -> Result<Option<PollOption>, StoreError> {
        Ok(self
            .lock()
            .options
            .iter()
            .find(|o| o.id == option_id && o.poll_id == poll_id)
            .cloned())
    }

    async fn option_tallies(&self, poll_id: i64) -> Result<Vec<OptionTally>, StoreError> {
        let tables = self.lock();

        Ok(tables
            .options
            .iter()
            .filter(|o| o.poll_id == poll_id)
            .map(|o| OptionTally {
                option_id: o.id,
                text: o.text.clone(),
                votes: tables.votes.iter().filter(|v| v.option_id == o.id).count() as i64,
            })
            .collect())
    }

    async fn record_vote(&self, vote: &NewVote) -> Result<Vote, StoreError> {
        let mut tables = self.lock();

        let owned = tables
            .options
            .iter()
            .any(|o| o.id == vote.option_id && o.poll_id == vote.poll_id);
        if !owned {
            return Err(StoreError::UnknownOption);
        }

        if !tables.voted.insert((vote.user_id.clone(), vote.poll_id)) {
            return Err(StoreError::DuplicateVote);
        }

        let recorded = Vote {
            id: tables.votes.len() as i64 + 1,
            user_id: vote.user_id.clone(),
            poll_id: vote.poll_id,
            option_id: vote.option_id,
        };
        tables.votes.push(recorded.clone());

        Ok(recorded)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    #[tokio::test]
    async fn ids_are_sequential_across_polls() {
        let store = InMemoryPollStore::new();

        let first = store.create_poll("Best color?", &options(&["Red", "Blue"])).await.unwrap();
        let second = store.create_poll("Best pet?", &options(&["Cat"])).await.unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 2);

        let cat = store.find_option(2, 3).await.unwrap().unwrap();
        assert_eq!(cat.text, "Cat");
    }

    #[tokio::test]
    async fn find_option_requires_matching_poll() {
        let store = InMemoryPollStore::new();
        store.create_poll("A?", &options(&["a1"])).await.unwrap();
        store.create_poll("B?", &options(&["b1"])).await.unwrap();

        assert!(store.find_option(1, 1).await.unwrap().is_some());
        assert!(store.find_option(1, 2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn second_vote_for_same_poll_is_rejected() {
        let store = InMemoryPollStore::new();
        store.create_poll("Q?", &options(&["x", "y"])).await.unwrap();

        let vote = NewVote {
            user_id: "u1".to_string(),
            poll_id: 1,
            option_id: 1,
        };
        store.record_vote(&vote).await.unwrap();

        let other_option = NewVote { option_id: 2, ..vote };
        let err = store.record_vote(&other_option).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateVote));

        let tallies = store.option_tallies(1).await.unwrap();
        assert_eq!(tallies[0].votes, 1);
        assert_eq!(tallies[1].votes, 0);
    }

    #[tokio::test]
    async fn same_user_may_vote_on_different_polls() {
        let store = InMemoryPollStore::new();
        store.create_poll("A?", &options(&["a1"])).await.unwrap();
        store.create_poll("B?", &options(&["b1"])).await.unwrap();

        for (poll_id, option_id) in [(1, 1), (2, 2)] {
            let vote = NewVote {
                user_id: "u1".to_string(),
                poll_id,
                option_id,
            };
            assert!(store.record_vote(&vote).await.is_ok());
        }
    }

    #[tokio::test]
    async fn vote_with_option_of_another_poll_is_rejected() {
        let store = InMemoryPollStore::new();
        store.create_poll("A?", &options(&["a"])).await.unwrap();
        store.create_poll("B?", &options(&["b"])).await.unwrap();

        let cross_poll = NewVote {
            user_id: "u".to_string(),
            poll_id: 1,
            option_id: 2,
        };
        let err = store.record_vote(&cross_poll).await.unwrap_err();
        assert!(matches!(err, StoreError::UnknownOption));

        let nowhere = NewVote {
            user_id: "v".to_string(),
            poll_id: 77,
            option_id: 99,
        };
        let err = store.record_vote(&nowhere).await.unwrap_err();
        assert!(matches!(err, StoreError::UnknownOption));

        assert_eq!(store.option_tallies(1).await.unwrap()[0].votes, 0);
        assert_eq!(store.option_tallies(2).await.unwrap()[0].votes, 0);

        // The rejected attempt must not use up the user's vote on poll 1.
        let valid = NewVote { option_id: 1, ..cross_poll };
        assert!(store.record_vote(&valid).await.is_ok());
    }
}
