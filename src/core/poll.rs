// partial view of a poll: just enough to navigate from an answer to its siblings
// creating and closing polls happens elsewhere

use crate::Error;
use crate::core::{Answer, Db, VoteChange, Voter};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

// answers hold one of these, never the poll itself
pub trait PollRef {
    fn poll_id(&self) -> i64;
}

impl PollRef for i64 {
    fn poll_id(&self) -> i64 {
        *self
    }
}

pub trait PollView: PollRef {
    fn answers(&self) -> &[Answer];

    // someone who picked two answers counts once
    fn total_voters(&self) -> usize {
        self.answers()
            .iter()
            .flat_map(|a| a.voters())
            .map(|v| v.id)
            .collect::<HashSet<_>>()
            .len()
    }
}

#[derive(Debug, Clone)]
pub struct Poll {
    id: i64,
    answers: Vec<Answer>,
}

impl Poll {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            answers: Vec::new(),
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub async fn load(db: &Db, id: i64) -> Result<Self, Error> {
        let answers = Answer::query(db, &id).await?;
        tracing::debug!(poll_id = id, answers = answers.len(), "loaded poll");
        Ok(Self { id, answers })
    }

    pub fn add_answer(&mut self, text: impl Into<String>) -> &mut Answer {
        let answer = Answer::new(&self.id, text);
        self.answers.push(answer);
        let last = self.answers.len() - 1;
        &mut self.answers[last]
    }

    pub fn answer(&self, answer_id: i64) -> Option<&Answer> {
        self.answers.iter().find(|a| a.id() == Some(answer_id))
    }

    pub fn answer_mut(&mut self, answer_id: i64) -> Option<&mut Answer> {
        self.answers.iter_mut().find(|a| a.id() == Some(answer_id))
    }

    pub fn answers_mut(&mut self) -> &mut [Answer] {
        &mut self.answers
    }

    // memory only changes once the store went through
    pub async fn toggle_vote(
        &mut self,
        db: &Db,
        answer_id: i64,
        voter: Voter,
    ) -> Result<VoteChange, Error> {
        let poll_id = self.id;
        let voter_id = voter.id;
        let answer = self
            .answer_mut(answer_id)
            .ok_or(Error::AnswerNotFound { poll_id, answer_id })?;

        let mut updated = answer.clone();
        let change = updated.toggle_vote(voter);
        updated.store(db).await?;
        *answer = updated;

        tracing::info!(poll_id, answer_id, voter_id, ?change, "vote recorded");
        Ok(change)
    }

    pub async fn store_answers(&mut self, db: &Db) -> Result<(), Error> {
        for answer in &mut self.answers {
            answer.store(db).await?;
        }
        Ok(())
    }

    pub fn stats(&self) -> PollStats {
        PollStats {
            answers: self
                .answers
                .iter()
                .map(|a| AnswerStats {
                    id: a.id(),
                    text: a.text.clone(),
                    voters: VoterStats {
                        total: a.voters().len(),
                        list: a.voters().iter().map(VoterEntry::from).collect(),
                    },
                })
                .collect(),
        }
    }
}

impl PollRef for Poll {
    fn poll_id(&self) -> i64 {
        self.id
    }
}

impl PollView for Poll {
    fn answers(&self) -> &[Answer] {
        &self.answers
    }
}

// every answer's tally, then a footer with the head count
impl fmt::Display for Poll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, answer) in self.answers.iter().enumerate() {
            if i > 0 {
                f.write_str("\n\n")?;
            }
            f.write_str(&answer.render(self))?;
        }
        if !self.answers.is_empty() {
            f.write_str("\n\n")?;
        }

        match self.total_voters() {
            0 => f.write_str("\u{1F465} Nobody voted so far\\."),
            n => write!(f, "\u{1F465} {n} people voted so far\\."),
        }
    }
}

// statistics export for the poll's owner
#[derive(Debug, Serialize)]
pub struct PollStats {
    pub answers: Vec<AnswerStats>,
}

#[derive(Debug, Serialize)]
pub struct AnswerStats {
    pub id: Option<i64>,
    pub text: String,
    pub voters: VoterStats,
}

#[derive(Debug, Serialize)]
pub struct VoterStats {
    pub total: usize,
    #[serde(rename = "_")]
    pub list: Vec<VoterEntry>,
}

// empty fields are left out of the export
#[derive(Debug, Serialize)]
pub struct VoterEntry {
    pub id: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub first_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl From<&Voter> for VoterEntry {
    fn from(v: &Voter) -> Self {
        let non_empty = |s: &Option<String>| s.clone().filter(|s| !s.is_empty());
        Self {
            id: v.id,
            first_name: v.first_name.clone(),
            last_name: non_empty(&v.last_name),
            username: non_empty(&v.username),
        }
    }
}
