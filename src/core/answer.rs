// poll answers: who picked them, how they are stored, how they are shown

use crate::Error;
use crate::core::poll::{PollRef, PollView};
use crate::core::tally::{Tally, escape_markdown};
use crate::core::Db;
use crate::core::voter::{Voter, required};
use serde::Serialize;

// only the poll id is kept, rendering borrows the poll again for siblings
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    id: Option<i64>,
    pub text: String,
    voters: Vec<Voter>,
    poll_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteChange {
    Cast,
    Retracted,
}

impl Answer {
    pub fn new(poll: &impl PollRef, text: impl Into<String>) -> Self {
        Self {
            id: None,
            text: text.into(),
            voters: Vec::new(),
            poll_id: poll.poll_id(),
        }
    }

    // none until the first store
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn poll_id(&self) -> i64 {
        self.poll_id
    }

    pub fn voters(&self) -> &[Voter] {
        &self.voters
    }

    // no duplicate check here, store() rejects duplicates
    pub fn voters_mut(&mut self) -> &mut Vec<Voter> {
        &mut self.voters
    }

    pub fn set_voters(&mut self, voters: Vec<Voter>) {
        self.voters = voters;
    }

    pub fn has_voter(&self, voter_id: i64) -> bool {
        self.voters.iter().any(|v| v.id == voter_id)
    }

    pub fn add_voter(&mut self, voter: Voter) -> bool {
        if self.has_voter(voter.id) {
            return false;
        }
        self.voters.push(voter);
        true
    }

    pub fn remove_voter(&mut self, voter_id: i64) -> Option<Voter> {
        let pos = self.voters.iter().position(|v| v.id == voter_id)?;
        Some(self.voters.remove(pos))
    }

    // pressing the button twice takes the vote back
    pub fn toggle_vote(&mut self, voter: Voter) -> VoteChange {
        let voter_id = voter.id;
        let change = if self.remove_voter(voter_id).is_some() {
            VoteChange::Retracted
        } else {
            self.voters.push(voter);
            VoteChange::Cast
        };

        tracing::debug!(
            voter_id,
            answer_id = ?self.id,
            poll_id = self.poll_id,
            ?change,
            "vote toggled"
        );
        change
    }

    // one transaction: answer row, voters, then votes deleted and reinserted.
    // a new answer only gets its id after the commit
    pub async fn store(&mut self, db: &Db) -> Result<i64, Error> {
        let mut tx = db.pool().begin().await?;

        let id = match self.id {
            None => sqlx::query("INSERT INTO answers (poll_id, txt) VALUES (?1, ?2)")
                .bind(self.poll_id)
                .bind(&self.text)
                .execute(&mut *tx)
                .await?
                .last_insert_rowid(),
            Some(id) => {
                let result =
                    sqlx::query("UPDATE answers SET poll_id = ?1, txt = ?2 WHERE id = ?3")
                        .bind(self.poll_id)
                        .bind(&self.text)
                        .bind(id)
                        .execute(&mut *tx)
                        .await?;
                if result.rows_affected() == 0 {
                    return Err(Error::AnswerMissing(id));
                }
                id
            }
        };

        for voter in &self.voters {
            voter.upsert(&mut *tx).await?;
        }

        sqlx::query("DELETE FROM votes WHERE poll_id = ?1 AND answer_id = ?2")
            .bind(self.poll_id)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        for voter in &self.voters {
            sqlx::query("INSERT INTO votes (user_id, poll_id, answer_id) VALUES (?1, ?2, ?3)")
                .bind(voter.id)
                .bind(self.poll_id)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        self.id = Some(id);

        tracing::debug!(
            answer_id = id,
            poll_id = self.poll_id,
            voters = self.voters.len(),
            "answer stored"
        );
        Ok(id)
    }

    // voters come back highest id first
    pub async fn load(
        db: &Db,
        poll: &impl PollRef,
        answer_id: i64,
    ) -> Result<Option<Self>, Error> {
        let poll_id = poll.poll_id();
        let mut conn = db.pool().acquire().await?;

        let row = sqlx::query("SELECT txt FROM answers WHERE poll_id = ?1 AND id = ?2")
            .bind(poll_id)
            .bind(answer_id)
            .fetch_optional(&mut *conn)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let text: String = required(&row, "txt")?;

        let voters = sqlx::query(
            r#"SELECT u.id AS id,
                      u.first_name AS first_name,
                      u.last_name AS last_name,
                      u.username AS username
               FROM votes v
               JOIN users u ON u.id = v.user_id
               WHERE v.poll_id = ?1 AND v.answer_id = ?2
               ORDER BY u.id DESC"#,
        )
        .bind(poll_id)
        .bind(answer_id)
        .fetch_all(&mut *conn)
        .await?
        .iter()
        .map(Voter::from_row)
        .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(Self {
            id: Some(answer_id),
            text,
            voters,
            poll_id,
        }))
    }

    // oldest first, one round trip per answer
    pub async fn query(db: &Db, poll: &impl PollRef) -> Result<Vec<Self>, Error> {
        let ids: Vec<i64> =
            sqlx::query_scalar("SELECT id FROM answers WHERE poll_id = ?1 ORDER BY id ASC")
                .bind(poll.poll_id())
                .fetch_all(db.pool())
                .await?;

        let mut answers = Vec::with_capacity(ids.len());
        for id in ids {
            // deleted between the two queries
            if let Some(answer) = Self::load(db, poll, id).await? {
                answers.push(answer);
            }
        }

        Ok(answers)
    }

    pub fn tally(&self, poll: &impl PollView) -> Tally {
        let count = self.voters.len();
        let max_count = poll
            .answers()
            .iter()
            .map(|a| a.voters.len())
            .max()
            .unwrap_or(0)
            .max(count);

        Tally::new(count, poll.total_voters(), max_count)
    }

    // markdown v2: title and count, bar, voter mentions
    pub fn render(&self, poll: &impl PollView) -> String {
        let tally = self.tally(poll);
        let mut out = format!(
            "{} \\- {}\n{}",
            escape_markdown(&self.text),
            tally.count,
            tally.bar()
        );

        if !self.voters.is_empty() {
            let mentions: Vec<String> = self.voters.iter().map(Voter::mention).collect();
            out.push('\n');
            out.push_str(&mentions.join(", "));
        }

        out
    }

    pub fn button_label(&self) -> String {
        match self.voters.len() {
            0 => self.text.clone(),
            n => format!("{} - {}", self.text, n),
        }
    }
}
