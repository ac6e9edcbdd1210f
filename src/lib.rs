// pollvote library - who voted for what, and how the tally looks

pub mod cli;
mod core;
mod error;
mod output;
mod server;

pub use crate::core::{
    Answer, AnswerStats, BAR_WIDTH, Db, EMPTY_BAR, FILLED, Poll, PollRef, PollStats, PollView,
    Tally, VoteChange, Voter, VoterEntry, VoterStats, escape_markdown,
};
pub use error::Error;
pub use output::Output;
pub use server::Server;
