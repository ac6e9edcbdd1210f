// core logic - answers and their voters, storage, and tally rendering

mod answer;
mod db;
mod poll;
mod tally;
mod voter;

pub use answer::{Answer, VoteChange};
pub use db::Db;
pub use poll::{AnswerStats, Poll, PollRef, PollStats, PollView, VoterEntry, VoterStats};
pub use tally::{BAR_WIDTH, EMPTY_BAR, FILLED, Tally, escape_markdown};
pub use voter::Voter;
