// output formatting - rendered tally for humans or json stats for scripts

use crate::core::{Poll, PollStats, PollView};

pub struct Output;

impl Output {
    // the same markdown text the chat would get
    pub fn pretty(poll: &Poll) {
        println!("poll: {}\n", poll.id());

        if poll.answers().is_empty() {
            println!("no answers");
            return;
        }

        println!("{poll}");
    }

    // json for scripts, indented unless raw
    pub fn stats(stats: &PollStats, raw: bool) {
        let json = if raw {
            serde_json::to_string(stats)
        } else {
            serde_json::to_string_pretty(stats)
        };
        println!("{}", json.unwrap_or_default());
    }
}
