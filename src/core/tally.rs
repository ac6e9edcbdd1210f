// vote share bar for one answer
// output is telegram MarkdownV2, so anything user supplied goes through escape_markdown

pub const FILLED: &str = "\u{1F44D}";

// shown instead of a bar when nobody picked the answer
pub const EMPTY_BAR: &str = "\u{25AB} 0%";

pub const BAR_WIDTH: usize = 8;

const RESERVED: &[char] = &[
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!', '\\',
];

// count: this answer, total: distinct voters in the poll, max_count: leading answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub count: usize,
    pub total: usize,
    pub max_count: usize,
}

impl Tally {
    pub fn new(count: usize, total: usize, max_count: usize) -> Self {
        Self {
            count,
            total,
            max_count,
        }
    }

    // 0..=1 of the leading answer, drives bar length
    pub fn relative(&self) -> f64 {
        if self.max_count == 0 {
            0.0
        } else {
            self.count as f64 / self.max_count as f64
        }
    }

    pub fn share(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.count as f64 / self.total as f64
        }
    }

    pub fn percent(&self) -> u64 {
        (self.share() * 100.0).floor() as u64
    }

    pub fn filled_width(&self) -> usize {
        if self.count == 0 {
            return 0;
        }
        ((self.relative() * BAR_WIDTH as f64).floor() as usize).max(1)
    }

    pub fn bar(&self) -> String {
        if self.count == 0 {
            return EMPTY_BAR.to_string();
        }
        format!("{} {}%", FILLED.repeat(self.filled_width()), self.percent())
    }
}

pub fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if RESERVED.contains(&ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
