use indicatif::{ProgressBar, ProgressStyle};

/// Row counter shown while importing; hidden when stderr is not a terminal
pub struct ImportProgress {
    pb: ProgressBar,
}

impl ImportProgress {
    pub fn new() -> Self {
        // indicatif draws to stderr
        let pb = if console::Term::stderr().is_term() {
            ProgressBar::new(0)
        } else {
            ProgressBar::hidden()
        };
        if let Ok(style) = ProgressStyle::with_template("{bar:30} {pos}/{len} rows {msg}") {
            pb.set_style(style);
        }
        Self { pb }
    }

    pub fn row_done(&self, done: usize, total: usize, title: &str) {
        self.pb.set_length(total as u64);
        self.pb.set_position(done as u64);
        self.pb.set_message(title.to_string());
    }

    pub fn finish(&self) {
        self.pb.finish_and_clear();
    }
}

impl Default for ImportProgress {
    fn default() -> Self {
        Self::new()
    }
}
