use crate::ui::{theme, Icons};
use owo_colors::OwoColorize;

pub fn success(label: &str) {
    println!("{} {}", Icons::CHECK, label.style(theme().success.clone()));
}

/// A user-facing failure that is not an error exit
pub fn failure(label: &str) {
    println!("{} {}", Icons::CROSS, label.style(theme().error.clone()));
}

pub fn error(label: &str) {
    eprintln!("{} {}", Icons::CROSS, label.style(theme().error.clone()));
}

pub fn dim(text: &str) -> String {
    text.style(theme().dim.clone()).to_string()
}
