pub mod agenda;
pub mod icons;
pub mod output;
pub mod progress;
pub mod table;
pub mod theme;

pub use agenda::{format_results, format_session, query_header, separator};
pub use icons::Icons;
pub use output::{dim, error, failure, success};
pub use progress::ImportProgress;
pub use table::{stats_table, TableBuilder};
pub use theme::{theme, Theme};
