mod collector;
mod formatter;
mod project;
mod size;

pub use collector::{collect_file_stats, FileStat};
pub use formatter::{format_json, format_table, ProjectRow};
pub use project::ProjectStats;
pub use size::{format_size, gzip_size, totals, SizeTotals};
