use serde::Serialize;

use super::project::ProjectStats;
use super::size::format_size;

/// One line of a project size report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRow {
    pub project_name: String,
    pub dist_dir_name: String,
    pub title: String,
    pub files: usize,
    pub size: u64,
    pub compressed_size: u64,
}

impl From<&ProjectStats> for ProjectRow {
    fn from(stats: &ProjectStats) -> Self {
        let totals = stats.totals();
        Self {
            project_name: stats.project_name.clone(),
            dist_dir_name: stats.dist_dir_name.clone(),
            title: stats.meta.title.clone(),
            files: totals.files,
            size: totals.size,
            compressed_size: totals.compressed_size,
        }
    }
}

/// Format rows as an aligned table
pub fn format_table(rows: &[ProjectRow]) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "  {:<32} {:<6} {:>6} {:>12} {:>12}\n",
        "PROJECT", "OUTPUT", "FILES", "SIZE", "GZIP"
    ));
    output.push_str(&format!("  {}\n", "-".repeat(72)));

    for row in rows {
        let name = if row.project_name.chars().count() > 32 {
            format!("{}...", row.project_name.chars().take(29).collect::<String>())
        } else {
            row.project_name.clone()
        };

        output.push_str(&format!(
            "  {:<32} {:<6} {:>6} {:>12} {:>12}\n",
            name,
            row.dist_dir_name,
            row.files,
            format_size(row.size),
            format_size(row.compressed_size),
        ));
    }

    output
}

/// Format rows as JSON
pub fn format_json(rows: &[ProjectRow], pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(rows)
    } else {
        serde_json::to_string(rows)
    }
}
