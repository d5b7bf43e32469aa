//! HTML injection of the shared layout.
//!
//! A sub-project's built `index.html` is rewritten as text. Only a few
//! well-known anchors are located (`</head>`, `<title>`, `<body>`); the
//! project's own markup is left alone. The result references the hashed
//! stylesheet and favicon, carries a per-project title, and embeds the
//! serialized [`LayoutData`] for the client-side chrome to render from.
//!
//! Input is always the original build output, so injecting twice is not a
//! supported operation.

use regex::Regex;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use crate::assets::SharedAssets;
use crate::config::{clean_path, Config};
use crate::error::Result;
use crate::layout::LayoutData;
use crate::stats::ProjectStats;

/// `id` of the script element holding the layout payload.
pub const LAYOUT_DATA_ID: &str = "layout-data";

/// `id` of the element the layout chrome mounts into.
pub const LAYOUT_ROOT_ID: &str = "layout-root";

type StatsFn<T> = Box<dyn Fn(&ProjectStats) -> T + Send + Sync>;

/// Run-wide settings for injecting project pages.
pub struct InjectConfig {
    /// Output directory of a project's copy
    pub out_dir: StatsFn<PathBuf>,
    /// URL path a project is served under
    pub base_url: StatsFn<String>,
    /// Link from a project page back to the landing page
    pub back_url: String,
    /// Stylesheet href, relative to a project page
    pub css: String,
    /// Favicon href, relative to a project page
    pub favicon: String,
    /// Formats a project's raw title into the page title
    pub title: Box<dyn Fn(&str) -> String + Send + Sync>,
    /// Repository home page
    pub github_url: String,
    /// Link to a project's sources
    pub source_url: StatsFn<String>,
}

impl InjectConfig {
    /// Settings for a run writing into `output_root` with published `assets`.
    ///
    /// Projects land in `<output_root>/<projects_subdir>/<name>/`, so the
    /// shared asset links climb one level per subdir component plus one.
    pub fn for_site(config: &Config, assets: &SharedAssets, output_root: &Path) -> Self {
        let subdir = config.projects_subdir();
        let up = "../".repeat(subdir.components().count() + 1);

        let out_root = output_root.join(&subdir);
        let base_path = config.site.base_path.trim_end_matches('/').to_string();
        let url_subdir = slash_join(&subdir);
        let suffix = config.site.title_suffix.clone();
        let repo = config.site.repository_url.trim_end_matches('/').to_string();
        let source_repo = repo.clone();
        let branch = config.site.source_branch.clone();
        let source_dir = repository_path(config);

        Self {
            out_dir: Box::new(move |stats| out_root.join(&stats.project_name)),
            base_url: Box::new(move |stats| {
                join_url(&[base_path.as_str(), url_subdir.as_str(), stats.project_name.as_str()]) + "/"
            }),
            back_url: config.site.back_url.clone().unwrap_or_else(|| up.clone()),
            css: format!("{}{}", up, assets.stylesheet.file_name),
            favicon: format!("{}{}", up, assets.favicon.file_name),
            title: Box::new(move |raw| format!("{}{}", raw, suffix)),
            github_url: repo,
            source_url: Box::new(move |stats| {
                join_url(&[
                    source_repo.as_str(),
                    "tree",
                    branch.as_str(),
                    source_dir.as_str(),
                    stats.project_name.as_str(),
                ])
            }),
        }
    }
}

/// Projects directory relative to `paths.root`, as it appears in the
/// repository. A projects directory outside the root contributes only its
/// own name.
fn repository_path(config: &Config) -> String {
    let projects = clean_path(&config.projects_dir());
    let root = clean_path(&config.paths.root);

    match projects.strip_prefix(&root) {
        Ok(relative) if relative.is_relative() && !relative.starts_with("..") => slash_join(relative),
        _ => projects
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
    }
}

fn slash_join(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn join_url(parts: &[&str]) -> String {
    let mut url = String::new();
    for (i, part) in parts.iter().enumerate() {
        let part = if i == 0 {
            part.trim_end_matches('/')
        } else {
            part.trim_matches('/')
        };
        if part.is_empty() {
            continue;
        }
        if i > 0 {
            url.push('/');
        }
        url.push_str(part);
    }
    if url.is_empty() {
        url.push('/');
    }
    url
}

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title\b[^>]*>.*?</title\s*>").expect("valid regex"));
static ICON_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<link\b[^>]*?\brel\s*=\s*["']?(?:shortcut\s+)?icon\b[^>]*>"#)
        .expect("valid regex")
});
static HEAD_CLOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</head\s*>").expect("valid regex"));
static BODY_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<body\b[^>]*>").expect("valid regex"));

/// Rewrite `html` to carry the shared layout for `data`.
pub fn inject_html(html: &str, config: &InjectConfig, data: &LayoutData) -> Result<String> {
    let raw_title = if data.stats.meta.title.trim().is_empty() {
        data.stats.project_name.as_str()
    } else {
        data.stats.meta.title.as_str()
    };
    let title = (config.title)(raw_title);

    let head = format!(
        "<title>{}</title>\n<link rel=\"icon\" href=\"{}\">\n<link rel=\"stylesheet\" href=\"{}\">\n",
        escape_html(&title),
        escape_html(&config.favicon),
        escape_html(&config.css),
    );
    let payload = format!(
        "\n<script id=\"{}\" type=\"application/json\">{}</script>\n<div id=\"{}\"></div>\n",
        LAYOUT_DATA_ID,
        script_safe_json(&serde_json::to_string(data)?),
        LAYOUT_ROOT_ID,
    );

    // Titles and icons are only stripped from the head; an inline SVG in the
    // body may carry its own <title>.
    let (head_part, body_part, prepend) = match head_end(html) {
        Some(at) => (&html[..at], &html[at..], false),
        None => (html, "", true),
    };
    let head_part = TITLE_RE.replace_all(head_part, "");
    let head_part = ICON_LINK_RE.replace_all(&head_part, "");

    let mut out = String::with_capacity(html.len() + head.len() + payload.len());
    if prepend {
        out.push_str(&head);
        out.push_str(&head_part);
    } else {
        out.push_str(&head_part);
        out.push_str(&head);
    }
    out.push_str(body_part);

    Ok(match BODY_OPEN_RE.find(&out) {
        Some(m) => splice(&out, m.end(), &payload),
        None => format!("{}{}", out, payload),
    })
}

/// Byte offset where head content ends: `</head>`, else `<body>`.
fn head_end(html: &str) -> Option<usize> {
    HEAD_CLOSE_RE
        .find(html)
        .or_else(|| BODY_OPEN_RE.find(html))
        .map(|m| m.start())
}

fn splice(html: &str, at: usize, insert: &str) -> String {
    let mut out = String::with_capacity(html.len() + insert.len());
    out.push_str(&html[..at]);
    out.push_str(insert);
    out.push_str(&html[at..]);
    out
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// JSON that cannot terminate the surrounding `<script>` element.
fn script_safe_json(json: &str) -> String {
    json.replace("</", "<\\/").replace("<!--", "<\\u0021--")
}
