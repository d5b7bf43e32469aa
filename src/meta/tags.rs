//! Tag registry for stack and library badges.

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Display record for a tag id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagInfo {
    pub name: String,
    pub url: String,
    pub desc: String,
}

/// Read-only mapping from tag id to [`TagInfo`].
///
/// Lookups are total: an unknown id resolves to nothing.
#[derive(Debug, Clone, Default)]
pub struct TagRegistry {
    entries: BTreeMap<String, TagInfo>,
}

static BUILTIN: LazyLock<TagRegistry> = LazyLock::new(|| {
    TagRegistry::from_entries(BUILTIN_TAGS.iter().map(|(id, name, url, desc)| {
        (
            *id,
            TagInfo {
                name: name.to_string(),
                url: url.to_string(),
                desc: desc.to_string(),
            },
        )
    }))
});

impl TagRegistry {
    /// The compiled-in registry shared by the whole process.
    pub fn builtin() -> &'static TagRegistry {
        &BUILTIN
    }

    /// Build a registry from `(id, info)` pairs. Ids are stored lowercased.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, TagInfo)>,
        S: AsRef<str>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(id, info)| (id.as_ref().to_lowercase(), info))
                .collect(),
        }
    }

    /// Look up a single id, ignoring case.
    pub fn get(&self, id: &str) -> Option<&TagInfo> {
        self.entries.get(&id.to_lowercase())
    }

    /// Resolve ids in order, dropping the ones the registry does not know.
    pub fn resolve<S: AsRef<str>>(&self, ids: &[S]) -> Vec<TagInfo> {
        ids.iter()
            .filter_map(|id| self.get(id.as_ref()))
            .cloned()
            .collect()
    }

    /// List all tag ids.
    pub fn ids(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

const BUILTIN_TAGS: &[(&str, &str, &str, &str)] = &[
    (
        "ts",
        "TypeScript",
        "https://www.typescriptlang.org/",
        "TypeScript is a strongly typed programming language that builds on JavaScript, giving you better tooling at any scale.",
    ),
    (
        "js",
        "JavaScript",
        "https://javascript.info/",
        "JavaScript (JS) is a lightweight, interpreted, or just-in-time compiled programming language with first-class functions. While it is most well-known as the scripting language for Web pages, many non-browser environments also use it, such as Node.js, Apache CouchDB and Adobe Acrobat.",
    ),
    (
        "css",
        "CSS",
        "https://developer.mozilla.org/en-US/docs/Learn/Getting_started_with_the_web/CSS_basics",
        "CSS (Cascading Style Sheets) is the code that styles web content. CSS basics walks through what you need to get started.",
    ),
    (
        "sass",
        "Sass",
        "https://sass-lang.com/",
        "Sass is the most mature, stable, and powerful professional grade CSS extension language in the world.",
    ),
    (
        "react",
        "React",
        "https://reactjs.org/",
        "React makes it painless to create interactive UIs. Design simple views for each state in your application, and React will efficiently update and render just the right components when your data changes.",
    ),
    (
        "reacthooks",
        "React Hooks",
        "https://reactjs.org/docs/hooks-intro.html",
        "Hooks are a new addition in React 16.8. They let you use state and other React features without writing a class. Hooks solve a wide variety of seemingly unconnected problems in React that we've encountered over five years of writing and maintaining tens of thousands of components.",
    ),
    (
        "mobx",
        "MobX",
        "https://mobx.js.org/",
        "Anything that can be derived from the application state, should be. Automatically. MobX is a battle tested library that makes state management simple and scalable by transparently applying functional reactive programming (TFRP).",
    ),
    (
        "immer",
        "Immer",
        "https://immerjs.github.io/immer/",
        "Immer can be used in any context in which immutable data structures need to be used. For example in combination with React state, React or Redux reducers, or configuration management. Immutable data structures allow for (efficient) change detection: if the reference to an object didn't change, the object itself did not change. In addition, it makes cloning relatively cheap: Unchanged parts of a data tree don't need to be copied and are shared in memory with older versions of the same state.",
    ),
    (
        "recoil",
        "Recoil",
        "https://recoiljs.org/",
        "Atoms are units of state. They're updatable and subscribable: when an atom is updated, each subscribed component is re-rendered with the new value. They can be created at runtime, too. Atoms can be used in place of React local component state. If the same atom is used from multiple components, all those components share their state.",
    ),
    (
        "jotai",
        "Jotai",
        "https://jotai.org/",
        "Jotai takes a bottom-up approach to React state management with an atomic model inspired by Recoil. One can build state by combining atoms and renders are optimized based on atom dependency. This solves the extra re-render issue of React context and eliminates the need for the memoization technique.",
    ),
    (
        "vite",
        "Vite",
        "https://vitejs.dev/",
        "Vite (French word for \"quick\", pronounced /vit/, like \"veet\") is a build tool that aims to provide a faster and leaner development experience for modern web projects.",
    ),
];
