//! Static lore library.
//!
//! A read-only id -> entry store backing the observer's codex. Display
//! material only: nothing in the turn engine depends on it.

/// Category of a codex entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoreCategory {
    Geography,
    Bestiary,
    History,
    Survival,
}

impl LoreCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoreCategory::Geography => "Geography",
            LoreCategory::Bestiary => "Bestiary",
            LoreCategory::History => "History",
            LoreCategory::Survival => "Survival",
        }
    }
}

/// One codex entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoreEntry {
    pub id: &'static str,
    pub title: &'static str,
    pub category: LoreCategory,
    pub content: &'static str,
}

/// The built-in, read-only lore library.
pub struct LoreStore {
    entries: Vec<LoreEntry>,
}

impl LoreStore {
    pub fn new() -> Self {
        Self {
            entries: builtin_entries(),
        }
    }

    /// Looks up an entry by id.
    pub fn get(&self, id: &str) -> Option<&LoreEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// All entries, in display order.
    pub fn entries(&self) -> &[LoreEntry] {
        &self.entries
    }
}

impl Default for LoreStore {
    fn default() -> Self {
        Self::new()
    }
}

fn builtin_entries() -> Vec<LoreEntry> {
    vec![
        LoreEntry {
            id: "regions",
            title: "On the Six Regions",
            category: LoreCategory::Geography,
            content: "Every soul the Voice finds wakes in one of six regions: the drowned \
dungeons beneath the old keeps, the pine forests that swallow roads whole, the glass \
deserts, the winter wastes, the fever swamps, and the walled cities where the plague \
bells never stop. No map agrees on where one ends and the next begins.",
        },
        LoreEntry {
            id: "voice",
            title: "The Voice Above",
            category: LoreCategory::History,
            content: "The heroes call it the Voice. It speaks rarely, for speaking costs it \
dearly, and the wise among them have learned that long silences mean the Voice is \
gathering strength rather than abandoning them. A directive is never free.",
        },
        LoreEntry {
            id: "gaunts",
            title: "Gaunts",
            category: LoreCategory::Bestiary,
            content: "Thin shapes that follow travellers at the edge of firelight. They do \
not attack the watched. Heroes who stop writing their diaries are found later, or are \
not found.",
        },
        LoreEntry {
            id: "rations",
            title: "What May Be Eaten",
            category: LoreCategory::Survival,
            content: "Trust bread you baked, water you boiled, and fruit with an unbroken \
skin. Everything else in this world has already been claimed by something smaller \
than you.",
        },
    ]
}
