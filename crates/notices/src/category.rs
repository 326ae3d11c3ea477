//! Notice categories and the override table between them.
//!
//! The table is two named category sets plus the same-category cases:
//!
//! - an old notice in [`BROADLY_SUPERSEDED`] yields to any newer notice whose
//!   category is in [`SUPERSEDING`];
//! - an old notice in [`SELF_SUPERSEDING`] yields to a newer notice of the
//!   same category.
//!
//! Trackability is read off the same table so the two can never disagree.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// Semantic kind of a bot notice.
///
/// Adding a variant means adding it to [`Category::ALL`] and deciding which of
/// the override sets below it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Commands,
    #[serde(rename = "BoP")]
    Bop,
    Events,
    Cars,
    Organizations,
    Rating,
    Entries,
    NewEntries,
    SeasonSettingsViolations,
}

impl Category {
    /// All variants, in declaration order.
    pub const ALL: &'static [Category] = &[
        Self::Commands,
        Self::Bop,
        Self::Events,
        Self::Cars,
        Self::Organizations,
        Self::Rating,
        Self::Entries,
        Self::NewEntries,
        Self::SeasonSettingsViolations,
    ];

    const COUNT: usize = Self::ALL.len();

    /// Persisted tag, as written into the registry snapshot.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Commands => "Commands",
            Self::Bop => "BoP",
            Self::Events => "Events",
            Self::Cars => "Cars",
            Self::Organizations => "Organizations",
            Self::Rating => "Rating",
            Self::Entries => "Entries",
            Self::NewEntries => "NewEntries",
            Self::SeasonSettingsViolations => "SeasonSettingsViolations",
        }
    }

    /// Whether a newer notice of category `newer` retracts an older notice of
    /// this category posted in the same channel.
    pub fn is_superseded_by(self, newer: Category) -> bool {
        OVERRIDES.superseded[self as usize][newer as usize]
    }

    /// Whether notices of this category are ever retracted, and therefore
    /// worth recording in the registry.
    pub fn is_trackable(self) -> bool {
        OVERRIDES.trackable[self as usize]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    /// Case-insensitive; `-` and `_` are ignored so `new-entries`,
    /// `new_entries` and `NewEntries` all parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().to_lowercase() == normalized)
            .ok_or_else(|| Error::unknown_category(s))
    }
}

/// Old notices in this set yield to any newer notice from [`SUPERSEDING`].
pub const BROADLY_SUPERSEDED: &[Category] = &[
    Category::Commands,
    Category::Bop,
    Category::Events,
    Category::Cars,
    Category::Organizations,
    Category::Rating,
];

/// Categories whose notices retract broadly superseded ones.
pub const SUPERSEDING: &[Category] = &[
    Category::Commands,
    Category::Entries,
    Category::NewEntries,
    Category::SeasonSettingsViolations,
    Category::Bop,
    Category::Events,
    Category::Cars,
    Category::Organizations,
    Category::Rating,
];

/// Categories whose notices are retracted by a newer notice of the same kind.
pub const SELF_SUPERSEDING: &[Category] = &[Category::Entries, Category::SeasonSettingsViolations];

/// Convenience form of [`Category::is_superseded_by`].
pub fn supersedes(old: Category, new: Category) -> bool {
    old.is_superseded_by(new)
}

struct OverrideTable {
    /// `superseded[old][new]`
    superseded: [[bool; Category::COUNT]; Category::COUNT],
    trackable: [bool; Category::COUNT],
}

static OVERRIDES: OverrideTable = OverrideTable::build();

impl OverrideTable {
    const fn build() -> Self {
        let mut superseded = [[false; Category::COUNT]; Category::COUNT];
        let mut trackable = [false; Category::COUNT];

        let mut old = 0;
        while old < Category::COUNT {
            let old_cat = Category::ALL[old];
            let mut new = 0;
            while new < Category::COUNT {
                let new_cat = Category::ALL[new];
                let broad = contains(BROADLY_SUPERSEDED, old_cat) && contains(SUPERSEDING, new_cat);
                let same = old == new && contains(SELF_SUPERSEDING, old_cat);
                if broad || same {
                    superseded[old_cat as usize][new_cat as usize] = true;
                    trackable[old_cat as usize] = true;
                }
                new += 1;
            }
            old += 1;
        }

        Self {
            superseded,
            trackable,
        }
    }
}

const fn contains(set: &[Category], category: Category) -> bool {
    let mut i = 0;
    while i < set.len() {
        if set[i] as usize == category as usize {
            return true;
        }
        i += 1;
    }
    false
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest};

    use super::Category::*;

    #[rstest]
    #[case(Bop, Commands, true)]
    #[case(Commands, NewEntries, true)]
    #[case(Rating, SeasonSettingsViolations, true)]
    #[case(NewEntries, Commands, false)]
    #[case(NewEntries, NewEntries, false)]
    #[case(Entries, Entries, true)]
    #[case(Entries, Bop, false)]
    #[case(Entries, NewEntries, false)]
    #[case(SeasonSettingsViolations, SeasonSettingsViolations, true)]
    #[case(SeasonSettingsViolations, Entries, false)]
    fn supersedes_examples(#[case] old: Category, #[case] new: Category, #[case] expected: bool) {
        assert_eq!(supersedes(old, new), expected);
    }

    #[test]
    fn supersedes_matches_full_table() {
        // Rows are the old category, columns the new one, both in `ALL` order.
        #[rustfmt::skip]
        let expected: [[bool; 9]; 9] = [
            [true,  true,  true,  true,  true,  true,  true,  true,  true ], // Commands
            [true,  true,  true,  true,  true,  true,  true,  true,  true ], // BoP
            [true,  true,  true,  true,  true,  true,  true,  true,  true ], // Events
            [true,  true,  true,  true,  true,  true,  true,  true,  true ], // Cars
            [true,  true,  true,  true,  true,  true,  true,  true,  true ], // Organizations
            [true,  true,  true,  true,  true,  true,  true,  true,  true ], // Rating
            [false, false, false, false, false, false, true,  false, false], // Entries
            [false, false, false, false, false, false, false, false, false], // NewEntries
            [false, false, false, false, false, false, false, false, true ], // SeasonSettingsViolations
        ];

        for (i, old) in Category::ALL.iter().enumerate() {
            for (j, new) in Category::ALL.iter().enumerate() {
                assert_eq!(
                    supersedes(*old, *new),
                    expected[i][j],
                    "supersedes({old}, {new})"
                );
            }
        }
    }

    #[test]
    fn trackable_is_derived_from_overrides() {
        for category in Category::ALL {
            let derived = Category::ALL.iter().any(|new| supersedes(*category, *new));
            assert_eq!(category.is_trackable(), derived, "{category}");
        }
        assert!(!NewEntries.is_trackable());
        let trackable: Vec<_> = Category::ALL
            .iter()
            .filter(|c| c.is_trackable())
            .copied()
            .collect();
        assert_eq!(trackable, vec![
            Commands,
            Bop,
            Events,
            Cars,
            Organizations,
            Rating,
            Entries,
            SeasonSettingsViolations,
        ]);
    }

    #[rstest]
    #[case("BoP", Bop)]
    #[case("bop", Bop)]
    #[case("new-entries", NewEntries)]
    #[case("season_settings_violations", SeasonSettingsViolations)]
    #[case("Commands", Commands)]
    fn parses_tags(#[case] input: &str, #[case] expected: Category) {
        assert_eq!(input.parse::<Category>().unwrap(), expected);
    }

    #[test]
    fn rejects_unknown_tag() {
        let err = "weather".parse::<Category>().unwrap_err();
        assert!(matches!(err, Error::UnknownCategory { ref tag } if tag == "weather"));
    }

    #[test]
    fn serde_uses_persisted_tags() {
        for category in Category::ALL {
            let json = serde_json::to_string(category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
        }
    }
}
