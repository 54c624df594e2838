//! Building letters and building filters.
//!
//! Room codes start with their building letter (`"A101"`, `"I104"`). Blocks
//! I, J and K are adjacent and searched as one zone.

/// The letters searched together as one zone.
const COMBINED_GROUP: &[char] = &['I', 'J', 'K'];

/// A search group: the building letters a filter expands to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildingGroup(Vec<char>);

impl BuildingGroup {
    pub fn letters(&self) -> &[char] {
        &self.0
    }

    /// Whether a stored room code starts with one of the group's letters.
    pub fn contains_room(&self, room: &str) -> bool {
        building_of(room).is_some_and(|letter| self.0.contains(&letter))
    }
}

/// Map a building letter to its search group.
///
/// Identity for every letter except I, J and K, which share one group.
pub fn normalize(letter: char) -> BuildingGroup {
    let letter = letter.to_ascii_uppercase();
    if COMBINED_GROUP.contains(&letter) {
        BuildingGroup(COMBINED_GROUP.to_vec())
    } else {
        BuildingGroup(vec![letter])
    }
}

/// The building letter of a room code, uppercased.
pub fn building_of(room: &str) -> Option<char> {
    room.trim()
        .chars()
        .next()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_uppercase())
}

/// A parsed building filter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BuildingFilter {
    #[default]
    All,
    Group(BuildingGroup),
}

impl BuildingFilter {
    /// `"all"`, a blank value or anything other than a single letter means
    /// no filtering.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim) else {
            return BuildingFilter::All;
        };
        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (Some(letter), None) if letter.is_ascii_alphabetic() => {
                BuildingFilter::Group(normalize(letter))
            }
            _ => BuildingFilter::All,
        }
    }

    pub fn admits(&self, room: &str) -> bool {
        match self {
            BuildingFilter::All => true,
            BuildingFilter::Group(group) => group.contains_room(room),
        }
    }
}
