use std::fmt;

use serde::{Deserialize, Serialize};

/// Partition key for the parallel forum sections. The four named sections
/// share one post table; community posts are additionally scoped to the
/// owning community's id (not its routing slug).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum Section {
    Learning,
    Imagining,
    Organizing,
    Plugs,
    Community(i64),
}

impl Section {
    /// The four account-free forum sections, in navigation order.
    pub const FORUM_SECTIONS: [Section; 4] = [
        Section::Learning,
        Section::Imagining,
        Section::Organizing,
        Section::Plugs,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Section::Learning => "learning",
            Section::Imagining => "imagining",
            Section::Organizing => "organizing",
            Section::Plugs => "plugs",
            Section::Community(_) => "community",
        }
    }

    pub fn community_id(&self) -> Option<i64> {
        match self {
            Section::Community(community_id) => Some(*community_id),
            _ => None,
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Community(community_id) => write!(f, "community:{community_id}"),
            section => write!(f, "{}", section.key()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::section::Section;

    #[test]
    fn test_section_key() {
        assert_eq!(Section::Learning.key(), "learning");
        assert_eq!(Section::Imagining.key(), "imagining");
        assert_eq!(Section::Organizing.key(), "organizing");
        assert_eq!(Section::Plugs.key(), "plugs");
        assert_eq!(Section::Community(3).key(), "community");
    }

    #[test]
    fn test_section_community_id() {
        assert_eq!(Section::Learning.community_id(), None);
        assert_eq!(Section::Community(3).community_id(), Some(3));
    }

    #[test]
    fn test_section_display() {
        assert_eq!(Section::Plugs.to_string(), "plugs");
        assert_eq!(Section::Community(7).to_string(), "community:7");
    }
}
