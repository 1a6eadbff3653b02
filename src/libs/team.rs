use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A named group of users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: Option<i32>,
    pub name: String,
    pub description: Option<String>,
}

impl Team {
    pub fn new(name: &str, description: Option<&str>) -> Self {
        Team {
            id: None,
            name: name.to_string(),
            description: description.map(str::to_string),
        }
    }
}

/// Caller-held staging of a team's member set.
///
/// Single-member additions and removals are collected here and only reach the
/// database as one full reconciliation. Duplicates collapse and iteration is
/// ordered by user id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberSelection {
    members: BTreeSet<i32>,
}

impl MemberSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the user was already staged.
    pub fn add(&mut self, user_id: i32) -> bool {
        self.members.insert(user_id)
    }

    /// Returns `false` if the user was not staged.
    pub fn remove(&mut self, user_id: i32) -> bool {
        self.members.remove(&user_id)
    }

    pub fn contains(&self, user_id: i32) -> bool {
        self.members.contains(&user_id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn ids(&self) -> Vec<i32> {
        self.members.iter().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &i32> {
        self.members.iter()
    }
}

impl FromIterator<i32> for MemberSelection {
    fn from_iter<I: IntoIterator<Item = i32>>(iter: I) -> Self {
        MemberSelection {
            members: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a MemberSelection {
    type Item = &'a i32;
    type IntoIter = std::collections::btree_set::Iter<'a, i32>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staging_collapses_duplicates() {
        let selection: MemberSelection = vec![3, 1, 3, 2, 1].into_iter().collect();
        assert_eq!(selection.ids(), vec![1, 2, 3]);
    }

    #[test]
    fn add_and_remove_report_changes() {
        let mut selection = MemberSelection::from_iter([1, 2, 3]);
        assert!(!selection.add(2));
        assert!(selection.add(4));
        assert!(selection.remove(1));
        assert!(!selection.remove(1));
        assert_eq!(selection.ids(), vec![2, 3, 4]);
        assert!(selection.contains(4));
        assert!(!selection.contains(1));
    }
}
