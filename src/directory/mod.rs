use log::debug;

use crate::domain::{PlayerQuery, PlayerRecord};
use crate::errors::StoreError;
use crate::store::TabularStore;

/// First physical row holding player data (row 1 is the header)
pub const FIRST_DATA_ROW: usize = 2;

/// How a name + contact query is matched against stored players.
///
/// `NameOrContact` treats a hit on either field as the same player: two
/// people sharing a contact collide, and so do two people with the same
/// name. This is the policy the leaderboard runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPolicy {
    #[default]
    NameOrContact,
    NameAndContact,
}

impl MatchPolicy {
    /// Setting value: `or` / `name-or-contact`, `and` / `name-and-contact`
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "or" | "name-or-contact" => Some(Self::NameOrContact),
            "and" | "name-and-contact" => Some(Self::NameAndContact),
            _ => None,
        }
    }

    /// Names compare trimmed and case-insensitively, contacts compare trimmed
    pub fn matches(self, record: &PlayerRecord, name: &str, contact: &str) -> bool {
        let same_name = record.name().trim().to_lowercase() == name.trim().to_lowercase();
        let same_contact = record.contact().trim() == contact.trim();

        match self {
            MatchPolicy::NameOrContact => same_name || same_contact,
            MatchPolicy::NameAndContact => same_name && same_contact,
        }
    }
}

/// Snapshot of every present player row, with its physical row number
#[derive(Debug, Clone, Default)]
pub struct PlayerDirectory {
    entries: Vec<(usize, PlayerRecord)>,
    policy: MatchPolicy,
}

impl PlayerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: MatchPolicy) -> Self {
        Self {
            entries: Vec::new(),
            policy,
        }
    }

    /// Replace the snapshot with the store's current rows.
    ///
    /// Blank rows are dropped and the survivors are numbered consecutively
    /// from row 2.
    pub fn reload<S: TabularStore>(&mut self, store: &S) -> Result<(), StoreError> {
        let rows = store.read_all()?;
        self.entries = rows
            .into_iter()
            .filter(|row| !row.is_blank())
            .enumerate()
            .map(|(idx, row)| (idx + FIRST_DATA_ROW, PlayerRecord::new(row)))
            .collect();

        debug!("Directory reloaded: {} players", self.entries.len());
        Ok(())
    }

    pub fn entries(&self) -> impl Iterator<Item = (usize, &PlayerRecord)> {
        self.entries.iter().map(|(row, record)| (*row, record))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Locate a player; the first match in sheet order wins.
    ///
    /// An id is compared as an exact string against the stored id. Without
    /// an id, name and contact must both be given and are matched with the
    /// directory's [`MatchPolicy`].
    pub fn find(&self, query: &PlayerQuery) -> Option<(usize, &PlayerRecord)> {
        match (&query.id, &query.name, &query.contact) {
            (Some(id), _, _) => self.entries().find(|(_, record)| record.id() == id.as_str()),
            (None, Some(name), Some(contact)) => self
                .entries()
                .find(|(_, record)| self.policy.matches(record, name, contact)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_names() {
        assert_eq!(MatchPolicy::from_name(" AND "), Some(MatchPolicy::NameAndContact));
        assert_eq!(MatchPolicy::from_name("name-or-contact"), Some(MatchPolicy::NameOrContact));
        assert_eq!(MatchPolicy::from_name("xor"), None);
    }
    use crate::config::canonical_header;
    use crate::store::MemorySheet;

    fn sheet(rows: &[&[&str]]) -> MemorySheet {
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|v| v.to_string()).collect::<Vec<String>>())
            .collect();
        MemorySheet::with_rows(canonical_header(), rows)
    }

    fn loaded(rows: &[&[&str]]) -> PlayerDirectory {
        let mut directory = PlayerDirectory::new();
        directory.reload(&sheet(rows)).unwrap();
        directory
    }

    #[test]
    fn test_reload_skips_blank_rows_and_renumbers() {
        let directory = loaded(&[&["1", "Ana", "@ana"], &["", " ", ""], &["2", "Bia", "@bia"]]);

        let rows: Vec<_> = directory.entries().map(|(row, r)| (row, r.name().to_string())).collect();

        assert_eq!(rows, vec![(2, "Ana".to_string()), (3, "Bia".to_string())]);
    }

    #[test]
    fn test_entries_can_be_walked_twice() {
        let directory = loaded(&[&["1", "Ana", "@ana"]]);

        assert_eq!(directory.entries().count(), 1);
        assert_eq!(directory.entries().count(), 1);
    }

    #[test]
    fn test_find_by_id_is_exact_string_match() {
        let directory = loaded(&[&["07", "Ana", "@ana"], &["7", "Bia", "@bia"]]);

        let (row, record) = directory.find(&PlayerQuery::by_id("7")).unwrap();

        assert_eq!(row, 3);
        assert_eq!(record.name(), "Bia");
        assert!(loaded(&[&["07", "Ana", "@ana"]]).find(&PlayerQuery::by_id("7")).is_none());
    }

    #[test]
    fn test_find_by_id_ignores_name_and_contact() {
        let directory = loaded(&[&["1", "Ana", "@ana"]]);
        let query = PlayerQuery {
            id: Some("9".to_string()),
            name: Some("Ana".to_string()),
            contact: Some("@ana".to_string()),
        };

        assert!(directory.find(&query).is_none());
    }

    #[test]
    fn test_find_name_is_case_insensitive_and_trimmed() {
        let directory = loaded(&[&["1", " Ana Souza ", "@ana"]]);

        let found = directory.find(&PlayerQuery::by_name_and_contact("ana souza", "@other"));

        assert_eq!(found.map(|(row, _)| row), Some(2));
    }

    #[test]
    fn test_find_matches_on_contact_alone() {
        let directory = loaded(&[&["1", "Ana", "@ana"], &["2", "Bia", "11999990000"]]);

        let (_, record) = directory
            .find(&PlayerQuery::by_name_and_contact("Beatriz", " 11999990000 "))
            .unwrap();

        assert_eq!(record.id(), "2");
    }

    #[test]
    fn test_first_match_wins() {
        let directory = loaded(&[&["1", "Ana", "@a"], &["2", "Bia", "@ana"]]);

        let (_, record) = directory
            .find(&PlayerQuery::by_name_and_contact("Ana", "@ana"))
            .unwrap();

        assert_eq!(record.id(), "1");
    }

    #[test]
    fn test_strict_policy_requires_both_fields() {
        let mut directory = PlayerDirectory::with_policy(MatchPolicy::NameAndContact);
        directory.reload(&sheet(&[&["1", "Ana", "@ana"]])).unwrap();

        assert!(directory.find(&PlayerQuery::by_name_and_contact("Ana", "@other")).is_none());
        assert!(directory.find(&PlayerQuery::by_name_and_contact("ana", "@ana")).is_some());
    }

    #[test]
    fn test_name_without_contact_is_not_a_query() {
        let directory = loaded(&[&["1", "Ana", "@ana"]]);
        let query = PlayerQuery {
            name: Some("Ana".to_string()),
            ..PlayerQuery::default()
        };

        assert!(directory.find(&query).is_none());
    }
}
