//! Group (pool) with its members and standings.

use crate::models::entrant::EntrantId;
use crate::models::standing::Standing;
use serde::{Deserialize, Serialize};

/// Group identifier: a letter ("A", "B", ...) or "SUPER8" for the rotating pool.
pub type GroupId = String;

/// Id of the single pool a SUPER8 tournament plays in.
pub const SUPER8_GROUP_ID: &str = "SUPER8";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    /// Members in draw order; fixed once the group is created.
    pub members: Vec<EntrantId>,
    /// One standing per member, same order as `members`.
    pub standings: Vec<Standing>,
}

impl Group {
    pub fn new(id: impl Into<GroupId>, name: impl Into<String>, members: Vec<EntrantId>) -> Self {
        let standings = members.iter().copied().map(Standing::new).collect();
        Self {
            id: id.into(),
            name: name.into(),
            members,
            standings,
        }
    }

    /// Group named by its position in the draw: 0 -> "A", 1 -> "B", ...
    pub fn lettered(index: usize, members: Vec<EntrantId>) -> Self {
        let letter = group_letter(index);
        let name = format!("Group {letter}");
        Self::new(letter, name, members)
    }

    pub fn contains(&self, id: EntrantId) -> bool {
        self.members.contains(&id)
    }

    pub fn standing(&self, id: EntrantId) -> Option<&Standing> {
        self.standings.iter().find(|s| s.entrant == id)
    }

    pub fn standing_mut(&mut self, id: EntrantId) -> Option<&mut Standing> {
        self.standings.iter_mut().find(|s| s.entrant == id)
    }

    /// Zero every member's counters (before a full recomputation).
    pub fn reset_standings(&mut self) {
        self.standings = self.members.iter().copied().map(Standing::new).collect();
    }
}

/// Spreadsheet-style letters: A..Z, then AA, AB, ...
fn group_letter(index: usize) -> String {
    let mut n = index;
    let mut letters = Vec::new();
    loop {
        letters.push(char::from(b'A' + (n % 26) as u8));
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    letters.iter().rev().collect()
}
