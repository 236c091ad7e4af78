//! Entrant: a team (doubles) or an individual registered in a tournament.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an entrant (used in matches, groups and standings).
pub type EntrantId = Uuid;

/// A registered entrant. In doubles formats the entrant is the fixed pair and
/// `partner_name` names the second player; SUPER8 and individual entrants have none.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Entrant {
    pub id: EntrantId,
    pub name: String,
    pub partner_name: Option<String>,
}

impl Entrant {
    /// Create a new entrant without a partner.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            partner_name: None,
        }
    }

    /// Create a new fixed doubles pair.
    pub fn with_partner(name: impl Into<String>, partner_name: impl Into<String>) -> Self {
        Self {
            partner_name: Some(partner_name.into()),
            ..Self::new(name)
        }
    }

    /// Name as shown in tables and brackets ("Ana & Bia" for a pair).
    pub fn display_name(&self) -> String {
        match &self.partner_name {
            Some(partner) => format!("{} & {}", self.name, partner),
            None => self.name.clone(),
        }
    }
}
