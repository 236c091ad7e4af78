//! CSV roster import.
//!
//! Expected header `name,partner`; the partner column may be missing or empty.
//!
//! ```text
//! name,partner
//! Ana,Bia
//! Carla,Duda
//! ```

use crate::models::Entrant;
use serde::Deserialize;
use std::fmt;
use std::io::Read;

#[derive(Debug)]
pub enum RosterError {
    /// Malformed CSV (with the line it was found on, when known).
    Csv { line: Option<u64>, message: String },
    /// The file has a header but no entrants.
    Empty,
}

impl fmt::Display for RosterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RosterError::Csv {
                line: Some(line),
                message,
            } => write!(f, "Roster line {}: {}", line, message),
            RosterError::Csv { line: None, message } => write!(f, "Roster: {}", message),
            RosterError::Empty => write!(f, "Roster has no entrants"),
        }
    }
}

impl std::error::Error for RosterError {}

impl From<csv::Error> for RosterError {
    fn from(e: csv::Error) -> Self {
        RosterError::Csv {
            line: e.position().map(|p| p.line()),
            message: e.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RosterRow {
    name: String,
    #[serde(default)]
    partner: Option<String>,
}

/// Read entrants from CSV. Names are only trimmed here; uniqueness and partner rules
/// are checked when the roster is imported into a tournament.
pub fn parse_roster<R: Read>(reader: R) -> Result<Vec<Entrant>, RosterError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut entrants = Vec::new();
    for row in csv_reader.deserialize::<RosterRow>() {
        let row = row?;
        let entrant = match row.partner.filter(|p| !p.is_empty()) {
            Some(partner) => Entrant::with_partner(row.name, partner),
            None => Entrant::new(row.name),
        };
        entrants.push(entrant);
    }
    if entrants.is_empty() {
        return Err(RosterError::Empty);
    }
    Ok(entrants)
}
