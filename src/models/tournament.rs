//! Tournament aggregate, TournamentState, bracket bookkeeping and errors.

use crate::logic::ScoreError;
use crate::models::entrant::{Entrant, EntrantId};
use crate::models::game::{EliminationRound, GameMatch, MatchId};
use crate::models::group::{Group, GroupId};
use crate::models::standing::{RankingPolicy, Standing};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Broad class of a [`TournamentError`], used by callers to pick a response.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// The caller supplied bad data (roster, score string, unknown id).
    Input,
    /// The operation is not allowed in the tournament's current phase.
    State,
    /// An entrant, match or group id that does not exist.
    NotFound,
}

/// Errors that can occur during tournament operations. None of them leave partial changes behind.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// Too few entrants for the format.
    NotEnoughEntrants { required: usize, found: usize },
    /// Too many entrants for the format (SUPER8 allows 12).
    TooManyEntrants { max: usize, found: usize },
    /// Tournament is not in a state that allows this action.
    InvalidState,
    /// Entrant names must be non-empty.
    EmptyName,
    /// An entrant with this name already exists (names are unique, case-insensitive).
    DuplicateEntrantName,
    /// Doubles entrants register as a pair.
    PartnerRequired,
    /// Individual and SUPER8 entrants register alone.
    PartnerNotAllowed,
    EntrantNotFound(EntrantId),
    MatchNotFound(MatchId),
    GroupNotFound(GroupId),
    /// The match already has a result; use an explicit correction instead.
    MatchAlreadyFinal(MatchId),
    /// Only final matches can be corrected.
    MatchNotFinal(MatchId),
    /// Score string rejected by the ITF grammar.
    InvalidScore(ScoreError),
    /// Pool matches still waiting for a result.
    PendingGroupMatches { remaining: usize },
    /// Fewer than two entrants qualified for the bracket.
    NotEnoughQualifiers { found: usize },
    /// More qualifiers than the largest bracket (64) holds.
    TooManyQualifiers { found: usize },
    /// Bracket cannot continue: no round is defined for the advancing entrants.
    /// Valid qualifier counts never reach this.
    BracketStalled {
        round: EliminationRound,
        advancing: usize,
    },
}

impl TournamentError {
    pub fn kind(&self) -> ErrorKind {
        use TournamentError::*;
        match self {
            NotEnoughEntrants { .. }
            | TooManyEntrants { .. }
            | EmptyName
            | DuplicateEntrantName
            | PartnerRequired
            | PartnerNotAllowed
            | InvalidScore(_) => ErrorKind::Input,
            EntrantNotFound(_) | MatchNotFound(_) | GroupNotFound(_) => ErrorKind::NotFound,
            InvalidState
            | MatchAlreadyFinal(_)
            | MatchNotFinal(_)
            | PendingGroupMatches { .. }
            | NotEnoughQualifiers { .. }
            | TooManyQualifiers { .. }
            | BracketStalled { .. } => ErrorKind::State,
        }
    }
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::NotEnoughEntrants { required, found } => {
                write!(f, "Need at least {} entrants (found {})", required, found)
            }
            TournamentError::TooManyEntrants { max, found } => {
                write!(f, "At most {} entrants allowed (found {})", max, found)
            }
            TournamentError::InvalidState => write!(f, "Invalid state for this action"),
            TournamentError::EmptyName => write!(f, "Name cannot be empty"),
            TournamentError::DuplicateEntrantName => {
                write!(f, "An entrant with this name already exists")
            }
            TournamentError::PartnerRequired => write!(f, "Doubles entrants need a partner"),
            TournamentError::PartnerNotAllowed => {
                write!(f, "This format takes individual entrants only")
            }
            TournamentError::EntrantNotFound(_) => write!(f, "Entrant not found"),
            TournamentError::MatchNotFound(_) => write!(f, "Match not found"),
            TournamentError::GroupNotFound(id) => write!(f, "Group {} not found", id),
            TournamentError::MatchAlreadyFinal(_) => {
                write!(f, "Match already has a result")
            }
            TournamentError::MatchNotFinal(_) => write!(f, "Match has no result to correct"),
            TournamentError::InvalidScore(e) => write!(f, "Invalid score: {}", e),
            TournamentError::PendingGroupMatches { remaining } => {
                write!(f, "{} group match(es) still pending", remaining)
            }
            TournamentError::NotEnoughQualifiers { found } => {
                write!(f, "Not enough qualifiers for a bracket ({})", found)
            }
            TournamentError::TooManyQualifiers { found } => {
                write!(f, "Too many qualifiers for a 64 bracket ({})", found)
            }
            TournamentError::BracketStalled { round, advancing } => write!(
                f,
                "No round defined after {:?} for {} advancing entrants",
                round, advancing
            ),
        }
    }
}

impl std::error::Error for TournamentError {}

impl From<ScoreError> for TournamentError {
    fn from(e: ScoreError) -> Self {
        TournamentError::InvalidScore(e)
    }
}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Entry format.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentKind {
    /// One player per entrant, groups then bracket.
    Individual,
    /// Fixed pairs, groups then bracket.
    #[default]
    Doubles,
    /// Individual entry, partners rotate every round, single pool ranked by games balance.
    Super8,
}

/// Current phase of the tournament.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentState {
    /// Registering entrants; not started.
    #[default]
    Setup,
    /// Round-robin pools are being played.
    GroupStage,
    /// Bracket rounds are being played.
    Elimination,
    /// SUPER8 rotation schedule is being played.
    Super8Rounds,
    /// Champion and runner-up known.
    Completed,
}

/// An entrant that finished first or second in its group.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Qualifier {
    pub entrant: EntrantId,
    pub group_id: GroupId,
    /// Final group position, 1 or 2.
    pub position: usize,
    /// Group standing at the moment the bracket was drawn.
    pub standing: Standing,
}

/// Elimination bookkeeping kept while the bracket is played.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BracketState {
    pub qualified: Vec<Qualifier>,
    /// Everyone knocked out: group positions 3+ and every bracket loser.
    pub eliminated: Vec<EntrantId>,
    /// Entrants holding a bye into the round after `current_round`.
    pub byes: Vec<EntrantId>,
    pub current_round: EliminationRound,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Podium {
    pub champion: EntrantId,
    pub runner_up: EntrantId,
}

/// Full tournament state: roster, pools, matches, bracket and phase.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub kind: TournamentKind,
    pub state: TournamentState,
    pub entrants: Vec<Entrant>,
    pub groups: Vec<Group>,
    /// Every match generated so far, pool and bracket, in creation order.
    pub matches: Vec<GameMatch>,
    pub bracket: Option<BracketState>,
    pub podium: Option<Podium>,
    pub created_at: DateTime<Utc>,
}

impl Tournament {
    /// Create a new tournament in Setup state with no entrants.
    pub fn new(name: impl Into<String>, kind: TournamentKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            state: TournamentState::Setup,
            entrants: Vec::new(),
            groups: Vec::new(),
            matches: Vec::new(),
            bracket: None,
            podium: None,
            created_at: Utc::now(),
        }
    }

    /// Create a tournament with an initial roster. Still in Setup until started.
    pub fn with_entrants(name: impl Into<String>, kind: TournamentKind, entrants: Vec<Entrant>) -> Self {
        Self {
            entrants,
            ..Self::new(name, kind)
        }
    }

    /// Ranking policy used for this tournament's pools.
    pub fn ranking_policy(&self) -> RankingPolicy {
        match self.kind {
            TournamentKind::Super8 => RankingPolicy::Super8,
            TournamentKind::Individual | TournamentKind::Doubles => RankingPolicy::Standard,
        }
    }

    pub fn entrant(&self, id: EntrantId) -> Option<&Entrant> {
        self.entrants.iter().find(|e| e.id == id)
    }

    pub fn group(&self, id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn group_mut(&mut self, id: &str) -> Option<&mut Group> {
        self.groups.iter_mut().find(|g| g.id == id)
    }

    pub fn match_by_id(&self, id: MatchId) -> Option<&GameMatch> {
        self.matches.iter().find(|m| m.id == id)
    }

    pub fn match_mut(&mut self, id: MatchId) -> Option<&mut GameMatch> {
        self.matches.iter_mut().find(|m| m.id == id)
    }

    /// Add an entrant (only valid in Setup). Names are trimmed and must be unique (case-insensitive).
    pub fn add_entrant(
        &mut self,
        name: impl Into<String>,
        partner_name: Option<String>,
    ) -> Result<EntrantId, TournamentError> {
        if self.state != TournamentState::Setup {
            return Err(TournamentError::InvalidState);
        }
        let entrant = self.checked_entrant(&name.into(), partner_name.as_deref())?;
        let id = entrant.id;
        self.entrants.push(entrant);
        Ok(id)
    }

    /// Add a whole roster (only valid in Setup). Either every entrant is added or none is.
    pub fn import_roster(&mut self, roster: Vec<Entrant>) -> Result<usize, TournamentError> {
        if self.state != TournamentState::Setup {
            return Err(TournamentError::InvalidState);
        }
        let mut staged = self.entrants.clone();
        let count = roster.len();
        for row in roster {
            let entrant = checked_entrant(&staged, self.kind, &row.name, row.partner_name.as_deref())?;
            staged.push(entrant);
        }
        self.entrants = staged;
        Ok(count)
    }

    /// Remove an entrant by id (only valid in Setup).
    pub fn remove_entrant(&mut self, entrant_id: EntrantId) -> Result<(), TournamentError> {
        if self.state != TournamentState::Setup {
            return Err(TournamentError::InvalidState);
        }
        let idx = self
            .entrants
            .iter()
            .position(|e| e.id == entrant_id)
            .ok_or(TournamentError::EntrantNotFound(entrant_id))?;
        self.entrants.remove(idx);
        Ok(())
    }

    /// Restart: back to Setup with the same roster. Clears pools, matches and bracket.
    pub fn restart(&mut self) -> Result<(), TournamentError> {
        if self.state == TournamentState::Setup {
            return Err(TournamentError::InvalidState);
        }
        self.state = TournamentState::Setup;
        self.groups.clear();
        self.matches.clear();
        self.bracket = None;
        self.podium = None;
        Ok(())
    }

    fn checked_entrant(&self, name: &str, partner_name: Option<&str>) -> Result<Entrant, TournamentError> {
        checked_entrant(&self.entrants, self.kind, name, partner_name)
    }
}

/// Validate a new entrant against the roster and format, returning it with trimmed names.
fn checked_entrant(
    roster: &[Entrant],
    kind: TournamentKind,
    name: &str,
    partner_name: Option<&str>,
) -> Result<Entrant, TournamentError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TournamentError::EmptyName);
    }
    let partner = partner_name.map(str::trim).filter(|p| !p.is_empty());
    match (kind, partner) {
        (TournamentKind::Doubles, None) => return Err(TournamentError::PartnerRequired),
        (TournamentKind::Individual | TournamentKind::Super8, Some(_)) => {
            return Err(TournamentError::PartnerNotAllowed)
        }
        _ => {}
    }
    if roster.iter().any(|e| e.name.eq_ignore_ascii_case(name)) {
        return Err(TournamentError::DuplicateEntrantName);
    }
    Ok(match partner {
        Some(partner) => Entrant::with_partner(name, partner),
        None => Entrant::new(name),
    })
}
