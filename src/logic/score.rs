//! ITF beach tennis score grammar: parse and validate raw score strings.
//!
//! Accepted (tokens separated by whitespace, no leading or trailing whitespace):
//! - `6-4` one set
//! - `6-4 6-2` two sets, won 2-0
//! - `6-4 4-6 [10-8]` two split sets and a match tie-break

use crate::models::Side;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Largest game or tie-break point count accepted in a single token.
pub const MAX_SCORE_VALUE: u32 = 99;

/// Why a score string was rejected.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreError {
    /// Nothing but whitespace.
    Empty,
    /// A set that does not end at 6+ with a 2-game margin, nor 7-6.
    InvalidSet { games_1: u32, games_2: u32 },
    /// A match tie-break that does not reach 10+ with a 2-point margin.
    InvalidMatchTieBreak { points_1: u32, points_2: u32 },
    /// Two sets without a tie-break must be won 2-0.
    TwoSetsNeedStraightWin,
    /// A match tie-break is only played after the sets split 1-1.
    TieBreakNeedsSplitSets,
    /// A game or point count above [`MAX_SCORE_VALUE`].
    ValueTooLarge,
    /// Does not match any accepted layout.
    UnrecognizedFormat,
}

impl fmt::Display for ScoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreError::Empty => write!(f, "Score cannot be empty"),
            ScoreError::InvalidSet { games_1, games_2 } => write!(
                f,
                "Set {}-{} must end at 6 games with a 2-game lead, or 7-6",
                games_1, games_2
            ),
            ScoreError::InvalidMatchTieBreak { points_1, points_2 } => write!(
                f,
                "Match tie-break [{}-{}] must reach 10 points with a 2-point lead",
                points_1, points_2
            ),
            ScoreError::TwoSetsNeedStraightWin => {
                write!(f, "In 2 sets, one side must win both (2-0)")
            }
            ScoreError::TieBreakNeedsSplitSets => {
                write!(f, "Match tie-break is only played when sets are tied 1-1")
            }
            ScoreError::ValueTooLarge => {
                write!(f, "Game and point counts are limited to {}", MAX_SCORE_VALUE)
            }
            ScoreError::UnrecognizedFormat => write!(
                f,
                "Invalid score format. Use \"6-4 6-2\", \"6-4 4-6 [10-8]\" or \"6-4\""
            ),
        }
    }
}

impl std::error::Error for ScoreError {}

/// Games of one set, side one first.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SetScore {
    pub games_1: u32,
    pub games_2: u32,
}

impl SetScore {
    /// Side that took the set. Only meaningful for validated sets (never level).
    pub fn winner(&self) -> Side {
        if self.games_1 > self.games_2 {
            Side::One
        } else {
            Side::Two
        }
    }
}

/// Match tie-break points, side one first.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TieBreakScore {
    pub points_1: u32,
    pub points_2: u32,
}

impl TieBreakScore {
    pub fn winner(&self) -> Side {
        if self.points_1 > self.points_2 {
            Side::One
        } else {
            Side::Two
        }
    }
}

/// A validated score. Only [`parse_score`] builds one.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ParsedScore {
    pub winner: Side,
    /// One or two sets.
    pub sets: Vec<SetScore>,
    pub match_tie_break: Option<TieBreakScore>,
}

impl FromStr for ParsedScore {
    type Err = ScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_score(s)
    }
}

impl fmt::Display for ParsedScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sets: Vec<String> = self
            .sets
            .iter()
            .map(|s| format!("{}-{}", s.games_1, s.games_2))
            .collect();
        write!(f, "{}", sets.join(" "))?;
        if let Some(tb) = &self.match_tie_break {
            write!(f, " [{}-{}]", tb.points_1, tb.points_2)?;
        }
        Ok(())
    }
}

/// A set is over at 6+ games with a 2-game lead, or 7-6 after a set tie-break.
pub fn validate_set(games_1: u32, games_2: u32) -> bool {
    let (hi, lo) = (games_1.max(games_2), games_1.min(games_2));
    (hi >= 6 && hi - lo >= 2) || (hi == 7 && lo == 6)
}

/// A match tie-break is over at 10+ points with a 2-point lead.
pub fn validate_match_tie_break(points_1: u32, points_2: u32) -> bool {
    let (hi, lo) = (points_1.max(points_2), points_1.min(points_2));
    hi >= 10 && hi - lo >= 2
}

/// Parse and validate a raw score string.
pub fn parse_score(raw: &str) -> Result<ParsedScore, ScoreError> {
    if raw.trim().is_empty() {
        return Err(ScoreError::Empty);
    }
    if raw.trim() != raw {
        return Err(ScoreError::UnrecognizedFormat);
    }
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    match tokens.as_slice() {
        [first, second, tie_break] => {
            let (s1, s2) = (set_token(first)?, set_token(second)?);
            let tb = tie_break_token(tie_break)?;
            checked_sets(&[s1, s2])?;
            if !validate_match_tie_break(tb.points_1, tb.points_2) {
                return Err(ScoreError::InvalidMatchTieBreak {
                    points_1: tb.points_1,
                    points_2: tb.points_2,
                });
            }
            if s1.winner() == s2.winner() {
                return Err(ScoreError::TieBreakNeedsSplitSets);
            }
            Ok(ParsedScore {
                winner: tb.winner(),
                sets: vec![s1, s2],
                match_tie_break: Some(tb),
            })
        }
        [first, second] => {
            let (s1, s2) = (set_token(first)?, set_token(second)?);
            checked_sets(&[s1, s2])?;
            if s1.winner() != s2.winner() {
                return Err(ScoreError::TwoSetsNeedStraightWin);
            }
            Ok(ParsedScore {
                winner: s1.winner(),
                sets: vec![s1, s2],
                match_tie_break: None,
            })
        }
        [only] => {
            let set = set_token(only)?;
            checked_sets(&[set])?;
            Ok(ParsedScore {
                winner: set.winner(),
                sets: vec![set],
                match_tie_break: None,
            })
        }
        _ => Err(ScoreError::UnrecognizedFormat),
    }
}

fn checked_sets(sets: &[SetScore]) -> Result<(), ScoreError> {
    match sets.iter().find(|s| !validate_set(s.games_1, s.games_2)) {
        Some(bad) => Err(ScoreError::InvalidSet {
            games_1: bad.games_1,
            games_2: bad.games_2,
        }),
        None => Ok(()),
    }
}

fn set_token(token: &str) -> Result<SetScore, ScoreError> {
    let (games_1, games_2) = number_pair(token)?;
    Ok(SetScore { games_1, games_2 })
}

fn tie_break_token(token: &str) -> Result<TieBreakScore, ScoreError> {
    let inner = token
        .strip_prefix('[')
        .and_then(|t| t.strip_suffix(']'))
        .ok_or(ScoreError::UnrecognizedFormat)?;
    let (points_1, points_2) = number_pair(inner)?;
    Ok(TieBreakScore { points_1, points_2 })
}

/// "<digits>-<digits>"; signs, spaces and anything else are rejected.
fn number_pair(token: &str) -> Result<(u32, u32), ScoreError> {
    let (a, b) = token.split_once('-').ok_or(ScoreError::UnrecognizedFormat)?;
    Ok((digits(a)?, digits(b)?))
}

fn digits(s: &str) -> Result<u32, ScoreError> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ScoreError::UnrecognizedFormat);
    }
    match s.parse::<u32>() {
        Ok(value) if value <= MAX_SCORE_VALUE => Ok(value),
        _ => Err(ScoreError::ValueTooLarge),
    }
}
