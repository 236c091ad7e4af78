//! Setup phase: start the tournament (Setup -> GroupStage or Super8Rounds).

use crate::logic::groups::generate_group_stage;
use crate::logic::super8::start_super8;
use crate::models::{Tournament, TournamentError, TournamentKind, TournamentState};
use rand::Rng;

/// Start the tournament: pools and round robins for individual and doubles,
/// the rotating-partner schedule for SUPER8.
pub fn start_tournament<R: Rng + ?Sized>(
    tournament: &mut Tournament,
    rng: &mut R,
) -> Result<(), TournamentError> {
    if tournament.state != TournamentState::Setup {
        return Err(TournamentError::InvalidState);
    }
    match tournament.kind {
        TournamentKind::Super8 => start_super8(tournament, rng).map(|_| ()),
        TournamentKind::Individual | TournamentKind::Doubles => generate_group_stage(tournament, rng),
    }
}
