use anchor_lang::prelude::*;

use crate::{error::RaffleError, oracle, state::Raffle};

/// Event emitted when a randomness request is issued
#[event]
pub struct RandomnessRequested {
    /// The pubkey of the raffle
    pub raffle: Pubkey,
    /// Correlation id for the outstanding request
    pub request_id: u64,
    /// The round being drawn
    pub round: u64,
}

/// Triggers the draw once the upkeep conditions hold. Any caller may invoke
/// this directly, so the predicate is re-validated here rather than trusted
/// from a prior `check_upkeep` call.
///
/// On success the raffle moves to Calculating, a randomness request is
/// issued against the configured oracle parameters, and the request id is
/// recorded as the single outstanding request. The participant set is frozen
/// until the oracle delivers: no entries are admitted while Calculating and
/// no second request can be issued.
///
/// There is no timeout out of Calculating. If the oracle never delivers,
/// the raffle stays stranded awaiting fulfillment.
///
/// # Errors
/// - `UpkeepNotNeeded` if any of the four conditions fails; the diagnostic
///   snapshot (state, participant count, elapsed time) is logged
pub fn perform_upkeep(ctx: Context<PerformUpkeep>, _perform_data: Vec<u8>) -> Result<()> {
    let raffle = &mut ctx.accounts.raffle;
    let now = Clock::get()?.unix_timestamp;

    if !raffle.is_upkeep_needed(now) {
        msg!(
            "upkeep not needed: state={:?} participants={} elapsed={}s pot={}",
            raffle.raffle_state,
            raffle.participant_count(),
            now.saturating_sub(raffle.last_timestamp),
            raffle.pot,
        );
        return err!(RaffleError::UpkeepNotNeeded);
    }

    raffle.begin_calculating(now)?;
    let request = oracle::issue_request(raffle)?;

    emit!(RandomnessRequested {
        raffle: raffle.key(),
        request_id: request.request_id,
        round: raffle.current_round,
    });

    Ok(())
}

/// Accounts required for the perform_upkeep instruction
#[derive(Accounts)]
pub struct PerformUpkeep<'info> {
    #[account(mut)]
    pub raffle: Account<'info, Raffle>,
}
