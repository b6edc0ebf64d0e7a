use anchor_lang::prelude::*;

use crate::state::Raffle;

/// Read-only eligibility probe for off-chain automation. Returns whether
/// the draw may be triggered right now:
///
/// 1. The raffle is Open
/// 2. The configured interval has elapsed since the round started
/// 3. At least one participant has entered
/// 4. The pot holds funds
///
/// `check_data` is an opaque pass-through for the automation network and is
/// not interpreted here. Never mutates state; `perform_upkeep` re-validates
/// the same predicate on its own.
pub fn check_upkeep(ctx: Context<CheckUpkeep>, _check_data: Vec<u8>) -> Result<bool> {
    let now = Clock::get()?.unix_timestamp;

    Ok(ctx.accounts.raffle.is_upkeep_needed(now))
}

/// Accounts required for the check_upkeep instruction
#[derive(Accounts)]
pub struct CheckUpkeep<'info> {
    pub raffle: Account<'info, Raffle>,
}
