use anchor_lang::prelude::*;

use crate::{
    error::RaffleError,
    oracle,
    state::{Raffle, Vault},
};

/// Event emitted when a winner is selected and paid
#[event]
pub struct WinnerSelected {
    /// The pubkey of the raffle
    pub raffle: Pubkey,
    /// The winning player
    pub winner: Pubkey,
    /// Index of the winner in this round's participant sequence
    pub winning_index: u64,
    /// Pot paid out in lamports
    pub payout: u64,
    /// The round now open for entries
    pub new_round: u64,
}

/// Oracle delivery callback: consumes the outstanding randomness request,
/// selects the winner, pays out the pot, and rolls the raffle into the next
/// round.
///
/// The whole transition is indivisible. Solana rolls back every account
/// mutation when an instruction errors, so a failed payout leaves the
/// raffle Calculating with pot and participants intact, and the delivery
/// can be retried.
///
/// # Arguments
/// * `request_id` - Correlation id returned when the request was issued
/// * `randomness` - The oracle's 32-byte verified result buffer
///
/// # Errors
/// - `NotOracleAuthority` if the signer is not the configured oracle
/// - `UnknownRequestId` for stale, duplicate, or unsolicited deliveries
/// - `NoParticipants` if the round is empty (invariant violation; upkeep
///   requires participants and entries are frozen while Calculating)
/// - `WinnerAccountMismatch` if the passed winner account is not the
///   selected participant
/// - `TransferFailed` if the vault cannot cover the pot
pub fn fulfill_randomness(
    ctx: Context<FulfillRandomness>,
    request_id: u64,
    randomness: [u8; 32],
) -> Result<()> {
    let raffle = &mut ctx.accounts.raffle;

    oracle::match_pending(raffle, request_id)?;

    let words = oracle::random_words(&randomness);
    let (winning_index, winner) = raffle.select_winner(words[0])?;

    // The winner account cannot be constrained up front; it is resolved
    // from the delivered randomness
    require!(
        ctx.accounts.winner.key() == winner,
        RaffleError::WinnerAccountMismatch
    );

    // Pay the full pot before any bookkeeping is touched
    let payout = raffle.pot;
    let vault_account = ctx.accounts.vault.to_account_info();
    let winner_account = ctx.accounts.winner.to_account_info();
    require!(
        vault_account.lamports() >= payout,
        RaffleError::TransferFailed
    );

    // Direct lamport moves work because the vault is a PDA owned by this
    // program. The vault keeps its rent-exempt minimum; only the tracked
    // pot leaves.
    vault_account.sub_lamports(payout)?;
    winner_account.add_lamports(payout)?;

    let now = Clock::get()?.unix_timestamp;
    raffle.roll_over(winner, now)?;

    emit!(WinnerSelected {
        raffle: raffle.key(),
        winner,
        winning_index,
        payout,
        new_round: raffle.current_round,
    });

    Ok(())
}

/// Accounts required for the fulfill_randomness instruction
#[derive(Accounts)]
pub struct FulfillRandomness<'info> {
    #[account(
        mut,
        has_one = oracle_authority @ RaffleError::NotOracleAuthority,
        has_one = vault @ RaffleError::InvalidVault,
    )]
    pub raffle: Account<'info, Raffle>,

    /// Only the oracle identity fixed at raffle creation may deliver
    pub oracle_authority: Signer<'info>,

    /// Escrow vault paying out the pot
    /// PDA with seeds ["vault", raffle_key]
    #[account(
        mut,
        seeds = [
            b"vault",
            raffle.key().as_ref(),
        ],
        bump = vault.bump,
    )]
    pub vault: Account<'info, Vault>,

    /// CHECK: Verified at runtime against the participant selected by the
    /// delivered randomness.
    #[account(mut)]
    pub winner: UncheckedAccount<'info>,
}
