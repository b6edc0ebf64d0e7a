use anchor_lang::prelude::*;

use crate::state::{PlayerRecord, Raffle, PLAYER_RECORD_ACCOUNT_SIZE};

/// Initializes a player's entry-history account for one raffle. The record
/// tracks the last round the player entered and backs the one-entry-per-round
/// check. PDA-derived using ["player", raffle_pubkey, user_pubkey].
///
/// # State Changes
/// - Creates a new `PlayerRecord` account
/// - Initializes owner to signer's pubkey
/// - Sets last_round_played to 0 (never played)
/// - Stores the PDA bump
///
/// # Access Control
/// - Anyone can initialize their own record
/// - One record per user per raffle; the record outlives individual rounds
pub fn init_player_record(ctx: Context<InitPlayerRecord>) -> Result<()> {
    let player_record = &mut ctx.accounts.player_record;
    player_record.owner = ctx.accounts.signer.key();
    player_record.last_round_played = 0;
    player_record.bump = ctx.bumps.player_record;

    Ok(())
}

#[derive(Accounts)]
pub struct InitPlayerRecord<'info> {
    #[account(mut)]
    pub signer: Signer<'info>,

    #[account(
        init,
        payer = signer,
        space = PLAYER_RECORD_ACCOUNT_SIZE,
        seeds = [
            b"player",
            raffle.key().as_ref(),
            signer.key().as_ref(),
        ],
        bump,
    )]
    pub player_record: Account<'info, PlayerRecord>,

    pub raffle: Account<'info, Raffle>,
    pub system_program: Program<'info, System>,
}
