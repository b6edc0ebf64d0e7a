use anchor_lang::prelude::*;

use crate::{
    error::RaffleError,
    state::{
        raffle::{Raffle, RaffleState},
        PlayerRecord, Vault,
    },
};

/// Event emitted when a player enters the raffle
#[event]
pub struct EnteredRaffle {
    /// The pubkey of the raffle
    pub raffle: Pubkey,
    /// The entering player
    pub player: Pubkey,
    /// Amount paid in lamports (>= entrance fee)
    pub amount: u64,
    /// The round the entry belongs to
    pub round: u64,
}

/// Instruction to enter the current raffle round
///
/// # Arguments
/// * `ctx` - The context object containing all required accounts
/// * `amount` - Lamports the player pays; must cover the entrance fee
///
/// # Security Considerations
/// The instruction performs several critical checks:
/// 1. Validates raffle is Open through account constraints
/// 2. Rejects payment below the entrance fee
/// 3. Rejects a second entry by the same player in the same round
/// 4. Rejects entries once the participant sequence is full
/// 5. Verifies the vault account matches the one stored in the raffle
/// 6. Verifies the lamport transfer landed by checking vault balances
///
/// # Implementation Notes
/// - Overpayment beyond the fee is accepted and escrowed in full
/// - Uses checked arithmetic for all pot accounting
/// - Updates state before performing the external transfer
pub fn enter_raffle(ctx: Context<EnterRaffle>, amount: u64) -> Result<()> {
    // Ensure the vault matches the one stored in the raffle
    require!(
        ctx.accounts.vault.key() == ctx.accounts.raffle.vault,
        RaffleError::InvalidVault,
    );

    // Admission: fee, duplicate-entry, and capacity checks live on the
    // raffle aggregate
    let player = ctx.accounts.signer.key();
    let last_round_played = ctx.accounts.player_record.last_round_played;
    ctx.accounts
        .raffle
        .record_entry(player, amount, last_round_played)?;

    let round = ctx.accounts.raffle.current_round;
    ctx.accounts.player_record.last_round_played = round;

    // Store pre-transfer balance for verification
    let pre_transfer_balance = ctx.accounts.vault.to_account_info().lamports();

    // Transfer the fee from the player into the escrow vault
    anchor_lang::solana_program::program::invoke(
        &anchor_lang::solana_program::system_instruction::transfer(
            &ctx.accounts.signer.key(),
            &ctx.accounts.vault.key(),
            amount,
        ),
        &[
            ctx.accounts.signer.to_account_info(),
            ctx.accounts.system_program.to_account_info(),
            ctx.accounts.vault.to_account_info(),
        ],
    )?;

    // Verify the transfer was successful by checking the vault balance
    let post_transfer_balance = ctx.accounts.vault.to_account_info().lamports();
    require!(
        post_transfer_balance
            == pre_transfer_balance
                .checked_add(amount)
                .ok_or(RaffleError::Overflow)?,
        RaffleError::TransferFailed
    );

    emit!(EnteredRaffle {
        raffle: ctx.accounts.raffle.key(),
        player,
        amount,
        round,
    });

    Ok(())
}

/// Accounts required for the enter_raffle instruction
#[derive(Accounts)]
pub struct EnterRaffle<'info> {
    /// The raffle being entered. Must be in Open state; entries are frozen
    /// while a randomness request is outstanding
    #[account(
        mut,
        constraint = raffle.raffle_state == RaffleState::Open @ RaffleError::RaffleNotOpen,
    )]
    pub raffle: Account<'info, Raffle>,

    /// The player's entry-history record
    /// PDA with seeds ["player", raffle_key, signer_key]
    #[account(
        mut,
        seeds = [
            b"player",
            raffle.key().as_ref(),
            signer.key().as_ref(),
        ],
        bump = player_record.bump,
    )]
    pub player_record: Account<'info, PlayerRecord>,

    /// The player entering and paying the entrance fee
    #[account(mut)]
    pub signer: Signer<'info>,

    pub system_program: Program<'info, System>,

    /// Escrow vault receiving the entrance fee
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
}
