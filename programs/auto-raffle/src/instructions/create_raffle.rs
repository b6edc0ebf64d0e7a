use crate::{
    error::RaffleError,
    state::{
        raffle::{Raffle, RaffleState},
        Config, Vault, RAFFLE_ACCOUNT_SIZE, VAULT_ACCOUNT_SIZE,
    },
};
use anchor_lang::prelude::*;

/// Event emitted when a raffle is created
#[event]
pub struct RaffleCreated {
    /// The pubkey of the created raffle
    pub raffle: Pubkey,
    /// Entrance fee per entry in lamports
    pub entrance_fee: u64,
    /// Seconds between round start and draw eligibility
    pub interval: i64,
    /// The oracle authority allowed to deliver randomness
    pub oracle_authority: Pubkey,
    /// When the raffle was created
    pub creation_time: i64,
}

/// Instruction to create a new recurring raffle with fixed parameters
///
/// # Arguments
/// * `ctx` - The context object containing all required accounts
/// * `entrance_fee` - Fee per entry in lamports (must be > 0)
/// * `interval` - Seconds a round must run before the draw may trigger (> 0)
/// * `gas_lane` - Opaque oracle gas-lane identifier, forwarded on requests
/// * `subscription_id` - Oracle billing subscription, forwarded on requests
/// * `callback_gas_limit` - Delivery gas budget, forwarded on requests
///
/// All parameters are immutable after creation. The raffle starts in round 1,
/// Open, with an empty participant sequence and a zero pot. The oracle
/// authority account passed in the context is the only identity allowed to
/// deliver fulfillment for this raffle.
pub fn create_raffle(
    ctx: Context<CreateRaffle>,
    entrance_fee: u64,
    interval: i64,
    gas_lane: [u8; 32],
    subscription_id: u64,
    callback_gas_limit: u32,
) -> Result<()> {
    let current_time = Clock::get()?.unix_timestamp;

    require!(entrance_fee > 0, RaffleError::InvalidEntranceFee);
    require!(interval > 0, RaffleError::InvalidInterval);

    let raffle = &mut ctx.accounts.raffle;
    raffle.entrance_fee = entrance_fee;
    raffle.interval = interval;
    raffle.oracle_authority = ctx.accounts.oracle_authority.key();
    raffle.gas_lane = gas_lane;
    raffle.subscription_id = subscription_id;
    raffle.callback_gas_limit = callback_gas_limit;
    raffle.vault = ctx.accounts.vault.key();
    raffle.bump = ctx.bumps.raffle;

    // Round 1 opens immediately.
    raffle.current_round = 1;
    raffle.raffle_state = RaffleState::Open;
    raffle.participants = Vec::new();
    raffle.pot = 0;
    raffle.last_timestamp = current_time;
    raffle.recent_winner = None;
    raffle.pending_request = None;
    raffle.request_counter = 0;

    ctx.accounts.vault.raffle = ctx.accounts.raffle.key();
    ctx.accounts.vault.bump = ctx.bumps.vault;

    // Increment the raffle counter
    ctx.accounts.config.raffle_counter = ctx
        .accounts
        .config
        .raffle_counter
        .checked_add(1)
        .ok_or(RaffleError::Overflow)?;

    emit!(RaffleCreated {
        raffle: ctx.accounts.raffle.key(),
        entrance_fee,
        interval,
        oracle_authority: ctx.accounts.raffle.oracle_authority,
        creation_time: current_time,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct CreateRaffle<'info> {
    #[account(
        init,
        payer = creator,
        space = RAFFLE_ACCOUNT_SIZE,
        seeds = [
            b"raffle",
            config.raffle_counter.to_le_bytes().as_ref(),
        ],
        bump
    )]
    pub raffle: Account<'info, Raffle>,

    #[account(mut)]
    pub creator: Signer<'info>,

    /// The randomness oracle identity recorded into the raffle
    pub oracle_authority: SystemAccount<'info>,

    #[account(
        init,
        payer = creator,
        space = VAULT_ACCOUNT_SIZE,
        seeds = [
            b"vault",
            raffle.key().as_ref(),
        ],
        bump,
    )]
    pub vault: Account<'info, Vault>,

    /// The config account holding the raffle counter
    #[account(
        mut,
        seeds = [b"config"],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    pub system_program: Program<'info, System>,
}
