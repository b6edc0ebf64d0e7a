use anchor_lang::prelude::*;

// 8 discriminator + 32 owner + 8 last_round_played + 1 bump
pub const PLAYER_RECORD_ACCOUNT_SIZE: usize = 8 + 32 + 8 + 1;

/// Per-user, per-raffle entry history. `last_round_played` of 0 means the
/// user has never entered; the duplicate-entry check compares it against
/// the raffle's current round, so history never blocks future rounds.
#[account]
pub struct PlayerRecord {
    pub owner: Pubkey,
    pub last_round_played: u64,
    pub bump: u8,
}
