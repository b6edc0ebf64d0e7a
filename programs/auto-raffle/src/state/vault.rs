use anchor_lang::prelude::*;

// 8 discriminator, 32 pubkey, 1 bump
pub const VAULT_ACCOUNT_SIZE: usize = 8 + 32 + 1;

/// Program-owned escrow holding the pot lamports for one raffle. Only the
/// fulfillment payout moves funds out.
#[account]
pub struct Vault {
    pub raffle: Pubkey,
    pub bump: u8,
}
