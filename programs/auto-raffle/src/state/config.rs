use anchor_lang::prelude::*;

// 8 discriminator + 1 bump + 8 raffle_counter
pub const CONFIG_ACCOUNT_SIZE: usize = 8 + 1 + 8;

#[account]
pub struct Config {
    pub bump: u8,
    /// Counter used to derive raffle PDAs; one slot per created raffle.
    pub raffle_counter: u64,
}
