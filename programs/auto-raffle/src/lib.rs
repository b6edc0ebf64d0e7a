#![allow(unexpected_cfgs)]

use anchor_lang::prelude::*;
use instructions::*;

pub mod error;
pub mod instructions;
pub mod oracle;
pub mod state;

declare_id!("Fg6PaFpoGXkYsidMpWTK6W2BeZ7FEfcYkg476zPFsLnS");

#[program]
pub mod auto_raffle {
    use super::*;

    pub fn init_config(ctx: Context<InitConfig>) -> Result<()> {
        instructions::init_config::init_config(ctx)
    }

    pub fn create_raffle(
        ctx: Context<CreateRaffle>,
        entrance_fee: u64,
        interval: i64,
        gas_lane: [u8; 32],
        subscription_id: u64,
        callback_gas_limit: u32,
    ) -> Result<()> {
        instructions::create_raffle::create_raffle(
            ctx,
            entrance_fee,
            interval,
            gas_lane,
            subscription_id,
            callback_gas_limit,
        )
    }

    pub fn init_player_record(ctx: Context<InitPlayerRecord>) -> Result<()> {
        instructions::init_player_record::init_player_record(ctx)
    }

    pub fn enter_raffle(ctx: Context<EnterRaffle>, amount: u64) -> Result<()> {
        instructions::enter_raffle::enter_raffle(ctx, amount)
    }

    pub fn check_upkeep(ctx: Context<CheckUpkeep>, check_data: Vec<u8>) -> Result<bool> {
        instructions::check_upkeep::check_upkeep(ctx, check_data)
    }

    pub fn perform_upkeep(ctx: Context<PerformUpkeep>, perform_data: Vec<u8>) -> Result<()> {
        instructions::perform_upkeep::perform_upkeep(ctx, perform_data)
    }

    pub fn fulfill_randomness(
        ctx: Context<FulfillRandomness>,
        request_id: u64,
        randomness: [u8; 32],
    ) -> Result<()> {
        instructions::fulfill_randomness::fulfill_randomness(ctx, request_id, randomness)
    }
}
