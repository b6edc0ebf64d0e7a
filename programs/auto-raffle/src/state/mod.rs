pub use config::*;
pub use player_record::*;
pub use raffle::*;
pub use vault::*;

pub mod config;
pub mod player_record;
pub mod raffle;
pub mod vault;
