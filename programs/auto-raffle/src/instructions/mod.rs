pub use check_upkeep::*;
pub use create_raffle::*;
pub use enter_raffle::*;
pub use fulfill_randomness::*;
pub use init_config::*;
pub use init_player_record::*;
pub use perform_upkeep::*;

pub mod check_upkeep;
pub mod create_raffle;
pub mod enter_raffle;
pub mod fulfill_randomness;
pub mod init_config;
pub mod init_player_record;
pub mod perform_upkeep;
