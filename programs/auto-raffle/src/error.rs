use anchor_lang::error_code;

#[error_code]
pub enum RaffleError {
    Overflow,
    InvalidEntranceFee,
    InvalidInterval,
    RaffleNotOpen,
    #[msg("Amount sent is below the entrance fee")]
    InsufficientEntranceFee,
    #[msg("Address has already entered this round")]
    AlreadyEntered,
    #[msg("Participant limit reached for this round")]
    RaffleFull,
    #[msg("Upkeep conditions are not met")]
    UpkeepNotNeeded,
    #[msg("Request id does not match the outstanding randomness request")]
    UnknownRequestId,
    #[msg("Only the configured oracle authority may deliver randomness")]
    NotOracleAuthority,
    #[msg("Winner account does not match the selected participant")]
    WinnerAccountMismatch,
    #[msg("No participants recorded for this round")]
    NoParticipants,
    #[msg("Vault payout transfer failed")]
    TransferFailed,
    #[msg("Participant index is out of range")]
    ParticipantIndexOutOfRange,
    #[msg("Vault account does not match the one stored in the raffle")]
    InvalidVault,
}
