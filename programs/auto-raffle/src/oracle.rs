use anchor_lang::prelude::*;
use arrayref::array_ref;

use crate::{error::RaffleError, state::Raffle};

/// Number of random words requested per draw. Winner selection only
/// consumes the first word.
pub const NUM_WORDS: u8 = 1;

/// Confirmations the oracle network waits for before delivering.
pub const REQUEST_CONFIRMATIONS: u8 = 3;

/// One randomness request as handed to the oracle network. The identifier
/// is returned synchronously; the random value arrives later through
/// `fulfill_randomness`, correlated only by this id.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RandomnessRequest {
    pub request_id: u64,
    pub gas_lane: [u8; 32],
    pub subscription_id: u64,
    pub confirmations: u8,
    pub callback_gas_limit: u32,
    pub num_words: u8,
}

/// Issues a new request against the raffle's configured oracle parameters
/// and records it as the single outstanding request. Request ids are drawn
/// from a monotonic counter and never reused.
pub fn issue_request(raffle: &mut Raffle) -> Result<RandomnessRequest> {
    let request_id = raffle
        .request_counter
        .checked_add(1)
        .ok_or(RaffleError::Overflow)?;
    raffle.request_counter = request_id;
    raffle.pending_request = Some(request_id);

    Ok(RandomnessRequest {
        request_id,
        gas_lane: raffle.gas_lane,
        subscription_id: raffle.subscription_id,
        confirmations: REQUEST_CONFIRMATIONS,
        callback_gas_limit: raffle.callback_gas_limit,
        num_words: NUM_WORDS,
    })
}

/// Rejects stray, stale, and duplicate deliveries: the given id must match
/// the outstanding request exactly.
pub fn match_pending(raffle: &Raffle, request_id: u64) -> Result<()> {
    require!(
        raffle.pending_request == Some(request_id),
        RaffleError::UnknownRequestId
    );
    Ok(())
}

/// Derives the requested random words from the oracle's 32-byte result
/// buffer, one little-endian u64 per word.
pub fn random_words(result: &[u8; 32]) -> [u64; NUM_WORDS as usize] {
    let mut words = [0u64; NUM_WORDS as usize];
    for (i, word) in words.iter_mut().enumerate() {
        *word = u64::from_le_bytes(*array_ref![result, i * 8, 8]);
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::RaffleState;

    fn raffle() -> Raffle {
        Raffle {
            entrance_fee: 1_000_000_000,
            interval: 60,
            oracle_authority: Pubkey::new_unique(),
            gas_lane: [7u8; 32],
            subscription_id: 4557,
            callback_gas_limit: 2_500_000,
            vault: Pubkey::new_unique(),
            current_round: 1,
            raffle_state: RaffleState::Open,
            participants: Vec::new(),
            pot: 0,
            last_timestamp: 0,
            recent_winner: None,
            pending_request: None,
            request_counter: 0,
            bump: 255,
        }
    }

    #[test]
    fn request_ids_are_monotonic_and_recorded() {
        let mut raffle = raffle();

        let first = issue_request(&mut raffle).unwrap();
        assert_eq!(first.request_id, 1);
        assert_eq!(raffle.pending_request, Some(1));

        raffle.pending_request = None;
        let second = issue_request(&mut raffle).unwrap();
        assert_eq!(second.request_id, 2);
    }

    #[test]
    fn request_carries_configured_parameters() {
        let mut raffle = raffle();

        let request = issue_request(&mut raffle).unwrap();

        assert_eq!(request.gas_lane, raffle.gas_lane);
        assert_eq!(request.subscription_id, 4557);
        assert_eq!(request.callback_gas_limit, 2_500_000);
        assert_eq!(request.confirmations, REQUEST_CONFIRMATIONS);
        assert_eq!(request.num_words, NUM_WORDS);
    }

    #[test]
    fn delivery_must_match_the_outstanding_request() {
        let mut raffle = raffle();
        issue_request(&mut raffle).unwrap();

        assert!(match_pending(&raffle, 1).is_ok());
        assert_eq!(
            match_pending(&raffle, 2),
            Err(RaffleError::UnknownRequestId.into())
        );
    }

    #[test]
    fn delivery_without_outstanding_request_is_rejected() {
        let raffle = raffle();

        assert_eq!(
            match_pending(&raffle, 1),
            Err(RaffleError::UnknownRequestId.into())
        );
    }

    #[test]
    fn second_delivery_for_same_request_is_rejected() {
        let mut raffle = raffle();
        issue_request(&mut raffle).unwrap();

        assert!(match_pending(&raffle, 1).is_ok());
        // Fulfillment clears the outstanding request.
        raffle.pending_request = None;
        assert_eq!(
            match_pending(&raffle, 1),
            Err(RaffleError::UnknownRequestId.into())
        );
    }

    #[test]
    fn words_are_little_endian_u64s() {
        let mut result = [0u8; 32];
        result[0] = 23;

        let words = random_words(&result);

        assert_eq!(words[0], 23);
    }
}
