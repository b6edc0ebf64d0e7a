use anchor_lang::prelude::*;

use crate::error::RaffleError;

/// Hard cap on entries per round. The participant sequence lives inside the
/// raffle account, and Solana accounts are fixed-size, so the sequence must
/// be bounded up front.
pub const MAX_PARTICIPANTS: usize = 100;

// Space calculation:
// 8 (discriminator) +
// 8 (entrance_fee) +
// 8 (interval) +
// 32 (oracle_authority) +
// 32 (gas_lane) +
// 8 (subscription_id) +
// 4 (callback_gas_limit) +
// 32 (vault) +
// 8 (current_round) +
// 1 (raffle_state) +
// 4 + 32 * 100 (participants: Vec<Pubkey>) +
// 8 (pot) +
// 8 (last_timestamp) +
// 33 (recent_winner: Option<Pubkey>) +
// 9 (pending_request: Option<u64>) +
// 8 (request_counter) +
// 1 (bump) =
// 3412 total bytes
pub const RAFFLE_ACCOUNT_SIZE: usize =
    8 + 8 + 8 + 32 + 32 + 8 + 4 + 32 + 8 + 1 + (4 + 32 * MAX_PARTICIPANTS) + 8 + 8 + 33 + 9 + 8 + 1;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq)]
pub enum RaffleState {
    /// Entries accepted; upkeep may fire once the predicate holds.
    Open = 0,
    /// A randomness request is outstanding; entries rejected. Leaves this
    /// state only through fulfillment delivery.
    Calculating = 1,
}

#[account]
pub struct Raffle {
    /// Fixed fee per entry in lamports. Immutable after creation.
    pub entrance_fee: u64,
    /// Minimum seconds between round start and the draw trigger.
    pub interval: i64,
    /// The randomness oracle identity; only this signer may deliver
    /// fulfillment.
    pub oracle_authority: Pubkey,
    /// Opaque oracle request parameters, forwarded on every request.
    pub gas_lane: [u8; 32],
    pub subscription_id: u64,
    pub callback_gas_limit: u32,
    /// Escrow PDA holding the pot lamports.
    pub vault: Pubkey,
    /// Monotonic round counter, starts at 1, +1 per finalized round.
    pub current_round: u64,
    pub raffle_state: RaffleState,
    /// Current-round entries in insertion order. Cleared en masse when the
    /// round finalizes. Winner selection indexes into this sequence.
    pub participants: Vec<Pubkey>,
    /// Sum of fees paid this round; zeroed on payout.
    pub pot: u64,
    /// Start of the current round.
    pub last_timestamp: i64,
    pub recent_winner: Option<Pubkey>,
    /// The single outstanding randomness request, if any. Set exactly while
    /// `raffle_state` is Calculating.
    pub pending_request: Option<u64>,
    /// Source of request ids, never reused.
    pub request_counter: u64,
    pub bump: u8,
}

impl Raffle {
    pub fn participant_count(&self) -> u64 {
        self.participants.len() as u64
    }

    pub fn participant_at(&self, index: u64) -> Result<Pubkey> {
        self.participants
            .get(index as usize)
            .copied()
            .ok_or_else(|| error!(RaffleError::ParticipantIndexOutOfRange))
    }

    /// Admits one entry into the current round. `last_round_played` is the
    /// player's record value; a match against the current round means the
    /// player already holds an entry this round.
    pub fn record_entry(
        &mut self,
        player: Pubkey,
        amount: u64,
        last_round_played: u64,
    ) -> Result<()> {
        require!(
            self.raffle_state == RaffleState::Open,
            RaffleError::RaffleNotOpen
        );
        require!(
            amount >= self.entrance_fee,
            RaffleError::InsufficientEntranceFee
        );
        require!(
            last_round_played != self.current_round,
            RaffleError::AlreadyEntered
        );
        require!(
            self.participants.len() < MAX_PARTICIPANTS,
            RaffleError::RaffleFull
        );

        self.participants.push(player);
        // Overpayment is accepted and escrowed in full.
        self.pot = self.pot.checked_add(amount).ok_or(RaffleError::Overflow)?;

        Ok(())
    }

    /// The upkeep predicate. All four conditions are necessary. Pure: safe
    /// to evaluate at any time, never mutates.
    pub fn is_upkeep_needed(&self, now: i64) -> bool {
        let is_open = self.raffle_state == RaffleState::Open;
        let interval_passed = now.saturating_sub(self.last_timestamp) >= self.interval;
        let has_participants = !self.participants.is_empty();
        let has_pot = self.pot > 0;

        is_open && interval_passed && has_participants && has_pot
    }

    /// Transitions Open -> Calculating. Re-validates the predicate itself:
    /// callers may invoke the trigger directly without a prior check.
    pub fn begin_calculating(&mut self, now: i64) -> Result<()> {
        require!(self.is_upkeep_needed(now), RaffleError::UpkeepNotNeeded);
        require!(self.pending_request.is_none(), RaffleError::UpkeepNotNeeded);

        self.raffle_state = RaffleState::Calculating;

        Ok(())
    }

    /// Resolves the winning index and address for a delivered random word.
    /// Read-only: payout must succeed before any bookkeeping is touched.
    pub fn select_winner(&self, random_word: u64) -> Result<(u64, Pubkey)> {
        let count = self.participant_count();
        // Unreachable by construction: upkeep requires participants and no
        // entries are accepted while Calculating.
        require!(count > 0, RaffleError::NoParticipants);

        let winner_index = random_word % count;
        let winner = self.participant_at(winner_index)?;

        Ok((winner_index, winner))
    }

    /// Finalizes the round after a successful payout and reopens for the
    /// next one.
    pub fn roll_over(&mut self, winner: Pubkey, now: i64) -> Result<()> {
        self.recent_winner = Some(winner);
        self.pot = 0;
        self.participants.clear();
        self.current_round = self
            .current_round
            .checked_add(1)
            .ok_or(RaffleError::Overflow)?;
        self.last_timestamp = now;
        self.pending_request = None;
        self.raffle_state = RaffleState::Open;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEE: u64 = 1_000_000_000; // 1 SOL
    const INTERVAL: i64 = 60;

    fn open_raffle() -> Raffle {
        Raffle {
            entrance_fee: FEE,
            interval: INTERVAL,
            oracle_authority: Pubkey::new_unique(),
            gas_lane: [7u8; 32],
            subscription_id: 4557,
            callback_gas_limit: 2_500_000,
            vault: Pubkey::new_unique(),
            current_round: 1,
            raffle_state: RaffleState::Open,
            participants: Vec::new(),
            pot: 0,
            last_timestamp: 1_000,
            recent_winner: None,
            pending_request: None,
            request_counter: 0,
            bump: 255,
        }
    }

    #[test]
    fn entry_grows_pot_and_participants() {
        let mut raffle = open_raffle();
        let player = Pubkey::new_unique();

        raffle.record_entry(player, FEE, 0).unwrap();

        assert_eq!(raffle.pot, FEE);
        assert_eq!(raffle.participant_count(), 1);
        assert_eq!(raffle.participant_at(0).unwrap(), player);
    }

    #[test]
    fn entry_below_fee_is_rejected() {
        let mut raffle = open_raffle();

        let res = raffle.record_entry(Pubkey::new_unique(), FEE / 2, 0);

        assert_eq!(res, Err(RaffleError::InsufficientEntranceFee.into()));
        assert_eq!(raffle.pot, 0);
        assert_eq!(raffle.participant_count(), 0);
    }

    #[test]
    fn overpayment_is_escrowed_in_full() {
        let mut raffle = open_raffle();

        raffle
            .record_entry(Pubkey::new_unique(), FEE * 3, 0)
            .unwrap();

        assert_eq!(raffle.pot, FEE * 3);
    }

    #[test]
    fn duplicate_entry_in_same_round_is_rejected() {
        let mut raffle = open_raffle();
        let player = Pubkey::new_unique();

        raffle.record_entry(player, FEE, 0).unwrap();
        // The player's record now carries the current round.
        let res = raffle.record_entry(player, FEE, raffle.current_round);

        assert_eq!(res, Err(RaffleError::AlreadyEntered.into()));
        assert_eq!(raffle.participant_count(), 1);
    }

    #[test]
    fn entry_allowed_again_in_a_later_round() {
        let mut raffle = open_raffle();
        let player = Pubkey::new_unique();

        raffle.record_entry(player, FEE, 0).unwrap();
        raffle.roll_over(player, 2_000).unwrap();

        // last_round_played is still 1, current round is now 2.
        raffle.record_entry(player, FEE, 1).unwrap();
        assert_eq!(raffle.participant_count(), 1);
    }

    #[test]
    fn entry_rejected_while_calculating() {
        let mut raffle = open_raffle();
        raffle.raffle_state = RaffleState::Calculating;

        let res = raffle.record_entry(Pubkey::new_unique(), FEE, 0);

        assert_eq!(res, Err(RaffleError::RaffleNotOpen.into()));
    }

    #[test]
    fn entry_rejected_at_capacity() {
        let mut raffle = open_raffle();
        for _ in 0..MAX_PARTICIPANTS {
            raffle.record_entry(Pubkey::new_unique(), FEE, 0).unwrap();
        }

        let res = raffle.record_entry(Pubkey::new_unique(), FEE, 0);

        assert_eq!(res, Err(RaffleError::RaffleFull.into()));
    }

    #[test]
    fn upkeep_requires_all_four_conditions() {
        // Each condition gates the predicate independently.
        for mask in 0u8..16 {
            let is_open = mask & 1 != 0;
            let interval_passed = mask & 2 != 0;
            let has_participants = mask & 4 != 0;
            let has_pot = mask & 8 != 0;

            let mut raffle = open_raffle();
            if !is_open {
                raffle.raffle_state = RaffleState::Calculating;
            }
            if has_participants {
                raffle.participants.push(Pubkey::new_unique());
            }
            if has_pot {
                raffle.pot = FEE;
            }
            let now = if interval_passed {
                raffle.last_timestamp + INTERVAL
            } else {
                raffle.last_timestamp + INTERVAL - 1
            };

            assert_eq!(
                raffle.is_upkeep_needed(now),
                is_open && interval_passed && has_participants && has_pot,
                "mask {mask:#06b}"
            );
        }
    }

    #[test]
    fn upkeep_false_without_participants_even_after_interval() {
        let raffle = open_raffle();

        assert!(!raffle.is_upkeep_needed(raffle.last_timestamp + INTERVAL));
    }

    #[test]
    fn begin_calculating_rejected_without_participants() {
        let mut raffle = open_raffle();

        let res = raffle.begin_calculating(raffle.last_timestamp + INTERVAL);

        assert_eq!(res, Err(RaffleError::UpkeepNotNeeded.into()));
        assert_eq!(raffle.raffle_state, RaffleState::Open);
    }

    #[test]
    fn begin_calculating_flips_state() {
        let mut raffle = open_raffle();
        raffle.record_entry(Pubkey::new_unique(), FEE, 0).unwrap();

        raffle
            .begin_calculating(raffle.last_timestamp + INTERVAL)
            .unwrap();

        assert_eq!(raffle.raffle_state, RaffleState::Calculating);
        // Entries are frozen until fulfillment arrives.
        assert!(!raffle.is_upkeep_needed(raffle.last_timestamp + INTERVAL));
    }

    #[test]
    fn winner_selection_is_word_mod_count() {
        let mut raffle = open_raffle();
        let players: Vec<Pubkey> = (0..10).map(|_| Pubkey::new_unique()).collect();
        for player in &players {
            raffle.record_entry(*player, FEE, 0).unwrap();
        }

        let (index, winner) = raffle.select_winner(23).unwrap();

        assert_eq!(index, 3);
        assert_eq!(winner, players[3]);
        assert_eq!(raffle.pot, FEE * 10);
    }

    #[test]
    fn winner_selection_with_no_participants_is_an_invariant_violation() {
        let raffle = open_raffle();

        assert_eq!(
            raffle.select_winner(23),
            Err(RaffleError::NoParticipants.into())
        );
    }

    #[test]
    fn roll_over_resets_the_round() {
        let mut raffle = open_raffle();
        let winner = Pubkey::new_unique();
        for _ in 0..3 {
            raffle.record_entry(Pubkey::new_unique(), FEE, 0).unwrap();
        }
        raffle
            .begin_calculating(raffle.last_timestamp + INTERVAL)
            .unwrap();
        raffle.pending_request = Some(1);

        raffle.roll_over(winner, 5_000).unwrap();

        assert_eq!(raffle.recent_winner, Some(winner));
        assert_eq!(raffle.pot, 0);
        assert_eq!(raffle.participant_count(), 0);
        assert_eq!(raffle.current_round, 2);
        assert_eq!(raffle.last_timestamp, 5_000);
        assert_eq!(raffle.pending_request, None);
        assert_eq!(raffle.raffle_state, RaffleState::Open);
    }

    #[test]
    fn round_increments_by_exactly_one_per_finalization() {
        let mut raffle = open_raffle();

        for expected in 2..=5u64 {
            raffle.record_entry(Pubkey::new_unique(), FEE, 0).unwrap();
            raffle
                .begin_calculating(raffle.last_timestamp + INTERVAL)
                .unwrap();
            raffle
                .roll_over(Pubkey::new_unique(), raffle.last_timestamp + INTERVAL)
                .unwrap();
            assert_eq!(raffle.current_round, expected);
        }
    }

    #[test]
    fn participant_index_out_of_range() {
        let mut raffle = open_raffle();
        raffle.record_entry(Pubkey::new_unique(), FEE, 0).unwrap();

        assert_eq!(
            raffle.participant_at(1),
            Err(RaffleError::ParticipantIndexOutOfRange.into())
        );
    }
}
