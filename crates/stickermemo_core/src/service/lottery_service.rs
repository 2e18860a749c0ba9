//! Lottery use-case service.
//!
//! # Responsibility
//! - Generate weighted lucky-number sets.
//! - Keep generated and hand-picked tickets with favorite/purchase
//!   bookkeeping.
//!
//! # Invariants
//! - Generated and recorded sets always satisfy
//!   `lottery_repo::validate_numbers` (six ascending values in `1..=45`).
//! - Generation is pure over the injected RNG; a seeded RNG reproduces
//!   the same draw.

use std::error::Error;
use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use rand::Rng;
use uuid::Uuid;

use crate::repo::lottery_repo::{
    GenerationMethod, LotteryRepository, LotteryStatistics, LotteryTicket, TicketId,
    NUMBER_MAX, NUMBER_MIN, TICKET_NUMBERS,
};
use crate::repo::{RepoError, RepoResult};

/// Numbers that come up often in historical draws get 1.5x weight; the
/// pool holds `WEIGHT_BASE` copies of a normal number and
/// `WEIGHT_FREQUENT` copies of a frequent one.
const FREQUENT_NUMBERS: [u8; 10] = [1, 2, 3, 7, 17, 21, 27, 31, 34, 40];
const WEIGHT_BASE: usize = 10;
const WEIGHT_FREQUENT: usize = 15;

/// Chance that one whole generation avoids consecutive pairs.
const AVOID_CONSECUTIVE_P: f64 = 0.7;
/// Chance that an adjacent candidate is skipped while avoiding.
const SKIP_ADJACENT_P: f64 = 0.8;

/// Service error for lottery use-cases.
#[derive(Debug)]
pub enum LotteryServiceError {
    /// Target ticket does not exist.
    TicketNotFound(TicketId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for LotteryServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TicketNotFound(id) => write!(f, "lottery ticket not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => {
                write!(f, "inconsistent ticket state: {details}")
            }
        }
    }
}

impl Error for LotteryServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for LotteryServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound {
                entity: "lottery ticket",
                id,
            } => match Uuid::parse_str(&id) {
                Ok(ticket_id) => Self::TicketNotFound(ticket_id),
                Err(_) => Self::Repo(RepoError::InvalidData(format!(
                    "unparseable ticket id `{id}` in not-found error"
                ))),
            },
            other => Self::Repo(other),
        }
    }
}

/// Draws six weighted lucky numbers, ascending.
///
/// Frequent numbers are half again as likely as the rest. Seventy percent
/// of generations avoid consecutive values by re-rolling an adjacent
/// candidate with eighty percent probability, so runs like 7-8 stay
/// possible but rare.
pub fn generate_numbers(rng: &mut impl Rng) -> Vec<u8> {
    let avoid_consecutive = rng.gen_bool(AVOID_CONSECUTIVE_P);
    let mut numbers: Vec<u8> = Vec::with_capacity(TICKET_NUMBERS);

    while numbers.len() < TICKET_NUMBERS {
        let pool = build_weighted_pool(&numbers);
        let candidate = pool[rng.gen_range(0..pool.len())];

        if avoid_consecutive
            && numbers
                .iter()
                .any(|&picked| picked.abs_diff(candidate) == 1)
            && rng.gen_bool(SKIP_ADJACENT_P)
        {
            continue;
        }

        numbers.push(candidate);
    }

    numbers.sort_unstable();
    numbers
}

fn build_weighted_pool(already_picked: &[u8]) -> Vec<u8> {
    let mut pool = Vec::with_capacity((NUMBER_MAX as usize) * WEIGHT_FREQUENT);
    for number in NUMBER_MIN..=NUMBER_MAX {
        if already_picked.contains(&number) {
            continue;
        }
        let copies = if FREQUENT_NUMBERS.contains(&number) {
            WEIGHT_FREQUENT
        } else {
            WEIGHT_BASE
        };
        for _ in 0..copies {
            pool.push(number);
        }
    }
    pool
}

/// Lottery service facade over repository implementations.
pub struct LotteryService<R: LotteryRepository> {
    repo: R,
}

impl<R: LotteryRepository> LotteryService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Generates one weighted draw and stores it as an AI ticket.
    pub fn generate_and_save(
        &self,
        user_id: &str,
        rng: &mut impl Rng,
    ) -> Result<LotteryTicket, LotteryServiceError> {
        let ticket = LotteryTicket {
            id: Uuid::new_v4(),
            user_id: user_id.to_owned(),
            numbers: generate_numbers(rng),
            bonus_number: None,
            method: GenerationMethod::Ai,
            is_favorite: false,
            purchased_at: None,
            notes: None,
            created_at: Utc::now(),
        };

        let id = self.repo.create_ticket(&ticket)?;
        self.read_back(id, "created ticket not found in read-back")
    }

    /// Stores a hand-picked number set.
    ///
    /// Input order does not matter; numbers are normalized ascending
    /// before validation.
    pub fn record_manual(
        &self,
        user_id: &str,
        mut numbers: Vec<u8>,
        bonus_number: Option<u8>,
    ) -> Result<LotteryTicket, LotteryServiceError> {
        numbers.sort_unstable();
        let ticket = LotteryTicket {
            id: Uuid::new_v4(),
            user_id: user_id.to_owned(),
            numbers,
            bonus_number,
            method: GenerationMethod::Manual,
            is_favorite: false,
            purchased_at: None,
            notes: None,
            created_at: Utc::now(),
        };

        let id = self.repo.create_ticket(&ticket)?;
        self.read_back(id, "recorded ticket not found in read-back")
    }

    /// Lists tickets newest first; `limit` defaults and caps per the
    /// repository contract.
    pub fn list_tickets(
        &self,
        user_id: &str,
        limit: Option<u32>,
        offset: u32,
    ) -> RepoResult<Vec<LotteryTicket>> {
        self.repo.list_tickets(user_id, limit, offset)
    }

    /// Lists favorite tickets newest first.
    pub fn favorites(&self, user_id: &str) -> RepoResult<Vec<LotteryTicket>> {
        self.repo.list_favorites(user_id)
    }

    /// Marks or unmarks one ticket as favorite.
    pub fn toggle_favorite(
        &self,
        id: TicketId,
        is_favorite: bool,
    ) -> Result<LotteryTicket, LotteryServiceError> {
        self.repo.set_favorite(id, is_favorite)?;
        self.read_back(id, "favorite ticket not found in read-back")
    }

    /// Records whether (and when) one ticket was bought.
    pub fn mark_purchased(
        &self,
        id: TicketId,
        purchased_at: Option<DateTime<Utc>>,
    ) -> Result<LotteryTicket, LotteryServiceError> {
        self.repo.set_purchased(id, purchased_at)?;
        self.read_back(id, "purchased ticket not found in read-back")
    }

    /// Replaces the free-text note of one ticket.
    pub fn update_notes(
        &self,
        id: TicketId,
        notes: &str,
    ) -> Result<LotteryTicket, LotteryServiceError> {
        self.repo.update_notes(id, notes)?;
        self.read_back(id, "noted ticket not found in read-back")
    }

    /// Deletes one ticket permanently.
    pub fn delete_ticket(&self, id: TicketId) -> Result<(), LotteryServiceError> {
        self.repo.delete_ticket(id)?;
        Ok(())
    }

    /// Per-account ticket counters.
    pub fn statistics(&self, user_id: &str) -> RepoResult<LotteryStatistics> {
        self.repo.statistics(user_id)
    }

    fn read_back(
        &self,
        id: TicketId,
        details: &'static str,
    ) -> Result<LotteryTicket, LotteryServiceError> {
        self.repo
            .get_ticket(id)?
            .ok_or(LotteryServiceError::InconsistentState(details))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::lottery_repo::validate_numbers;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn generated_sets_are_always_valid() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let numbers = generate_numbers(&mut rng);
            validate_numbers(&numbers).unwrap();
        }
    }

    #[test]
    fn generation_is_reproducible_for_a_seed() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        assert_eq!(generate_numbers(&mut a), generate_numbers(&mut b));
    }

    #[test]
    fn frequent_numbers_dominate_over_many_draws() {
        let mut rng = StdRng::seed_from_u64(1234);
        let mut frequent_hits = 0usize;
        let mut other_hits = 0usize;
        for _ in 0..500 {
            for number in generate_numbers(&mut rng) {
                if FREQUENT_NUMBERS.contains(&number) {
                    frequent_hits += 1;
                } else {
                    other_hits += 1;
                }
            }
        }
        // 10 frequent numbers at weight 15 vs 35 others at weight 10: the
        // per-number hit rate of the frequent set must come out ahead.
        let frequent_rate = frequent_hits as f64 / FREQUENT_NUMBERS.len() as f64;
        let other_rate = other_hits as f64 / 35.0;
        assert!(
            frequent_rate > other_rate,
            "frequent {frequent_rate:.2} vs other {other_rate:.2}"
        );
    }

    #[test]
    fn weighted_pool_excludes_picked_numbers() {
        let pool = build_weighted_pool(&[1, 45]);
        assert!(!pool.contains(&1));
        assert!(!pool.contains(&45));
        assert_eq!(
            pool.iter().filter(|&&n| n == 2).count(),
            WEIGHT_FREQUENT
        );
        assert_eq!(pool.iter().filter(|&&n| n == 4).count(), WEIGHT_BASE);
    }
}
