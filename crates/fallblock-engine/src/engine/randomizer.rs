use std::{fmt, num::ParseIntError, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Serialize, Serializer};
use tracing::trace;

use crate::PieceKind;

/// A bag: one permutation of the seven piece kinds.
pub type Bag = [PieceKind; PieceKind::LEN];

/// Deals piece kinds using the 7-bag system.
///
/// # 7-Bag System
///
/// 1. A "bag" holds each of the 7 piece kinds exactly once, in a uniformly
///    random order
/// 2. Kinds are dealt from the bag in order
/// 3. As soon as the last kind of a bag is dealt, a freshly shuffled bag
///    replaces it
///
/// Every run of 7 consecutive deals aligned to a bag boundary contains every
/// kind exactly once, so no kind is ever missing for more than 12 deals.
///
/// # Example
///
/// ```
/// use fallblock_engine::Randomizer;
///
/// let mut randomizer = Randomizer::new();
///
/// let mut kinds: Vec<_> = (0..7).map(|_| randomizer.next_kind()).collect();
/// kinds.sort_by_key(|kind| kind.index());
/// kinds.dedup();
/// assert_eq!(kinds.len(), 7);
/// ```
#[derive(Debug, Clone)]
pub struct Randomizer {
    rng: Pcg32,
    bag: Bag,
    cursor: usize,
}

impl Default for Randomizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Randomizer {
    /// Creates a randomizer seeded from the thread-local RNG.
    ///
    /// For a reproducible sequence, use [`Self::with_seed`] instead.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but deterministic for a given seed.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        let mut rng = Pcg32::from_seed(seed.0);
        let bag = generate_bag(&mut rng);
        Self {
            rng,
            bag,
            cursor: 0,
        }
    }

    /// Deals the next kind.
    ///
    /// When this deals the last kind of the current bag, the next bag is
    /// shuffled before returning, so the cursor always points into a bag with
    /// at least one kind left.
    pub fn next_kind(&mut self) -> PieceKind {
        let kind = self.bag[self.cursor];
        self.cursor += 1;
        if self.cursor == PieceKind::LEN {
            self.bag = generate_bag(&mut self.rng);
            self.cursor = 0;
            trace!(bag = ?self.bag, "bag refilled");
        }
        kind
    }

    /// Returns the kind [`Self::next_kind`] would deal, without dealing it.
    #[must_use]
    pub fn peek(&self) -> PieceKind {
        self.bag[self.cursor]
    }

    /// Returns the kinds left in the current bag, in deal order.
    ///
    /// Never empty.
    pub fn upcoming(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.bag[self.cursor..].iter().copied()
    }
}

/// Shuffles a fresh bag with Fisher–Yates.
///
/// For each index `i` from the last down to 1, swaps element `i` with an
/// element drawn uniformly from `0..=i`. The bound is inclusive: excluding
/// `i` itself would skew the permutation distribution.
pub fn generate_bag<R: Rng + ?Sized>(rng: &mut R) -> Bag {
    let mut bag = PieceKind::ALL;
    for i in (1..bag.len()).rev() {
        let j = rng.random_range(0..=i);
        bag.swap(i, j);
    }
    bag
}

/// Seed for deterministic piece generation.
///
/// This is a 128-bit seed used to initialize the random number generator
/// behind the bag. Using the same seed will produce the same sequence of
/// pieces, enabling:
///
/// - Reproducible games for debugging
/// - Scripted replays from the command line
/// - Deterministic testing
///
/// The text form is 32 hexadecimal digits.
///
/// # Example
///
/// ```
/// use fallblock_engine::{GameSession, PieceSeed};
/// use rand::Rng as _;
///
/// let seed: PieceSeed = rand::rng().random();
///
/// let session1 = GameSession::with_seed(seed);
/// let session2 = GameSession::with_seed(seed);
/// assert_eq!(session1.active_piece(), session2.active_piece());
///
/// let parsed: PieceSeed = seed.to_string().parse().unwrap();
/// assert_eq!(parsed, seed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

impl PieceSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseSeedError {
    #[display("invalid seed: expected 32 hex characters, got {found}")]
    Length { found: usize },
    #[display("invalid seed: {found:?} at {index} is not a hex digit")]
    Digit { index: usize, found: char },
    #[display("invalid seed: {source}")]
    Digits { source: ParseIntError },
}

impl FromStr for PieceSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(ParseSeedError::Length { found: s.len() });
        }
        if let Some((index, found)) = s.char_indices().find(|(_, c)| !c.is_ascii_hexdigit()) {
            return Err(ParseSeedError::Digit { index, found });
        }
        let num =
            u128::from_str_radix(s, 16).map_err(|source| ParseSeedError::Digits { source })?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Allows generating random `PieceSeed` values with `rng.random()`.
impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: PieceSeed = PieceSeed([
        0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77,
        0x88,
    ]);

    fn sorted(mut kinds: Vec<PieceKind>) -> Vec<PieceKind> {
        kinds.sort_by_key(|kind| kind.index());
        kinds
    }

    #[test]
    fn test_every_bag_is_a_permutation() {
        let mut rng = Pcg32::from_seed(SEED.0);
        for _ in 0..1000 {
            let bag = generate_bag(&mut rng);
            assert_eq!(sorted(bag.to_vec()), PieceKind::ALL);
        }
    }

    #[test]
    fn test_deals_are_exhaustive_across_bag_boundaries() {
        let mut randomizer = Randomizer::with_seed(SEED);
        for _ in 0..50 {
            let bag: Vec<_> = (0..PieceKind::LEN)
                .map(|_| randomizer.next_kind())
                .collect();
            assert_eq!(sorted(bag), PieceKind::ALL);
        }
    }

    #[test]
    fn test_cursor_wraps_to_fresh_bag() {
        let mut randomizer = Randomizer::with_seed(SEED);
        assert_eq!(randomizer.upcoming().count(), 7);
        for dealt in 1..PieceKind::LEN {
            randomizer.next_kind();
            assert_eq!(randomizer.upcoming().count(), PieceKind::LEN - dealt);
        }
        let last = randomizer.peek();
        assert_eq!(randomizer.next_kind(), last);
        assert_eq!(randomizer.cursor, 0);
        assert_eq!(randomizer.upcoming().count(), 7);
    }

    #[test]
    fn test_peek_matches_next() {
        let mut randomizer = Randomizer::with_seed(SEED);
        for _ in 0..30 {
            let expected = randomizer.peek();
            assert_eq!(randomizer.upcoming().next(), Some(expected));
            assert_eq!(randomizer.next_kind(), expected);
        }
    }

    #[test]
    fn test_first_position_is_uniform() {
        const BAGS: usize = 10_000;
        let mut rng = Pcg32::from_seed(SEED.0);
        let mut first = [0usize; PieceKind::LEN];
        for _ in 0..BAGS {
            first[generate_bag(&mut rng)[0].index()] += 1;
        }
        // Expected ~1428.6 per kind with standard deviation ~35; allow ~5 sigma.
        for (kind, count) in PieceKind::ALL.iter().zip(first) {
            assert!(
                (1250..=1610).contains(&count),
                "{kind:?} led {count} of {BAGS} bags"
            );
        }
    }

    #[test]
    fn test_deterministic_piece_generation() {
        let mut randomizer1 = Randomizer::with_seed(SEED);
        let mut randomizer2 = Randomizer::with_seed(SEED);
        for _ in 0..20 {
            assert_eq!(randomizer1.next_kind(), randomizer2.next_kind());
        }
    }

    mod piece_seed {
        use super::*;

        #[test]
        fn test_known_value_sequential_bytes() {
            let seed = PieceSeed([
                0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0xFE, 0xDC, 0xBA, 0x98, 0x76, 0x54,
                0x32, 0x10,
            ]);
            assert_eq!(seed.to_string(), "0123456789abcdeffedcba9876543210");
            assert_eq!(
                serde_json::to_string(&seed).unwrap(),
                "\"0123456789abcdeffedcba9876543210\""
            );
        }

        #[test]
        fn test_parse_accepts_uppercase() {
            let seed: PieceSeed = "0123456789ABCDEFFEDCBA9876543210".parse().unwrap();
            assert_eq!(seed.0[0], 0x01);
            assert_eq!(seed.0[15], 0x10);
        }

        #[test]
        fn test_parse_errors() {
            assert_eq!(
                "0123".parse::<PieceSeed>(),
                Err(ParseSeedError::Length { found: 4 })
            );
            let err = "ghijklmnopqrstuvwxyzghijklmnopqr"
                .parse::<PieceSeed>()
                .unwrap_err();
            assert_eq!(
                err,
                ParseSeedError::Digit {
                    index: 0,
                    found: 'g'
                }
            );
            assert!(err.to_string().starts_with("invalid seed"));
        }

        #[test]
        fn test_parse_rejects_sign_prefix() {
            assert_eq!(
                "+0123456789abcdef0123456789abcde".parse::<PieceSeed>(),
                Err(ParseSeedError::Digit {
                    index: 0,
                    found: '+'
                })
            );
        }

        #[test]
        fn test_random_seed_roundtrip() {
            let seed: PieceSeed = rand::rng().random();
            assert_eq!(seed.to_string().parse::<PieceSeed>(), Ok(seed));
        }
    }
}
