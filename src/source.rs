//! Piece providers: where new piece kinds come from.
use crate::error::EngineError;
use crate::grid::PieceKind;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Fewest kinds a board may play with.
pub const MIN_KINDS: usize = 3;
/// Most kinds a board may play with.
pub const MAX_KINDS: usize = PieceKind::ALL.len();

/// Supplies the kind of every piece the engine creates, both during board
/// generation and when refilling.
pub trait PieceSource {
    fn next_kind(&mut self) -> PieceKind;
}

/// Uniform random kinds drawn from the first `kinds` entries of [`PieceKind::ALL`].
#[derive(Clone, Debug)]
pub struct RandomPieces {
    rng: SmallRng,
    kinds: usize,
}

impl RandomPieces {
    /// Creates a reproducible source: the same seed always yields the same kinds.
    ///
    /// # Errors
    /// Returns [`EngineError::KindCount`] unless `MIN_KINDS <= kinds <= MAX_KINDS`.
    pub fn with_seed(kinds: usize, seed: u64) -> Result<Self, EngineError> {
        check_kind_count(kinds)?;
        Ok(RandomPieces {
            rng: SmallRng::seed_from_u64(seed),
            kinds,
        })
    }

    /// Creates a source seeded from operating system entropy.
    pub fn from_entropy(kinds: usize) -> Result<Self, EngineError> {
        check_kind_count(kinds)?;
        Ok(RandomPieces {
            rng: SmallRng::from_entropy(),
            kinds,
        })
    }

    pub fn kinds(&self) -> usize {
        self.kinds
    }
}

impl PieceSource for RandomPieces {
    fn next_kind(&mut self) -> PieceKind {
        PieceKind::ALL[self.rng.gen_range(0..self.kinds)]
    }
}

pub(crate) fn check_kind_count(kinds: usize) -> Result<(), EngineError> {
    if (MIN_KINDS..=MAX_KINDS).contains(&kinds) {
        Ok(())
    } else {
        Err(EngineError::KindCount {
            min: MIN_KINDS,
            max: MAX_KINDS,
            found: kinds,
        })
    }
}

/// A scripted source that replays a fixed list of kinds, cycling when exhausted.
#[derive(Clone, Debug)]
pub struct SequencePieces {
    kinds: Vec<PieceKind>,
    cursor: usize,
}

impl SequencePieces {
    /// # Panics
    /// Panics if `kinds` is empty.
    pub fn new(kinds: Vec<PieceKind>) -> Self {
        assert!(!kinds.is_empty(), "a piece sequence needs at least one kind");
        SequencePieces { kinds, cursor: 0 }
    }

    /// Parses a sequence from kind letters, e.g. `"RGBY"`.
    pub fn parse(letters: &str) -> Result<Self, EngineError> {
        let kinds = letters
            .chars()
            .enumerate()
            .map(|(x, ch)| {
                PieceKind::from_char(ch).ok_or(EngineError::UnknownCharacter { ch, x, y: 0 })
            })
            .collect::<Result<Vec<_>, _>>()?;
        if kinds.is_empty() {
            return Err(EngineError::EmptyBoard);
        }
        Ok(SequencePieces::new(kinds))
    }
}

impl PieceSource for SequencePieces {
    fn next_kind(&mut self) -> PieceKind {
        let kind = self.kinds[self.cursor];
        self.cursor = (self.cursor + 1) % self.kinds.len();
        kind
    }
}
