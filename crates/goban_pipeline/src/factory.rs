//! # Entity Factory
//!
//! Builds the fixed demo entities the generator feeds into the store. Kind
//! selection is uniform over the four kinds; construction is fixed by
//! [`PipelineConfig`]:
//!
//! | kind   | construction                          |
//! |--------|---------------------------------------|
//! | Room   | `Room::new(room_code)`                 |
//! | Game   | `Game::new()` (default 19x19 board)    |
//! | Board  | `Board::new(board_size)`               |
//! | Player | `Player::new(player_name)`             |

use std::time::{SystemTime, UNIX_EPOCH};

use goban_model::{Board, Game, ModelResult, Player, Room};
use goban_store::{Entity, EntityKind};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::PipelineConfig;

/// Random source of new, unassigned entities.
#[derive(Debug)]
pub struct EntityFactory {
    rng: ChaCha8Rng,
    board_size: usize,
    room_code: String,
    player_name: String,
}

impl EntityFactory {
    /// Creates a factory from the construction fields of `config`.
    #[must_use]
    pub fn new(config: &PipelineConfig) -> Self {
        let seed = config.seed.unwrap_or_else(clock_seed);
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            board_size: config.board_size,
            room_code: config.room_code.clone(),
            player_name: config.player_name.clone(),
        }
    }

    /// Picks a kind uniformly at random.
    pub fn next_kind(&mut self) -> EntityKind {
        EntityKind::ALL[self.rng.gen_range(0..EntityKind::COUNT)]
    }

    /// Builds the fixed entity for `kind`.
    ///
    /// # Errors
    ///
    /// Returns a model error if the configured board size is invalid.
    pub fn build(&self, kind: EntityKind) -> ModelResult<Entity> {
        let entity: Entity = match kind {
            EntityKind::Room => Room::new(self.room_code.as_str()).into(),
            EntityKind::Game => Game::new().into(),
            EntityKind::Board => Board::new(self.board_size)?.into(),
            EntityKind::Player => Player::new(self.player_name.as_str()).into(),
        };
        Ok(entity)
    }

    /// Picks a kind and builds it.
    ///
    /// # Errors
    ///
    /// See [`Self::build`].
    pub fn next_entity(&mut self) -> ModelResult<Entity> {
        let kind = self.next_kind();
        self.build(kind)
    }
}

// Low 64 bits of the nanosecond clock carry all the entropy needed here.
#[allow(clippy::cast_possible_truncation)]
fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos() as u64)
}
