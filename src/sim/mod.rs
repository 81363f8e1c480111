//! Frame-synchronized simulation module
//!
//! All gameplay logic lives here:
//! - One update per frame, timers are frame deltas
//! - Audio and the score store are injected, never global
//! - Rendering only reads state (`draw.rs`)

pub mod avatar;
pub mod collision;
pub mod draw;
pub mod fruit;
pub mod lanes;
pub mod score;
pub mod state;
pub mod tick;

pub use avatar::{ArmState, Avatar, Direction, FallState, Posture, PostureQuery};
pub use fruit::{Fruit, FruitStage};
pub use lanes::{Cell, EnemyLanes, Lane, LaneKind};
pub use score::{Award, Score};
pub use state::{CounterDisplay, Game, GameMode, GameType, ScoreShown};
pub use tick::TickInput;
