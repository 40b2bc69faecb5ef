/// Events emitted during a simulation step.
/// The presentation layer consumes these for sound and logging.

use crate::domain::entity::Paint;

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    Landed { y: i32 },
    ScrollStarted,
    PlatformSpawned { x: i32, y: i32, width: i32, paint: Paint },
    PlatformRemoved,
    ScoreChanged { score: u32 },
    FellOutOfBounds { score: u32 },
}
