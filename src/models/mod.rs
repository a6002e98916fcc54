mod game;

pub use game::{GameEvent, GameModel};
