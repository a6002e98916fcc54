mod piece;
mod square;

pub use piece::{render_floating_piece, render_piece};
pub use square::render_square;
