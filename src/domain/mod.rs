pub mod chess;
pub mod geometry;
pub mod record;
pub mod uci;
