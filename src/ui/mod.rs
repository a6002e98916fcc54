pub mod assets;
pub mod components;
pub mod theme;
pub mod views;

pub use assets::{FileAssets, PieceAssets};
