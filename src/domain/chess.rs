//! Pure chess domain types and utilities.
//! No GPUI dependencies - this is the domain layer.

use serde::Deserialize;
use shakmaty::{Color as SColor, Rank, Role, Square};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PieceKind {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Rook,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Queen,
        PieceKind::King,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            PieceKind::Pawn => "pawn",
            PieceKind::Rook => "rook",
            PieceKind::Knight => "knight",
            PieceKind::Bishop => "bishop",
            PieceKind::Queen => "queen",
            PieceKind::King => "king",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PieceColor {
    White,
    Black,
}

impl PieceColor {
    pub const ALL: [PieceColor; 2] = [PieceColor::White, PieceColor::Black];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            PieceColor::White => "white",
            PieceColor::Black => "black",
        }
    }
}

impl From<SColor> for PieceColor {
    fn from(color: SColor) -> Self {
        match color {
            SColor::White => PieceColor::White,
            SColor::Black => PieceColor::Black,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: PieceColor,
}

/// Convert shakmaty piece to our domain Piece
pub fn shakmaty_to_piece(piece: shakmaty::Piece) -> Piece {
    let kind = match piece.role {
        Role::Pawn => PieceKind::Pawn,
        Role::Knight => PieceKind::Knight,
        Role::Bishop => PieceKind::Bishop,
        Role::Rook => PieceKind::Rook,
        Role::Queen => PieceKind::Queen,
        Role::King => PieceKind::King,
    };
    Piece {
        kind,
        color: piece.color.into(),
    }
}

/// Which side the human plays in engine mode.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerSide {
    #[default]
    White,
    Black,
    /// Resolved to a concrete colour at every reset.
    Random,
}

impl PlayerSide {
    pub fn resolve(self) -> SColor {
        match self {
            PlayerSide::White => SColor::White,
            PlayerSide::Black => SColor::Black,
            PlayerSide::Random => {
                if rand::random::<bool>() {
                    SColor::White
                } else {
                    SColor::Black
                }
            }
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameMode {
    /// Human against the UCI engine
    #[default]
    Engine,
    /// Both sides played at this board
    TwoPlayer,
}

impl GameMode {
    pub fn label(self) -> &'static str {
        match self {
            GameMode::Engine => "vs engine",
            GameMode::TwoPlayer => "two players",
        }
    }
}

pub fn color_name(color: SColor) -> &'static str {
    PieceColor::from(color).name()
}

/// Promotion pieces accepted from the user, case-insensitive.
pub fn parse_promotion(choice: &str) -> Option<Role> {
    match choice.trim().to_ascii_lowercase().as_str() {
        "q" | "queen" => Some(Role::Queen),
        "r" | "rook" => Some(Role::Rook),
        "b" | "bishop" => Some(Role::Bishop),
        "n" | "knight" => Some(Role::Knight),
        _ => None,
    }
}

/// A pawn landing here must promote.
pub fn is_last_rank(square: Square) -> bool {
    matches!(square.rank(), Rank::First | Rank::Eighth)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_promotion_is_case_insensitive() {
        assert_eq!(parse_promotion("q"), Some(Role::Queen));
        assert_eq!(parse_promotion("Q"), Some(Role::Queen));
        assert_eq!(parse_promotion("R"), Some(Role::Rook));
        assert_eq!(parse_promotion("b"), Some(Role::Bishop));
        assert_eq!(parse_promotion(" N "), Some(Role::Knight));
        assert_eq!(parse_promotion("Knight"), Some(Role::Knight));
    }

    #[test]
    fn test_parse_promotion_rejects_other_pieces() {
        assert_eq!(parse_promotion("k"), None);
        assert_eq!(parse_promotion("p"), None);
        assert_eq!(parse_promotion(""), None);
        assert_eq!(parse_promotion("qq"), None);
    }

    #[test]
    fn test_last_rank() {
        assert!(is_last_rank(Square::A8));
        assert!(is_last_rank(Square::H1));
        assert!(!is_last_rank(Square::E4));
        assert!(!is_last_rank(Square::G7));
    }

    #[test]
    fn test_player_side_resolve() {
        assert_eq!(PlayerSide::White.resolve(), SColor::White);
        assert_eq!(PlayerSide::Black.resolve(), SColor::Black);
        for _ in 0..16 {
            let color = PlayerSide::Random.resolve();
            assert!(color == SColor::White || color == SColor::Black);
        }
    }

    #[test]
    fn test_shakmaty_to_piece() {
        let piece = shakmaty_to_piece(shakmaty::Piece {
            color: SColor::Black,
            role: Role::Knight,
        });
        assert_eq!(
            piece,
            Piece {
                kind: PieceKind::Knight,
                color: PieceColor::Black
            }
        );
    }
}
