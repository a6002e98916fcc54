//! Filesystem-based asset source and the piece image table.

use gpui::{AssetSource, SharedString};
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::chess::{Piece, PieceColor, PieceKind};
use crate::error::AssetError;

/// Filesystem-based asset source that looks for assets in multiple locations
pub struct FileAssets {
    base_path: PathBuf,
}

impl FileAssets {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// First existing location of `path`: next to the executable, as given,
    /// then under the working directory
    pub fn resolve(&self, path: &str) -> Option<PathBuf> {
        let mut paths_to_try = vec![self.base_path.join(path), PathBuf::from(path)];
        if let Ok(cwd) = std::env::current_dir() {
            paths_to_try.push(cwd.join(path));
        }
        paths_to_try.into_iter().find(|p| p.is_file())
    }
}

impl AssetSource for FileAssets {
    fn load(&self, path: &str) -> gpui::Result<Option<Cow<'static, [u8]>>> {
        let Some(found) = self.resolve(path) else {
            return Ok(None);
        };
        Ok(Some(Cow::Owned(fs::read(found)?)))
    }

    fn list(&self, path: &str) -> gpui::Result<Vec<SharedString>> {
        let dir_path = self.base_path.join(path);
        let mut results = Vec::new();

        if let Ok(entries) = fs::read_dir(&dir_path) {
            for entry in entries.flatten() {
                if let Some(name) = entry.file_name().to_str() {
                    results.push(SharedString::from(name.to_string()));
                }
            }
        }
        Ok(results)
    }
}

/// One image per (colour, piece kind), checked to exist when loaded
#[derive(Clone, Debug)]
pub struct PieceAssets {
    paths: [[SharedString; 6]; 2],
}

impl PieceAssets {
    pub fn load(assets: &FileAssets, dir: &Path) -> Result<Self, AssetError> {
        let mut missing = None;
        let paths: [[SharedString; 6]; 2] = std::array::from_fn(|c| {
            std::array::from_fn(|k| {
                let color = PieceColor::ALL[c];
                let kind = PieceKind::ALL[k];
                let path = dir.join(format!("{}-{}.svg", kind.name(), color.name()));
                let path = path.to_string_lossy().into_owned();
                if missing.is_none() && assets.resolve(&path).is_none() {
                    missing = Some(PathBuf::from(&path));
                }
                SharedString::from(path)
            })
        });

        match missing {
            Some(path) => Err(AssetError::Missing(path)),
            None => Ok(Self { paths }),
        }
    }

    pub fn path(&self, piece: Piece) -> SharedString {
        self.paths[piece.color.index()][piece.kind.index()].clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_all(dir: &Path) {
        for color in PieceColor::ALL {
            for kind in PieceKind::ALL {
                let file = dir.join(format!("{}-{}.svg", kind.name(), color.name()));
                fs::write(file, "<svg xmlns=\"http://www.w3.org/2000/svg\"/>").unwrap();
            }
        }
    }

    #[test]
    fn test_loads_complete_set() {
        let base = tempfile::tempdir().unwrap();
        fs::create_dir_all(base.path().join("test-pieces")).unwrap();
        write_all(&base.path().join("test-pieces"));

        let assets = FileAssets::new(base.path().to_path_buf());
        let pieces = PieceAssets::load(&assets, Path::new("test-pieces")).unwrap();
        let path = pieces.path(Piece {
            kind: PieceKind::Knight,
            color: PieceColor::Black,
        });
        assert!(path.ends_with("knight-black.svg"));
        assert!(assets.resolve(&path).is_some());
    }

    #[test]
    fn test_missing_image_is_reported() {
        let base = tempfile::tempdir().unwrap();
        let dir = base.path().join("test-pieces");
        fs::create_dir_all(&dir).unwrap();
        write_all(&dir);
        fs::remove_file(dir.join("queen-white.svg")).unwrap();

        let assets = FileAssets::new(base.path().to_path_buf());
        let err = PieceAssets::load(&assets, Path::new("test-pieces")).unwrap_err();
        let AssetError::Missing(path) = err;
        assert!(path.ends_with("queen-white.svg"));
    }

    #[test]
    fn test_asset_source_loads_bytes() {
        let base = tempfile::tempdir().unwrap();
        fs::write(base.path().join("board.svg"), "<svg/>").unwrap();
        let assets = FileAssets::new(base.path().to_path_buf());

        let bytes = assets.load("board.svg").unwrap().unwrap();
        assert_eq!(&*bytes, b"<svg/>");
        assert!(assets.load("absent-file.svg").unwrap().is_none());
    }
}
