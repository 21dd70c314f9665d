//! Music library listing
//!
//! Recursive scan of the music directory for files the engine can decode.

use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions the rodio decoder handles with default features.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "flac"];

/// URL prefix the router serves music-directory images under.
pub const IMAGE_ROUTE: &str = "/imagem";

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Folder-wide artwork, tried when a track has no image of its own.
const FOLDER_IMAGES: &[&str] = &["cover.jpg", "cover.jpeg", "cover.png", "folder.jpg"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LibraryEntry {
    pub id: usize,
    pub titulo: String,
    /// Relative to the music directory, `/`-separated
    pub caminho: String,
    pub formato: String,
    /// URL of the cover art, when one sits next to the track
    pub imagem: Option<String>,
}

pub struct MusicLibrary {
    root: PathBuf,
}

impl MusicLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        MusicLibrary { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a client-supplied path: relative paths live under the
    /// music directory, absolute ones are taken as-is.
    pub fn resolve(&self, requested: &str) -> PathBuf {
        let requested = Path::new(requested);
        if requested.is_absolute() {
            requested.to_path_buf()
        } else {
            self.root.join(requested)
        }
    }

    /// All playable files, sorted by path. Unreadable entries are skipped.
    pub fn scan(&self) -> Vec<LibraryEntry> {
        if !self.root.is_dir() {
            tracing::warn!(root = %self.root.display(), "Music directory does not exist");
            return Vec::new();
        }

        let mut files: Vec<PathBuf> = WalkDir::new(&self.root)
            .follow_links(true)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("Error accessing entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| audio_format(path).is_some())
            .collect();
        files.sort();

        tracing::debug!(count = files.len(), "Music library scanned");

        files
            .into_iter()
            .enumerate()
            .filter_map(|(id, path)| {
                let relative = path.strip_prefix(&self.root).ok()?;
                Some(LibraryEntry {
                    id,
                    titulo: path.file_stem()?.to_string_lossy().into_owned(),
                    caminho: url_path(relative),
                    formato: audio_format(&path)?,
                    imagem: self.cover_art(&path),
                })
            })
            .collect()
    }

    /// `track.jpg` beside `track.mp3` wins over a shared `cover.jpg`.
    fn cover_art(&self, track: &Path) -> Option<String> {
        let own = IMAGE_EXTENSIONS
            .iter()
            .map(|ext| track.with_extension(ext))
            .find(|candidate| candidate.is_file());

        let image = own.or_else(|| {
            let dir = track.parent()?;
            FOLDER_IMAGES
                .iter()
                .map(|name| dir.join(name))
                .find(|candidate| candidate.is_file())
        })?;

        let relative = image.strip_prefix(&self.root).ok()?;
        Some(format!("{}/{}", IMAGE_ROUTE, url_path(relative)))
    }
}

/// `/`-joined components, whatever the platform separator.
fn url_path(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Upper-cased extension when the file is one we can play.
fn audio_format(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    SUPPORTED_EXTENSIONS
        .contains(&ext.as_str())
        .then(|| ext.to_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn lists_only_audio_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("rock")).unwrap();
        fs::write(dir.path().join("b.mp3"), b"x").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        fs::write(dir.path().join("rock").join("a.FLAC"), b"x").unwrap();
        fs::write(dir.path().join("a.wav"), b"x").unwrap();

        let entries = MusicLibrary::new(dir.path()).scan();

        let paths: Vec<_> = entries.iter().map(|e| e.caminho.as_str()).collect();
        assert_eq!(paths, vec!["a.wav", "b.mp3", "rock/a.FLAC"]);
        assert_eq!(entries[2].titulo, "a");
        assert_eq!(entries[2].formato, "FLAC");
        assert_eq!(entries[2].id, 2);
        assert_eq!(entries[2].imagem, None);
    }

    #[test]
    fn cover_art_prefers_track_image_over_folder_cover() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("album")).unwrap();
        fs::write(dir.path().join("album").join("one.mp3"), b"x").unwrap();
        fs::write(dir.path().join("album").join("two.mp3"), b"x").unwrap();
        fs::write(dir.path().join("album").join("one.png"), b"x").unwrap();
        fs::write(dir.path().join("album").join("cover.jpg"), b"x").unwrap();
        fs::write(dir.path().join("loose.wav"), b"x").unwrap();

        let entries = MusicLibrary::new(dir.path()).scan();

        let images: Vec<_> = entries.iter().map(|e| e.imagem.as_deref()).collect();
        assert_eq!(
            images,
            vec![
                Some("/imagem/album/one.png"),
                Some("/imagem/album/cover.jpg"),
                None,
            ]
        );
    }

    #[test]
    fn missing_directory_is_empty() {
        let library = MusicLibrary::new("/no/such/music/dir");
        assert!(library.scan().is_empty());
    }

    #[test]
    fn relative_paths_resolve_under_root() {
        let library = MusicLibrary::new("/srv/music");
        assert_eq!(library.resolve("rock/a.mp3"), PathBuf::from("/srv/music/rock/a.mp3"));
        assert_eq!(library.resolve("/tmp/b.mp3"), PathBuf::from("/tmp/b.mp3"));
    }
}
