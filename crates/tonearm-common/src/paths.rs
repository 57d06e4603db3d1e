//! Path utilities for audio files.
//!
//! Extension checks used when registering songs, and the MIME type sent in
//! `Content-Type` when a song is streamed.

use std::path::Path;

/// List of supported audio file extensions.
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "m4a", "aac", "flac", "ogg", "oga", "opus", "wav"];

/// Check if a path has an audio file extension.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use tonearm_common::paths::is_audio_file;
///
/// assert!(is_audio_file(Path::new("track.mp3")));
/// assert!(is_audio_file(Path::new("/music/album/01.FLAC")));
/// assert!(!is_audio_file(Path::new("cover.jpg")));
/// ```
pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| AUDIO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Guess the MIME type of an audio file from its extension.
///
/// Returns `None` for unknown extensions so callers can pick their own default.
pub fn audio_content_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();

    let mime = match ext.as_str() {
        "mp3" => "audio/mpeg",
        "m4a" | "aac" => "audio/mp4",
        "flac" => "audio/flac",
        "ogg" | "oga" => "audio/ogg",
        "opus" => "audio/opus",
        "wav" => "audio/wav",
        _ => return None,
    };

    Some(mime)
}

/// Get the list of audio file extensions.
pub fn audio_extensions() -> &'static [&'static str] {
    AUDIO_EXTENSIONS
}
