//! Asset handles and the lookup that produces them.
//!
//! An [`AssetHandle`] owns one open byte source for the length of a single
//! request. Whoever holds the handle holds the source; dropping the handle is
//! the release, so every exit path of the streaming code frees it without an
//! explicit close.

use std::fmt;
use std::path::Path;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncSeek};
use tonearm_common::paths::audio_content_type;
use tonearm_common::SongId;
use tonearm_db::pool::{get_conn, DbPool};
use tonearm_db::queries::songs;

use super::error::StreamError;

/// A seekable byte source an asset can be read from.
pub trait AssetSource: AsyncRead + AsyncSeek + Send + Unpin {}

impl<T: AsyncRead + AsyncSeek + Send + Unpin> AssetSource for T {}

/// An open asset: its size, its MIME type if known, and the source itself.
pub struct AssetHandle {
    song_id: SongId,
    total_size: u64,
    content_type: Option<&'static str>,
    source: Box<dyn AssetSource>,
}

impl AssetHandle {
    pub fn new(song_id: SongId, total_size: u64, source: impl AssetSource + 'static) -> Self {
        Self {
            song_id,
            total_size,
            content_type: None,
            source: Box::new(source),
        }
    }

    pub fn with_content_type(mut self, content_type: Option<&'static str>) -> Self {
        self.content_type = content_type;
        self
    }

    /// Open a file on disk as the asset for `song_id`.
    ///
    /// A missing path, or one that is not a regular file, is `AssetNotFound`.
    pub async fn open_file(song_id: SongId, path: &Path) -> Result<Self, StreamError> {
        let not_found = || StreamError::AssetNotFound(format!("file for song {song_id} is missing"));

        let file = tokio::fs::File::open(path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => not_found(),
            _ => StreamError::AssetRead(e),
        })?;

        let metadata = file.metadata().await.map_err(StreamError::AssetRead)?;
        if !metadata.is_file() {
            return Err(not_found());
        }

        tracing::trace!(%song_id, path = %path.display(), size = metadata.len(), "Opened asset");

        Ok(Self::new(song_id, metadata.len(), file).with_content_type(audio_content_type(path)))
    }

    pub fn song_id(&self) -> SongId {
        self.song_id
    }

    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    pub fn content_type(&self) -> Option<&'static str> {
        self.content_type
    }

    pub(crate) fn source_mut(&mut self) -> &mut dyn AssetSource {
        self.source.as_mut()
    }
}

impl fmt::Debug for AssetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetHandle")
            .field("song_id", &self.song_id)
            .field("total_size", &self.total_size)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

impl Drop for AssetHandle {
    fn drop(&mut self) {
        tracing::trace!(song_id = %self.song_id, "Released asset");
    }
}

/// Resolves a song ID to an open asset.
#[async_trait]
pub trait AssetStore: Send + Sync {
    async fn lookup(&self, song_id: SongId) -> Result<AssetHandle, StreamError>;
}

/// Asset lookup backed by the song catalog: the database row names the file.
#[derive(Clone)]
pub struct CatalogStore {
    pool: DbPool,
}

impl CatalogStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssetStore for CatalogStore {
    async fn lookup(&self, song_id: SongId) -> Result<AssetHandle, StreamError> {
        let pool = self.pool.clone();
        let song = tokio::task::spawn_blocking(move || {
            let conn = get_conn(&pool)?;
            songs::get_song(&conn, song_id)
        })
        .await
        .map_err(|e| StreamError::Internal(e.to_string()))??;

        AssetHandle::open_file(song_id, Path::new(&song.file_path)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tonearm_db::pool::init_memory_pool;

    #[tokio::test]
    async fn test_open_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("track.flac");
        std::fs::write(&path, vec![7u8; 321]).unwrap();

        let handle = AssetHandle::open_file(SongId::new(), &path).await.unwrap();
        assert_eq!(handle.total_size(), 321);
        assert_eq!(handle.content_type(), Some("audio/flac"));
    }

    #[tokio::test]
    async fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = AssetHandle::open_file(SongId::new(), &dir.path().join("gone.mp3"))
            .await
            .unwrap_err();
        assert_matches!(err, StreamError::AssetNotFound(_));
    }

    #[tokio::test]
    async fn test_open_directory_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = AssetHandle::open_file(SongId::new(), dir.path())
            .await
            .unwrap_err();
        assert_matches!(err, StreamError::AssetNotFound(_));
    }

    #[tokio::test]
    async fn test_catalog_lookup() {
        let pool = init_memory_pool().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.mp3");
        std::fs::write(&path, b"ID3 fake mp3 body").unwrap();

        let song = {
            let conn = get_conn(&pool).unwrap();
            songs::create_song(&conn, "Song", None, path.to_str().unwrap(), None).unwrap()
        };

        let store = CatalogStore::new(pool);
        let handle = store.lookup(song.id).await.unwrap();
        assert_eq!(handle.song_id(), song.id);
        assert_eq!(handle.total_size(), 17);
        assert_eq!(handle.content_type(), Some("audio/mpeg"));
    }

    #[tokio::test]
    async fn test_catalog_lookup_unknown_song() {
        let store = CatalogStore::new(init_memory_pool().unwrap());
        let err = store.lookup(SongId::new()).await.unwrap_err();
        assert_matches!(err, StreamError::AssetNotFound(_));
    }

    #[tokio::test]
    async fn test_catalog_lookup_missing_file() {
        let pool = init_memory_pool().unwrap();
        let song = {
            let conn = get_conn(&pool).unwrap();
            songs::create_song(&conn, "Ghost", None, "/definitely/not/here.mp3", None).unwrap()
        };

        let err = CatalogStore::new(pool).lookup(song.id).await.unwrap_err();
        assert_matches!(err, StreamError::AssetNotFound(_));
    }
}
