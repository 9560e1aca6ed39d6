//! In-memory song store used by handler tests

use crate::pagination::Pagination;
use crate::songs::filter::SongFilter;
use crate::songs::models::{NewSong, Song, SongId};
use crate::songs::store::SongStore;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// Song store kept in a `BTreeMap`, ordered by id like the SQL store
#[derive(Default)]
pub struct MemorySongStore {
    songs: RwLock<BTreeMap<SongId, Song>>,
    fail: AtomicBool,
}

impl MemorySongStore {
    /// Create a store pre-populated with `songs`, assigning ids from 1
    pub async fn with_songs(songs: Vec<NewSong>) -> Self {
        let store = Self::default();
        for song in songs {
            store.insert(&song).await.unwrap();
        }
        store
    }

    /// Make every subsequent operation fail with a database error
    pub fn fail_all(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    /// Number of stored songs
    pub async fn count(&self) -> usize {
        self.songs.read().await.len()
    }

    fn check(&self) -> Result<(), sqlx::Error> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(sqlx::Error::PoolTimedOut);
        }
        Ok(())
    }
}

fn matches(filter: &SongFilter, song: &Song) -> bool {
    filter.predicates().into_iter().all(|(column, needle)| {
        let field = match column {
            "music_group" => &song.group,
            "song" => &song.title,
            "release_date" => &song.release_date,
            "text" => &song.text,
            "link" => &song.link,
            other => panic!("unknown filter column {}", other),
        };
        field.contains(needle)
    })
}

#[async_trait]
impl SongStore for MemorySongStore {
    async fn list(&self, filter: &SongFilter, page: Pagination) -> Result<Vec<Song>, sqlx::Error> {
        self.check()?;
        let songs = self.songs.read().await;
        Ok(songs
            .values()
            .filter(|song| matches(filter, song))
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .cloned()
            .collect())
    }

    async fn get(&self, id: SongId) -> Result<Option<Song>, sqlx::Error> {
        self.check()?;
        Ok(self.songs.read().await.get(&id).cloned())
    }

    async fn insert(&self, song: &NewSong) -> Result<Song, sqlx::Error> {
        self.check()?;
        let mut songs = self.songs.write().await;
        let id = songs.keys().next_back().map_or(1, |last| last + 1);
        let song = Song {
            id,
            group: song.group.clone(),
            title: song.title.clone(),
            release_date: song.release_date.clone(),
            text: song.text.clone(),
            link: song.link.clone(),
        };
        songs.insert(id, song.clone());
        Ok(song)
    }

    async fn update(&self, song: &Song) -> Result<Song, sqlx::Error> {
        self.check()?;
        let mut songs = self.songs.write().await;
        let slot = songs.get_mut(&song.id).ok_or(sqlx::Error::RowNotFound)?;
        *slot = song.clone();
        Ok(song.clone())
    }

    async fn delete(&self, id: SongId) -> Result<bool, sqlx::Error> {
        self.check()?;
        Ok(self.songs.write().await.remove(&id).is_some())
    }
}
