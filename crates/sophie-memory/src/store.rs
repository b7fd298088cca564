// SPDX-FileCopyrightText: 2026 Sophie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite-backed memory store with BLOB vectors and cosine recall.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use sophie_core::error::SophieError;
use sophie_core::traits::EmbeddingAdapter;
use sophie_core::types::EmbeddingInput;
use tokio_rusqlite::Connection;
use tracing::{debug, info};

use crate::ids::IdGenerator;
use crate::migrations::run_migrations;
use crate::types::{Memory, MemoryId, blob_to_vec, cosine_similarity, vec_to_blob};

/// File name of the database inside the memory directory.
pub const DATABASE_FILE: &str = "memories.db";

/// Default number of memories returned by [`MemoryStore::query`].
pub const DEFAULT_TOP_K: usize = 3;

/// Helper to convert tokio_rusqlite errors into SophieError::Storage.
fn storage_err(e: tokio_rusqlite::Error) -> SophieError {
    SophieError::storage(e)
}

/// Unwraps errors raised inside a connection closure that already speak `SophieError`.
fn flatten_err(e: tokio_rusqlite::Error<SophieError>) -> SophieError {
    match e {
        tokio_rusqlite::Error::Error(inner) => inner,
        other => SophieError::storage(std::io::Error::other(other.to_string())),
    }
}

/// How the store opens and ranks.
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Named collection the store reads and writes.
    pub collection: String,
    /// Minimum cosine similarity for a memory to be returned.
    pub similarity_threshold: f32,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            collection: "sophie_memories".to_string(),
            similarity_threshold: 0.1,
        }
    }
}

/// Durable store of immutable memories, searched by embedding similarity.
///
/// Owns its database exclusively; one writer process at a time.
pub struct MemoryStore {
    conn: Connection,
    embedder: Arc<dyn EmbeddingAdapter>,
    options: StoreOptions,
    path: PathBuf,
    ids: Mutex<IdGenerator>,
    dimensions: Mutex<Option<usize>>,
}

impl MemoryStore {
    /// Opens (creating if needed) the store in directory `dir`.
    ///
    /// Any failure here is fatal: the directory cannot be created, the
    /// database cannot be opened or migrated, or the collection was created
    /// with vectors of a different length than `embedder` produces.
    pub async fn open(
        dir: impl AsRef<Path>,
        embedder: Arc<dyn EmbeddingAdapter>,
        options: StoreOptions,
    ) -> Result<Self, SophieError> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(SophieError::storage)?;

        let path = dir.join(DATABASE_FILE);
        let conn = Connection::open(&path)
            .await
            .map_err(SophieError::storage)?;

        let store = Self::initialize(conn, embedder, options, path).await?;
        info!(
            path = %store.path.display(),
            collection = %store.options.collection,
            "memory store opened"
        );
        Ok(store)
    }

    /// Opens a throwaway in-memory store.
    pub async fn open_in_memory(
        embedder: Arc<dyn EmbeddingAdapter>,
        options: StoreOptions,
    ) -> Result<Self, SophieError> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(SophieError::storage)?;
        Self::initialize(conn, embedder, options, PathBuf::from(":memory:")).await
    }

    async fn initialize(
        conn: Connection,
        embedder: Arc<dyn EmbeddingAdapter>,
        options: StoreOptions,
        path: PathBuf,
    ) -> Result<Self, SophieError> {
        let collection = options.collection.clone();
        let (stored_dims, latest_id) = conn
            .call(move |conn| -> Result<(Option<usize>, Option<String>), SophieError> {
                conn.pragma_update(None, "foreign_keys", true)
                    .map_err(SophieError::storage)?;
                run_migrations(conn)?;
                conn.execute(
                    "INSERT OR IGNORE INTO collections (name) VALUES (?1)",
                    rusqlite::params![collection],
                )
                .map_err(SophieError::storage)?;
                let dims: Option<i64> = conn
                    .query_row(
                        "SELECT dimensions FROM collections WHERE name = ?1",
                        rusqlite::params![collection],
                        |row| row.get(0),
                    )
                    .map_err(SophieError::storage)?;
                let latest: Option<String> = conn
                    .query_row("SELECT MAX(id) FROM memories", [], |row| row.get(0))
                    .map_err(SophieError::storage)?;
                Ok((dims.map(|d| d as usize), latest))
            })
            .await
            .map_err(flatten_err)?;

        if let (Some(stored), Some(produced)) = (stored_dims, embedder.dimensions())
            && stored != produced
        {
            return Err(SophieError::storage(std::io::Error::other(format!(
                "collection `{}` holds {stored}-dimensional vectors but embedder `{}` produces {produced}",
                options.collection,
                embedder.name()
            ))));
        }

        Ok(Self {
            conn,
            embedder,
            options,
            path,
            ids: Mutex::new(IdGenerator::seeded(latest_id.as_deref())),
            dimensions: Mutex::new(stored_dims),
        })
    }

    /// Location of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Collection this store reads and writes.
    pub fn collection(&self) -> &str {
        &self.options.collection
    }

    /// The embedding backend in use.
    pub fn embedder(&self) -> &Arc<dyn EmbeddingAdapter> {
        &self.embedder
    }

    /// Stores `text` as a new memory and returns its id.
    pub async fn add(&self, text: &str) -> Result<MemoryId, SophieError> {
        let embedding = self.embed_one(text).await?;

        let fix_dimensions = {
            let mut dims = self.dimensions.lock().map_err(poisoned)?;
            match *dims {
                Some(expected) if expected != embedding.len() => {
                    return Err(SophieError::Embedding {
                        message: format!(
                            "collection `{}` expects {expected}-dimensional vectors, got {}",
                            self.options.collection,
                            embedding.len()
                        ),
                        source: None,
                    });
                }
                Some(_) => false,
                None => {
                    *dims = Some(embedding.len());
                    true
                }
            }
        };

        let now = Utc::now();
        let id = self.ids.lock().map_err(poisoned)?.next_at(now);

        let memory = Memory {
            id: id.clone(),
            text: text.to_string(),
            embedding,
            created_at: now.to_rfc3339(),
        };
        let collection = self.options.collection.clone();

        let result = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                if fix_dimensions {
                    tx.execute(
                        "UPDATE collections SET dimensions = ?1 WHERE name = ?2 AND dimensions IS NULL",
                        rusqlite::params![memory.embedding.len() as i64, collection],
                    )?;
                }
                tx.execute(
                    "INSERT INTO memories (id, collection, text, embedding, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                    rusqlite::params![
                        memory.id.as_str(),
                        collection,
                        memory.text,
                        vec_to_blob(&memory.embedding),
                        memory.created_at
                    ],
                )?;
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(storage_err);

        if let Err(e) = result {
            if fix_dimensions && let Ok(mut dims) = self.dimensions.lock() {
                *dims = None;
            }
            return Err(e);
        }

        info!(id = %id, collection = %self.options.collection, "memory stored");
        Ok(id)
    }

    /// Returns up to `k` memory texts most similar to `text`, best first.
    ///
    /// Empty when the store is empty or nothing clears the similarity
    /// threshold. Equal scores put the newer memory first.
    pub async fn query(&self, text: &str, k: usize) -> Result<Vec<String>, SophieError> {
        Ok(self
            .query_scored(text, k)
            .await?
            .into_iter()
            .map(|(memory, _)| memory.text)
            .collect())
    }

    /// Like [`query`](Self::query), keeping the memories and their scores.
    pub async fn query_scored(
        &self,
        text: &str,
        k: usize,
    ) -> Result<Vec<(Memory, f32)>, SophieError> {
        if k == 0 {
            return Ok(vec![]);
        }

        let memories = self.all().await?;
        if memories.is_empty() {
            debug!("memory query against empty collection");
            return Ok(vec![]);
        }

        let query = self.embed_one(text).await?;
        let threshold = self.options.similarity_threshold;

        let mut scored: Vec<(Memory, f32)> = memories
            .into_iter()
            .filter(|m| m.embedding.len() == query.len())
            .map(|m| {
                let score = cosine_similarity(&query, &m.embedding);
                (m, score)
            })
            .filter(|(_, score)| *score >= threshold)
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| b.0.id.cmp(&a.0.id)));
        scored.truncate(k);

        debug!(k, matches = scored.len(), "memory query");
        Ok(scored)
    }

    /// Every memory in the collection, oldest first.
    pub async fn all(&self) -> Result<Vec<Memory>, SophieError> {
        let collection = self.options.collection.clone();
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, text, embedding, created_at FROM memories WHERE collection = ?1 ORDER BY id",
                )?;
                let memories = stmt
                    .query_map(rusqlite::params![collection], row_to_memory)?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(memories)
            })
            .await
            .map_err(storage_err)
    }

    /// Number of memories in the collection.
    pub async fn len(&self) -> Result<usize, SophieError> {
        let collection = self.options.collection.clone();
        self.conn
            .call(move |conn| {
                let count: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM memories WHERE collection = ?1",
                    rusqlite::params![collection],
                    |row| row.get(0),
                )?;
                Ok(count as usize)
            })
            .await
            .map_err(storage_err)
    }

    pub async fn is_empty(&self) -> Result<bool, SophieError> {
        Ok(self.len().await? == 0)
    }

    async fn embed_one(&self, text: &str) -> Result<Vec<f32>, SophieError> {
        let output = self
            .embedder
            .embed(EmbeddingInput {
                texts: vec![text.to_string()],
            })
            .await?;
        output
            .embeddings
            .into_iter()
            .next()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| SophieError::Embedding {
                message: format!("embedder `{}` returned no vector", self.embedder.name()),
                source: None,
            })
    }
}

/// Convert a rusqlite Row to a Memory.
fn row_to_memory(row: &rusqlite::Row) -> rusqlite::Result<Memory> {
    let id: String = row.get(0)?;
    let blob: Vec<u8> = row.get(2)?;
    Ok(Memory {
        id: MemoryId(id),
        text: row.get(1)?,
        embedding: blob_to_vec(&blob),
        created_at: row.get(3)?,
    })
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> SophieError {
    SophieError::Internal("memory store lock poisoned".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedder::HashEmbedder;

    async fn test_store() -> MemoryStore {
        MemoryStore::open_in_memory(Arc::new(HashEmbedder::new(512)), StoreOptions::default())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn empty_store_returns_nothing() {
        let store = test_store().await;
        assert!(store.query("anything", 3).await.unwrap().is_empty());
        assert!(store.is_empty().await.unwrap());
    }

    #[tokio::test]
    async fn add_assigns_increasing_ids() {
        let store = test_store().await;
        let a = store.add("first fact").await.unwrap();
        let b = store.add("second fact").await.unwrap();
        assert!(a < b);
        assert_eq!(store.len().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn query_ranks_most_similar_first() {
        let store = test_store().await;
        store.add("my favourite colour is green").await.unwrap();
        store.add("my dog is called Biscuit").await.unwrap();
        store.add("I work as a nurse in Leeds").await.unwrap();

        let results = store.query("what is my dog called", 3).await.unwrap();
        assert_eq!(results.first().map(String::as_str), Some("my dog is called Biscuit"));
    }

    #[tokio::test]
    async fn query_respects_k() {
        let store = test_store().await;
        for i in 0..5 {
            store.add(&format!("note number {i} about tea")).await.unwrap();
        }
        assert_eq!(store.query("tea", 2).await.unwrap().len(), 2);
        assert!(store.query("tea", 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn identical_scores_prefer_newer_memory() {
        let store = test_store().await;
        store.add("Bake bread").await.unwrap();
        store.add("bake bread!").await.unwrap();

        let results = store.query("bake bread", 2).await.unwrap();
        assert_eq!(results, vec!["bake bread!", "Bake bread"]);
    }

    #[tokio::test]
    async fn memories_cannot_be_rewritten() {
        let store = test_store().await;
        store.add("immutable fact").await.unwrap();

        let update = store
            .conn
            .call(|conn| {
                conn.execute("UPDATE memories SET text = 'changed'", [])?;
                Ok::<_, rusqlite::Error>(())
            })
            .await;
        assert!(update.is_err());

        let delete = store
            .conn
            .call(|conn| {
                conn.execute("DELETE FROM memories", [])?;
                Ok::<_, rusqlite::Error>(())
            })
            .await;
        assert!(delete.is_err());
        assert_eq!(store.all().await.unwrap()[0].text, "immutable fact");
    }

    #[tokio::test]
    async fn collections_are_isolated() {
        let embedder: Arc<dyn EmbeddingAdapter> = Arc::new(HashEmbedder::new(64));
        let dir = tempfile::tempdir().unwrap();

        let work = MemoryStore::open(
            dir.path(),
            embedder.clone(),
            StoreOptions {
                collection: "work".into(),
                ..StoreOptions::default()
            },
        )
        .await
        .unwrap();
        work.add("standup at nine").await.unwrap();
        drop(work);

        let home = MemoryStore::open(
            dir.path(),
            embedder,
            StoreOptions {
                collection: "home".into(),
                ..StoreOptions::default()
            },
        )
        .await
        .unwrap();
        assert!(home.query("standup at nine", 3).await.unwrap().is_empty());
    }
}
