//! Redis-backed [`StoreClient`].
//!
//! `redis::Connection` is not shareable between threads, so the store keeps a
//! small pool of idle connections. Each call checks one out (opening a fresh
//! connection when the pool is empty) and puts it back when the call succeeds.
//! A connection whose call failed is dropped.

use std::collections::BTreeSet;
use std::sync::{Mutex, PoisonError};

use anyhow::{Context, Result};
use redis::{pipe, Client, Connection, RedisResult};

use super::{Batch, Command, StoreClient};

pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379/";

pub struct RedisStore {
    client: Client,
    idle: Mutex<Vec<Connection>>,
}

impl RedisStore {
    /// Open a client for `url` and verify the server answers `PING`.
    pub fn connect(url: &str) -> Result<Self> {
        let client =
            Client::open(url).with_context(|| format!("invalid Redis URL '{}'", url))?;
        let mut con = client
            .get_connection()
            .with_context(|| format!("failed to connect to Redis at {}", url))?;
        let pong: String = redis::cmd("PING")
            .query(&mut con)
            .with_context(|| format!("Redis at {} did not answer PING", url))?;
        log::debug!("connected to {} ({})", url, pong);

        Ok(Self {
            client,
            idle: Mutex::new(vec![con]),
        })
    }

    /// Connections currently parked in the pool.
    pub fn idle_connections(&self) -> usize {
        self.idle.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn with_connection<T>(
        &self,
        f: impl FnOnce(&mut Connection) -> RedisResult<T>,
    ) -> Result<T> {
        let parked = self
            .idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop();
        let mut con = match parked {
            Some(con) => con,
            None => {
                log::debug!("connection pool empty, opening a new connection");
                self.client
                    .get_connection()
                    .context("failed to open Redis connection")?
            }
        };

        let out = f(&mut con)?;
        self.idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(con);
        Ok(out)
    }
}

impl StoreClient for RedisStore {
    fn flush_all(&self) -> Result<()> {
        self.with_connection(|con| redis::cmd("FLUSHDB").query::<()>(con))
            .context("FLUSHDB failed")
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.with_connection(|con| redis::cmd("SET").arg(key).arg(value).query::<()>(con))
            .with_context(|| format!("SET {} failed", key))
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        self.with_connection(|con| redis::cmd("GET").arg(key).query::<Option<String>>(con))
            .with_context(|| format!("GET {} failed", key))
    }

    fn list_keys(&self, pattern: &str) -> Result<BTreeSet<String>> {
        let keys: Vec<String> = self
            .with_connection(|con| redis::cmd("KEYS").arg(pattern).query(con))
            .with_context(|| format!("KEYS {} failed", pattern))?;
        Ok(keys.into_iter().collect())
    }

    fn execute_batch(&self, batch: &Batch) -> Result<usize> {
        if batch.is_empty() {
            return Ok(0);
        }

        let mut pipeline = pipe();
        for command in batch.commands() {
            match command {
                Command::Set { key, value } => {
                    pipeline.cmd("SET").arg(key).arg(value);
                }
                Command::Get { key } => {
                    pipeline.cmd("GET").arg(key);
                }
            }
        }

        let replies: Vec<redis::Value> = self
            .with_connection(|con| pipeline.query(con))
            .with_context(|| format!("pipeline of {} commands failed", batch.len()))?;
        Ok(replies.len())
    }
}
