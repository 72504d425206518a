//! Store collaborator interface.
//!
//! The benchmark only needs five capabilities from the store: flush, single
//! SET, single GET, key listing and pipelined batches. Implementations must be
//! usable from several threads at once (the parallel strategy shares one
//! handle across its workers).

use std::collections::BTreeSet;

use anyhow::Result;

pub mod memory;
pub mod remote;

pub use memory::MemoryStore;
pub use remote::RedisStore;

/// A key/value store the strategies can be benchmarked against.
pub trait StoreClient: Send + Sync {
    /// Remove every key of the current database.
    fn flush_all(&self) -> Result<()>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Keys matching a glob `pattern` (`*` and `?` wildcards).
    fn list_keys(&self, pattern: &str) -> Result<BTreeSet<String>>;

    /// Send every queued command in one round-trip and drain the replies.
    ///
    /// Returns the number of replies drained. Individual replies are not
    /// inspected; only a failure of the exchange as a whole is an error.
    fn execute_batch(&self, batch: &Batch) -> Result<usize>;
}

/// One queued command inside a [`Batch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set { key: String, value: String },
    Get { key: String },
}

/// Commands queued for a single pipelined round-trip.
#[derive(Debug, Default, Clone)]
pub struct Batch {
    commands: Vec<Command>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            commands: Vec::with_capacity(capacity),
        }
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.commands.push(Command::Set {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    pub fn get(&mut self, key: impl Into<String>) -> &mut Self {
        self.commands.push(Command::Get { key: key.into() });
        self
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Redis-style glob match supporting `*` (any run) and `?` (one char).
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let t: Vec<char> = text.chars().collect();

    let (mut pi, mut ti) = (0, 0);
    let mut star: Option<usize> = None;
    let mut mark = 0;

    while ti < t.len() {
        if pi < p.len() && (p[pi] == '?' || p[pi] == t[ti]) {
            pi += 1;
            ti += 1;
        } else if pi < p.len() && p[pi] == '*' {
            star = Some(pi);
            mark = ti;
            pi += 1;
        } else if let Some(s) = star {
            // Backtrack: let the last star swallow one more char.
            pi = s + 1;
            mark += 1;
            ti = mark;
        } else {
            return false;
        }
    }

    while pi < p.len() && p[pi] == '*' {
        pi += 1;
    }
    pi == p.len()
}
