//! Descriptor database: maps firmware message ids to format/pack pairs.
//!
//! The descriptor file (`data.msc`) carries one `id,pack[,format]`
//! record per line after a `VERSION:<n>` header. Records are loaded
//! once into an open-addressing hash table with double hashing; the
//! table is read-only afterwards and rebuilt wholesale (build then
//! swap) when the firmware image changes.

use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::pack;

/// Expanded pack strings never exceed this many argument fields.
const PACK_EXPAND_CAP: usize = 128;

/// Errors that can occur while building the descriptor database.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("failed to read descriptor file: {0}")]
    IoFailure(#[from] std::io::Error),

    #[error("malformed descriptor file: {0}")]
    ParseFailure(String),
}

/// One descriptor: the renderable template for a single message id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorEntry {
    pub id: u32,
    /// printf-style template with `%`-conversions.
    pub format: String,
    /// One character per packed argument (`b`/`h`/`i`/`q`); empty for
    /// literal-only formats.
    pub pack: String,
}

/// Open-addressing hash table keyed by message id.
///
/// Collision resolution is double hashing: primary slot `id % capacity`,
/// step `step_base - (id % step_base)`. Capacity is sized to a prime at
/// least as large as the record count so the probe sequence visits every
/// slot. Lookup replays the identical probe sequence.
#[derive(Debug)]
pub struct DescriptorDatabase {
    slots: Vec<Option<DescriptorEntry>>,
    used: usize,
    step_base: u32,
    file_version: i32,
}

impl DescriptorDatabase {
    /// Build the database from a descriptor file on disk.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DatabaseError> {
        let text = fs::read_to_string(path)?;
        Self::from_str(&text)
    }

    /// Build the database from descriptor file text.
    ///
    /// Line 1 must contain `VERSION:<n>`; each following non-empty line
    /// is `id,pack[,format]`. When the format field is absent the pack
    /// field is taken as a literal format with no binary arguments.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(text: &str) -> Result<Self, DatabaseError> {
        let line_count = text.lines().count();
        let capacity = table_capacity(line_count);
        let mut db = Self {
            slots: vec![None; capacity as usize],
            used: 0,
            step_base: step_base(capacity),
            file_version: 0,
        };
        debug!(capacity, "sized descriptor table");

        let mut lines = text.lines();
        let version_line = lines
            .next()
            .ok_or_else(|| DatabaseError::ParseFailure("empty descriptor file".into()))?;
        db.file_version = parse_version(version_line)
            .ok_or_else(|| DatabaseError::ParseFailure("missing VERSION line".into()))?;

        for line in lines {
            let line = line.trim_end_matches(['\r', '\n']);
            if line.is_empty() {
                continue;
            }
            let mut fields = line.splitn(3, ',');
            let Some(id) = fields.next().and_then(|f| f.trim().parse::<u32>().ok()) else {
                continue;
            };
            let Some(second) = fields.next() else {
                continue;
            };
            let (format, raw_pack) = match fields.next() {
                Some(format) => (format.to_string(), second),
                // Two-field record: the second field is the literal format.
                None => (second.to_string(), ""),
            };
            let expanded = pack::expand(raw_pack, PACK_EXPAND_CAP);
            if !db.insert(id, format, expanded) {
                return Err(DatabaseError::ParseFailure(format!(
                    "descriptor table full while inserting id {id}"
                )));
            }
        }

        Ok(db)
    }

    /// Insert one entry via double hashing. Returns false when the
    /// table is full.
    pub fn insert(&mut self, id: u32, format: String, pack: String) -> bool {
        let capacity = self.capacity() as u32;
        if self.used == self.slots.len() {
            debug!(id, "descriptor table full");
            return false;
        }
        let step = self.step_base - (id % self.step_base);
        let mut slot = id % capacity;
        while self.slots[slot as usize].is_some() {
            slot = (slot + step) % capacity;
        }
        self.slots[slot as usize] = Some(DescriptorEntry { id, format, pack });
        self.used += 1;
        true
    }

    /// Look up an id, replaying the insertion probe sequence.
    pub fn lookup(&self, id: u32) -> Option<&DescriptorEntry> {
        if self.used == 0 {
            return None;
        }
        let capacity = self.capacity() as u32;
        let step = self.step_base - (id % self.step_base);
        let mut slot = id % capacity;
        for _ in 0..=capacity {
            let entry = self.slots[slot as usize].as_ref()?;
            if entry.id == id {
                return Some(entry);
            }
            slot = (slot + step) % capacity;
        }
        None
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.used
    }

    pub fn is_empty(&self) -> bool {
        self.used == 0
    }

    /// Total slot count (prime, fixed at build time).
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Version declared by the descriptor file's first line.
    pub fn file_version(&self) -> i32 {
        self.file_version
    }
}

/// Extract the numeric version from a `VERSION:<n>` header line.
fn parse_version(line: &str) -> Option<i32> {
    let (_, rest) = line.split_once("VERSION:")?;
    let digits: String = rest
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '-')
        .collect();
    digits.parse().ok()
}

/// Table sizing policy: line count minus the version line and the
/// trailing blank line, raised to the next prime (minimum 3).
fn table_capacity(line_count: usize) -> u32 {
    let base = line_count.saturating_sub(2).max(3) as u32;
    next_prime(base)
}

/// Double-hashing step modulus: half of capacity, rounded up.
fn step_base(capacity: u32) -> u32 {
    if capacity % 2 == 0 {
        capacity / 2
    } else {
        (capacity + 1) / 2
    }
}

fn next_prime(mut n: u32) -> u32 {
    while !is_prime(n) {
        n += 1;
    }
    n
}

fn is_prime(n: u32) -> bool {
    if n < 2 {
        return false;
    }
    (2..n).take_while(|d| d * d <= n).all(|d| n % d != 0)
}
