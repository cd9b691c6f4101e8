//! Event store access.
//!
//! The display never keeps a handle on the event file. Each load goes through
//! [`EventSource::open`], reads what it needs from the returned
//! [`EventReader`], and drops it.
//!
//! The concrete store is an EDM4hep JSON dump as written by `edm4hep2json`:
//!
//! ```text
//! {
//!   "Event 0": {
//!     "MCParticles": {"collID": 1, "collType": "edm4hep::MCParticleCollection",
//!                     "collection": [{...}, {...}]},
//!     "ToyCaloHits": {"collID": 2, "collType": "edm4hep::SimCalorimeterHitCollection",
//!                     "collection": [...]}
//!   },
//!   "Event 1": { ... }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::EventStoreError;

const EVENT_KEY_PREFIX: &str = "Event ";
const COLLECTION_KEY: &str = "collection";

/// Something that can be opened to read events.
pub trait EventSource {
    /// Reader returned by [`open`](Self::open).
    type Reader: EventReader;

    /// Open the store. Called once per event load.
    fn open(&self) -> Result<Self::Reader, EventStoreError>;
}

/// An open event store.
pub trait EventReader {
    /// Number of events in the store.
    fn num_entries(&self) -> usize;

    /// Entry numbers present in the store, ascending. They need not start
    /// at zero or be contiguous.
    fn entries(&self) -> Vec<usize>;

    /// Names of the branches present in `entry`.
    fn branch_names(&self, entry: usize) -> Result<Vec<String>, EventStoreError>;

    /// Deserialize the records of `branch` in `entry`, stopping after `limit`
    /// records when one is given.
    fn read<T: DeserializeOwned>(
        &self,
        entry: usize,
        branch: &str,
        limit: Option<usize>,
    ) -> Result<Vec<T>, EventStoreError>;
}

/// An EDM4hep JSON dump on disk.
#[derive(Debug, Clone)]
pub struct Edm4hepJsonFile {
    path: PathBuf,
}

impl Edm4hepJsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventSource for Edm4hepJsonFile {
    type Reader = Edm4hepReader;

    fn open(&self) -> Result<Edm4hepReader, EventStoreError> {
        let text = fs::read_to_string(&self.path).map_err(|source| EventStoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        let document: Value = serde_json::from_str(&text)?;
        let reader = Edm4hepReader::from_value(document)?;
        log::info!(
            "Opened {} ({} events)",
            self.path.display(),
            reader.num_entries()
        );
        Ok(reader)
    }
}

/// An EDM4hep JSON document held in memory.
///
/// Every [`open`](EventSource::open) parses a fresh copy, so it behaves like
/// the file-backed store without touching the disk.
#[derive(Debug, Clone)]
pub struct Edm4hepJson {
    document: Value,
}

impl Edm4hepJson {
    pub fn from_value(document: Value) -> Self {
        Self { document }
    }

    pub fn parse(text: &str) -> Result<Self, EventStoreError> {
        Ok(Self::from_value(serde_json::from_str(text)?))
    }
}

impl EventSource for Edm4hepJson {
    type Reader = Edm4hepReader;

    fn open(&self) -> Result<Edm4hepReader, EventStoreError> {
        Edm4hepReader::from_value(self.document.clone())
    }
}

/// Reader over a parsed EDM4hep JSON document.
///
/// Entries are addressed by the number in their `"Event <n>"` key.
#[derive(Debug, Clone, Default)]
pub struct Edm4hepReader {
    events: BTreeMap<usize, Map<String, Value>>,
}

impl Edm4hepReader {
    pub fn from_value(document: Value) -> Result<Self, EventStoreError> {
        let Value::Object(top) = document else {
            return Err(EventStoreError::Format(
                "top level is not an object of events".to_string(),
            ));
        };

        let mut events = BTreeMap::new();
        for (key, value) in top {
            let Some(number) = key.strip_prefix(EVENT_KEY_PREFIX) else {
                log::debug!("Ignoring top-level key '{}'", key);
                continue;
            };
            let number: usize = number.trim().parse().map_err(|_| {
                EventStoreError::Format(format!("'{}' is not a valid event key", key))
            })?;
            let Value::Object(branches) = value else {
                return Err(EventStoreError::Format(format!(
                    "'{}' is not an object of branches",
                    key
                )));
            };
            events.insert(number, branches);
        }

        Ok(Self { events })
    }

    fn entry(&self, entry: usize) -> Result<&Map<String, Value>, EventStoreError> {
        self.events
            .get(&entry)
            .ok_or_else(|| EventStoreError::EntryOutOfRange {
                entry,
                entries: self.events.len(),
                range: self
                    .events
                    .keys()
                    .next()
                    .zip(self.events.keys().next_back())
                    .map(|(&first, &last)| (first, last)),
            })
    }
}

impl EventReader for Edm4hepReader {
    fn num_entries(&self) -> usize {
        self.events.len()
    }

    fn entries(&self) -> Vec<usize> {
        self.events.keys().copied().collect()
    }

    fn branch_names(&self, entry: usize) -> Result<Vec<String>, EventStoreError> {
        Ok(self
            .entry(entry)?
            .iter()
            .filter(|(_, v)| v.get(COLLECTION_KEY).is_some_and(Value::is_array))
            .map(|(name, _)| name.clone())
            .collect())
    }

    fn read<T: DeserializeOwned>(
        &self,
        entry: usize,
        branch: &str,
        limit: Option<usize>,
    ) -> Result<Vec<T>, EventStoreError> {
        let records = self
            .entry(entry)?
            .get(branch)
            .and_then(|b| b.get(COLLECTION_KEY))
            .and_then(Value::as_array)
            .ok_or_else(|| {
                EventStoreError::Format(format!(
                    "event {} has no collection named '{}'",
                    entry, branch
                ))
            })?;

        let take = limit.unwrap_or(records.len());
        records
            .iter()
            .take(take)
            .enumerate()
            .map(|(index, record)| {
                T::deserialize(record).map_err(|source| EventStoreError::Record {
                    branch: branch.to_string(),
                    index,
                    source,
                })
            })
            .collect()
    }
}
