// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Read-only edge storage port plus the in-memory / CSV-backed implementation.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::{NodeId, TemporalEdge, TimeDomain, TimeSemantics, Timestep};

/// Errors raised while loading an edge dataset.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The dataset file could not be opened.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// A row was malformed (missing column, non-integer time, ...).
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    /// A row declared an end time before its start time.
    #[error("row {row}: time_end {end} precedes time_start {start}")]
    InvertedWindow {
        /// 1-based data row index (header excluded).
        row: usize,
        /// Declared start.
        start: Timestep,
        /// Declared end.
        end: Timestep,
    },
}

/// Read-only access to the full, already-loaded temporal edge list.
///
/// The engine only ever scans; implementations must not change their contents
/// after construction.
pub trait EdgeStore {
    /// All edges in dataset order.
    fn edges(&self) -> &[TemporalEdge];

    /// Edges active at `t` under `semantics`.
    fn active_at(
        &self,
        t: Timestep,
        semantics: TimeSemantics,
    ) -> impl Iterator<Item = &TemporalEdge> {
        self.edges()
            .iter()
            .filter(move |e| e.is_active(t, semantics))
    }

    /// `[min(time_start), max(time_end)]` over the dataset, `None` when empty.
    fn time_domain(&self) -> Option<TimeDomain> {
        let edges = self.edges();
        let min = edges.iter().map(|e| e.time_start).min()?;
        let max = edges.iter().map(TemporalEdge::effective_end).max()?;
        Some(TimeDomain::new(min, max))
    }
}

/// Vec-backed edge store.
#[derive(Debug, Clone, Default)]
pub struct MemoryEdgeStore {
    edges: Vec<TemporalEdge>,
}

#[derive(Deserialize)]
struct CsvRow {
    #[serde(rename = "Source")]
    source: String,
    #[serde(rename = "Target")]
    target: String,
    time_start: Timestep,
    #[serde(default)]
    time_end: Option<Timestep>,
}

impl MemoryEdgeStore {
    /// Wrap an already-built edge list.
    pub fn new(edges: Vec<TemporalEdge>) -> Self {
        Self { edges }
    }

    /// Number of stored edges.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether the store holds no edges.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Load a `Source,Target,time_start[,time_end]` CSV file.
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let file = File::open(path)?;
        Self::from_csv_reader(file)
    }

    /// Load CSV rows from any reader. Extra columns are ignored.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, StoreError> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut edges = Vec::new();
        for (idx, row) in rdr.deserialize::<CsvRow>().enumerate() {
            let row = row?;
            if let Some(end) = row.time_end {
                if end < row.time_start {
                    return Err(StoreError::InvertedWindow {
                        row: idx + 1,
                        start: row.time_start,
                        end,
                    });
                }
            }
            edges.push(TemporalEdge {
                source: NodeId(row.source),
                target: NodeId(row.target),
                time_start: row.time_start,
                time_end: row.time_end,
            });
        }
        Ok(Self { edges })
    }
}

impl EdgeStore for MemoryEdgeStore {
    fn edges(&self) -> &[TemporalEdge] {
        &self.edges
    }
}

impl FromIterator<TemporalEdge> for MemoryEdgeStore {
    fn from_iter<I: IntoIterator<Item = TemporalEdge>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
