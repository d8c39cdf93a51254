//! In-memory territory provider.

use tracing::warn;

use super::types::{
    boundary_envelope, DataSourceError, TerritoryDataProvider, TerritoryRecord, TerritorySet,
};
use crate::coord::GeoEnvelope;
use crate::geometry;

#[derive(Debug, Clone)]
struct Entry {
    region: Option<String>,
    record: TerritoryRecord,
    envelope: Option<GeoEnvelope>,
}

/// Territories held in memory, each tagged with an optional region.
///
/// Envelopes are computed once when a record is added. Records whose
/// boundary cannot be decoded are still returned but do not contribute to
/// the bounding box.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTerritoryProvider {
    entries: Vec<Entry>,
}

impl InMemoryTerritoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record under `region`.
    pub fn add(&mut self, region: Option<&str>, record: TerritoryRecord) {
        let envelope = match geometry::read_boundary(&record.boundary_wkb) {
            Ok(boundary) => boundary_envelope(&boundary),
            Err(e) => {
                warn!(name = %record.name, error = %e, "Territory boundary not decodable");
                None
            }
        };

        self.entries.push(Entry {
            region: region.map(str::to_string),
            record,
            envelope,
        });
    }

    /// Builder-style [`add`](Self::add).
    pub fn with(mut self, region: Option<&str>, record: TerritoryRecord) -> Self {
        self.add(region, record);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TerritoryDataProvider for InMemoryTerritoryProvider {
    fn fetch(&self, region: Option<&str>) -> Result<TerritorySet, DataSourceError> {
        let mut set = TerritorySet::default();

        let matching = self
            .entries
            .iter()
            .filter(|e| region.is_none() || e.region.as_deref() == region);

        for entry in matching {
            if let Some(env) = entry.envelope {
                set.bbox = Some(match set.bbox {
                    Some(bbox) => bbox.union(&env),
                    None => env,
                });
            }
            set.records.push(entry.record.clone());
        }

        Ok(set)
    }

    fn name(&self) -> &str {
        "memory"
    }
}
