use std::path::{Path, PathBuf};

use accessable_shared::models::{self, CatalogLocation, LocationType, SignalCandidate};

pub const LOCATIONS_FILE: &str = "locations.json";
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// The accessibility location catalog served to the map.
pub struct Catalog {
    locations: Vec<CatalogLocation>,
    signals: Vec<SignalCandidate>,
}

impl Catalog {
    pub fn load(assets_dir: &Path) -> Result<Self, CatalogError> {
        let path = assets_dir.join(LOCATIONS_FILE);
        let data = std::fs::read_to_string(&path).map_err(|source| CatalogError::Read {
            path: path.clone(),
            source,
        })?;
        let locations: Vec<CatalogLocation> =
            serde_json::from_str(&data).map_err(|source| CatalogError::Parse {
                path: path.clone(),
                source,
            })?;

        let catalog = Catalog::new(locations);
        tracing::info!(
            locations = catalog.locations.len(),
            signals = catalog.signals.len(),
            "Loaded location catalog"
        );
        Ok(catalog)
    }

    pub fn new(locations: Vec<CatalogLocation>) -> Self {
        let signals = models::signal_candidates(&locations);
        Catalog { locations, signals }
    }

    pub fn locations(&self, location_type: Option<LocationType>) -> Vec<&CatalogLocation> {
        self.locations
            .iter()
            .filter(|l| location_type.is_none_or(|t| l.location_type == t))
            .collect()
    }

    /// Case-insensitive substring match on the name, in catalog order.
    pub fn search(&self, term: &str, limit: usize) -> Vec<&CatalogLocation> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.locations
            .iter()
            .filter(|l| l.name.to_lowercase().contains(&needle))
            .take(limit)
            .collect()
    }

    /// Pedestrian signals with coordinates, ready for the waypoint composer.
    pub fn signals(&self) -> &[SignalCandidate] {
        &self.signals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {"id": "pg-1", "Name": "Hudson River Park Playground", "location_type": "playground", "lat": 40.7285, "lon": -74.0110, "borough": "Manhattan", "Accessible": "Y"},
        {"id": "ps-1", "name": "W 4 St & 6 Av", "location_type": "pedestrian_signal", "latitude": 40.7323, "longitude": -74.0003},
        {"id": "ps-2", "name": "Houston St & Varick St", "location_type": "pedestrian_signal"},
        {"id": "bc-1", "name": "Coney Island Beach", "location_type": "beach", "latitude": 40.5724, "longitude": -73.9790},
        {"id": "xx-1", "name": "Ferry Landing", "location_type": "ferry", "latitude": 40.7013, "longitude": -74.0132}
    ]"#;

    fn sample_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(LOCATIONS_FILE), SAMPLE).unwrap();
        dir
    }

    #[test]
    fn test_load_accepts_field_aliases() {
        let dir = sample_dir();
        let catalog = Catalog::load(dir.path()).unwrap();
        let all = catalog.locations(None);
        assert_eq!(all.len(), 5);
        assert_eq!(all[0].name, "Hudson River Park Playground");
        assert_eq!(all[0].latitude, Some(40.7285));
        assert_eq!(all[0].accessible.as_deref(), Some("Y"));
        assert_eq!(all[4].location_type, LocationType::Other);
    }

    #[test]
    fn test_signals_skip_records_without_coordinates() {
        let dir = sample_dir();
        let catalog = Catalog::load(dir.path()).unwrap();
        assert_eq!(catalog.signals().len(), 1);
        assert_eq!(catalog.signals()[0].id.0, "ps-1");
    }

    #[test]
    fn test_filter_by_type() {
        let dir = sample_dir();
        let catalog = Catalog::load(dir.path()).unwrap();
        let signals = catalog.locations(Some(LocationType::PedestrianSignal));
        assert_eq!(signals.len(), 2);
        assert!(catalog.locations(Some(LocationType::Restroom)).is_empty());
    }

    #[test]
    fn test_search() {
        let dir = sample_dir();
        let catalog = Catalog::load(dir.path()).unwrap();
        let hits = catalog.search("  st ", 10);
        assert_eq!(hits.len(), 2);
        assert_eq!(catalog.search("ST", 1).len(), 1);
        assert_eq!(catalog.search("coney", 10)[0].id, "bc-1");
        assert!(catalog.search("", 10).is_empty());
        assert!(catalog.search("   ", 10).is_empty());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Catalog::load(dir.path()),
            Err(CatalogError::Read { .. })
        ));
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(LOCATIONS_FILE), "{not json").unwrap();
        assert!(matches!(
            Catalog::load(dir.path()),
            Err(CatalogError::Parse { .. })
        ));
    }
}
