//! Shared application state
//!
//! The dataset is loaded once at startup and shared read-only; the
//! filter set is the only mutable resource and is serialized behind one
//! lock (one checkbox change at a time, matching the UI model).

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use parcel_browser::FilterSet;
use parcel_types::ParcelRecord;

#[derive(Clone)]
pub struct AppState {
    pub parcels: Arc<Vec<ParcelRecord>>,
    filters: Arc<RwLock<FilterSet>>,
}

impl AppState {
    pub fn new(parcels: Vec<ParcelRecord>, filters: FilterSet) -> Self {
        Self {
            parcels: Arc::new(parcels),
            filters: Arc::new(RwLock::new(filters)),
        }
    }

    /// Read access to the filter set. Poisoned locks are recovered,
    /// not propagated.
    pub fn filters(&self) -> RwLockReadGuard<'_, FilterSet> {
        self.filters.read().unwrap_or_else(|e| e.into_inner())
    }

    pub fn filters_mut(&self) -> RwLockWriteGuard<'_, FilterSet> {
        self.filters.write().unwrap_or_else(|e| e.into_inner())
    }
}
