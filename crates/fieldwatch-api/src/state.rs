//! Shared application state.
//!
//! [`AppState`] holds one [`RecordService`] per record kind. Handlers are
//! written once over [`Resource`], which selects the service for a kind.

use fieldwatch_core::{RecordService, RecordStores};
use fieldwatch_types::{AnimalObservation, HumanActivityObservation, PhotoConsent, PlantObservation};

/// Services shared by every request handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Plant observations.
    pub plants: RecordService<PlantObservation>,
    /// Animal observations.
    pub animals: RecordService<AnimalObservation>,
    /// Human activity observations.
    pub activities: RecordService<HumanActivityObservation>,
    /// Photo consent records.
    pub consents: RecordService<PhotoConsent>,
}

impl AppState {
    /// Build services over the given stores.
    pub fn new(stores: RecordStores) -> Self {
        Self {
            plants: RecordService::new(stores.plants),
            animals: RecordService::new(stores.animals),
            activities: RecordService::new(stores.activities),
            consents: RecordService::new(stores.consents),
        }
    }

    /// State backed by in-memory stores.
    pub fn in_memory() -> Self {
        Self::new(RecordStores::in_memory())
    }
}

/// A record kind served over HTTP.
pub trait Resource: fieldwatch_core::Record {
    /// The service for this kind.
    fn service(state: &AppState) -> &RecordService<Self>;
}

impl Resource for PlantObservation {
    fn service(state: &AppState) -> &RecordService<Self> {
        &state.plants
    }
}

impl Resource for AnimalObservation {
    fn service(state: &AppState) -> &RecordService<Self> {
        &state.animals
    }
}

impl Resource for HumanActivityObservation {
    fn service(state: &AppState) -> &RecordService<Self> {
        &state.activities
    }
}

impl Resource for PhotoConsent {
    fn service(state: &AppState) -> &RecordService<Self> {
        &state.consents
    }
}
