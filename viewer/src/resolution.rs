//! Sequential address resolution over one vehicle collection.
//!
//! A pass looks vehicles up one at a time in collection order and hands back
//! the whole address book at the end. Each pass is bound to the collection
//! generation it was started for; replacing the collection cancels it, and a
//! cancelled pass publishes nothing.

use std::{collections::HashMap, sync::Arc};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use viewer_msgs::{AddressStatus, Vehicle, VehicleId};

use crate::{context::ViewerContextRef, geocoding::{resolve, Geocoder}};

pub type AddressBook = HashMap<VehicleId, AddressStatus>;

pub struct ResolutionPass {
    pub generation: usize,
    pub vehicles: Arc<[Vehicle]>,
    pub geocoder: Arc<dyn Geocoder>,
    pub cancel: CancellationToken,
}

/// Returns `None` if cancelled before every vehicle was looked up.
pub async fn run_pass(geocoder: &dyn Geocoder, vehicles: &[Vehicle], cancel: &CancellationToken) -> Option<AddressBook> {
    let mut book = AddressBook::with_capacity(vehicles.len());
    for vehicle in vehicles {
        book.insert(vehicle.id, AddressStatus::Pending);
        let address = tokio::select! {
            biased;
            _ = cancel.cancelled() => return None,
            address = resolve(geocoder, vehicle.latitude, vehicle.longitude) => address,
        };
        book.insert(vehicle.id, AddressStatus::from_lookup(address));
    }
    Some(book)
}

pub fn spawn_resolution_pass(pass: ResolutionPass, context_ref: ViewerContextRef) -> JoinHandle<()> {
    tokio::spawn(async move {
        let ResolutionPass { generation, vehicles, geocoder, cancel } = pass;
        let Some(book) = run_pass(geocoder.as_ref(), &vehicles, &cancel).await else {
            debug!("resolution pass for generation {generation} superseded");
            return;
        };
        context_ref.write().await.publish_addresses(generation, book);
    })
}
