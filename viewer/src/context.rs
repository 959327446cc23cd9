use std::{collections::HashMap, sync::Arc};

use tokio::sync::{mpsc, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};
use viewer_msgs::{SortField, Vehicle, VehicleId, ViewerMsg};
use warp::filters::ws::Message;

use crate::{
    config::MapConfig,
    geocoding::Geocoder,
    list_view::ListView,
    map_view::MapView,
    resolution::{spawn_resolution_pass, AddressBook, ResolutionPass},
    store::{self, VehicleField},
};

pub type FrontendSender = mpsc::UnboundedSender<std::result::Result<Message, warp::Error>>;

/// Single owner of the vehicle collection and everything derived from it.
pub struct ViewerContext {
    vehicles: Arc<[Vehicle]>,
    /// Bumped on every collection replacement
    pub collection_generation: usize,
    pub list: ListView,
    pub map: MapView,
    pub geocoder: Arc<dyn Geocoder>,
    resolution_cancel: CancellationToken,
    pub to_frontend_senders: HashMap<String, FrontendSender>,
    /// Bumped on every change the pages should see
    pub view_generation: usize,
}

pub type ViewerContextRef = Arc<RwLock<ViewerContext>>;

impl ViewerContext {
    pub fn new(map_config: &MapConfig, geocoder: Arc<dyn Geocoder>) -> ViewerContext {
        ViewerContext {
            vehicles: Arc::from(Vec::<Vehicle>::new()),
            collection_generation: 0,
            list: ListView::default(),
            map: MapView::new(map_config),
            geocoder,
            resolution_cancel: CancellationToken::new(),
            to_frontend_senders: HashMap::new(),
            view_generation: 0,
        }
    }

    pub fn vehicles(&self) -> &Arc<[Vehicle]> {
        &self.vehicles
    }

    /// Swap in a new collection, rebuild the map and hand back the resolution
    /// pass for it. Any pass still running for the old collection is cancelled.
    pub fn replace_vehicles(&mut self, vehicles: Vec<Vehicle>) -> ResolutionPass {
        self.vehicles = Arc::from(vehicles);
        self.collection_generation += 1;
        self.map.sync(&self.vehicles);

        self.resolution_cancel.cancel();
        self.resolution_cancel = CancellationToken::new();
        self.view_generation += 1;

        ResolutionPass {
            generation: self.collection_generation,
            vehicles: self.vehicles.clone(),
            geocoder: self.geocoder.clone(),
            cancel: self.resolution_cancel.clone(),
        }
    }

    pub fn sort(&mut self, field: SortField) -> ResolutionPass {
        let direction = self.list.sort.toggle(field);
        let sorted = store::sorted(&self.vehicles, field, direction);
        self.replace_vehicles(sorted)
    }

    pub fn begin_edit(&mut self, id: VehicleId) -> bool {
        let started = self.list.edit.begin(&self.vehicles, id);
        if started {
            self.view_generation += 1;
        }
        started
    }

    pub fn edit_field(&mut self, field: VehicleField) -> anyhow::Result<()> {
        self.list.edit.apply(field)?;
        self.view_generation += 1;
        Ok(())
    }

    /// `None` if `id` is not the vehicle being edited.
    pub fn save(&mut self, id: VehicleId) -> Option<ResolutionPass> {
        let record = self.list.edit.take(id)?;
        let saved = store::with_record(&self.vehicles, &record);
        Some(self.replace_vehicles(saved))
    }

    /// `None` if no vehicle has that id.
    pub fn delete(&mut self, id: VehicleId) -> Option<ResolutionPass> {
        let remaining = store::without(&self.vehicles, id)?;
        if self.list.edit.editing_id() == Some(id) {
            self.list.edit.discard();
        }
        Some(self.replace_vehicles(remaining))
    }

    /// Publishes a finished pass unless the collection moved on meanwhile.
    pub fn publish_addresses(&mut self, generation: usize, book: AddressBook) -> bool {
        if generation != self.collection_generation {
            debug!("dropping addresses for stale generation {generation}");
            return false;
        }
        self.list.publish_addresses(book);
        self.view_generation += 1;
        true
    }

    pub fn snapshot(&self) -> ViewerMsg {
        ViewerMsg::Snapshot {
            list: self.list.snapshot(self.vehicles()),
            map: self.map.snapshot(),
        }
    }

    pub fn update_clients(&self) {
        let json = match serde_json::to_string(&self.snapshot()) {
            Ok(json) => json,
            Err(e) => {
                error!("error serializing snapshot: {e}");
                return;
            }
        };

        for (id, to_frontend_sender) in self.to_frontend_senders.iter() {
            if to_frontend_sender.send(Ok(Message::text(json.clone()))).is_err() {
                debug!("frontend {id} is gone, skipping snapshot");
            }
        }
    }
}

/// Replace the collection and start resolving its addresses.
pub async fn set_vehicles(context_ref: &ViewerContextRef, vehicles: Vec<Vehicle>) {
    let pass = context_ref.write().await.replace_vehicles(vehicles);
    spawn_resolution_pass(pass, context_ref.clone());
}
