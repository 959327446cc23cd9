use serde::{Deserialize, Serialize};

use crate::{LatLng, LatLngBounds, SortField, Vehicle, VehicleId};

/// Messages sent from the viewer backend to the page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ViewerMsg {
    /// Everything the page needs to redraw the list and the map
    #[serde(rename = "snapshot")]
    Snapshot {
        list: ListSnapshot,
        map: MapSnapshot,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListSnapshot {
    pub sort_buttons: Vec<SortButton>,
    pub rows: Vec<ListRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortButton {
    pub field: SortField,
    pub label: String,
    pub active: bool,
    /// Up while this field sorts ascending, down otherwise
    pub arrow: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListRow {
    pub vehicle: Vehicle,
    /// Scratch copy while this row is being edited
    pub editing: Option<Vehicle>,
    pub address: AddressCell,
}

/// What the address line of a row shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "text")]
pub enum AddressCell {
    Loading,
    Text (String),
}

pub type MarkerId = u64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapSnapshot {
    pub tile_url: String,
    pub attribution: String,
    pub icon: MarkerIcon,
    pub viewport: Viewport,
    pub markers: Vec<MarkerView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerView {
    pub id: MarkerId,
    pub vehicle_id: VehicleId,
    pub position: LatLng,
    pub label: String,
    pub popup_open: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerIcon {
    pub class_name: String,
    pub size: [u32; 2],
    pub anchor: [i32; 2],
    pub popup_anchor: [i32; 2],
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Viewport {
    #[serde(rename = "center")]
    Center { center: LatLng, zoom: u8 },
    #[serde(rename = "bounds")]
    Bounds { bounds: LatLngBounds },
}
