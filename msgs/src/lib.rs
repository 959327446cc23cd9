pub mod address;
pub mod geo;
pub mod sort;
pub mod vehicle;
pub mod viewer_msg;

pub use address::AddressStatus;
pub use geo::{LatLng, LatLngBounds};
pub use sort::{SortDirection, SortField};
pub use vehicle::{Vehicle, VehicleId};
pub use viewer_msg::ViewerMsg;
