pub type VehicleId = i64;

/// One listed vehicle, in the shape the vehicles endpoint returns it.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Vehicle {
    pub id: VehicleId,
    pub name: String,
    pub model: String,
    pub year: i32,
    pub color: String,
    pub price: f64,
    pub latitude: f64,
    pub longitude: f64,
}

impl Vehicle {
    pub fn position(&self) -> crate::LatLng {
        crate::LatLng::new(self.latitude, self.longitude)
    }
}
