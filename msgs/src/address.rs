/// Outcome of reverse geocoding one vehicle. A vehicle with no entry at all
/// has not been looked up yet.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AddressStatus {
    Pending,
    Resolved (String),
    Unavailable,
}

impl AddressStatus {
    /// The resolver reports failure as an empty address.
    pub fn from_lookup(address: String) -> AddressStatus {
        if address.is_empty() {
            AddressStatus::Unavailable
        } else {
            AddressStatus::Resolved(address)
        }
    }
}
