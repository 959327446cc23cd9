use viewer_msgs::{
    viewer_msg::{AddressCell, ListRow, ListSnapshot, SortButton},
    AddressStatus, SortDirection, SortField, Vehicle, VehicleId,
};

use crate::{resolution::AddressBook, store::{EditBuffer, SortState}};

pub const ADDRESS_UNAVAILABLE: &str = "N/A";

/// List-side state that lives next to the collection but is not part of it.
#[derive(Debug, Default)]
pub struct ListView {
    pub sort: SortState,
    pub edit: EditBuffer,
    addresses: AddressBook,
}

impl ListView {
    /// Replaces the published addresses in one go.
    pub fn publish_addresses(&mut self, book: AddressBook) {
        self.addresses = book;
    }

    pub fn address_status(&self, id: VehicleId) -> Option<&AddressStatus> {
        self.addresses.get(&id)
    }

    pub fn address_cell(&self, id: VehicleId) -> AddressCell {
        match self.address_status(id) {
            None | Some(AddressStatus::Pending) => AddressCell::Loading,
            Some(AddressStatus::Resolved(address)) => AddressCell::Text(address.clone()),
            Some(AddressStatus::Unavailable) => AddressCell::Text(ADDRESS_UNAVAILABLE.to_string()),
        }
    }

    pub fn snapshot(&self, vehicles: &[Vehicle]) -> ListSnapshot {
        let sort_buttons = SortField::ALL
            .into_iter()
            .map(|field| {
                let active = self.sort.is_active(field);
                let ascending = active && self.sort.direction == SortDirection::Ascending;
                SortButton {
                    field,
                    label: field.label().to_string(),
                    active,
                    arrow: if ascending { "▲" } else { "▼" }.to_string(),
                }
            })
            .collect();

        let rows = vehicles
            .iter()
            .map(|vehicle| ListRow {
                vehicle: vehicle.clone(),
                editing: self.edit.scratch().filter(|scratch| scratch.id == vehicle.id).cloned(),
                address: self.address_cell(vehicle.id),
            })
            .collect();

        ListSnapshot { sort_buttons, rows }
    }
}
