//! Pure operations on the vehicle collection.
//!
//! Every operation takes the current collection by reference and returns a
//! fresh one. The context swaps the result in as a whole, which is what
//! re-triggers map sync and address resolution.

use std::cmp::Ordering;

use anyhow::bail;
use viewer_msgs::{SortDirection, SortField, Vehicle, VehicleId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortState {
    pub field: Option<SortField>,
    pub direction: SortDirection,
}

impl SortState {
    /// Same field while ascending flips to descending, anything else starts ascending.
    pub fn toggle(&mut self, field: SortField) -> SortDirection {
        let direction = if self.field == Some(field) && self.direction == SortDirection::Ascending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        self.field = Some(field);
        self.direction = direction;
        direction
    }

    pub fn is_active(&self, field: SortField) -> bool {
        self.field == Some(field)
    }
}

pub fn sorted(vehicles: &[Vehicle], field: SortField, direction: SortDirection) -> Vec<Vehicle> {
    let mut sorted = vehicles.to_vec();
    sorted.sort_unstable_by(|a, b| {
        let ordering = compare(a, b, field);
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
    sorted
}

fn compare(a: &Vehicle, b: &Vehicle, field: SortField) -> Ordering {
    match field {
        SortField::Year => a.year.cmp(&b.year),
        SortField::Price => a.price.total_cmp(&b.price),
    }
}

/// `None` when no vehicle has that id.
pub fn without(vehicles: &[Vehicle], id: VehicleId) -> Option<Vec<Vehicle>> {
    if !vehicles.iter().any(|vehicle| vehicle.id == id) {
        return None;
    }
    Some(vehicles.iter().filter(|vehicle| vehicle.id != id).cloned().collect())
}

/// Swap in `record` at the position of the vehicle with the same id.
pub fn with_record(vehicles: &[Vehicle], record: &Vehicle) -> Vec<Vehicle> {
    vehicles
        .iter()
        .map(|vehicle| if vehicle.id == record.id { record.clone() } else { vehicle.clone() })
        .collect()
}

/// A single field change coming from an edit form. Values are raw input text.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum VehicleField {
    Name (String),
    Model (String),
    Year (String),
    Color (String),
    Price (String),
}

impl VehicleField {
    /// Numeric input that does not parse becomes zero.
    pub fn apply(self, vehicle: &mut Vehicle) {
        match self {
            VehicleField::Name(name) => vehicle.name = name,
            VehicleField::Model(model) => vehicle.model = model,
            VehicleField::Year(year) => vehicle.year = year.trim().parse().unwrap_or(0),
            VehicleField::Color(color) => vehicle.color = color,
            VehicleField::Price(price) => {
                vehicle.price = price.trim().parse::<f64>().ok().filter(|p| p.is_finite()).unwrap_or(0.0)
            }
        }
    }
}

/// Scratch copy of the one record being edited.
#[derive(Debug, Clone, Default)]
pub struct EditBuffer {
    scratch: Option<Vehicle>,
}

impl EditBuffer {
    /// Replaces any unsaved edit. Returns false if the id is not in the collection.
    pub fn begin(&mut self, vehicles: &[Vehicle], id: VehicleId) -> bool {
        let Some(vehicle) = vehicles.iter().find(|vehicle| vehicle.id == id) else { return false };
        self.scratch = Some(vehicle.clone());
        true
    }

    pub fn apply(&mut self, field: VehicleField) -> anyhow::Result<()> {
        let Some(scratch) = self.scratch.as_mut() else { bail!("no vehicle is being edited") };
        field.apply(scratch);
        Ok(())
    }

    /// Hands out the scratch record if it belongs to `id`, clearing the buffer.
    pub fn take(&mut self, id: VehicleId) -> Option<Vehicle> {
        if self.editing_id() != Some(id) {
            return None;
        }
        self.scratch.take()
    }

    pub fn discard(&mut self) {
        self.scratch = None;
    }

    pub fn editing_id(&self) -> Option<VehicleId> {
        self.scratch.as_ref().map(|vehicle| vehicle.id)
    }

    pub fn scratch(&self) -> Option<&Vehicle> {
        self.scratch.as_ref()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;

    pub(crate) fn vehicle(id: VehicleId, year: i32, price: f64) -> Vehicle {
        Vehicle {
            id,
            name: format!("Make {id}"),
            model: format!("Model {id}"),
            year,
            color: "black".to_string(),
            price,
            latitude: 55.0 + id as f64 / 100.0,
            longitude: 37.0 + id as f64 / 100.0,
        }
    }

    fn ids(vehicles: &[Vehicle]) -> Vec<VehicleId> {
        vehicles.iter().map(|vehicle| vehicle.id).collect()
    }

    fn collection() -> impl Strategy<Value = Vec<Vehicle>> {
        prop::collection::vec((1990..2025i32, 0.0..1_000_000.0f64), 0..24).prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (year, price))| vehicle(i as VehicleId + 1, year, price))
                .collect()
        })
    }

    fn is_ordered(vehicles: &[Vehicle], field: SortField, direction: SortDirection) -> bool {
        vehicles.windows(2).all(|pair| {
            let ordering = compare(&pair[0], &pair[1], field);
            match direction {
                SortDirection::Ascending => ordering != Ordering::Greater,
                SortDirection::Descending => ordering != Ordering::Less,
            }
        })
    }

    #[test]
    fn toggle_flips_only_on_same_ascending_field() {
        let mut state = SortState::default();
        assert_eq!(state.toggle(SortField::Price), SortDirection::Ascending);
        assert_eq!(state.toggle(SortField::Price), SortDirection::Descending);
        assert_eq!(state.toggle(SortField::Price), SortDirection::Ascending);
        assert_eq!(state.toggle(SortField::Year), SortDirection::Ascending);
        assert!(state.is_active(SortField::Year));
        assert!(!state.is_active(SortField::Price));
    }

    #[test]
    fn sort_leaves_input_untouched() {
        let input = vec![vehicle(1, 2010, 300.0), vehicle(2, 2020, 100.0), vehicle(3, 2000, 200.0)];
        let by_price = sorted(&input, SortField::Price, SortDirection::Ascending);
        assert_eq!(ids(&by_price), vec![2, 3, 1]);
        let by_year = sorted(&input, SortField::Year, SortDirection::Descending);
        assert_eq!(ids(&by_year), vec![2, 1, 3]);
        assert_eq!(ids(&input), vec![1, 2, 3]);
    }

    #[test]
    fn delete_missing_id_is_noop() {
        let input = vec![vehicle(1, 2010, 1.0)];
        assert_eq!(without(&input, 99), None);
    }

    #[test]
    fn numeric_fields_coerce_silently() {
        let mut v = vehicle(1, 2010, 10.0);
        VehicleField::Price("abc".into()).apply(&mut v);
        assert_eq!(v.price, 0.0);
        VehicleField::Price(" 1250.5 ".into()).apply(&mut v);
        assert_eq!(v.price, 1250.5);
        VehicleField::Year("soon".into()).apply(&mut v);
        assert_eq!(v.year, 0);
    }

    #[test]
    fn new_edit_discards_previous_scratch() {
        let vehicles = vec![vehicle(1, 2010, 1.0), vehicle(2, 2011, 2.0)];
        let mut buffer = EditBuffer::default();
        assert!(buffer.begin(&vehicles, 1));
        buffer.apply(VehicleField::Name("changed".into())).unwrap();
        assert!(buffer.begin(&vehicles, 2));
        assert_eq!(buffer.take(1), None);
        assert_eq!(buffer.take(2), Some(vehicles[1].clone()));
        assert_eq!(buffer.editing_id(), None);
    }

    #[test]
    fn edit_without_begin_fails() {
        let mut buffer = EditBuffer::default();
        assert!(buffer.apply(VehicleField::Color("red".into())).is_err());
        assert!(!buffer.begin(&[], 1));
    }

    proptest! {
        #[test]
        fn sorting_twice_reverses_and_keeps_records(vehicles in collection(), by_year in any::<bool>()) {
            let field = if by_year { SortField::Year } else { SortField::Price };
            let mut state = SortState::default();

            let first = sorted(&vehicles, field, state.toggle(field));
            prop_assert!(is_ordered(&first, field, SortDirection::Ascending));
            let second = sorted(&first, field, state.toggle(field));
            prop_assert!(is_ordered(&second, field, SortDirection::Descending));

            for result in [&first, &second] {
                prop_assert_eq!(result.len(), vehicles.len());
                let expected: HashSet<_> = ids(&vehicles).into_iter().collect();
                let got: HashSet<_> = ids(result).into_iter().collect();
                prop_assert_eq!(got, expected);
            }
        }

        #[test]
        fn delete_removes_exactly_one(vehicles in collection(), pick in any::<prop::sample::Index>()) {
            prop_assume!(!vehicles.is_empty());
            let target = vehicles[pick.index(vehicles.len())].id;
            let remaining = without(&vehicles, target).unwrap();
            prop_assert_eq!(remaining.len(), vehicles.len() - 1);
            prop_assert!(remaining.iter().all(|vehicle| vehicle.id != target));
        }

        #[test]
        fn edit_then_save_changes_only_edited_fields(
            vehicles in collection(),
            pick in any::<prop::sample::Index>(),
            name in "[a-zA-Z ]{0,12}",
            price in 0u32..100_000,
        ) {
            prop_assume!(!vehicles.is_empty());
            let original = vehicles[pick.index(vehicles.len())].clone();

            let mut buffer = EditBuffer::default();
            prop_assert!(buffer.begin(&vehicles, original.id));
            buffer.apply(VehicleField::Name(name.clone())).unwrap();
            buffer.apply(VehicleField::Price(price.to_string())).unwrap();
            let record = buffer.take(original.id).unwrap();
            let saved = with_record(&vehicles, &record);

            prop_assert_eq!(saved.len(), vehicles.len());
            let matching: Vec<_> = saved.iter().filter(|vehicle| vehicle.id == original.id).collect();
            prop_assert_eq!(matching.len(), 1);
            let edited = matching[0];
            prop_assert_eq!(&edited.name, &name);
            prop_assert_eq!(edited.price, price as f64);
            prop_assert_eq!(&edited.model, &original.model);
            prop_assert_eq!(edited.year, original.year);
            prop_assert_eq!(&edited.color, &original.color);
            prop_assert_eq!(edited.latitude, original.latitude);
            prop_assert_eq!(edited.longitude, original.longitude);
            prop_assert_eq!(buffer.editing_id(), None);
        }
    }
}
