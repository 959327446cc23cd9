//! Map state mirrored by the page's Leaflet instance.
//!
//! The map itself is created once with the context. Markers are rebuilt from
//! scratch on every collection change and get fresh ids, so hover and click
//! events for a marker from an earlier render are rejected.

use anyhow::Context;
use viewer_msgs::{
    viewer_msg::{MapSnapshot, MarkerId, MarkerView, Viewport},
    LatLng, LatLngBounds, Vehicle, VehicleId,
};

use crate::config::MapConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub id: MarkerId,
    pub vehicle_id: VehicleId,
    pub position: LatLng,
    pub label: String,
}

pub fn marker_label(vehicle: &Vehicle) -> String {
    format!("{} {}\nPrice: {}", vehicle.name, vehicle.model, vehicle.price)
}

pub struct MapView {
    config: MapConfig,
    viewport: Viewport,
    markers: Vec<Marker>,
    next_marker_id: MarkerId,
    open_popup: Option<MarkerId>,
}

impl MapView {
    pub fn new(config: &MapConfig) -> MapView {
        MapView {
            config: config.clone(),
            viewport: Viewport::Center { center: config.default_center, zoom: config.default_zoom },
            markers: Vec::new(),
            next_marker_id: 1,
            open_popup: None,
        }
    }

    /// Tear down every marker, create one per vehicle, then fit the viewport
    /// around them. With no vehicles the viewport stays where it was.
    pub fn sync(&mut self, vehicles: &[Vehicle]) {
        self.markers.clear();
        self.open_popup = None;

        for vehicle in vehicles {
            let id = self.next_marker_id;
            self.next_marker_id += 1;
            self.markers.push(Marker {
                id,
                vehicle_id: vehicle.id,
                position: vehicle.position(),
                label: marker_label(vehicle),
            });
        }

        if let Some(bounds) = LatLngBounds::from_points(self.markers.iter().map(|marker| marker.position)) {
            self.viewport = Viewport::Bounds { bounds };
        }
    }

    fn marker(&self, id: MarkerId) -> anyhow::Result<&Marker> {
        self.markers.iter().find(|marker| marker.id == id).with_context(|| format!("could not find marker with id {id}"))
    }

    /// Returns whether the open popup changed.
    pub fn pointer_enter(&mut self, id: MarkerId) -> anyhow::Result<bool> {
        self.marker(id)?;
        let changed = self.open_popup != Some(id);
        self.open_popup = Some(id);
        Ok(changed)
    }

    /// Returns whether the open popup changed.
    pub fn pointer_leave(&mut self, id: MarkerId) -> anyhow::Result<bool> {
        self.marker(id)?;
        if self.open_popup != Some(id) {
            return Ok(false);
        }
        self.open_popup = None;
        Ok(true)
    }

    /// Center on the marker at the focus zoom.
    pub fn click(&mut self, id: MarkerId) -> anyhow::Result<()> {
        let center = self.marker(id)?.position;
        self.viewport = Viewport::Center { center, zoom: self.config.focus_zoom };
        Ok(())
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn open_popup(&self) -> Option<MarkerId> {
        self.open_popup
    }

    pub fn snapshot(&self) -> MapSnapshot {
        MapSnapshot {
            tile_url: self.config.tile_url.clone(),
            attribution: self.config.attribution.clone(),
            icon: self.config.icon.clone(),
            viewport: self.viewport(),
            markers: self
                .markers()
                .iter()
                .map(|marker| MarkerView {
                    id: marker.id,
                    vehicle_id: marker.vehicle_id,
                    position: marker.position,
                    label: marker.label.clone(),
                    popup_open: self.open_popup() == Some(marker.id),
                })
                .collect(),
        }
    }
}
