use std::time::Duration;

use viewer_msgs::{viewer_msg::MarkerIcon, LatLng};

pub const PORT: u16 = 9080;
pub const VEHICLES_URL: &str = "https://test.tspb.su/test-task/vehicles";
pub const GEOCODER_URL: &str = "https://nominatim.openstreetmap.org/reverse";
pub const USER_AGENT: &str = concat!("vehicle-viewer/", env!("CARGO_PKG_VERSION"));
pub const TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const TILE_ATTRIBUTION: &str = "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub port: u16,
    pub vehicles_url: String,
    pub geocoder_url: String,
    pub user_agent: String,
    /// How often pending view changes are pushed to connected pages
    pub publish_interval: Duration,
    pub map: MapConfig,
}

#[derive(Debug, Clone)]
pub struct MapConfig {
    pub default_center: LatLng,
    pub default_zoom: u8,
    /// Zoom used when a marker is clicked
    pub focus_zoom: u8,
    pub tile_url: String,
    pub attribution: String,
    pub icon: MarkerIcon,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            port: PORT,
            vehicles_url: VEHICLES_URL.to_string(),
            geocoder_url: GEOCODER_URL.to_string(),
            user_agent: USER_AGENT.to_string(),
            publish_interval: Duration::from_millis(100),
            map: MapConfig::default(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            default_center: LatLng::new(55.751244, 37.618423),
            default_zoom: 10,
            focus_zoom: 15,
            tile_url: TILE_URL.to_string(),
            attribution: TILE_ATTRIBUTION.to_string(),
            icon: MarkerIcon {
                class_name: "custom-marker".to_string(),
                size: [20, 20],
                anchor: [20, 20],
                popup_anchor: [-10, -20],
            },
        }
    }
}
