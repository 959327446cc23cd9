use std::{
    collections::HashMap,
    net::TcpListener,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
    time::Duration,
};

use anyhow::bail;
use async_trait::async_trait;
use viewer_msgs::Vehicle;
use warp::{filters::BoxedFilter, Reply};

use crate::geocoding::{AddressParts, Geocoder};

/// Serves `filter` on an ephemeral local port and returns its base url.
pub fn serve<R: Reply + 'static>(filter: BoxedFilter<(R,)>) -> String {
    let (addr, server) = warp::serve(filter).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    format!("http://{addr}")
}

/// A url nothing listens on.
pub fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// In-memory geocoder keyed by coordinates. Unknown coordinates fail.
#[derive(Default)]
pub struct FakeGeocoder {
    cities: HashMap<(u64, u64), String>,
    delay: Option<Duration>,
    delays: HashMap<(u64, u64), Duration>,
    calls: Mutex<Vec<(f64, f64)>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

fn key(latitude: f64, longitude: f64) -> (u64, u64) {
    (latitude.to_bits(), longitude.to_bits())
}

impl FakeGeocoder {
    pub fn new() -> FakeGeocoder {
        FakeGeocoder::default()
    }

    pub fn with_city(mut self, vehicle: &Vehicle, city: &str) -> FakeGeocoder {
        self.cities.insert(key(vehicle.latitude, vehicle.longitude), city.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> FakeGeocoder {
        self.delay = Some(delay);
        self
    }

    /// Delay lookups at `vehicle`'s coordinates, overriding `with_delay`.
    pub fn with_delay_at(mut self, vehicle: &Vehicle, delay: Duration) -> FakeGeocoder {
        self.delays.insert(key(vehicle.latitude, vehicle.longitude), delay);
        self
    }

    pub fn calls(&self) -> Vec<(f64, f64)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn reverse(&self, latitude: f64, longitude: f64) -> anyhow::Result<AddressParts> {
        self.calls.lock().unwrap().push((latitude, longitude));
        let in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(in_flight, Ordering::SeqCst);
        if let Some(delay) = self.delays.get(&key(latitude, longitude)).copied().or(self.delay) {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        let Some(city) = self.cities.get(&key(latitude, longitude)) else { bail!("no address at ({latitude}, {longitude})") };
        Ok(AddressParts { city: Some(city.clone()), ..AddressParts::default() })
    }
}
