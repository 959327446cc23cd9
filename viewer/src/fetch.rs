use anyhow::Context;
use tracing::{error, info};
use viewer_msgs::Vehicle;

use crate::context::{set_vehicles, ViewerContextRef};

pub async fn fetch_vehicles(client: &reqwest::Client, url: &str) -> anyhow::Result<Vec<Vehicle>> {
    let response = client
        .get(url)
        .send()
        .await
        .context("failed to fetch vehicles")?
        .error_for_status()
        .context("failed to fetch vehicles")?;
    let vehicles = response.json::<Vec<Vehicle>>().await.context("malformed vehicles response")?;
    Ok(vehicles)
}

/// Initial load. On failure the current collection is left as it is.
pub async fn load_vehicles(context_ref: &ViewerContextRef, client: &reqwest::Client, url: &str) -> bool {
    match fetch_vehicles(client, url).await {
        Ok(vehicles) => {
            info!("fetched {} vehicles", vehicles.len());
            set_vehicles(context_ref, vehicles).await;
            true
        }
        Err(e) => {
            error!("error fetching vehicles: {e:#}");
            false
        }
    }
}
