use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::env;

use crate::{
    entities::{Coordinates, RouteMetrics},
    error::{invalid_input_error, upstream_error, Error},
    external::Directions,
};

const DEFAULT_API_BASE: &str = "api.mapbox.com";

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Route {
    distance: f64,
    duration: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Response {
    code: String,
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Clone)]
pub struct MapboxDirections {
    client: reqwest::Client,
    api_base: String,
    access_token: String,
}

impl std::fmt::Debug for MapboxDirections {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapboxDirections")
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl MapboxDirections {
    pub fn new(api_base: String, access_token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base,
            access_token,
        }
    }

    pub fn from_env() -> Result<Self, Error> {
        let api_base = env::var("MAPBOX_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.into());
        let access_token = env::var("MAPBOX_ACCESS_TOKEN")?;

        Ok(Self::new(api_base, access_token))
    }

    fn url(&self, waypoints: &[Coordinates]) -> String {
        let path: Vec<String> = waypoints.iter().map(|&point| point.into()).collect();

        format!(
            "https://{}/directions/v5/mapbox/driving/{}",
            self.api_base,
            path.join(";")
        )
    }
}

#[async_trait]
impl Directions for MapboxDirections {
    #[tracing::instrument(skip(self))]
    async fn route(&self, waypoints: &[Coordinates]) -> Result<RouteMetrics, Error> {
        if waypoints.len() < 2 {
            return Err(invalid_input_error());
        }

        let res = self
            .client
            .get(self.url(waypoints))
            .query(&[("access_token", self.access_token.as_str())])
            .query(&[("overview", "false")])
            .send()
            .await?;

        let status_code = res.status().as_u16();

        if status_code >= 400 && status_code < 500 {
            tracing::warn!(status_code, "directions request rejected");
            return Err(invalid_input_error());
        } else if status_code != 200 {
            tracing::warn!(status_code, "directions service unavailable");
            return Err(upstream_error());
        }

        let data: Response = res.json().await?;

        metrics_of(data)
    }
}

fn metrics_of(data: Response) -> Result<RouteMetrics, Error> {
    if data.code != "Ok" {
        tracing::warn!(code = data.code.as_str(), "directions service returned no route");
        return Err(upstream_error());
    }

    let route = data.routes.into_iter().next().ok_or_else(|| upstream_error())?;

    Ok(RouteMetrics {
        distance: route.distance,
        duration: route.duration,
    })
}
