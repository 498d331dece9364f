use std::time::Duration;

use async_trait::async_trait;
use base64::{Engine, prelude::BASE64_STANDARD};
use chrono::{DateTime, FixedOffset, SecondsFormat};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{
    api::MeasurementSource,
    core::{
        calendar::{Month, QueryWindow, query_window},
        measurement::{ConsumptionUnit, Measurement},
    },
    prelude::*,
    quantity::{cost::Kroner, energy::KilowattHours, rate::KronerPerKilowattHour},
};

pub struct Api {
    client: Client,
    access_key: String,
}

impl Api {
    const URL: &'static str = "https://api.tibber.com/v1-beta/gql";

    pub fn try_new(access_key: String) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self { client, access_key })
    }

    #[instrument(skip_all)]
    async fn call(&self, request: &Request) -> Result<Data> {
        let response = self
            .client
            .post(Self::URL)
            .bearer_auth(&self.access_key)
            .json(request)
            .send()
            .await?
            .error_for_status()?
            .json::<Response>()
            .await?;
        if let Some(error) = response.errors.into_iter().flatten().next() {
            bail!("Tibber returned an error: {}", error.message);
        }
        response.data.context("Tibber returned no data")
    }
}

#[async_trait]
impl MeasurementSource for Api {
    #[instrument(skip_all, fields(month = %month, year = year))]
    async fn get_measurements(&self, month: Month, year: i32) -> Result<Vec<Measurement>> {
        let window = query_window(month, year);
        info!(after = %window.after, n_hours = window.n_hours(), "fetching…");
        let data = self.call(&Request::consumption(window)).await?;
        let Some(home) = data.viewer.homes.into_iter().next() else {
            warn!("no homes found");
            return Ok(Vec::new());
        };
        let n_nodes = home.consumption.nodes.len();
        let measurements: Vec<_> =
            home.consumption.nodes.into_iter().filter_map(Node::into_measurement).collect();
        if measurements.len() != n_nodes {
            debug!(n_dropped = n_nodes - measurements.len(), "dropped incomplete hours");
        }
        info!(n_measurements = measurements.len(), "fetched");
        Ok(measurements)
    }
}

#[derive(Serialize)]
struct Request {
    query: String,
}

impl Request {
    fn consumption(window: QueryWindow) -> Self {
        let after = BASE64_STANDARD
            .encode(window.after.to_utc().to_rfc3339_opts(SecondsFormat::Millis, true));
        Self {
            query: format!(
                "{{ viewer {{ homes {{ consumption(resolution: HOURLY, first: {}, after: \"{after}\") {{ nodes {{ from to cost unitPrice unitPriceVAT consumption consumptionUnit }} }} }} }} }}",
                window.n_hours(),
            ),
        }
    }
}

#[derive(Deserialize)]
struct Response {
    data: Option<Data>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
struct Data {
    viewer: Viewer,
}

#[derive(Deserialize)]
struct Viewer {
    homes: Vec<Home>,
}

#[derive(Deserialize)]
struct Home {
    consumption: Consumption,
}

#[derive(Deserialize)]
struct Consumption {
    nodes: Vec<Node>,
}

/// Tibber leaves the fields empty for the hours it has not billed yet.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Node {
    from: DateTime<FixedOffset>,
    to: DateTime<FixedOffset>,
    cost: Option<f64>,
    unit_price: Option<f64>,

    #[serde(rename = "unitPriceVAT")]
    unit_price_vat: Option<f64>,

    consumption: Option<f64>,
    consumption_unit: Option<ConsumptionUnit>,
}

impl Node {
    fn into_measurement(self) -> Option<Measurement> {
        Some(Measurement {
            from: self.from,
            to: self.to,
            consumption: KilowattHours::from(self.consumption?),
            cost: Kroner::from(self.cost?),
            unit_price: KronerPerKilowattHour::from(self.unit_price?),
            unit_price_vat: KronerPerKilowattHour::from(self.unit_price_vat?),
            consumption_unit: self.consumption_unit.unwrap_or_default(),
        })
    }
}
