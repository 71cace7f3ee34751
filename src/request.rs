use reqwest::blocking::{Client, Response};
use serde_json::Value;
use tracing::debug;

use std::fmt::Display;

pub const DEFAULT_BASE_URL: &str = "https://qa-internship.avito.com/api/1";

/// One request per call, no retries. Non-success statuses are handed back untouched;
/// only transport errors end up in the `Err` arm.
pub struct ListingClient {
    client: Client,
    base_url: String,
}

impl ListingClient {
    pub fn new(base_url: &str) -> Self {
        ListingClient {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn create_item(&self, payload: &Value) -> Result<Response, Box<dyn std::error::Error>> {
        let url = item_url(&self.base_url);
        debug!("Posting {} {}", url, payload);
        Ok(self.client.post(&url).json(payload).send()?)
    }

    pub fn get_item(&self, item_id: impl Display) -> Result<Response, Box<dyn std::error::Error>> {
        self.get(item_by_id_url(&self.base_url, item_id))
    }

    pub fn get_statistic(
        &self,
        item_id: impl Display,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        self.get(statistic_url(&self.base_url, item_id))
    }

    pub fn get_items_by_seller(
        &self,
        seller_id: impl Display,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        self.get(seller_items_url(&self.base_url, seller_id))
    }

    fn get(&self, url: String) -> Result<Response, Box<dyn std::error::Error>> {
        debug!("Fetching {}", url);
        Ok(self.client.get(&url).send()?)
    }
}

pub fn item_url(base_url: &str) -> String {
    format!("{}/item", base_url)
}

pub fn item_by_id_url(base_url: &str, item_id: impl Display) -> String {
    format!("{}/item/{}", base_url, item_id)
}

pub fn statistic_url(base_url: &str, item_id: impl Display) -> String {
    format!("{}/statistic/{}", base_url, item_id)
}

pub fn seller_items_url(base_url: &str, seller_id: impl Display) -> String {
    format!("{}/{}/item", base_url, seller_id)
}
