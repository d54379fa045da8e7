use reqwest::Method;

use crate::error::ApiError;

use super::client::XanoClient;
use super::records::XanoCity;

impl XanoClient {
    pub async fn get_cities(&self, state: Option<&str>) -> Result<Vec<XanoCity>, ApiError> {
        let endpoint = match state.map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => format!("/cities?state={}", urlencoding::encode(s)),
            None => "/cities".to_string(),
        };
        self.request(Method::GET, &endpoint, None).await
    }

    pub async fn create_city(&self, city: &XanoCity) -> Result<XanoCity, ApiError> {
        let body = serde_json::to_value(city).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.request(Method::POST, "/cities", Some(&body)).await
    }
}
