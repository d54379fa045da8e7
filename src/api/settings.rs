use reqwest::Method;
use serde_json::json;

use crate::error::ApiError;

use super::client::XanoClient;
use super::records::XanoSetting;

pub const DEFAULT_SETTING_CATEGORY: &str = "general";

impl XanoClient {
    pub async fn get_settings(&self) -> Result<Vec<XanoSetting>, ApiError> {
        self.request(Method::GET, "/settings", None).await
    }

    pub async fn get_setting(&self, key: &str) -> Result<XanoSetting, ApiError> {
        self.request(Method::GET, &format!("/settings/{}", urlencoding::encode(key)), None)
            .await
    }

    pub async fn update_setting(
        &self,
        key: &str,
        value: &str,
        category: Option<&str>,
    ) -> Result<XanoSetting, ApiError> {
        let body = json!({
            "value": value,
            "category": category.unwrap_or(DEFAULT_SETTING_CATEGORY),
        });
        self.request(Method::PUT, &format!("/settings/{}", urlencoding::encode(key)), Some(&body))
            .await
    }
}
