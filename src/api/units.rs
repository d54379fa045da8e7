use reqwest::Method;
use serde_json::{json, Value};

use crate::error::ApiError;

use super::client::XanoClient;
use super::records::XanoUnit;

impl XanoClient {
    pub async fn get_units(&self) -> Result<Vec<XanoUnit>, ApiError> {
        self.request(Method::GET, "/user", None).await
    }

    pub async fn get_unit(&self, id: i64) -> Result<XanoUnit, ApiError> {
        self.request(Method::GET, &format!("/user/{}", id), None).await
    }

    /// The `/user` POST accepts only name and email; everything else is
    /// written with a follow-up PATCH.
    pub async fn create_unit(&self, record: &XanoUnit) -> Result<XanoUnit, ApiError> {
        let basic = json!({
            "name": record.name.clone().unwrap_or_default(),
            "email": record.email.clone().unwrap_or_default(),
        });
        let created: XanoUnit = self.request(Method::POST, "/user", Some(&basic)).await?;
        let mut fields = record.clone();
        fields.id = None;
        fields.name = Some(record.name.clone().unwrap_or_default());
        fields.email = Some(record.email.clone().unwrap_or_default());
        if fields.field_count() <= 2 {
            return Ok(created);
        }
        let id = created
            .id
            .ok_or_else(|| ApiError::Decode("created record has no id".into()))?;
        let body = serde_json::to_value(&fields).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.request(Method::PATCH, &format!("/user/{}", id), Some(&body)).await
    }

    /// PATCHes the record, keeping the stored name and email when the update
    /// leaves them blank.
    pub async fn update_unit(&self, id: i64, record: &XanoUnit) -> Result<XanoUnit, ApiError> {
        let current = self.get_unit(id).await?;
        let mut merged = record.clone();
        merged.id = None;
        if merged.name.as_deref().map_or(true, str::is_empty) {
            merged.name = current.name;
        }
        if merged.email.as_deref().map_or(true, str::is_empty) {
            merged.email = current.email;
        }
        let body = serde_json::to_value(&merged).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.request(Method::PATCH, &format!("/user/{}", id), Some(&body)).await
    }

    pub async fn delete_unit(&self, id: i64) -> Result<(), ApiError> {
        let _: Value = self.request(Method::DELETE, &format!("/user/{}", id), None).await?;
        Ok(())
    }
}
