//! HTTP client for the upstream asset-management API.
//!
//! Responses conventionally arrive wrapped in a `{ "data": ... }` envelope,
//! but the upstream is not strict about it; [`unwrap_envelope`] accepts both
//! shapes. Create responses are equally loose about the id key, which
//! [`extract_created_id`] handles with a fixed fallback order.
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

use crate::config::Config;
use crate::model::{Asset, Category, Employee, Location, SubCategory};

pub mod model;

use model::{CategoryCount, CheckOutRequest, NewAsset, NewComputerDetail, NewExternalDetail};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("failed to reach asset API: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("asset API error {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("invalid response payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid API URL: {0}")]
    Url(String),
}

/// The calls the creation wizard and the reference-data loader make,
/// behind a trait so tests can substitute a recording fake.
#[async_trait]
pub trait AssetService: Send + Sync {
    async fn list_categories(&self) -> Result<Vec<Category>, ApiError>;
    async fn list_sub_categories(&self) -> Result<Vec<SubCategory>, ApiError>;
    async fn list_locations(&self) -> Result<Vec<Location>, ApiError>;

    /// Create the base asset record. Returns the raw response body; the
    /// caller extracts the server-assigned id via [`extract_created_id`].
    async fn create_asset(&self, req: &NewAsset) -> Result<Value, ApiError>;
    async fn get_asset_by_id(&self, id: i64) -> Result<Value, ApiError>;
    async fn delete_asset(&self, id: i64) -> Result<(), ApiError>;
    async fn create_computer_detail(&self, req: &NewComputerDetail) -> Result<Value, ApiError>;
    async fn create_external_detail(&self, req: &NewExternalDetail) -> Result<Value, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn from_config(cfg: &Config) -> Result<Self, ApiError> {
        let base_url =
            Url::parse(cfg.api.base_url.trim()).map_err(|e| ApiError::Url(e.to_string()))?;
        Ok(Self::with_base_url(
            base_url,
            Duration::from_secs(cfg.api.timeout_seconds),
        ))
    }

    pub fn with_base_url(mut base_url: Url, timeout: Duration) -> Self {
        // Url::join drops the last path segment unless the base ends in '/'.
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }
        let http = Client::builder()
            .user_agent("assetctl/0.1")
            .timeout(timeout)
            .no_proxy()
            .build()
            .expect("reqwest client");
        Self { http, base_url }
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::Url(e.to_string()))
    }

    async fn read_body(res: reqwest::Response) -> Result<Value, ApiError> {
        let status = res.status();
        let body = res.text().await.map_err(ApiError::Transport)?;
        if !status.is_success() {
            warn!(%status, %body, "asset API error response");
            return Err(ApiError::Status { status, body });
        }
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }

    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, ApiError> {
        let url = self.endpoint(path)?;
        let res = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(ApiError::Transport)?;
        Self::read_body(res).await
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Value, ApiError> {
        let url = self.endpoint(path)?;
        let res = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(ApiError::Transport)?;
        Self::read_body(res).await
    }

    async fn delete(&self, path: &str, query: &[(&str, String)]) -> Result<Value, ApiError> {
        let url = self.endpoint(path)?;
        let res = self
            .http
            .delete(url)
            .query(query)
            .send()
            .await
            .map_err(ApiError::Transport)?;
        Self::read_body(res).await
    }

    fn decode_list<T: DeserializeOwned>(raw: Value) -> Result<Vec<T>, ApiError> {
        let data = unwrap_envelope(raw);
        if data.is_null() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_value(data)?)
    }

    pub async fn list_assets(&self) -> Result<Vec<Asset>, ApiError> {
        Self::decode_list(self.get_json("asset/getAllAssets", &[]).await?)
    }

    pub async fn assets_by_status(&self) -> Result<Value, ApiError> {
        Ok(unwrap_envelope(
            self.get_json("asset/getAssetsByStatus", &[]).await?,
        ))
    }

    pub async fn counts_by_category(&self) -> Result<Vec<CategoryCount>, ApiError> {
        Self::decode_list(self.get_json("asset/getAssetsCountByCategory", &[]).await?)
    }

    pub async fn list_computer_details(&self) -> Result<Value, ApiError> {
        Ok(unwrap_envelope(
            self.get_json("computerAsset/getAll", &[]).await?,
        ))
    }

    pub async fn list_external_details(&self) -> Result<Value, ApiError> {
        Ok(unwrap_envelope(
            self.get_json("externalAsset/getAll", &[]).await?,
        ))
    }

    pub async fn list_employees(&self) -> Result<Vec<Employee>, ApiError> {
        Self::decode_list(self.get_json("employee/getAllEmployees", &[]).await?)
    }

    /// Assign (`check_out: true`) or return (`check_out: false`) an asset.
    /// Failures carry no compensation: the caller reports them and the
    /// asset record is left as the server has it.
    pub async fn check_out(&self, req: &CheckOutRequest) -> Result<Value, ApiError> {
        self.post_json("asset/checkOut", req).await
    }
}

#[async_trait]
impl AssetService for ApiClient {
    async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        Self::decode_list(self.get_json("category/getAllCategories", &[]).await?)
    }

    async fn list_sub_categories(&self) -> Result<Vec<SubCategory>, ApiError> {
        Self::decode_list(self.get_json("subCategory/getAllSubcategories", &[]).await?)
    }

    async fn list_locations(&self) -> Result<Vec<Location>, ApiError> {
        // The upstream spells this path with a lowercase second 'l'.
        Self::decode_list(self.get_json("location/getAlllocations", &[]).await?)
    }

    async fn create_asset(&self, req: &NewAsset) -> Result<Value, ApiError> {
        self.post_json("asset/createAssets", req).await
    }

    async fn get_asset_by_id(&self, id: i64) -> Result<Value, ApiError> {
        self.get_json("asset/getAssetsById", &[("id", id.to_string())])
            .await
    }

    async fn delete_asset(&self, id: i64) -> Result<(), ApiError> {
        self.delete("asset/deleteAssets", &[("id", id.to_string())])
            .await?;
        Ok(())
    }

    async fn create_computer_detail(&self, req: &NewComputerDetail) -> Result<Value, ApiError> {
        self.post_json("computerAsset/create", req).await
    }

    async fn create_external_detail(&self, req: &NewExternalDetail) -> Result<Value, ApiError> {
        self.post_json("externalAsset/create", req).await
    }
}

/// Unwrap the `{ "data": ... }` response envelope, falling back to the raw
/// payload when the envelope is absent.
pub fn unwrap_envelope(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Id keys probed on create responses, in order. The upstream does not
/// commit to one canonical key.
const ID_FALLBACK_KEYS: [&str; 3] = ["id", "assetId", "asset_id"];

/// Extract the server-assigned id from a create response. Looks inside the
/// `data` envelope first, then at the top level; accepts numbers and
/// numeric strings.
pub fn extract_created_id(value: &Value) -> Option<i64> {
    let body = match value.get("data") {
        Some(data) if !data.is_null() => data,
        _ => value,
    };
    for key in ID_FALLBACK_KEYS {
        match body.get(key) {
            Some(Value::Number(n)) => {
                if let Some(id) = n.as_i64() {
                    return Some(id);
                }
            }
            Some(Value::String(s)) => {
                if let Ok(id) = s.parse() {
                    return Some(id);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AssetStatus;
    use serde_json::json;

    #[test]
    fn unwrap_envelope_prefers_data_key() {
        assert_eq!(
            unwrap_envelope(json!({"data": [1, 2]})),
            json!([1, 2])
        );
        assert_eq!(unwrap_envelope(json!([3])), json!([3]));
        assert_eq!(unwrap_envelope(json!({"id": 5})), json!({"id": 5}));
    }

    #[test]
    fn extract_id_from_enveloped_and_bare_responses() {
        assert_eq!(extract_created_id(&json!({"data": {"id": 55}})), Some(55));
        assert_eq!(extract_created_id(&json!({"id": 55})), Some(55));
        assert_eq!(extract_created_id(&json!({"assetId": 7})), Some(7));
        assert_eq!(
            extract_created_id(&json!({"data": {"asset_id": "12"}})),
            Some(12)
        );
        assert_eq!(extract_created_id(&json!({"data": {}})), None);
        assert_eq!(extract_created_id(&json!({"name": "x"})), None);
    }

    #[test]
    fn extract_id_fallback_order_prefers_id() {
        let body = json!({"data": {"assetId": 2, "id": 1}});
        assert_eq!(extract_created_id(&body), Some(1));
    }

    #[test]
    fn endpoint_joins_with_and_without_trailing_slash() {
        let client = ApiClient::with_base_url(
            Url::parse("http://localhost:8080/api").unwrap(),
            Duration::from_secs(5),
        );
        assert_eq!(
            client.endpoint("asset/getAllAssets").unwrap().as_str(),
            "http://localhost:8080/api/asset/getAllAssets"
        );

        let client = ApiClient::with_base_url(
            Url::parse("http://localhost:8080/api/").unwrap(),
            Duration::from_secs(5),
        );
        assert_eq!(
            client.endpoint("category/getAllCategories").unwrap().as_str(),
            "http://localhost:8080/api/category/getAllCategories"
        );
    }

    #[test]
    fn new_asset_serializes_camel_case() {
        let body = serde_json::to_value(NewAsset {
            status: AssetStatus::Available,
            category_id: 1,
            sub_category_id: 2,
            site_id: Some(3),
            location_id: Some(4),
        })
        .unwrap();
        assert_eq!(
            body,
            json!({
                "status": "Available",
                "categoryId": 1,
                "subCategoryId": 2,
                "siteId": 3,
                "locationId": 4,
            })
        );
    }

    #[test]
    fn computer_detail_keeps_upstream_ram_key() {
        let draft = crate::model::ComputerDraft {
            brand: "Lenovo".into(),
            total_ram: "16GB".into(),
            ..Default::default()
        };
        let body = serde_json::to_value(NewComputerDetail::from_draft(9, &draft)).unwrap();
        assert_eq!(body["assetId"], 9);
        assert_eq!(body["totalRAM"], "16GB");
    }
}
