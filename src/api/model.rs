use serde::{Deserialize, Serialize};

use crate::model::{AssetStatus, ComputerDraft, ExternalDraft};

/// Body for `POST asset/createAssets`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAsset {
    pub status: AssetStatus,
    pub category_id: i64,
    pub sub_category_id: i64,
    pub site_id: Option<i64>,
    pub location_id: Option<i64>,
}

/// Body for `POST computerAsset/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComputerDetail {
    pub asset_id: i64,
    pub brand: String,
    pub model: String,
    pub serial_number: String,
    pub description: String,
    pub processor: String,
    pub processor_generation: String,
    pub ram_slot1: String,
    pub ram_slot2: String,
    #[serde(rename = "totalRAM")]
    pub total_ram: String,
    pub warranty_start: String,
    pub warranty_expire: String,
}

impl NewComputerDetail {
    pub fn from_draft(asset_id: i64, draft: &ComputerDraft) -> Self {
        Self {
            asset_id,
            brand: draft.brand.clone(),
            model: draft.model.clone(),
            serial_number: draft.serial_number.clone(),
            description: draft.description.clone(),
            processor: draft.processor.clone(),
            processor_generation: draft.processor_generation.clone(),
            ram_slot1: draft.ram_slot1.clone(),
            ram_slot2: draft.ram_slot2.clone(),
            total_ram: draft.total_ram.clone(),
            warranty_start: draft.warranty_start.clone(),
            warranty_expire: draft.warranty_expire.clone(),
        }
    }
}

/// Body for `POST externalAsset/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExternalDetail {
    pub asset_id: i64,
    pub brand: String,
    pub model: String,
    pub serial_number: String,
    pub description: String,
    pub warranty_start: String,
    pub warranty_end: String,
}

impl NewExternalDetail {
    pub fn from_draft(asset_id: i64, draft: &ExternalDraft) -> Self {
        Self {
            asset_id,
            brand: draft.brand.clone(),
            model: draft.model.clone(),
            serial_number: draft.serial_number.clone(),
            description: draft.description.clone(),
            warranty_start: draft.warranty_start.clone(),
            warranty_end: draft.warranty_end.clone(),
        }
    }
}

/// Body for `POST asset/checkOut`. `check_out: false` checks the asset
/// back in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckOutRequest {
    pub asset_id: i64,
    pub employee_id: Option<i64>,
    pub check_out: bool,
}

/// Row of `GET asset/getAssetsCountByCategory`.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}
