//! Domain types shared by the API client, the reference-data loader and the
//! creation wizard.
use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Lifecycle status of an asset, serialized with the upstream display strings.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum AssetStatus {
    #[default]
    Available,
    #[serde(rename = "Under Maintenance")]
    UnderMaintenance,
    Broken,
    Assigned,
}

impl AssetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetStatus::Available => "Available",
            AssetStatus::UnderMaintenance => "Under Maintenance",
            AssetStatus::Broken => "Broken",
            AssetStatus::Assigned => "Assigned",
        }
    }
}

/// Which detail record a category calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailKind {
    Computer,
    External,
}

impl DetailKind {
    /// Only "Computer Assets" gets the computer detail shape; every other
    /// category uses the external-equipment shape.
    pub fn for_category(name: &str) -> DetailKind {
        if name == "Computer Assets" {
            DetailKind::Computer
        } else {
            DetailKind::External
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubCategory {
    pub id: i64,
    pub name: String,
    pub category_id: i64,
}

/// A location record. Site is not a first-class entity upstream: each
/// location row carries both its own name and the site name it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub id: i64,
    pub location: String,
    pub site: String,
}

/// Employee row as listed by the API. Optional fields are decoded
/// defensively since the upstream schema is not pinned.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Employee {
    pub id: i64,
    pub name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
}

/// A base asset row as listed by the API.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Asset {
    pub id: i64,
    pub status: Option<String>,
    pub category_id: Option<i64>,
    pub sub_category_id: Option<i64>,
    pub site_id: Option<i64>,
    pub location_id: Option<i64>,
}

/// Client-held wizard input: the step-1 selections by name, plus the
/// step-2 payload matching the selected category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssetDraft {
    pub category: String,
    pub sub_category: String,
    pub site: String,
    pub location: String,
    pub status: AssetStatus,
    pub computer: Option<ComputerDraft>,
    pub external: Option<ExternalDraft>,
}

/// Step-2 fields for computer assets. All fields except the descriptions
/// and `warranty_months` are required non-empty at submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComputerDraft {
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
    pub warranty_months: Option<u32>,
    pub warranty_expire: String,
}

/// Step-2 fields for external equipment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExternalDraft {
    pub brand: String,
    pub model: String,
    pub serial_number: String,
    pub description: String,
    pub warranty_start: String,
    pub warranty_end: String,
}

/// Derive a warranty expiry date (`YYYY-MM-DD`) from a start date and a
/// duration in months. Month arithmetic clamps to the end of the target
/// month (Jan 31 + 1 month = Feb 29 in a leap year).
pub fn warranty_expire_from(start: &str, months: u32) -> Option<String> {
    let start = NaiveDate::parse_from_str(start.trim(), "%Y-%m-%d").ok()?;
    let expire = start.checked_add_months(Months::new(months))?;
    Some(expire.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_display_strings() {
        let json = serde_json::to_string(&AssetStatus::UnderMaintenance).unwrap();
        assert_eq!(json, "\"Under Maintenance\"");
        let back: AssetStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, AssetStatus::UnderMaintenance);
        assert_eq!(AssetStatus::default(), AssetStatus::Available);
    }

    #[test]
    fn detail_kind_from_category_name() {
        assert_eq!(
            DetailKind::for_category("Computer Assets"),
            DetailKind::Computer
        );
        assert_eq!(
            DetailKind::for_category("External Equipment"),
            DetailKind::External
        );
        assert_eq!(
            DetailKind::for_category("Office Supplies"),
            DetailKind::External
        );
    }

    #[test]
    fn warranty_expiry_clamps_to_month_end() {
        assert_eq!(
            warranty_expire_from("2024-01-31", 1).as_deref(),
            Some("2024-02-29")
        );
        assert_eq!(
            warranty_expire_from("2023-06-15", 12).as_deref(),
            Some("2024-06-15")
        );
        assert_eq!(warranty_expire_from("not a date", 12), None);
    }

    #[test]
    fn draft_parses_from_yaml() {
        let draft: AssetDraft = serde_yaml::from_str(
            r#"
category: "Computer Assets"
subCategory: "Laptop"
site: "HQ"
location: "Head Office"
status: "Available"
computer:
  brand: "Lenovo"
  model: "T14"
  serialNumber: "SN-1"
  processor: "i7"
  ramSlot1: "8GB"
  ramSlot2: "8GB"
  totalRAM: "16GB"
  warrantyStart: "2024-01-01"
  warrantyMonths: 24
"#,
        )
        .unwrap();
        assert_eq!(draft.sub_category, "Laptop");
        let computer = draft.computer.unwrap();
        assert_eq!(computer.warranty_months, Some(24));
        assert!(computer.warranty_expire.is_empty());
    }
}
