//! Reference-data snapshot and name→id resolution.
//!
//! Categories, subcategories and locations are loaded once per run and are
//! read-only afterwards. Each list is fetched independently so one failing
//! endpoint does not block the others. Sites are not fetched at all: they
//! are derived from the `site` field of location records.
use serde_json::Value;
use tracing::warn;

use crate::api::{ApiError, AssetService};
use crate::model::{Category, Location, SubCategory};

/// Which reference list an operation concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefList {
    Categories,
    SubCategories,
    Locations,
}

impl RefList {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefList::Categories => "categories",
            RefList::SubCategories => "subcategories",
            RefList::Locations => "locations",
        }
    }
}

/// A single failed reference fetch. The snapshot keeps that list empty.
#[derive(Debug)]
pub struct LoadFailure {
    pub list: RefList,
    pub error: ApiError,
}

/// Result of [`ReferenceData::load`]: the snapshot plus any per-list
/// failures, so callers can report each one independently.
#[derive(Debug)]
pub struct ReferenceLoad {
    pub data: ReferenceData,
    pub failures: Vec<LoadFailure>,
}

#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub categories: Vec<Category>,
    pub sub_categories: Vec<SubCategory>,
    pub locations: Vec<Location>,
}

/// Foreign keys resolved from the human-readable step-1 selections.
/// `None` means the name had no match in the snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolvedIds {
    pub category_id: Option<i64>,
    pub sub_category_id: Option<i64>,
    pub site_id: Option<i64>,
    pub location_id: Option<i64>,
}

impl ReferenceData {
    pub async fn load(api: &dyn AssetService) -> ReferenceLoad {
        let mut data = ReferenceData::default();
        let mut failures = Vec::new();

        match api.list_categories().await {
            Ok(categories) => data.categories = categories,
            Err(error) => {
                warn!(%error, "failed to load categories");
                failures.push(LoadFailure {
                    list: RefList::Categories,
                    error,
                });
            }
        }
        match api.list_sub_categories().await {
            Ok(sub_categories) => data.sub_categories = sub_categories,
            Err(error) => {
                warn!(%error, "failed to load subcategories");
                failures.push(LoadFailure {
                    list: RefList::SubCategories,
                    error,
                });
            }
        }
        match api.list_locations().await {
            Ok(locations) => data.locations = locations,
            Err(error) => {
                warn!(%error, "failed to load locations");
                failures.push(LoadFailure {
                    list: RefList::Locations,
                    error,
                });
            }
        }

        ReferenceLoad { data, failures }
    }

    /// Resolve the step-1 name selections to foreign-key ids. Pure and
    /// deterministic over the snapshot.
    ///
    /// The subcategory lookup is independent of the category lookup. The
    /// site id is read off the first location record (list order) whose
    /// `site` field matches, since sites are not stored as their own
    /// entity upstream.
    pub fn resolve_ids(
        &self,
        category: &str,
        sub_category: &str,
        site: &str,
        location: &str,
    ) -> ResolvedIds {
        ResolvedIds {
            category_id: self
                .categories
                .iter()
                .find(|c| c.name == category)
                .map(|c| c.id),
            sub_category_id: self
                .sub_categories
                .iter()
                .find(|s| s.name == sub_category)
                .map(|s| s.id),
            site_id: self
                .locations
                .iter()
                .find(|l| l.site == site)
                .map(|l| l.id),
            location_id: self
                .locations
                .iter()
                .find(|l| l.location == location)
                .map(|l| l.id),
        }
    }
}

/// Whether a verification read actually returned a record. Null, empty
/// strings, empty arrays and empty objects all count as missing.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        _ => true,
    }
}
