//! The asset-creation wizard: a two-step saga against the upstream API.
//!
//! Step 1 creates the base asset record, step 2 creates the matching
//! category-specific detail record and verifies the asset is retrievable.
//! Once a base asset exists, every later failure (and a user cancel) runs a
//! best-effort compensating delete so no asset is left without its detail
//! record. The wizard holds the only mutable state; collaborators are
//! passed in per call.
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::api::model::{NewAsset, NewComputerDetail, NewExternalDetail};
use crate::api::{extract_created_id, unwrap_envelope, ApiError, AssetService};
use crate::model::{AssetDraft, DetailKind};
use crate::refdata::{is_present, ReferenceData};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WizardStep {
    #[default]
    Idle,
    Step1Submitting,
    Step1Created,
    Step2Submitting,
    Verifying,
    CompensatingDelete,
    Completed,
    Aborted,
}

#[derive(Debug, Error)]
pub enum WizardError {
    /// Rejected before any mutating call; nothing to compensate.
    #[error("validation failed: {0}")]
    Validation(String),
    /// The create request never reached the API, so no mutation is assumed.
    #[error("cannot reach the asset API: {0}")]
    Connectivity(#[source] ApiError),
    /// Base or detail creation failed.
    #[error("asset creation failed: {0}")]
    Creation(String),
    /// The post-creation read did not return the asset.
    #[error("asset verification failed: {0}")]
    Verification(String),
    /// Re-entrant or out-of-order submission.
    #[error("cannot {action} while the wizard is {step:?}")]
    InvalidTransition {
        step: WizardStep,
        action: &'static str,
    },
}

#[derive(Debug)]
enum DetailRequest {
    Computer(NewComputerDetail),
    External(NewExternalDetail),
}

/// One wizard instance drives one asset creation; `Completed` and
/// `Aborted` are terminal, a fresh instance starts over. Methods take
/// `&mut self` and await every call before returning, so submissions
/// cannot overlap and a cancel never races an in-flight request.
#[derive(Debug, Default)]
pub struct AssetWizard {
    step: WizardStep,
    created_asset_id: Option<i64>,
    detail_kind: Option<DetailKind>,
}

impl AssetWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    /// The armed compensation guard: the base asset id held between a
    /// successful step 1 and completion.
    pub fn created_asset_id(&self) -> Option<i64> {
        self.created_asset_id
    }

    /// Validate the step-1 selections, resolve them to foreign keys and
    /// create the base asset. On success the wizard holds the
    /// server-assigned id and compensation is armed.
    #[instrument(skip_all)]
    pub async fn submit_step1(
        &mut self,
        api: &dyn AssetService,
        refdata: &ReferenceData,
        draft: &AssetDraft,
    ) -> Result<(), WizardError> {
        if self.step != WizardStep::Idle {
            return Err(WizardError::InvalidTransition {
                step: self.step,
                action: "submit step 1",
            });
        }
        validate_step1(draft).map_err(WizardError::Validation)?;

        self.step = WizardStep::Step1Submitting;
        let ids = refdata.resolve_ids(&draft.category, &draft.sub_category, &draft.site, &draft.location);
        let (category_id, sub_category_id) = match (ids.category_id, ids.sub_category_id) {
            (Some(category_id), Some(sub_category_id)) => (category_id, sub_category_id),
            _ => {
                self.step = WizardStep::Idle;
                return Err(WizardError::Validation(
                    "category or subcategory has no match in reference data".into(),
                ));
            }
        };

        let request = NewAsset {
            status: draft.status,
            category_id,
            sub_category_id,
            site_id: ids.site_id,
            location_id: ids.location_id,
        };
        let response = match api.create_asset(&request).await {
            Ok(response) => response,
            Err(err @ ApiError::Transport(_)) => {
                // The request never settled; no mutation is assumed and
                // there is nothing to compensate.
                self.step = WizardStep::Aborted;
                return Err(WizardError::Connectivity(err));
            }
            Err(err) => {
                self.step = WizardStep::Aborted;
                return Err(WizardError::Creation(err.to_string()));
            }
        };

        let asset_id = match extract_created_id(&response) {
            Some(asset_id) => asset_id,
            None => {
                // Without an id there is no durable record we could delete.
                self.step = WizardStep::Aborted;
                return Err(WizardError::Creation(
                    "create response carried no asset id".into(),
                ));
            }
        };

        self.created_asset_id = Some(asset_id);
        self.detail_kind = Some(DetailKind::for_category(&draft.category));
        self.step = WizardStep::Step1Created;
        info!(asset_id, "base asset created");
        Ok(())
    }

    /// Create the detail record for the held asset and verify the asset is
    /// retrievable. Any failure after step 1 compensates by deleting the
    /// base asset, then surfaces the original error. Returns the created
    /// asset id.
    #[instrument(skip_all)]
    pub async fn submit_step2(
        &mut self,
        api: &dyn AssetService,
        draft: &AssetDraft,
    ) -> Result<i64, WizardError> {
        let (kind, asset_id) = match (self.step, self.detail_kind, self.created_asset_id) {
            (WizardStep::Step1Created, Some(kind), Some(asset_id)) => (kind, asset_id),
            _ => {
                return Err(WizardError::InvalidTransition {
                    step: self.step,
                    action: "submit step 2",
                })
            }
        };
        // Validation failures leave the wizard in Step1Created; the base
        // asset stays put until the user retries or cancels.
        let request = build_detail_request(kind, asset_id, draft).map_err(WizardError::Validation)?;

        self.step = WizardStep::Step2Submitting;
        let result = match &request {
            DetailRequest::Computer(req) => api.create_computer_detail(req).await,
            DetailRequest::External(req) => api.create_external_detail(req).await,
        };
        if let Err(err) = result {
            return Err(self
                .compensate(api, WizardError::Creation(err.to_string()))
                .await);
        }

        self.step = WizardStep::Verifying;
        match api.get_asset_by_id(asset_id).await {
            Ok(body) => {
                if !is_present(&unwrap_envelope(body)) {
                    return Err(self
                        .compensate(
                            api,
                            WizardError::Verification("created asset is not retrievable".into()),
                        )
                        .await);
                }
            }
            Err(err) => {
                return Err(self
                    .compensate(api, WizardError::Verification(err.to_string()))
                    .await)
            }
        }

        self.created_asset_id = None;
        self.detail_kind = None;
        self.step = WizardStep::Completed;
        info!(asset_id, "asset creation completed");
        Ok(asset_id)
    }

    /// User-initiated cancel. Runs the same compensating delete as the
    /// failure path but surfaces no error: cancellation is cleanup, not a
    /// fault.
    #[instrument(skip_all)]
    pub async fn cancel(&mut self, api: &dyn AssetService) {
        if matches!(self.step, WizardStep::Completed | WizardStep::Aborted) {
            return;
        }
        self.run_compensation(api).await;
        self.step = WizardStep::Aborted;
    }

    async fn compensate(&mut self, api: &dyn AssetService, original: WizardError) -> WizardError {
        self.run_compensation(api).await;
        self.step = WizardStep::Aborted;
        original
    }

    /// Best-effort delete of the held base asset. Delete failures are
    /// logged and swallowed; they never displace the triggering error.
    async fn run_compensation(&mut self, api: &dyn AssetService) {
        if let Some(asset_id) = self.created_asset_id.take() {
            self.step = WizardStep::CompensatingDelete;
            match api.delete_asset(asset_id).await {
                Ok(()) => info!(asset_id, "compensating delete succeeded"),
                Err(err) => warn!(%err, asset_id, "compensating delete failed"),
            }
        }
        self.detail_kind = None;
    }
}

fn validate_step1(draft: &AssetDraft) -> Result<(), String> {
    let mut missing = Vec::new();
    if draft.category.trim().is_empty() {
        missing.push("category");
    }
    if draft.sub_category.trim().is_empty() {
        missing.push("subCategory");
    }
    if draft.site.trim().is_empty() {
        missing.push("site");
    }
    if draft.location.trim().is_empty() {
        missing.push("location");
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(format!("missing required fields: {}", missing.join(", ")))
    }
}

fn build_detail_request(
    kind: DetailKind,
    asset_id: i64,
    draft: &AssetDraft,
) -> Result<DetailRequest, String> {
    match kind {
        DetailKind::Computer => {
            let computer = draft
                .computer
                .as_ref()
                .ok_or_else(|| "computer details are required for this category".to_string())?;
            let mut missing = Vec::new();
            if computer.brand.trim().is_empty() {
                missing.push("brand");
            }
            if computer.model.trim().is_empty() {
                missing.push("model");
            }
            if computer.serial_number.trim().is_empty() {
                missing.push("serialNumber");
            }
            if computer.processor.trim().is_empty() {
                missing.push("processor");
            }
            if computer.ram_slot1.trim().is_empty() {
                missing.push("ramSlot1");
            }
            if computer.ram_slot2.trim().is_empty() {
                missing.push("ramSlot2");
            }
            if computer.total_ram.trim().is_empty() {
                missing.push("totalRAM");
            }
            if computer.warranty_start.trim().is_empty() {
                missing.push("warrantyStart");
            }
            if computer.warranty_expire.trim().is_empty() {
                missing.push("warrantyExpire");
            }
            if !missing.is_empty() {
                return Err(format!("missing required fields: {}", missing.join(", ")));
            }
            Ok(DetailRequest::Computer(NewComputerDetail::from_draft(
                asset_id, computer,
            )))
        }
        DetailKind::External => {
            let external = draft
                .external
                .as_ref()
                .ok_or_else(|| "equipment details are required for this category".to_string())?;
            let mut missing = Vec::new();
            if external.brand.trim().is_empty() {
                missing.push("brand");
            }
            if external.model.trim().is_empty() {
                missing.push("model");
            }
            if external.serial_number.trim().is_empty() {
                missing.push("serialNumber");
            }
            if !missing.is_empty() {
                return Err(format!("missing required fields: {}", missing.join(", ")));
            }
            Ok(DetailRequest::External(NewExternalDetail::from_draft(
                asset_id, external,
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ComputerDraft, ExternalDraft};

    fn step1_draft() -> AssetDraft {
        AssetDraft {
            category: "Computer Assets".into(),
            sub_category: "Laptop".into(),
            site: "HQ".into(),
            location: "Head Office".into(),
            ..Default::default()
        }
    }

    #[test]
    fn step1_validation_names_missing_fields() {
        let mut draft = step1_draft();
        draft.sub_category.clear();
        draft.site = "  ".into();
        let msg = validate_step1(&draft).unwrap_err();
        assert!(msg.contains("subCategory"));
        assert!(msg.contains("site"));
        assert!(!msg.contains("location"));
    }

    #[test]
    fn step1_validation_accepts_complete_draft() {
        assert!(validate_step1(&step1_draft()).is_ok());
    }

    #[test]
    fn computer_detail_requires_all_hardware_fields() {
        let mut draft = step1_draft();
        draft.computer = Some(ComputerDraft {
            brand: "Lenovo".into(),
            model: "T14".into(),
            serial_number: "SN-1".into(),
            ..Default::default()
        });
        let msg = build_detail_request(DetailKind::Computer, 1, &draft).unwrap_err();
        assert!(msg.contains("processor"));
        assert!(msg.contains("totalRAM"));
        assert!(msg.contains("warrantyExpire"));
    }

    #[test]
    fn external_detail_requires_three_fields() {
        let mut draft = step1_draft();
        draft.external = Some(ExternalDraft::default());
        let msg = build_detail_request(DetailKind::External, 1, &draft).unwrap_err();
        assert!(msg.contains("brand"));
        assert!(msg.contains("model"));
        assert!(msg.contains("serialNumber"));
    }

    #[test]
    fn detail_payload_must_match_category_kind() {
        let mut draft = step1_draft();
        draft.external = Some(ExternalDraft {
            brand: "Logitech".into(),
            model: "MX".into(),
            serial_number: "SN-2".into(),
            ..Default::default()
        });
        // Category resolves to Computer but only external fields are set.
        assert!(build_detail_request(DetailKind::Computer, 1, &draft).is_err());
        assert!(build_detail_request(DetailKind::External, 1, &draft).is_ok());
    }
}
