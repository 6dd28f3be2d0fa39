//! Issuance plans: the entitlement template stamped into new documents.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entitlement::{Entitlement, FeatureValue};
use crate::timestamp::Timestamp;
use crate::{DocumentError, Result};

/// Product granted by the built-in plan.
const DEFAULT_PRODUCT_ID: Uuid = Uuid::from_u128(0x7c1e_52d4_3b0f_4a8e_9d61_2f54_c0a3_e817);

/// Template for the entitlement an issuer grants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitlementPlan {
    /// Fixed entitlement id. When absent every issuance gets a fresh one.
    #[serde(default)]
    pub entitlement_id: Option<Uuid>,
    pub product_id: Uuid,
    #[serde(default)]
    pub product_metadata: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub features: BTreeMap<String, FeatureValue>,
    #[serde(default)]
    pub feature_overrides: BTreeMap<String, FeatureValue>,
    #[serde(default)]
    pub is_floatable: bool,
}

impl EntitlementPlan {
    /// Loads a plan from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::MalformedDocument`] if the JSON does not
    /// describe a plan.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| DocumentError::MalformedDocument(format!("invalid plan: {e}")))
    }

    /// Stamps an entitlement valid over `[valid_from, valid_to]`.
    #[must_use]
    pub fn entitlement(&self, valid_from: Timestamp, valid_to: Timestamp) -> Entitlement {
        Entitlement {
            id: self.entitlement_id.unwrap_or_else(Uuid::new_v4),
            product_id: self.product_id,
            product_metadata: self.product_metadata.clone(),
            features: self.features.clone(),
            feature_overrides: self.feature_overrides.clone(),
            valid_from,
            valid_to,
            is_floatable: self.is_floatable,
        }
    }
}

impl Default for EntitlementPlan {
    fn default() -> Self {
        let plan_name = "Enterprise";

        let mut product_metadata = BTreeMap::new();
        product_metadata.insert("planName".to_string(), plan_name.into());

        let features: BTreeMap<String, FeatureValue> = [
            ("planName", FeatureValue::from(plan_name)),
            ("feat:sharing", true.into()),
            ("feat:variables", true.into()),
            ("feat:logStreaming", true.into()),
            ("feat:advancedPermissions", true.into()),
            ("feat:historyPrune", false.into()),
            ("quota:maxTeamProjects", 50_i64.into()),
            ("quota:insights:maxHistoryDays", 365_i64.into()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        Self {
            entitlement_id: None,
            product_id: DEFAULT_PRODUCT_ID,
            product_metadata,
            features,
            feature_overrides: BTreeMap::new(),
            is_floatable: false,
        }
    }
}
