//! Response shapes for the standard operation table.
//!
//! The backend owns these schemas; only the paging envelope of
//! [`ValOperationPaged`] is interpreted here; everything else passes
//! through as JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One page of validation operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValOperationPaged {
    /// Records on this page, as returned by the backend
    #[serde(default)]
    pub items: Vec<Value>,
    pub total_count: u64,
    pub page: u32,
    pub page_size: u32,
}

impl ValOperationPaged {
    /// Whether more records exist past this page.
    pub fn has_more(&self) -> bool {
        let seen = u64::from(self.page.max(1)) * u64::from(self.page_size);
        seen < self.total_count
    }
}

/// Result of `OtherOperation1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OtherType1(pub Value);

/// Result of `OtherOperation2`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OtherType2(pub Value);

/// Result of `OtherOperation3`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OtherType3(pub Value);

/// Result of `OtherOperation4`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OtherType4(pub Value);
