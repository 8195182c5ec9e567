//! # Procure Core
//!
//! 核心資料模型、協作者介面與錯誤類型定義

pub mod config;
pub mod deadline;
pub mod demand;
pub mod item;
pub mod memory;
pub mod ports;
pub mod purchase;
pub mod shopping;
pub mod tree;

use std::time::Duration;

// Re-export 主要類型
pub use config::EngineConfig;
pub use deadline::Deadline;
pub use demand::{parse_invoice_lines, InvoiceLine, RootDemandLine};
pub use item::{ComponentEdge, Item, PurchaseMapping};
pub use ports::{
    ComponentLookup, ContactDirectory, ItemCatalog, OAuthStateStore, PurchaseOrderGateway,
    ShoppingListStore,
};
pub use purchase::{BatchReport, PurchaseOrderDraft, PurchaseOrderLine};
pub use shopping::{GroupedItem, ShoppingListRecord, SupplierDemandGroups};
pub use tree::{BomNode, BomNodeKind, LeafTotal, PerAssemblyKind, PerAssemblyNode};

/// 基礎設施錯誤（協作者 I/O、逾時、格式錯誤）
///
/// 這類錯誤面向維運日誌，絕不降級為業務訊息。
#[derive(Debug, thiserror::Error)]
pub enum ProcureError {
    #[error("{operation} failed: {message}")]
    Collaborator {
        operation: &'static str,
        message: String,
    },

    #[error("operation timed out after {elapsed:?} (budget {budget:?})")]
    Timeout { elapsed: Duration, budget: Duration },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to load configuration: {0}")]
    ConfigLoad(#[from] figment::Error),

    #[error("malformed payload: {0}")]
    Malformed(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl ProcureError {
    /// 包裝協作者錯誤
    pub fn collaborator(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Collaborator {
            operation,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ProcureError>;

/// 業務規則錯誤
///
/// `Display` 的文字即為直接顯示給使用者的訊息。任何一個業務錯誤都會中止整個操作。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BusinessError {
    #[error("item {0} not found in the item catalog")]
    ItemNotFound(String),

    #[error("max depth exceeded while resolving item {0} (possible circular reference)")]
    MaxDepthExceeded(String),

    #[error("circular parent/child relationship detected at {0}")]
    CircularReference(String),

    #[error("item {0} has no supplier contact and no subcomponents")]
    NoSourceNoComponents(String),

    #[error("component edge {parent} -> {child} has a non-positive quantity")]
    InvalidMultiplier { parent: String, child: String },

    #[error("quantity of item {0} is too large to calculate")]
    QuantityOverflow(String),

    #[error("no contact mapping found for item {0}")]
    MissingContactMapping(String),

    #[error("no supplier contact found for account number {0}")]
    UnknownContactAccount(String),

    #[error("No valid invoice items found.")]
    NoValidInvoiceLines,

    #[error("No valid items to add to the shopping list.")]
    NoValidShoppingEntries,
}

/// 業務結果：成功或被業務規則拒絕
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Accepted(T),
    Rejected(BusinessError),
}

impl<T> Outcome<T> {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted(_))
    }

    /// 使用者訊息（成功時為 `None`）
    pub fn message(&self) -> Option<String> {
        match self {
            Outcome::Accepted(_) => None,
            Outcome::Rejected(err) => Some(err.to_string()),
        }
    }

    pub fn accepted(self) -> Option<T> {
        match self {
            Outcome::Accepted(value) => Some(value),
            Outcome::Rejected(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<&BusinessError> {
        match self {
            Outcome::Accepted(_) => None,
            Outcome::Rejected(err) => Some(err),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Accepted(value) => Outcome::Accepted(f(value)),
            Outcome::Rejected(err) => Outcome::Rejected(err),
        }
    }

    pub fn into_result(self) -> std::result::Result<T, BusinessError> {
        match self {
            Outcome::Accepted(value) => Ok(value),
            Outcome::Rejected(err) => Err(err),
        }
    }
}

impl<T> From<BusinessError> for Outcome<T> {
    fn from(err: BusinessError) -> Self {
        Outcome::Rejected(err)
    }
}
