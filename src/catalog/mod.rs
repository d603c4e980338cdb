//! 模型目录模块：远程注册表查询、TTL 缓存与静态回退列表。
//!
//! # Model Catalog Module
//!
//! Resolves human-facing model identifiers against the remote registry.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`ModelCatalog`] | Cached registry view with TTL expiry and single-flight refresh |
//! | [`CatalogSnapshot`] | Immutable point-in-time copy of the registry |
//! | [`categorize`] | Ordered pattern rules mapping an identifier to a category |
//! | [`fallback_models`] | Embedded list served when discovery fails |
//!
//! ## Degradation
//!
//! A failed registry call never reaches the caller: the catalog swaps in the
//! fallback list (tagged [`SnapshotSource::Fallback`]) and logs a warning.
//! Registry outages are therefore only visible in logs and in the snapshot
//! source. The fallback snapshot expires like any other, so the next refresh
//! after the TTL can replace it with live data.

mod categorize;
mod fallback;
mod manager;

pub use categorize::{categorize, default_input};
pub use fallback::{fallback_models, FALLBACK_MODELS};
pub use manager::{CatalogConfig, CatalogSnapshot, ModelCatalog, SnapshotSource};
