#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod config;
pub mod encode;
pub mod error;
pub mod filter;
pub mod media_type;
pub mod naming;
pub mod store;
pub mod transform;

pub use config::TransformOptions;
pub use error::{CopyFailure, TransformError, TransformResult};
pub use filter::{Filter, FilterRule};
pub use store::{AssetStore, DiskStore, MemoryStore};
pub use transform::{EncodedAsset, OutputTarget, UrlTransform};
