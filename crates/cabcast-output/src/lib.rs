#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/cabcast/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod export;
pub mod row;
pub mod summary;

pub use error::{ExportError, Result};
pub use export::{ExportFormat, Exporter, split_path, write_frame, write_splits};
pub use row::FeatureRow;
pub use summary::{SegmentSummary, SplitSummary};
