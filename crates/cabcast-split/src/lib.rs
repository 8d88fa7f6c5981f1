#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/cabcast/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod temporal;

pub use config::SplitConfig;
pub use error::{Result, SplitError};
pub use temporal::{Segment, SplitBoundaries, SplitFrames, TemporalSplitter};
