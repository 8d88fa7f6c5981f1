#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/cabcast/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod pipeline;

// Re-export main types from sub-crates
pub use cabcast_data as data;
pub use cabcast_features as features;
pub use cabcast_output as output;
pub use cabcast_split as split;

pub use cabcast_features::ZoneStatsMode;
pub use cabcast_split::{Segment, SplitFrames};
pub use config::PipelineConfig;
pub use error::{PipelineError, Result};
pub use pipeline::Pipeline;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
