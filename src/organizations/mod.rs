//! # Organizations Module
//!
//! Everything the poll loop does with organizations:
//! - Organization/member models
//! - Snapshot persistence and diffing
//! - Member enrichment with GitHub profiles
//! - Notification rendering and delivery

pub mod diff;
pub mod enricher;
pub mod models;
pub mod notifier;
pub mod snapshot;


pub use diff::find_new;
pub use enricher::MemberEnricher;
pub use notifier::Notifier;
pub use snapshot::SnapshotStore;
