//! Business logic services.

#![allow(missing_docs)]

pub mod archive_policy;
pub mod authorization;
pub mod blob_cleanup;
pub mod cascade_graph;
pub mod deletion;
pub mod moderation;
pub mod report;

pub use archive_policy::{DepartureOutcome, on_creator_departure};
pub use authorization::{Action, Actor, GateRequest, authorize, can_perform};
pub use blob_cleanup::BlobCleanupCoordinator;
pub use cascade_graph::{CascadeNode, EntityKind, NulledRef, deletion_order, node};
pub use deletion::{DELETE_ACCOUNT_SENTENCE, DeleteGalerieInput, DeleteUserInput, DeletionService};
pub use moderation::{BlackListInput, ModerationService};
pub use report::{BlobFailure, CascadeReport, MembershipRef};
