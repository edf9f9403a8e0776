//! Outcome of a deletion cascade.

use serde::Serialize;

/// A blob that could not be removed from storage.
///
/// The image row is deleted regardless; the blob is left for manual
/// reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlobFailure {
    pub image_id: String,
    pub bucket: String,
    pub key: String,
    pub error: String,
}

/// A removed membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipRef {
    pub galerie_id: String,
    pub user_id: String,
}

/// Everything a cascade removed or changed.
///
/// Returned by every orchestrator trigger. A re-run against an already
/// removed target yields an empty report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CascadeReport {
    pub users: Vec<String>,
    pub galeries: Vec<String>,
    pub archived_galeries: Vec<String>,
    pub memberships: Vec<MembershipRef>,
    pub frames: Vec<String>,
    pub galerie_pictures: Vec<String>,
    pub profile_pictures: Vec<String>,
    pub images: Vec<String>,
    pub likes: Vec<String>,
    /// Frames whose like counter was recomputed.
    pub resynced_frames: Vec<String>,
    pub invitations: u64,
    pub black_lists: u64,
    pub nulled_black_lists: u64,
    pub nulled_tickets: u64,
    pub blob_failures: Vec<BlobFailure>,
}

impl CascadeReport {
    /// Fold another report into this one.
    pub fn merge(&mut self, other: Self) {
        self.users.extend(other.users);
        self.galeries.extend(other.galeries);
        self.archived_galeries.extend(other.archived_galeries);
        self.memberships.extend(other.memberships);
        self.frames.extend(other.frames);
        self.galerie_pictures.extend(other.galerie_pictures);
        self.profile_pictures.extend(other.profile_pictures);
        self.images.extend(other.images);
        self.likes.extend(other.likes);
        self.resynced_frames.extend(other.resynced_frames);
        self.invitations += other.invitations;
        self.black_lists += other.black_lists;
        self.nulled_black_lists += other.nulled_black_lists;
        self.nulled_tickets += other.nulled_tickets;
        self.blob_failures.extend(other.blob_failures);
    }

    /// Whether the cascade changed nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
            && self.galeries.is_empty()
            && self.archived_galeries.is_empty()
            && self.memberships.is_empty()
            && self.frames.is_empty()
            && self.galerie_pictures.is_empty()
            && self.profile_pictures.is_empty()
            && self.images.is_empty()
            && self.likes.is_empty()
            && self.resynced_frames.is_empty()
            && self.invitations == 0
            && self.black_lists == 0
            && self.nulled_black_lists == 0
            && self.nulled_tickets == 0
            && self.blob_failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        assert!(CascadeReport::default().is_empty());
    }

    #[test]
    fn test_merge() {
        let mut report = CascadeReport {
            frames: vec!["f1".to_string()],
            invitations: 1,
            ..Default::default()
        };
        report.merge(CascadeReport {
            frames: vec!["f2".to_string()],
            invitations: 2,
            blob_failures: vec![BlobFailure {
                image_id: "i1".to_string(),
                bucket: "b".to_string(),
                key: "k".to_string(),
                error: "timeout".to_string(),
            }],
            ..Default::default()
        });

        assert_eq!(report.frames, vec!["f1", "f2"]);
        assert_eq!(report.invitations, 3);
        assert_eq!(report.blob_failures.len(), 1);
        assert!(!report.is_empty());
    }

    #[test]
    fn test_serializes_camel_case() {
        let report = CascadeReport {
            archived_galeries: vec!["g1".to_string()],
            ..Default::default()
        };
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["archivedGaleries"][0], "g1");
        assert_eq!(value["nulledTickets"], 0);
    }
}
