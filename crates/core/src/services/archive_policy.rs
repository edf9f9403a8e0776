//! What happens to a galerie when its creator leaves.

/// Fate of a galerie whose creator departs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepartureOutcome {
    /// No member is left: the galerie and everything in it is destroyed.
    Delete,
    /// Members remain: the galerie is kept read-only with its content.
    Archive,
}

/// Decide the fate of a galerie given the number of memberships left once
/// the creator's own membership is discounted.
#[must_use]
pub const fn on_creator_departure(remaining_members: u64) -> DepartureOutcome {
    if remaining_members == 0 {
        DepartureOutcome::Delete
    } else {
        DepartureOutcome::Archive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_galerie_is_deleted() {
        assert_eq!(on_creator_departure(0), DepartureOutcome::Delete);
    }

    #[test]
    fn test_galerie_with_members_is_archived() {
        assert_eq!(on_creator_departure(1), DepartureOutcome::Archive);
        assert_eq!(on_creator_departure(250), DepartureOutcome::Archive);
    }
}
