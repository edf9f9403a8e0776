//! Static model of which entities depend on which.
//!
//! Consulted by the deletion orchestrator; the order in which it tears a
//! graph down is derived from this table and nowhere else.

use std::collections::HashSet;

/// Entity kinds reachable by a deletion cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    User,
    Galerie,
    Membership,
    Frame,
    GaleriePicture,
    ProfilePicture,
    Image,
    Like,
    Invitation,
    BlackList,
    Ticket,
}

/// A foreign key that is cleared instead of deleting its row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NulledRef {
    pub kind: EntityKind,
    pub column: &'static str,
}

/// Cascade declaration of one entity kind.
#[derive(Debug, Clone, Copy)]
pub struct CascadeNode {
    pub kind: EntityKind,
    /// Destroyed before this entity, in this order.
    pub dependents: &'static [EntityKind],
    /// Referrers that survive with the reference cleared.
    pub nulled: &'static [NulledRef],
    /// Whether rows of this kind own image rows and blobs.
    pub owns_images: bool,
}

const USER: CascadeNode = CascadeNode {
    kind: EntityKind::User,
    dependents: &[
        EntityKind::ProfilePicture,
        EntityKind::BlackList,
        EntityKind::Frame,
        EntityKind::Like,
        EntityKind::Membership,
        EntityKind::Invitation,
    ],
    nulled: &[
        NulledRef {
            kind: EntityKind::Ticket,
            column: "user_id",
        },
        NulledRef {
            kind: EntityKind::BlackList,
            column: "admin_id",
        },
        NulledRef {
            kind: EntityKind::BlackList,
            column: "updated_by_id",
        },
    ],
    owns_images: false,
};

const GALERIE: CascadeNode = CascadeNode {
    kind: EntityKind::Galerie,
    dependents: &[
        EntityKind::Frame,
        EntityKind::Invitation,
        EntityKind::Membership,
    ],
    nulled: &[],
    owns_images: false,
};

/// A membership drags along the member's frames and likes inside the galerie.
const MEMBERSHIP: CascadeNode = CascadeNode {
    kind: EntityKind::Membership,
    dependents: &[EntityKind::Frame, EntityKind::Like],
    nulled: &[],
    owns_images: false,
};

const FRAME: CascadeNode = CascadeNode {
    kind: EntityKind::Frame,
    dependents: &[EntityKind::Like, EntityKind::GaleriePicture],
    nulled: &[],
    owns_images: false,
};

const GALERIE_PICTURE: CascadeNode = CascadeNode {
    kind: EntityKind::GaleriePicture,
    dependents: &[],
    nulled: &[],
    owns_images: true,
};

const PROFILE_PICTURE: CascadeNode = CascadeNode {
    kind: EntityKind::ProfilePicture,
    dependents: &[],
    nulled: &[],
    owns_images: true,
};

const fn leaf(kind: EntityKind) -> CascadeNode {
    CascadeNode {
        kind,
        dependents: &[],
        nulled: &[],
        owns_images: false,
    }
}

/// Cascade declaration of `kind`.
#[must_use]
pub const fn node(kind: EntityKind) -> CascadeNode {
    match kind {
        EntityKind::User => USER,
        EntityKind::Galerie => GALERIE,
        EntityKind::Membership => MEMBERSHIP,
        EntityKind::Frame => FRAME,
        EntityKind::GaleriePicture => GALERIE_PICTURE,
        EntityKind::ProfilePicture => PROFILE_PICTURE,
        EntityKind::Image
        | EntityKind::Like
        | EntityKind::Invitation
        | EntityKind::BlackList
        | EntityKind::Ticket => leaf(kind),
    }
}

/// Children-before-parents order in which a cascade rooted at `root`
/// destroys entity kinds. Ends with `root`.
///
/// Every image owner is followed by [`EntityKind::Image`]: the picture row
/// is removed first so the image row is no longer referenced when it goes.
/// Other kinds appear once.
#[must_use]
pub fn deletion_order(root: EntityKind) -> Vec<EntityKind> {
    fn visit(kind: EntityKind, seen: &mut HashSet<EntityKind>, order: &mut Vec<EntityKind>) {
        if !seen.insert(kind) {
            return;
        }
        let node = node(kind);
        for dependent in node.dependents {
            visit(*dependent, seen, order);
        }
        order.push(kind);
        if node.owns_images {
            order.push(EntityKind::Image);
        }
    }

    let mut seen = HashSet::new();
    let mut order = Vec::new();
    visit(root, &mut seen, &mut order);
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use EntityKind::*;

    fn position(order: &[EntityKind], kind: EntityKind) -> usize {
        order.iter().position(|k| *k == kind).unwrap()
    }

    #[test]
    fn test_frame_order() {
        assert_eq!(
            deletion_order(Frame),
            vec![Like, GaleriePicture, Image, Frame]
        );
    }

    #[test]
    fn test_galerie_order() {
        assert_eq!(
            deletion_order(Galerie),
            vec![
                Like,
                GaleriePicture,
                Image,
                Frame,
                Invitation,
                Membership,
                Galerie
            ]
        );
    }

    #[test]
    fn test_user_order_children_first() {
        let order = deletion_order(User);

        assert_eq!(order.last(), Some(&User));
        assert!(position(&order, ProfilePicture) < position(&order, Image));
        assert!(position(&order, Like) < position(&order, Frame));
        assert!(position(&order, Frame) < position(&order, Membership));
        assert!(position(&order, Membership) < position(&order, Invitation));
        assert_eq!(order.iter().filter(|k| **k == Image).count(), 2);
        let others: Vec<_> = order.iter().filter(|k| **k != Image).collect();
        let unique: HashSet<_> = others.iter().collect();
        assert_eq!(unique.len(), others.len());
    }

    #[test]
    fn test_user_nulled_references() {
        let nulled = node(User).nulled;

        assert!(nulled.contains(&NulledRef {
            kind: Ticket,
            column: "user_id"
        }));
        assert_eq!(nulled.iter().filter(|r| r.kind == BlackList).count(), 2);
    }

    #[test]
    fn test_only_pictures_own_images() {
        let owners: Vec<_> = [
            User,
            Galerie,
            Membership,
            Frame,
            GaleriePicture,
            ProfilePicture,
            Image,
            Like,
            Invitation,
            BlackList,
            Ticket,
        ]
        .into_iter()
        .filter(|k| node(*k).owns_images)
        .collect();

        assert_eq!(owners, vec![GaleriePicture, ProfilePicture]);
    }
}
