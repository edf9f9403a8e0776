//! Authorization gate for cascade-triggering actions.
//!
//! Pure and total: every combination of roles yields a decision, and no
//! store is consulted. Callers resolve the roles first and ask afterwards,
//! before any mutation.

use galerie_common::{AppError, AppResult};
use galerie_db::entities::galerie_user::GalerieRole;
use galerie_db::entities::user::UserRole;
use serde::{Deserialize, Serialize};

/// Authenticated caller of an orchestrator entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub role: UserRole,
}

impl Actor {
    #[must_use]
    pub fn new(id: impl Into<String>, role: UserRole) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }
}

/// Actions guarded by the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    BlackListUser,
    RemoveMember,
    DeleteGalerie,
    DeleteFrame,
    DeleteUser,
    DeleteProfilePicture,
    DeleteTicket,
}

/// Role state the gate decides on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateRequest {
    pub action: Action,
    pub actor_role: UserRole,
    /// Actor's membership in the galerie concerned, if any.
    pub actor_membership: Option<GalerieRole>,
    pub target_role: Option<UserRole>,
    /// Target's membership in the galerie concerned, if any.
    pub target_membership: Option<GalerieRole>,
    /// Whether the target is the actor or owned by the actor.
    pub targets_self: bool,
}

impl GateRequest {
    /// A request with no galerie context and no target.
    #[must_use]
    pub const fn new(action: Action, actor_role: UserRole) -> Self {
        Self {
            action,
            actor_role,
            actor_membership: None,
            target_role: None,
            target_membership: None,
            targets_self: false,
        }
    }

    #[must_use]
    pub const fn actor_membership(mut self, role: Option<GalerieRole>) -> Self {
        self.actor_membership = role;
        self
    }

    #[must_use]
    pub const fn target_role(mut self, role: UserRole) -> Self {
        self.target_role = Some(role);
        self
    }

    #[must_use]
    pub const fn target_membership(mut self, role: GalerieRole) -> Self {
        self.target_membership = Some(role);
        self
    }

    #[must_use]
    pub const fn targets_self(mut self, targets_self: bool) -> Self {
        self.targets_self = targets_self;
        self
    }
}

/// Whether the action is allowed.
#[must_use]
pub const fn can_perform(request: &GateRequest) -> bool {
    match request.action {
        Action::BlackListUser => {
            !request.targets_self
                && matches!(
                    (request.actor_role, request.target_role),
                    (UserRole::SuperAdmin, Some(UserRole::User | UserRole::Admin))
                        | (UserRole::Admin, Some(UserRole::User))
                )
        }
        Action::RemoveMember => {
            !request.targets_self
                && match (request.actor_membership, request.target_membership) {
                    (Some(actor), Some(target)) => actor.can_remove(target),
                    _ => false,
                }
        }
        Action::DeleteGalerie => matches!(request.actor_membership, Some(GalerieRole::Creator)),
        // Any member may delete any frame of the galerie.
        Action::DeleteFrame => request.actor_membership.is_some(),
        Action::DeleteUser | Action::DeleteProfilePicture => request.targets_self,
        Action::DeleteTicket => request.actor_role.is_super_admin(),
    }
}

/// Turn a denial into a `Forbidden` error.
pub fn authorize(request: &GateRequest) -> AppResult<()> {
    if can_perform(request) {
        return Ok(());
    }

    let message = match request.action {
        Action::BlackListUser if request.targets_self => "you can't black list yourself",
        Action::BlackListUser => "you can't black list this user",
        Action::RemoveMember if request.targets_self => {
            "you can't remove yourself from a galerie"
        }
        Action::RemoveMember => "you can't remove this user",
        Action::DeleteGalerie => "you're not allowed to delete this galerie",
        Action::DeleteFrame => "you're not allowed to delete this frame",
        Action::DeleteUser => "you can only delete your own account",
        Action::DeleteProfilePicture => "you're not allowed to delete this profile picture",
        Action::DeleteTicket => "you're not allowed to delete tickets",
    };

    Err(AppError::Forbidden(message.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER_ROLES: [UserRole; 3] = [UserRole::User, UserRole::Admin, UserRole::SuperAdmin];
    const GALERIE_ROLES: [Option<GalerieRole>; 4] = [
        None,
        Some(GalerieRole::User),
        Some(GalerieRole::Admin),
        Some(GalerieRole::Creator),
    ];

    fn black_list(actor: UserRole, target: UserRole) -> bool {
        can_perform(&GateRequest::new(Action::BlackListUser, actor).target_role(target))
    }

    fn remove(actor: GalerieRole, target: GalerieRole) -> bool {
        can_perform(
            &GateRequest::new(Action::RemoveMember, UserRole::User)
                .actor_membership(Some(actor))
                .target_membership(target),
        )
    }

    #[test]
    fn test_black_list_truth_table() {
        use UserRole::{Admin, SuperAdmin, User};

        let table = [
            (User, User, false),
            (User, Admin, false),
            (User, SuperAdmin, false),
            (Admin, User, true),
            (Admin, Admin, false),
            (Admin, SuperAdmin, false),
            (SuperAdmin, User, true),
            (SuperAdmin, Admin, true),
            (SuperAdmin, SuperAdmin, false),
        ];
        for (actor, target, expected) in table {
            assert_eq!(black_list(actor, target), expected, "{actor:?} -> {target:?}");
        }
    }

    #[test]
    fn test_nobody_black_lists_themselves() {
        for role in USER_ROLES {
            let request = GateRequest::new(Action::BlackListUser, role)
                .target_role(UserRole::User)
                .targets_self(true);
            assert!(!can_perform(&request));
        }
    }

    #[test]
    fn test_remove_member_truth_table() {
        use GalerieRole::{Admin, Creator, User};

        let table = [
            (User, User, false),
            (User, Admin, false),
            (User, Creator, false),
            (Admin, User, true),
            (Admin, Admin, false),
            (Admin, Creator, false),
            (Creator, User, true),
            (Creator, Admin, true),
            (Creator, Creator, false),
        ];
        for (actor, target, expected) in table {
            assert_eq!(remove(actor, target), expected, "{actor:?} -> {target:?}");
        }
    }

    #[test]
    fn test_remove_member_requires_both_memberships() {
        let no_actor = GateRequest::new(Action::RemoveMember, UserRole::SuperAdmin)
            .target_membership(GalerieRole::User);
        let no_target = GateRequest::new(Action::RemoveMember, UserRole::SuperAdmin)
            .actor_membership(Some(GalerieRole::Creator));

        assert!(!can_perform(&no_actor));
        assert!(!can_perform(&no_target));
    }

    #[test]
    fn test_remove_self_is_denied() {
        let request = GateRequest::new(Action::RemoveMember, UserRole::User)
            .actor_membership(Some(GalerieRole::Creator))
            .target_membership(GalerieRole::User)
            .targets_self(true);

        assert!(!can_perform(&request));
    }

    #[test]
    fn test_galerie_actions() {
        for role in USER_ROLES {
            for membership in GALERIE_ROLES {
                let delete_galerie =
                    GateRequest::new(Action::DeleteGalerie, role).actor_membership(membership);
                let delete_frame =
                    GateRequest::new(Action::DeleteFrame, role).actor_membership(membership);

                assert_eq!(
                    can_perform(&delete_galerie),
                    membership == Some(GalerieRole::Creator)
                );
                assert_eq!(can_perform(&delete_frame), membership.is_some());
            }
        }
    }

    #[test]
    fn test_self_only_actions() {
        for role in USER_ROLES {
            for action in [Action::DeleteUser, Action::DeleteProfilePicture] {
                assert!(can_perform(&GateRequest::new(action, role).targets_self(true)));
                assert!(!can_perform(&GateRequest::new(action, role)));
            }
        }
    }

    #[test]
    fn test_delete_ticket_super_admin_only() {
        for role in USER_ROLES {
            assert_eq!(
                can_perform(&GateRequest::new(Action::DeleteTicket, role)),
                role == UserRole::SuperAdmin
            );
        }
    }

    #[test]
    fn test_authorize_maps_to_forbidden() {
        let request = GateRequest::new(Action::DeleteTicket, UserRole::Admin);
        assert!(matches!(authorize(&request), Err(AppError::Forbidden(_))));

        let request = GateRequest::new(Action::DeleteTicket, UserRole::SuperAdmin);
        assert!(authorize(&request).is_ok());
    }
}
