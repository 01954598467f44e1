use axum::http::StatusCode;
use uuid::Uuid;

use super::{roles::Role, roles::STAFF_LEVEL, User};

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum AuthorizationError {
    #[error("Administrative access requires the Staff rank or higher.")]
    BelowStaff,
    #[error("Users cannot change their own role.")]
    SelfRoleChange,
    #[error("Only a Fondateur can grant the Fondateur rank.")]
    TopRoleReserved,
    #[error("Target user's rank is not below yours.")]
    TargetNotBelow,
    #[error("Stored role reference could not be resolved.")]
    UnresolvedRole,
}

impl AuthorizationError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::FORBIDDEN
    }
}

/// Route-level gate for administrative views.
pub fn can_view_admin(role: Role) -> bool {
    role.level() >= STAFF_LEVEL
}

/// Only the top rank may hand out the top rank. Outranking the target is
/// not enough for this one.
pub fn can_assign_role(acting: Role, new_role: Role) -> bool {
    new_role != Role::TOP || acting == Role::TOP
}

/// Read access to a user record: oneself always, anyone else from
/// the staff threshold up.
pub fn can_view_user(actor: &User, target_id: Uuid) -> bool {
    actor.id == target_id || can_view_admin(actor.role)
}

/// Decides whether `actor` may replace `target`'s role with `new_role`.
pub fn authorize_role_change(
    actor: &User,
    target: &User,
    new_role: Role,
) -> Result<(), AuthorizationError> {
    if !can_view_admin(actor.role) {
        return Err(AuthorizationError::BelowStaff);
    }
    if actor.id == target.id {
        return Err(AuthorizationError::SelfRoleChange);
    }
    if !can_assign_role(actor.role, new_role) {
        return Err(AuthorizationError::TopRoleReserved);
    }
    if !actor.role.can_manage_role(target.role) {
        return Err(AuthorizationError::TargetNotBelow);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use strum::VariantArray;

    use super::*;

    fn user(handle: &str, role: Role) -> User {
        User {
            id: Uuid::now_v7(),
            username: handle.to_string(),
            email: format!("{handle}@ngmanager.test"),
            role,
        }
    }

    #[test]
    fn admin_view_threshold() {
        assert!(!can_view_admin(Role::Recrue));
        assert!(!can_view_admin(Role::Gouverneur));
        assert!(can_view_admin(Role::Staff));
        assert!(can_view_admin(Role::Fondateur));
    }

    #[test]
    fn top_role_assignment_requires_top_role() {
        for acting in Role::VARIANTS {
            assert_eq!(can_assign_role(*acting, Role::TOP), *acting == Role::TOP);
        }
        assert!(can_assign_role(Role::Staff, Role::Gouverneur));
    }

    #[test]
    fn staff_cannot_grant_fondateur_even_to_lower_rank() {
        let staff = user("staff", Role::Staff);
        let recruit = user("recrue", Role::Recrue);
        assert!(Role::Staff.can_manage_role(Role::Recrue));
        assert_eq!(
            authorize_role_change(&staff, &recruit, Role::Fondateur),
            Err(AuthorizationError::TopRoleReserved)
        );
    }

    #[test]
    fn fondateur_can_grant_fondateur() {
        let founder = user("founder", Role::Fondateur);
        let staff = user("staff", Role::Staff);
        assert_eq!(authorize_role_change(&founder, &staff, Role::Fondateur), Ok(()));
    }

    #[test]
    fn staff_promotes_and_demotes_lower_ranks() {
        let staff = user("staff", Role::Staff);
        let governor = user("gov", Role::Gouverneur);
        assert_eq!(authorize_role_change(&staff, &governor, Role::Recrue), Ok(()));
        assert_eq!(authorize_role_change(&staff, &governor, Role::Staff), Ok(()));
    }

    #[test]
    fn peers_and_superiors_are_out_of_reach() {
        let staff = user("staff", Role::Staff);
        let other_staff = user("staff2", Role::Staff);
        let founder = user("founder", Role::Fondateur);
        let other_founder = user("founder2", Role::Fondateur);
        assert_eq!(
            authorize_role_change(&staff, &other_staff, Role::Membre),
            Err(AuthorizationError::TargetNotBelow)
        );
        assert_eq!(
            authorize_role_change(&staff, &founder, Role::Membre),
            Err(AuthorizationError::TargetNotBelow)
        );
        assert_eq!(
            authorize_role_change(&founder, &other_founder, Role::Staff),
            Err(AuthorizationError::TargetNotBelow)
        );
    }

    #[test]
    fn nobody_changes_their_own_role() {
        let founder = user("founder", Role::Fondateur);
        assert_eq!(
            authorize_role_change(&founder, &founder, Role::Staff),
            Err(AuthorizationError::SelfRoleChange)
        );
    }

    #[test]
    fn below_staff_is_rejected_first() {
        let governor = user("gov", Role::Gouverneur);
        let recruit = user("recrue", Role::Recrue);
        assert!(Role::Gouverneur.can_manage_role(Role::Recrue));
        assert_eq!(
            authorize_role_change(&governor, &recruit, Role::Membre),
            Err(AuthorizationError::BelowStaff)
        );
    }

    #[test]
    fn self_is_always_readable() {
        let recruit = user("recrue", Role::Recrue);
        let other = user("membre", Role::Membre);
        let staff = user("staff", Role::Staff);
        assert!(can_view_user(&recruit, recruit.id));
        assert!(!can_view_user(&recruit, other.id));
        assert!(can_view_user(&staff, other.id));
    }
}
