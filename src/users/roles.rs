use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr, VariantArray};
use utoipa::ToSchema;

use super::permissions::Permission;

/// Ranks a user can hold. Every user holds exactly one.
///
/// The discriminant is the role's level. Levels are strictly increasing
/// in declaration order and the gaps between them are reserved for ranks
/// that may be inserted later. Comparing levels is the only way one rank
/// is considered higher than another.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    VariantArray,
    EnumIter,
    Display,
    EnumString,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[repr(i32)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    /// Newcomer. Can look around and ask to join a country.
    Recrue = 10,
    /// Confirmed member with standard access.
    Membre = 20,
    /// The governor's right hand, handles daily moderation.
    Officier = 40,
    /// Leader of a country, holds every power within it.
    Gouverneur = 60,
    /// Management team with limited administrative access.
    Staff = 80,
    /// Creator of the platform. Holds every permission.
    Fondateur = 100,
}

/// Lowest level allowed onto administrative surfaces.
pub const STAFF_LEVEL: i32 = Role::Staff.level();

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RoleError {
    #[error("Role not found: {0}")]
    NotFound(String),
}

impl Role {
    /// The highest rank. Only its holders may hand it out.
    pub const TOP: Role = Role::Fondateur;

    pub const fn level(self) -> i32 {
        self as i32
    }

    /// Stable lowercase identifier, also used as the storage key.
    pub fn id(self) -> &'static str {
        self.into()
    }

    pub fn name(self) -> &'static str {
        match self {
            Role::Recrue => "Recrue",
            Role::Membre => "Membre",
            Role::Officier => "Officier",
            Role::Gouverneur => "Gouverneur",
            Role::Staff => "Staff",
            Role::Fondateur => "Fondateur",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Role::Recrue => "#888888",
            Role::Membre => "#00aaff",
            Role::Officier => "#00ff88",
            Role::Gouverneur => "#ffd700",
            Role::Staff => "#ff6b00",
            Role::Fondateur => "#ff0000",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Role::Recrue => "🔰",
            Role::Membre => "🎖️",
            Role::Officier => "⭐",
            Role::Gouverneur => "👑",
            Role::Staff => "🟠",
            Role::Fondateur => "🔴",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Role::Recrue => "Nouveau membre - Accès limité",
            Role::Membre => "Membre confirmé - Accès standard",
            Role::Officier => "Bras droit du gouverneur - Gestion quotidienne",
            Role::Gouverneur => "Dirigeant du pays - Tous les pouvoirs dans son pays",
            Role::Staff => "Équipe de gestion - Accès limité à l'administration",
            Role::Fondateur => "Créateur de NG Manager - Accès total",
        }
    }

    pub fn get_role_permissions(self) -> &'static [Permission] {
        use Permission as P;
        match self {
            Role::Fondateur => P::VARIANTS, // all permissions
            Role::Staff => &[
                P::ViewLogs,
                P::ManageAllCountries,
                P::ManageUsers,
                P::ValidateCreations,
                P::ManageRequests,
            ],
            Role::Gouverneur => &[
                P::ManageCountry,
                P::ManageMembers,
                P::ManageRoles,
                P::DeleteCountry,
                P::ValidateCreations,
                P::ManageRequests,
                P::KickMembers,
                P::SendAnnouncements,
                P::CreateContent,
                P::MakeRequests,
                P::UseChat,
                P::ViewHistory,
                P::ViewContent,
            ],
            Role::Officier => &[
                P::ValidateCreations,
                P::ManageRequests,
                P::KickMembers,
                P::SendAnnouncements,
                P::CreateContent,
                P::MakeRequests,
                P::UseChat,
                P::ViewHistory,
                P::ViewContent,
            ],
            Role::Membre => &[
                P::CreateContent,
                P::MakeRequests,
                P::UseChat,
                P::ViewHistory,
                P::ViewContent,
            ],
            Role::Recrue => &[P::ViewContent, P::UseChat, P::SendJoinRequest],
        }
    }

    pub fn has_permission(self, permission: Permission) -> bool {
        self.get_role_permissions().contains(&permission)
    }

    /// Whether a holder of `self` may act upon a holder of `target`.
    /// Strict: peers and oneself are never manageable.
    pub fn can_manage_role(self, target: Role) -> bool {
        self.level() > target.level()
    }

    pub fn get_by_level(level: i32) -> Result<Role, RoleError> {
        Role::VARIANTS
            .iter()
            .copied()
            .find(|role| role.level() == level)
            .ok_or_else(|| RoleError::NotFound(format!("level {level}")))
    }

    /// Case-insensitive.
    pub fn get_by_id(id: &str) -> Result<Role, RoleError> {
        Role::from_str(id).map_err(|_| RoleError::NotFound(format!("id \"{id}\"")))
    }

    pub fn descriptor(self) -> RoleDescriptor {
        RoleDescriptor {
            id: self.id(),
            name: self.name(),
            level: self.level(),
            color: self.color(),
            emoji: self.emoji(),
            description: self.description(),
            permissions: self.get_role_permissions().to_vec(),
        }
    }
}

/// Full public view of a role, as served by the role catalogue.
#[derive(Debug, Serialize, ToSchema)]
pub struct RoleDescriptor {
    pub id: &'static str,
    pub name: &'static str,
    pub level: i32,
    pub color: &'static str,
    pub emoji: &'static str,
    pub description: &'static str,
    pub permissions: Vec<Permission>,
}

/// A role reference as persisted alongside a user record.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleRef {
    pub id: String,
    pub level: i32,
}

impl RoleRef {
    /// Resolves only when the id names a role that sits at the stored level.
    /// A stale or tampered reference never falls back to another role.
    pub fn resolve(&self) -> Result<Role, RoleError> {
        let role = Role::get_by_id(&self.id)?;
        if role.level() != self.level {
            return Err(RoleError::NotFound(format!(
                "id \"{}\" at level {}",
                self.id, self.level
            )));
        }
        Ok(role)
    }
}

impl From<Role> for RoleRef {
    fn from(role: Role) -> Self {
        RoleRef {
            id: role.id().to_string(),
            level: role.level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use strum::VariantArray;

    use super::*;

    #[test]
    fn levels_are_strictly_increasing_and_unique() {
        let levels: Vec<i32> = Role::VARIANTS.iter().map(|r| r.level()).collect();
        assert_eq!(levels, vec![10, 20, 40, 60, 80, 100]);
        for pair in levels.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn ids_are_unique_and_lowercase() {
        let ids: HashSet<&str> = Role::VARIANTS.iter().map(|r| r.id()).collect();
        assert_eq!(ids.len(), Role::VARIANTS.len());
        for id in ids {
            assert_eq!(id, id.to_lowercase());
        }
        assert_eq!(Role::Gouverneur.id(), "gouverneur");
    }

    #[test]
    fn top_role_has_maximum_level() {
        let max = Role::VARIANTS.iter().map(|r| r.level()).max().unwrap();
        assert_eq!(Role::TOP.level(), max);
        assert_eq!(Role::TOP, Role::Fondateur);
    }

    #[test]
    fn top_role_holds_every_permission() {
        let top: HashSet<Permission> =
            Role::TOP.get_role_permissions().iter().copied().collect();
        let universe: HashSet<Permission> = Permission::VARIANTS.iter().copied().collect();
        assert_eq!(top, universe);
    }

    #[test]
    fn permission_lists_have_no_duplicates() {
        for role in Role::VARIANTS {
            let perms = role.get_role_permissions();
            let unique: HashSet<&Permission> = perms.iter().collect();
            assert_eq!(unique.len(), perms.len(), "{role} lists a permission twice");
        }
    }

    #[test]
    fn has_permission_matches_static_table() {
        for role in Role::VARIANTS {
            for permission in Permission::VARIANTS {
                assert_eq!(
                    role.has_permission(*permission),
                    role.get_role_permissions().contains(permission),
                );
            }
        }
        assert!(!Role::Recrue.has_permission(Permission::ManageUsers));
        assert!(Role::Fondateur.has_permission(Permission::ManageUsers));
        assert!(Role::Staff.has_permission(Permission::ViewLogs));
        assert!(!Role::Staff.has_permission(Permission::UseChat));
        assert!(Role::Recrue.has_permission(Permission::SendJoinRequest));
        assert!(!Role::Membre.has_permission(Permission::SendJoinRequest));
    }

    #[test]
    fn can_manage_role_is_strict_level_comparison() {
        for a in Role::VARIANTS {
            for b in Role::VARIANTS {
                assert_eq!(a.can_manage_role(*b), a.level() > b.level());
            }
            assert!(!a.can_manage_role(*a));
        }
    }

    #[test]
    fn staff_and_gouverneur() {
        assert!(Role::Staff.can_manage_role(Role::Gouverneur));
        assert!(!Role::Gouverneur.can_manage_role(Role::Staff));
        assert!(!Role::Staff.can_manage_role(Role::Staff));
    }

    #[test]
    fn lookups_are_inverse_consistent() {
        for role in Role::VARIANTS {
            assert_eq!(Role::get_by_level(role.level()).unwrap().id(), role.id());
            assert_eq!(Role::get_by_id(role.id()).unwrap().level(), role.level());
        }
    }

    #[test]
    fn level_gaps_do_not_resolve() {
        assert_eq!(
            Role::get_by_level(50),
            Err(RoleError::NotFound("level 50".to_string()))
        );
        for gap in [0, 30, 70, 90, 101, -10] {
            assert!(Role::get_by_level(gap).is_err());
        }
    }

    #[test]
    fn id_lookup_ignores_case() {
        assert_eq!(Role::get_by_id("STAFF"), Ok(Role::Staff));
        assert_eq!(Role::get_by_id("Fondateur"), Ok(Role::Fondateur));
        assert!(Role::get_by_id("admin").is_err());
        assert!(Role::get_by_id("").is_err());
    }

    #[test]
    fn role_serializes_as_id() {
        assert_eq!(serde_json::to_string(&Role::Officier).unwrap(), "\"officier\"");
        let parsed: Role = serde_json::from_str("\"membre\"").unwrap();
        assert_eq!(parsed, Role::Membre);
    }

    #[test]
    fn descriptor_carries_presentation_data() {
        let d = Role::Gouverneur.descriptor();
        assert_eq!(d.id, "gouverneur");
        assert_eq!(d.name, "Gouverneur");
        assert_eq!(d.level, 60);
        assert_eq!(d.color, "#ffd700");
        assert_eq!(d.permissions.len(), 13);
    }

    #[test]
    fn role_ref_resolves_only_when_consistent() {
        let staff = RoleRef::from(Role::Staff);
        assert_eq!(staff.resolve(), Ok(Role::Staff));

        let mismatched = RoleRef {
            id: "recrue".to_string(),
            level: 100,
        };
        assert!(mismatched.resolve().is_err());

        let unknown = RoleRef {
            id: "emperor".to_string(),
            level: 100,
        };
        assert!(unknown.resolve().is_err());
    }
}
