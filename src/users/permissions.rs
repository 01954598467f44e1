use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, VariantArray};
use utoipa::ToSchema;

/// Capabilities granted by roles. Permissions are atomic:
/// holding one never implies holding another.
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
    AsRefStr,
    Serialize,
    Deserialize,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Permission {
    // global administration
    ManageUsers,
    ManageAllCountries,
    ViewLogs,
    ManageStaff,

    // country leadership
    ManageCountry,
    ManageMembers,
    ManageRoles,
    DeleteCountry,

    // day-to-day moderation
    ValidateCreations,
    ManageRequests,
    KickMembers,
    SendAnnouncements,

    // regular membership
    CreateContent,
    MakeRequests,
    UseChat,
    ViewHistory,

    ViewContent,
    SendJoinRequest,
}

#[test]
fn permission_names_are_snake_case() {
    assert_eq!(Permission::ManageUsers.to_string(), "manage_users");
    assert_eq!(Permission::SendJoinRequest.as_ref(), "send_join_request");
    assert_eq!(
        serde_json::to_string(&Permission::ManageAllCountries).unwrap(),
        "\"manage_all_countries\""
    );
}

#[test]
fn permission_parses_from_tag() {
    use std::str::FromStr;

    assert_eq!(
        Permission::from_str("validate_creations").unwrap(),
        Permission::ValidateCreations
    );
    assert!(Permission::from_str("launch_missiles").is_err());
}

#[test]
fn permission_tags_are_unique() {
    use std::collections::HashSet;

    let tags: HashSet<String> = Permission::VARIANTS.iter().map(|p| p.to_string()).collect();
    assert_eq!(tags.len(), Permission::VARIANTS.len());
}
