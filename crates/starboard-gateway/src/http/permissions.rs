//! Effective channel permissions of a guild member

use starboard_core::{Permissions, Snowflake};

use super::models::{OverwriteModel, RoleModel};

/// Compute a member's permissions in a channel
///
/// Guild-level permissions come from `@everyone` (the role whose id equals
/// the guild id) plus the member's roles. Channel overwrites are then applied
/// in Discord's order: `@everyone`, the member's roles combined, the member.
/// Administrators get everything and skip overwrites.
pub fn compute_channel_permissions(
    guild_id: Snowflake,
    member_id: Snowflake,
    member_roles: &[Snowflake],
    roles: &[RoleModel],
    overwrites: &[OverwriteModel],
) -> Permissions {
    let mut permissions = roles
        .iter()
        .filter(|role| role.id == guild_id || member_roles.contains(&role.id))
        .fold(Permissions::empty(), |acc, role| acc | role.permissions);

    if permissions.contains(Permissions::ADMINISTRATOR) {
        return Permissions::all();
    }

    if let Some(everyone) = overwrites
        .iter()
        .find(|o| o.kind == OverwriteModel::ROLE && o.id == guild_id)
    {
        permissions = (permissions - everyone.deny) | everyone.allow;
    }

    let (allow, deny) = overwrites
        .iter()
        .filter(|o| o.kind == OverwriteModel::ROLE && member_roles.contains(&o.id))
        .fold((Permissions::empty(), Permissions::empty()), |(allow, deny), o| {
            (allow | o.allow, deny | o.deny)
        });
    permissions = (permissions - deny) | allow;

    if let Some(member) = overwrites
        .iter()
        .find(|o| o.kind == OverwriteModel::MEMBER && o.id == member_id)
    {
        permissions = (permissions - member.deny) | member.allow;
    }

    permissions
}
