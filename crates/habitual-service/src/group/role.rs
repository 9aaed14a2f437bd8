//! Membership rules that need no database access.

use habitual_core::types::MemberRole;
use habitual_db::model::group::{Group, member::GroupMember};

use crate::error::{ServiceError, ServiceResult};

/// ## Summary
/// Parses a requested role name.
///
/// ## Errors
/// Returns a `ValidationError` ("Invalid role") for anything but member/admin.
pub fn parse_role(role: Option<&str>) -> ServiceResult<MemberRole> {
    role.and_then(|role| role.trim().parse().ok())
        .ok_or_else(|| ServiceError::validation("Invalid role"))
}

fn role_of(member: &GroupMember) -> MemberRole {
    member.role.into()
}

/// ## Summary
/// Checks whether `actor_id` may give `member_id` the role `new_role`, and
/// returns the targeted membership.
///
/// `members` are all memberships of `group`.
///
/// ## Errors
/// - `AuthorizationError` unless the actor owns the group or is an admin
/// - `NotFound` when `member_id` is not a membership of the group
/// - `ValidationError` when demoting the owner, or when an admin demotes
///   themself while no other admin remains
pub fn authorize_role_change<'a>(
    group: &Group,
    members: &'a [GroupMember],
    actor_id: uuid::Uuid,
    member_id: uuid::Uuid,
    new_role: MemberRole,
) -> ServiceResult<&'a GroupMember> {
    let is_owner = group.owner_id == actor_id;
    let is_admin = members
        .iter()
        .any(|m| m.user_id == actor_id && role_of(m) == MemberRole::Admin);
    if !is_owner && !is_admin {
        return Err(ServiceError::AuthorizationError(
            "Only owners and admins can change roles".to_string(),
        ));
    }

    let target = members
        .iter()
        .find(|m| m.id == member_id)
        .ok_or_else(|| ServiceError::not_found("Member not found"))?;

    let demoting = new_role == MemberRole::Member;

    if demoting && target.user_id == group.owner_id {
        return Err(ServiceError::validation("Cannot demote group owner"));
    }

    if demoting && target.user_id == actor_id && role_of(target) == MemberRole::Admin {
        let other_admins = members
            .iter()
            .filter(|m| m.user_id != actor_id)
            .filter(|m| role_of(m) == MemberRole::Admin || m.user_id == group.owner_id)
            .count();
        if other_admins == 0 {
            return Err(ServiceError::validation(
                "Cannot demote yourself - at least one other admin must remain",
            ));
        }
    }

    Ok(target)
}

/// ## Summary
/// Picks who inherits a group from a departing owner: the earliest admin,
/// else the earliest member, else nobody.
#[must_use]
pub fn ownership_successor(members: &[GroupMember]) -> Option<&GroupMember> {
    members
        .iter()
        .filter(|m| role_of(m) == MemberRole::Admin)
        .min_by_key(|m| m.joined_at)
        .or_else(|| members.iter().min_by_key(|m| m.joined_at))
}
