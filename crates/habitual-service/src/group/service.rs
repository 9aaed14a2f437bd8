//! Group membership workflows.

use diesel_async::AsyncPgConnection;
use serde::Deserialize;

use habitual_db::{
    db::{enums, query},
    model::{
        group::{
            Group, NewGroup,
            member::{GroupMember, NewGroupMember},
        },
        user::User,
    },
};

use super::invite::generate_invite_code;
use super::role::{authorize_role_change, parse_role};
use crate::error::{ServiceError, ServiceResult, is_unique_violation};

/// Attempts at finding an unused invite code before giving up.
const INVITE_CODE_ATTEMPTS: usize = 3;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroupForm {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinForm {
    pub invite_code: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoleForm {
    pub role: Option<String>,
}

/// A group with its owner and members (earliest joiner first).
#[derive(Debug, Clone)]
pub struct GroupDetails {
    pub group: Group,
    pub owner: User,
    pub members: Vec<(GroupMember, User)>,
}

impl GroupDetails {
    #[must_use]
    pub fn is_visible_to(&self, user_id: uuid::Uuid) -> bool {
        self.group.owner_id == user_id || self.members.iter().any(|(m, _)| m.user_id == user_id)
    }
}

async fn details(conn: &mut AsyncPgConnection, group: Group) -> ServiceResult<GroupDetails> {
    let owner = query::user::find_by_id(conn, group.owner_id)
        .await?
        .ok_or(ServiceError::InvariantViolation("group owner row is missing"))?;
    let members = query::group::members_with_users(conn, group.id).await?;

    Ok(GroupDetails {
        group,
        owner,
        members,
    })
}

async fn find_group(conn: &mut AsyncPgConnection, group_id: uuid::Uuid) -> ServiceResult<Group> {
    query::group::find_by_id(conn, group_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Group not found"))
}

/// ## Summary
/// Lists the groups the user owns or belongs to, newest first.
///
/// ## Errors
/// Returns a database error if a query fails.
#[tracing::instrument(skip(conn), fields(user_id = %user_id))]
pub async fn list_groups(
    conn: &mut AsyncPgConnection,
    user_id: uuid::Uuid,
) -> ServiceResult<Vec<GroupDetails>> {
    let groups = query::group::list_for_user(conn, user_id).await?;

    let mut result = Vec::with_capacity(groups.len());
    for group in groups {
        result.push(details(conn, group).await?);
    }
    Ok(result)
}

/// ## Summary
/// Creates a group owned by the user with a fresh invite code.
///
/// ## Errors
/// Returns a `ValidationError` when the name is missing, `Conflict` if no
/// unused invite code was found.
#[tracing::instrument(skip(conn, form), fields(user_id = %user_id))]
pub async fn create_group(
    conn: &mut AsyncPgConnection,
    user_id: uuid::Uuid,
    form: &GroupForm,
) -> ServiceResult<GroupDetails> {
    let name = form
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ServiceError::validation("Group name is required"))?;

    for attempt in 1..=INVITE_CODE_ATTEMPTS {
        let invite_code = generate_invite_code();
        let new_group = NewGroup {
            name,
            description: form.description.as_deref(),
            invite_code: &invite_code,
            owner_id: user_id,
        };

        match query::group::create_group(conn, &new_group).await {
            Ok(group) => {
                tracing::info!(group_id = %group.id, "Group created");
                return details(conn, group).await;
            }
            Err(err) if is_unique_violation(&err) => {
                tracing::warn!(attempt, "Invite code collision");
            }
            Err(err) => return Err(err.into()),
        }
    }

    Err(ServiceError::Conflict(
        "Could not allocate an invite code".to_string(),
    ))
}

/// ## Errors
/// Returns `NotFound` for an unknown group and `AuthorizationError` when the
/// user is neither its owner nor a member.
#[tracing::instrument(skip(conn), fields(user_id = %user_id, group_id = %group_id))]
pub async fn get_group(
    conn: &mut AsyncPgConnection,
    user_id: uuid::Uuid,
    group_id: uuid::Uuid,
) -> ServiceResult<GroupDetails> {
    let group = find_group(conn, group_id).await?;
    let details = details(conn, group).await?;

    if !details.is_visible_to(user_id) {
        return Err(ServiceError::AuthorizationError(
            "You are not a member of this group".to_string(),
        ));
    }

    Ok(details)
}

/// ## Summary
/// Adds the user to the group with the given invite code as a plain member.
///
/// ## Errors
/// - `ValidationError` for a missing code or when already owner or member
/// - `NotFound` ("Invalid invite code") for an unknown code
#[tracing::instrument(skip(conn, form), fields(user_id = %user_id))]
pub async fn join_group(
    conn: &mut AsyncPgConnection,
    user_id: uuid::Uuid,
    form: &JoinForm,
) -> ServiceResult<(GroupMember, Group)> {
    let already_member = || ServiceError::validation("You are already a member of this group");

    let invite_code = form
        .invite_code
        .as_deref()
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .ok_or_else(|| ServiceError::validation("Invite code is required"))?;

    let group = query::group::find_by_invite_code(conn, invite_code)
        .await?
        .ok_or_else(|| ServiceError::not_found("Invalid invite code"))?;

    if group.owner_id == user_id
        || query::group::find_membership(conn, group.id, user_id)
            .await?
            .is_some()
    {
        return Err(already_member());
    }

    let new_member = NewGroupMember {
        user_id,
        group_id: group.id,
        role: enums::MemberRole::Member,
    };
    let member = match query::group::add_member(conn, &new_member).await {
        Ok(member) => member,
        Err(err) if is_unique_violation(&err) => return Err(already_member()),
        Err(err) => return Err(err.into()),
    };

    tracing::info!(group_id = %group.id, "Joined group");

    Ok((member, group))
}

/// ## Errors
/// - `ValidationError` when the user owns the group
/// - `NotFound` when the user is not a member
#[tracing::instrument(skip(conn), fields(user_id = %user_id, group_id = %group_id))]
pub async fn leave_group(
    conn: &mut AsyncPgConnection,
    user_id: uuid::Uuid,
    group_id: uuid::Uuid,
) -> ServiceResult<()> {
    if let Some(group) = query::group::find_by_id(conn, group_id).await?
        && group.owner_id == user_id
    {
        return Err(ServiceError::validation(
            "Group owners cannot leave their own group. Transfer ownership or delete the group instead.",
        ));
    }

    let membership = query::group::find_membership(conn, group_id, user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("You are not a member of this group"))?;

    let _member_row_count = query::group::remove_member(conn, membership.id).await?;
    tracing::info!("Left group");

    Ok(())
}

/// ## Summary
/// Sets the role of a membership after checking the actor's rights.
///
/// ## Errors
/// See [`authorize_role_change`]; also `ValidationError` for an unknown role
/// and `NotFound` for an unknown group.
#[tracing::instrument(skip(conn, form), fields(actor_id = %actor_id, group_id = %group_id, member_id = %member_id))]
pub async fn change_member_role(
    conn: &mut AsyncPgConnection,
    actor_id: uuid::Uuid,
    group_id: uuid::Uuid,
    member_id: uuid::Uuid,
    form: &RoleForm,
) -> ServiceResult<(GroupMember, User)> {
    let new_role = parse_role(form.role.as_deref())?;
    let group = find_group(conn, group_id).await?;
    let members = query::group::members_with_users(conn, group.id).await?;

    let memberships: Vec<GroupMember> = members.iter().map(|(m, _)| m.clone()).collect();
    let target = authorize_role_change(&group, &memberships, actor_id, member_id, new_role)?;

    let updated = query::group::set_member_role(conn, target.id, new_role.into()).await?;
    let user = members
        .into_iter()
        .find_map(|(m, user)| (m.id == updated.id).then_some(user))
        .ok_or(ServiceError::InvariantViolation("updated member has no user"))?;

    tracing::info!(target_user_id = %updated.user_id, role = %new_role, "Member role updated");

    Ok((updated, user))
}
