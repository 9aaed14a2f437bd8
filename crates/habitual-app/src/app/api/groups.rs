//! Group endpoints.

use salvo::{Depot, Request, Response, Router, handler, http::StatusCode, writing::Json};
use serde::Serialize;

use habitual_service::{
    auth::require_user,
    group::service::{self, GroupDetails, GroupForm, JoinForm, RoleForm},
};

use super::{
    GROUPS_ROUTE_COMPONENT,
    extract::{json_body, path_id},
    response::{GroupSummary, MemberResponse, UserSummary},
};
use crate::{db_handler::get_db_from_depot, error::AppResult};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GroupResponse {
    #[serde(flatten)]
    group: GroupSummary,
    owner: UserSummary,
    members: Vec<MemberResponse>,
}

impl From<GroupDetails> for GroupResponse {
    fn from(details: GroupDetails) -> Self {
        Self {
            group: details.group.into(),
            owner: details.owner.into(),
            members: details
                .members
                .into_iter()
                .map(|(member, user)| MemberResponse::new(member, user))
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MembershipResponse {
    id: uuid::Uuid,
    user_id: uuid::Uuid,
    group_id: uuid::Uuid,
    role: habitual_core::types::MemberRole,
    joined_at: chrono::DateTime<chrono::Utc>,
    group: GroupSummary,
}

#[derive(Debug, Serialize)]
struct LeaveResponse {
    message: &'static str,
    success: bool,
}

#[derive(Debug, Serialize)]
struct RoleChangeResponse {
    member: MemberResponse,
    message: String,
}

/// ## Summary
/// GET /api/groups - Groups the caller owns or belongs to
#[handler]
#[tracing::instrument(skip_all)]
async fn list_groups(depot: &mut Depot) -> AppResult<Json<Vec<GroupResponse>>> {
    let user = require_user(depot)?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;
    let groups = service::list_groups(&mut conn, user.id).await?;

    Ok(Json(groups.into_iter().map(GroupResponse::from).collect()))
}

/// ## Summary
/// POST /api/groups - Creates a group owned by the caller
#[handler]
#[tracing::instrument(skip_all)]
async fn create_group(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> AppResult<Json<GroupResponse>> {
    let user = require_user(depot)?;
    let form: GroupForm = json_body(req).await?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;
    let group = service::create_group(&mut conn, user.id, &form).await?;

    res.status_code(StatusCode::CREATED);
    Ok(Json(group.into()))
}

/// ## Summary
/// GET /api/groups/{id} - One group, visible to its owner and members
#[handler]
#[tracing::instrument(skip_all)]
async fn get_group(req: &mut Request, depot: &mut Depot) -> AppResult<Json<GroupResponse>> {
    let user = require_user(depot)?;
    let group_id = path_id(req, "id", "Group")?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;
    let group = service::get_group(&mut conn, user.id, group_id).await?;

    Ok(Json(group.into()))
}

/// ## Summary
/// POST /api/groups/join - Joins a group by invite code as a plain member
#[handler]
#[tracing::instrument(skip_all)]
async fn join_group(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> AppResult<Json<MembershipResponse>> {
    let user = require_user(depot)?;
    let form: JoinForm = json_body(req).await?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;
    let (member, group) = service::join_group(&mut conn, user.id, &form).await?;

    res.status_code(StatusCode::CREATED);
    Ok(Json(MembershipResponse {
        id: member.id,
        user_id: member.user_id,
        group_id: member.group_id,
        role: member.role.into(),
        joined_at: member.joined_at,
        group: group.into(),
    }))
}

/// ## Summary
/// DELETE /api/groups/{id}/leave - Leaves a group; owners cannot
#[handler]
#[tracing::instrument(skip_all)]
async fn leave_group(req: &mut Request, depot: &mut Depot) -> AppResult<Json<LeaveResponse>> {
    let user = require_user(depot)?;
    let group_id = path_id(req, "id", "Group")?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;
    service::leave_group(&mut conn, user.id, group_id).await?;

    Ok(Json(LeaveResponse {
        message: "Successfully left the group",
        success: true,
    }))
}

/// ## Summary
/// PATCH /api/groups/{id}/members/{member_id}/role - Promotes or demotes a member
///
/// ## Errors
/// Returns HTTP 403 unless the caller owns the group or is one of its admins.
#[handler]
#[tracing::instrument(skip_all)]
async fn change_role(req: &mut Request, depot: &mut Depot) -> AppResult<Json<RoleChangeResponse>> {
    let user = require_user(depot)?;
    let group_id = path_id(req, "id", "Group")?;
    let member_id = path_id(req, "member_id", "Member")?;
    let form: RoleForm = json_body(req).await?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;
    let (member, member_user) =
        service::change_member_role(&mut conn, user.id, group_id, member_id, &form).await?;

    let message = format!("Successfully updated role to {}", member.role);
    Ok(Json(RoleChangeResponse {
        member: MemberResponse::new(member, member_user),
        message,
    }))
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(GROUPS_ROUTE_COMPONENT)
        .get(list_groups)
        .post(create_group)
        .push(Router::with_path("join").post(join_group))
        .push(
            Router::with_path("{id}")
                .get(get_group)
                .push(Router::with_path("leave").delete(leave_group))
                .push(Router::with_path("members/{member_id}/role").patch(change_role)),
        )
}
