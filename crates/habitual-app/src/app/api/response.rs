//! JSON response bodies shared by several endpoints.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use habitual_core::types::{Frequency, MemberRole};
use habitual_db::model::{
    group::{Group, member::GroupMember},
    habit::{Habit, entry::HabitEntry},
    user::User,
};

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Public fields of a user.
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: uuid::Uuid,
    pub email: String,
    pub name: String,
    pub avatar: Option<String>,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            avatar: user.avatar,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitResponse {
    pub id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub name: String,
    pub description: Option<String>,
    pub color: String,
    pub frequency: Frequency,
    pub target: i32,
    pub unit: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub habit_entries: Option<Vec<EntryResponse>>,
}

impl From<Habit> for HabitResponse {
    fn from(habit: Habit) -> Self {
        Self {
            id: habit.id,
            user_id: habit.user_id,
            name: habit.name,
            description: habit.description,
            color: habit.color,
            frequency: habit.frequency.into(),
            target: habit.target,
            unit: habit.unit,
            is_active: habit.is_active,
            created_at: habit.created_at,
            updated_at: habit.updated_at,
            habit_entries: None,
        }
    }
}

impl HabitResponse {
    pub fn with_entries(habit: Habit, entries: Vec<HabitEntry>) -> Self {
        Self {
            habit_entries: Some(entries.into_iter().map(EntryResponse::from).collect()),
            ..Self::from(habit)
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryResponse {
    pub id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub habit_id: uuid::Uuid,
    pub date: NaiveDate,
    pub value: i32,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub habit: Option<Box<HabitResponse>>,
}

impl From<HabitEntry> for EntryResponse {
    fn from(entry: HabitEntry) -> Self {
        Self {
            id: entry.id,
            user_id: entry.user_id,
            habit_id: entry.habit_id,
            date: entry.entry_date,
            value: entry.value,
            notes: entry.notes,
            created_at: entry.created_at,
            updated_at: entry.updated_at,
            habit: None,
        }
    }
}

impl EntryResponse {
    pub fn with_habit(entry: HabitEntry, habit: Habit) -> Self {
        Self {
            habit: Some(Box::new(habit.into())),
            ..Self::from(entry)
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSummary {
    pub id: uuid::Uuid,
    pub name: String,
    pub description: Option<String>,
    pub invite_code: String,
    pub owner_id: uuid::Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Group> for GroupSummary {
    fn from(group: Group) -> Self {
        Self {
            id: group.id,
            name: group.name,
            description: group.description,
            invite_code: group.invite_code,
            owner_id: group.owner_id,
            created_at: group.created_at,
            updated_at: group.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberResponse {
    pub id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub group_id: uuid::Uuid,
    pub role: MemberRole,
    pub joined_at: DateTime<Utc>,
    pub user: UserSummary,
}

impl MemberResponse {
    pub fn new(member: GroupMember, user: User) -> Self {
        Self {
            id: member.id,
            user_id: member.user_id,
            group_id: member.group_id,
            role: member.role.into(),
            joined_at: member.joined_at,
            user: user.into(),
        }
    }
}
