use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::application::policies::points_rank::points_rank;
use crate::modules::lifecycle::application::domain::{
    field_errors::required_text, ColumnSpec, EntityConfig, EntityKind, FieldErrors,
    LifecycleEntity, Record, ResolvedNames,
};

pub const MIN_USERNAME_LEN: usize = 3;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
pub enum Role {
    #[default]
    Customer,
    Seller,
    Manager,
    Admin,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Customer, Role::Seller, Role::Manager, Role::Admin];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Customer => "Customer",
            Role::Seller => "Seller",
            Role::Manager => "Manager",
            Role::Admin => "Admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown role '{s}'"))
    }
}

/// The verified caller, as carried by the session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub id: Uuid,
    pub role: Role,
}

impl Identity {
    pub fn new(id: Uuid, role: Role) -> Self {
        Self { id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserAttrs {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub points: i64,
    pub points_rank: String,
}

pub type UserRecord = Record<UserAttrs>;

/// Input to user creation. The password arrives already hashed.
#[derive(Debug, Clone)]
pub struct UserDraft {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: String,
    pub role: Role,
}

#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
    pub points: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
    pub points: Option<(i64, String)>,
}

/// Public shape of a user. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(rename = "roles")]
    pub role: Role,
    pub points: i64,
    pub points_rank: String,
    pub is_deleted: bool,
    pub created_by: Uuid,
    pub modified_by: Uuid,
    pub created_date: DateTime<Utc>,
    pub modified_date: DateTime<Utc>,
    pub deleted_date: Option<DateTime<Utc>>,
}

impl From<UserRecord> for UserView {
    fn from(record: UserRecord) -> Self {
        let Record { meta, attrs } = record;
        Self {
            id: meta.id,
            username: attrs.username,
            email: attrs.email,
            role: attrs.role,
            points: attrs.points,
            points_rank: attrs.points_rank,
            is_deleted: meta.is_deleted,
            created_by: meta.created_by,
            modified_by: meta.modified_by,
            created_date: meta.created_date,
            modified_date: meta.modified_date,
            deleted_date: meta.deleted_date,
        }
    }
}

pub fn normalize_username(errors: &mut FieldErrors, username: Option<String>) -> String {
    let username = required_text(errors, "username", username);
    if !username.is_empty() && username.chars().count() < MIN_USERNAME_LEN {
        errors.add(
            "username",
            format!("Username must be at least {MIN_USERNAME_LEN} characters long"),
        );
    }
    username
}

pub fn normalize_email(errors: &mut FieldErrors, email: Option<String>) -> String {
    let email = required_text(errors, "email", email).to_lowercase();
    if !email.is_empty() && !EMAIL_RE.is_match(&email) {
        errors.add("email", "Invalid email format");
    }
    email
}

fn check_points(errors: &mut FieldErrors, points: i64) {
    if points < 0 {
        errors.add("points", "points must not be negative");
    }
}

pub struct User;

impl LifecycleEntity for User {
    type Attrs = UserAttrs;
    type Draft = UserDraft;
    type Patch = UserPatch;
    type Changes = UserChanges;
    type View = UserView;

    const CONFIG: EntityConfig = EntityConfig {
        kind: EntityKind::User,
        label: "User",
        base_path: "/api/auth/users",
        singular: "user",
        plural: "users",
        columns: &[
            ColumnSpec { field: "username", header: "Username" },
            ColumnSpec { field: "email", header: "Email" },
            ColumnSpec { field: "roles", header: "Role" },
            ColumnSpec { field: "points", header: "Points" },
            ColumnSpec { field: "pointsRank", header: "Rank" },
        ],
    };

    // Users keep the historical behaviour: lookup by id sees soft-deleted accounts.
    const GET_INCLUDES_DELETED: bool = true;

    fn validate_draft(draft: UserDraft) -> Result<UserAttrs, FieldErrors> {
        let mut errors = FieldErrors::new();
        let username = normalize_username(&mut errors, draft.username);
        let email = normalize_email(&mut errors, draft.email);
        if draft.password_hash.is_empty() {
            errors.add("password", "password is required");
        }

        errors.into_result(UserAttrs {
            username,
            email,
            password_hash: draft.password_hash,
            role: draft.role,
            points: 0,
            points_rank: points_rank(0).to_string(),
        })
    }

    fn validate_patch(patch: UserPatch) -> Result<UserChanges, FieldErrors> {
        let mut errors = FieldErrors::new();
        let username = patch
            .username
            .map(|u| normalize_username(&mut errors, Some(u)));
        let email = patch.email.map(|e| normalize_email(&mut errors, Some(e)));
        if let Some(points) = patch.points {
            check_points(&mut errors, points);
        }

        errors.into_result(UserChanges {
            username,
            email,
            password_hash: patch.password_hash,
            role: patch.role,
            points: patch
                .points
                .map(|points| (points, points_rank(points).to_string())),
        })
    }

    fn apply(attrs: &mut UserAttrs, changes: UserChanges) {
        if let Some(username) = changes.username {
            attrs.username = username;
        }
        if let Some(email) = changes.email {
            attrs.email = email;
        }
        if let Some(hash) = changes.password_hash {
            attrs.password_hash = hash;
        }
        if let Some(role) = changes.role {
            attrs.role = role;
        }
        if let Some((points, rank)) = changes.points {
            attrs.points = points;
            attrs.points_rank = rank;
        }
    }

    fn project(record: UserRecord, _names: &ResolvedNames) -> UserView {
        record.into()
    }
}
