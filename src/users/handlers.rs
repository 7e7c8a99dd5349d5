use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::auth::extractors::{AdminUser, CurrentUser};
use crate::auth::handlers::is_valid_email;
use crate::auth::password::hash_password;
use crate::error::ApiError;
use crate::state::AppState;
use crate::users::dto::{MessageResponse, UpdateUserRequest};
use crate::users::repo::{PublicUser, Role, UserChanges};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

/// Self-or-admin rule: a record is visible to its owner and to any admin.
fn can_access(caller: &PublicUser, target: Uuid) -> bool {
    caller.role == Role::Admin || caller.id == target
}

#[instrument(skip(state, caller), fields(caller_id = %caller.0.id))]
pub async fn list_users(
    State(state): State<AppState>,
    caller: AdminUser,
) -> Result<Json<Vec<PublicUser>>, ApiError> {
    let users = PublicUser::list(&state.db).await?;
    Ok(Json(users))
}

#[instrument(skip(state, caller), fields(caller_id = %caller.0.id))]
pub async fn get_user(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<PublicUser>, ApiError> {
    // access check comes first: 403 regardless of whether the target exists
    if !can_access(&caller.0, id) {
        warn!(target = %id, "get denied");
        return Err(ApiError::Forbidden("Access denied".into()));
    }

    let user = PublicUser::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;
    Ok(Json(user))
}

#[instrument(skip(state, caller, payload), fields(caller_id = %caller.0.id))]
pub async fn update_user(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<Uuid>,
    Json(mut payload): Json<UpdateUserRequest>,
) -> Result<Json<PublicUser>, ApiError> {
    if !can_access(&caller.0, id) {
        warn!(target = %id, "update denied");
        return Err(ApiError::Forbidden("Access denied".into()));
    }
    // owners may change name/email/password; role changes are admin-only
    if payload.role.is_some() && caller.0.role != Role::Admin {
        warn!(target = %id, "role change denied");
        return Err(ApiError::Forbidden("Access denied: Admins only".into()));
    }

    if let Some(name) = &mut payload.name {
        *name = name.trim().to_string();
        if name.is_empty() {
            return Err(ApiError::Validation("Name is required".into()));
        }
    }
    if let Some(email) = &mut payload.email {
        *email = email.trim().to_lowercase();
        if !is_valid_email(email) {
            return Err(ApiError::Validation("Invalid email".into()));
        }
    }
    // an empty password leaves the stored hash unchanged
    let password_hash = match payload.password.as_deref() {
        Some(p) if !p.is_empty() => Some(hash_password(p, state.config.hash_cost)?),
        _ => None,
    };

    let changes = UserChanges {
        name: payload.name,
        email: payload.email,
        password_hash,
        role: payload.role,
    };
    let user = PublicUser::update(&state.db, id, changes)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    info!(target = %id, "user updated");
    Ok(Json(user))
}

#[instrument(skip(state, caller), fields(caller_id = %caller.0.id))]
pub async fn delete_user(
    State(state): State<AppState>,
    caller: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    // nothing stops an admin deleting their own account; the original
    // surface behaves the same way
    if !PublicUser::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("User not found".into()));
    }

    info!(target = %id, "user deleted");
    Ok(Json(MessageResponse {
        message: "User deleted successfully".into(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn identity(role: Role) -> PublicUser {
        PublicUser {
            id: Uuid::new_v4(),
            name: "Ann".into(),
            email: "ann@x.com".into(),
            role,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn owner_can_access_own_record() {
        let caller = identity(Role::User);
        assert!(can_access(&caller, caller.id));
    }

    #[test]
    fn non_admin_cannot_access_other_records() {
        let caller = identity(Role::User);
        assert!(!can_access(&caller, Uuid::new_v4()));
    }

    #[test]
    fn admin_can_access_any_record() {
        let caller = identity(Role::Admin);
        assert!(can_access(&caller, Uuid::new_v4()));
        assert!(can_access(&caller, caller.id));
    }
}
