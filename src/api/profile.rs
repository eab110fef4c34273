//! Profile endpoints: fetch and multipart partial update.

use axum::extract::{Multipart, Path, State};
use axum::Json;
use uuid::Uuid;
use validator::Validate;

use crate::domain::{ProfileUpdate, UserProfile};
use crate::error::ApiError;
use crate::AppState;

pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserProfile>, ApiError> {
    if let Some(profile) = state
        .sessions
        .get(user_id)
        .await
        .and_then(|ctx| ctx.profile().cloned())
    {
        return Ok(Json(profile));
    }
    let profile = fetch_profile(&state, user_id)
        .await?
        .ok_or(ApiError::NotFound("user not found"))?;
    Ok(Json(profile))
}

/// Partial update from a multipart form: `firstName`, `lastName`,
/// `contactNumber`, `gender`, and an optional `profileImage` file. Absent
/// fields keep their stored values.
pub async fn update_profile(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<UserProfile>, ApiError> {
    let mut update = ProfileUpdate::default();
    let mut image: Option<(String, axum::body::Bytes)> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "firstName" => update.first_name = Some(field.text().await?),
            "lastName" => update.last_name = Some(field.text().await?),
            "contactNumber" => update.contact_number = Some(field.text().await?),
            "gender" => update.gender = Some(field.text().await?.parse()?),
            "profileImage" => {
                let extension = field
                    .file_name()
                    .and_then(|n| std::path::Path::new(n).extension())
                    .and_then(|e| e.to_str())
                    .unwrap_or("bin")
                    .to_string();
                image = Some((extension, field.bytes().await?));
            }
            _ => {}
        }
    }
    update.validate()?;

    if let Some((extension, bytes)) = image {
        update.profile_image = Some(store_image(&state, &extension, &bytes).await?);
    }

    let profile = sqlx::query_as::<_, UserProfile>(
        "UPDATE users SET \
         first_name = COALESCE($2, first_name), \
         last_name = COALESCE($3, last_name), \
         contact_number = COALESCE($4, contact_number), \
         gender = COALESCE($5, gender), \
         profile_image = COALESCE($6, profile_image), \
         updated_at = NOW() \
         WHERE id = $1 RETURNING *",
    )
    .bind(user_id)
    .bind(&update.first_name)
    .bind(&update.last_name)
    .bind(&update.contact_number)
    .bind(update.gender)
    .bind(&update.profile_image)
    .fetch_optional(&state.db)
    .await?
    .ok_or(ApiError::NotFound("user not found"))?;

    state.sessions.refresh_profile(&profile).await;
    Ok(Json(profile))
}

async fn fetch_profile(state: &AppState, user_id: Uuid) -> Result<Option<UserProfile>, ApiError> {
    Ok(
        sqlx::query_as::<_, UserProfile>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&state.db)
            .await?,
    )
}

async fn store_image(state: &AppState, extension: &str, bytes: &[u8]) -> Result<String, ApiError> {
    tokio::fs::create_dir_all(&state.config.upload_dir).await?;
    let filename = format!("{}.{extension}", Uuid::new_v4());
    tokio::fs::write(state.config.upload_dir.join(&filename), bytes).await?;
    Ok(format!("/uploads/{filename}"))
}
