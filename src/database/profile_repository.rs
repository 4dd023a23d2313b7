use sqlx::SqlitePool;

use crate::models::Profile;

pub async fn insert_profile(pool: &SqlitePool, profile: &Profile) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO profiles (id, full_name, email, phone, user_type, avatar_url, verified, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&profile.id)
    .bind(&profile.full_name)
    .bind(&profile.email)
    .bind(&profile.phone)
    .bind(&profile.user_type)
    .bind(&profile.avatar_url)
    .bind(profile.verified)
    .bind(profile.created_at)
    .bind(profile.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get_profile(pool: &SqlitePool, id: &str) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_profile_by_email(pool: &SqlitePool, email: &str) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE email = ? COLLATE NOCASE")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn update_profile(pool: &SqlitePool, profile: &Profile) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE profiles SET full_name = ?, phone = ?, avatar_url = ?, updated_at = ? WHERE id = ?",
    )
    .bind(&profile.full_name)
    .bind(&profile.phone)
    .bind(&profile.avatar_url)
    .bind(profile.updated_at)
    .bind(&profile.id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
