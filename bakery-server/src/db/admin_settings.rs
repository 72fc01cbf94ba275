use sqlx::PgPool;

use super::StoreError;

pub async fn password_hash(pool: &PgPool) -> Result<Option<String>, StoreError> {
    let hash = sqlx::query_scalar("SELECT password_hash FROM admin_settings WHERE id = 1")
        .fetch_optional(pool)
        .await?;
    Ok(hash)
}

pub async fn upsert_password_hash(pool: &PgPool, hash: &str, now: i64) -> Result<(), StoreError> {
    sqlx::query(
        "INSERT INTO admin_settings (id, password_hash, updated_at)
         VALUES (1, $1, $2)
         ON CONFLICT (id) DO UPDATE SET
            password_hash = EXCLUDED.password_hash, updated_at = EXCLUDED.updated_at",
    )
    .bind(hash)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}
