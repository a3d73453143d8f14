// Board permission grants
//
// Each grant is one conditional INSERT, so the existence check and the write
// cannot interleave with another writer even without a unique index.

use anyhow::{Context, Result};
use sqlx::sqlite::SqliteConnection;

/// Permission level that lets the grantee see the whole board.
pub const BOARD_VIEW_ALL: &str = "board-view-all";

// Returns true when a row was inserted, false when the grant already existed
pub async fn grant_group_permission(
    conn: &mut SqliteConnection,
    board_id: &str,
    group_id: &str,
    permission: &str,
) -> Result<bool> {
    let result = sqlx::query(
        "INSERT INTO boardGroupPermission (board_id, group_id, permission)
         SELECT ?, ?, ?
         WHERE NOT EXISTS (
             SELECT 1 FROM boardGroupPermission WHERE board_id = ? AND group_id = ?
         )"
    )
    .bind(board_id)
    .bind(group_id)
    .bind(permission)
    .bind(board_id)
    .bind(group_id)
    .execute(&mut *conn)
    .await
    .context("Failed to grant group permission")?;

    Ok(result.rows_affected() > 0)
}

// Returns true when a row was inserted, false when the grant already existed
pub async fn grant_user_permission(
    conn: &mut SqliteConnection,
    board_id: &str,
    user_id: &str,
    permission: &str,
) -> Result<bool> {
    let result = sqlx::query(
        "INSERT INTO boardUserPermission (board_id, user_id, permission)
         SELECT ?, ?, ?
         WHERE NOT EXISTS (
             SELECT 1 FROM boardUserPermission WHERE board_id = ? AND user_id = ?
         )"
    )
    .bind(board_id)
    .bind(user_id)
    .bind(permission)
    .bind(board_id)
    .bind(user_id)
    .execute(&mut *conn)
    .await
    .context("Failed to grant user permission")?;

    Ok(result.rows_affected() > 0)
}
