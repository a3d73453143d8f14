// Database access for the dashboard store
//
// The schema belongs to the dashboard application; these queries only read
// and write the rows the seeders need.

pub mod permissions;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{ConnectOptions, Connection};

// Open the single connection a seeder uses for its whole run.
// The file must already exist: the dashboard creates and migrates it.
pub async fn open_db(db_path: &str) -> Result<SqliteConnection> {
    let mut conn = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(false)
        .connect()
        .await
        .with_context(|| format!("Failed to open database {}", db_path))?;

    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&mut conn)
        .await
        .context("Failed to enable foreign keys")?;

    Ok(conn)
}

// Close the connection on every exit path; errors are logged, not returned
pub async fn close_db(conn: SqliteConnection) {
    if let Err(e) = conn.close().await {
        tracing::warn!(error = %e, "failed to close database");
    }
}

// Models

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Board {
    pub id: String,
    pub name: String,
}

/// Any row looked up by its display name (apps, integrations, groups).
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct NamedRow {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct NewSection<'a> {
    pub id: &'a str,
    pub board_id: &'a str,
    pub kind: &'a str,
    pub name: &'a str,
    pub x_offset: i64,
    pub y_offset: i64,
}

#[derive(Debug, Clone)]
pub struct NewItem<'a> {
    pub id: &'a str,
    pub board_id: &'a str,
    pub kind: &'a str,
    pub options: &'a str,
    pub advanced_options: &'a str,
}

/// Where a section or item sits in a layout.
#[derive(Debug, Clone, Copy)]
pub struct LayoutBinding<'a> {
    pub layout_id: &'a str,
    pub x_offset: i64,
    pub y_offset: i64,
    pub width: i64,
    pub height: i64,
}

// Users and API keys

pub async fn first_user_id(conn: &mut SqliteConnection) -> Result<Option<String>> {
    let id: Option<String> = sqlx::query_scalar("SELECT id FROM user LIMIT 1")
        .fetch_optional(&mut *conn)
        .await
        .context("Failed to look up user")?;

    Ok(id)
}

pub async fn insert_api_key(
    conn: &mut SqliteConnection,
    id: &str,
    hashed_key: &str,
    salt: &str,
    user_id: &str,
) -> Result<()> {
    sqlx::query("INSERT INTO apiKey (id, api_key, salt, user_id) VALUES (?, ?, ?, ?)")
        .bind(id)
        .bind(hashed_key)
        .bind(salt)
        .bind(user_id)
        .execute(&mut *conn)
        .await
        .context("Failed to insert API key")?;

    Ok(())
}

// Give every user without a home board this one; existing choices stay
pub async fn assign_home_board_where_unset(conn: &mut SqliteConnection, board_id: &str) -> Result<u64> {
    let result = sqlx::query("UPDATE user SET home_board_id = ? WHERE home_board_id IS NULL")
        .bind(board_id)
        .execute(&mut *conn)
        .await
        .context("Failed to assign home board")?;

    Ok(result.rows_affected())
}

pub async fn user_ids_by_provider(conn: &mut SqliteConnection, provider: &str) -> Result<Vec<String>> {
    let ids: Vec<String> = sqlx::query_scalar("SELECT id FROM user WHERE provider = ?")
        .bind(provider)
        .fetch_all(&mut *conn)
        .await
        .context("Failed to list users by provider")?;

    Ok(ids)
}

// Boards

pub async fn make_boards_public_except(conn: &mut SqliteConnection, excluded_name: &str) -> Result<u64> {
    let result = sqlx::query("UPDATE board SET is_public = 1 WHERE name != ?")
        .bind(excluded_name)
        .execute(&mut *conn)
        .await
        .context("Failed to update board visibility")?;

    Ok(result.rows_affected())
}

pub async fn first_board(conn: &mut SqliteConnection) -> Result<Option<Board>> {
    let board = sqlx::query_as::<_, Board>("SELECT id, name FROM board LIMIT 1")
        .fetch_optional(&mut *conn)
        .await
        .context("Failed to look up board")?;

    Ok(board)
}

pub async fn board_by_name(conn: &mut SqliteConnection, name: &str) -> Result<Option<Board>> {
    let board = sqlx::query_as::<_, Board>("SELECT id, name FROM board WHERE name = ?")
        .bind(name)
        .fetch_optional(&mut *conn)
        .await
        .context("Failed to look up board by name")?;

    Ok(board)
}

pub async fn count_items(conn: &mut SqliteConnection, board_id: &str) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM item WHERE board_id = ?")
        .bind(board_id)
        .fetch_one(&mut *conn)
        .await
        .context("Failed to count items")?;

    Ok(count)
}

pub async fn layout_for_board(conn: &mut SqliteConnection, board_id: &str) -> Result<Option<String>> {
    let id: Option<String> = sqlx::query_scalar("SELECT id FROM layout WHERE board_id = ?")
        .bind(board_id)
        .fetch_optional(&mut *conn)
        .await
        .context("Failed to look up layout")?;

    Ok(id)
}

// Server settings

pub async fn get_server_setting(conn: &mut SqliteConnection, key: &str) -> Result<Option<String>> {
    let value: Option<String> = sqlx::query_scalar("SELECT value FROM serverSetting WHERE setting_key = ?")
        .bind(key)
        .fetch_optional(&mut *conn)
        .await
        .context("Failed to read server setting")?;

    Ok(value)
}

pub async fn update_server_setting(conn: &mut SqliteConnection, key: &str, value: &str) -> Result<()> {
    sqlx::query("UPDATE serverSetting SET value = ? WHERE setting_key = ?")
        .bind(value)
        .bind(key)
        .execute(&mut *conn)
        .await
        .context("Failed to update server setting")?;

    Ok(())
}

// Catalog lookups

pub async fn list_apps(conn: &mut SqliteConnection) -> Result<Vec<NamedRow>> {
    let apps = sqlx::query_as::<_, NamedRow>("SELECT id, name FROM app")
        .fetch_all(&mut *conn)
        .await
        .context("Failed to list apps")?;

    Ok(apps)
}

pub async fn list_integrations(conn: &mut SqliteConnection) -> Result<Vec<NamedRow>> {
    let integrations = sqlx::query_as::<_, NamedRow>("SELECT id, name FROM integration")
        .fetch_all(&mut *conn)
        .await
        .context("Failed to list integrations")?;

    Ok(integrations)
}

// Sections and items

// Drop a board's sections together with their layout bindings
pub async fn delete_sections(conn: &mut SqliteConnection, board_id: &str) -> Result<u64> {
    sqlx::query("DELETE FROM section_layout WHERE section_id IN (SELECT id FROM section WHERE board_id = ?)")
        .bind(board_id)
        .execute(&mut *conn)
        .await
        .context("Failed to delete section layouts")?;

    let result = sqlx::query("DELETE FROM section WHERE board_id = ?")
        .bind(board_id)
        .execute(&mut *conn)
        .await
        .context("Failed to delete sections")?;

    Ok(result.rows_affected())
}

pub async fn insert_section(
    conn: &mut SqliteConnection,
    section: &NewSection<'_>,
    binding: LayoutBinding<'_>,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO section (id, board_id, kind, x_offset, y_offset, name) VALUES (?, ?, ?, ?, ?, ?)"
    )
    .bind(section.id)
    .bind(section.board_id)
    .bind(section.kind)
    .bind(section.x_offset)
    .bind(section.y_offset)
    .bind(section.name)
    .execute(&mut *conn)
    .await
    .with_context(|| format!("Failed to insert section '{}'", section.name))?;

    sqlx::query(
        "INSERT INTO section_layout (section_id, layout_id, x_offset, y_offset, width, height)
         VALUES (?, ?, ?, ?, ?, ?)"
    )
    .bind(section.id)
    .bind(binding.layout_id)
    .bind(binding.x_offset)
    .bind(binding.y_offset)
    .bind(binding.width)
    .bind(binding.height)
    .execute(&mut *conn)
    .await
    .with_context(|| format!("Failed to bind section '{}' into layout", section.name))?;

    Ok(())
}

pub async fn insert_item(
    conn: &mut SqliteConnection,
    item: &NewItem<'_>,
    section_id: &str,
    binding: LayoutBinding<'_>,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO item (id, board_id, kind, options, advanced_options) VALUES (?, ?, ?, ?, ?)"
    )
    .bind(item.id)
    .bind(item.board_id)
    .bind(item.kind)
    .bind(item.options)
    .bind(item.advanced_options)
    .execute(&mut *conn)
    .await
    .context("Failed to insert item")?;

    sqlx::query(
        "INSERT INTO item_layout (item_id, section_id, layout_id, x_offset, y_offset, width, height)
         VALUES (?, ?, ?, ?, ?, ?, ?)"
    )
    .bind(item.id)
    .bind(section_id)
    .bind(binding.layout_id)
    .bind(binding.x_offset)
    .bind(binding.y_offset)
    .bind(binding.width)
    .bind(binding.height)
    .execute(&mut *conn)
    .await
    .context("Failed to bind item into layout")?;

    Ok(())
}

// Link an integration to an item; an existing link is left alone
pub async fn link_integration(conn: &mut SqliteConnection, integration_id: &str, item_id: &str) -> Result<bool> {
    let result = sqlx::query("INSERT OR IGNORE INTO integration_item (integration_id, item_id) VALUES (?, ?)")
        .bind(integration_id)
        .bind(item_id)
        .execute(&mut *conn)
        .await
        .context("Failed to link integration")?;

    Ok(result.rows_affected() > 0)
}

// Groups

pub async fn group_by_name(conn: &mut SqliteConnection, name: &str) -> Result<Option<NamedRow>> {
    let group = sqlx::query_as::<_, NamedRow>(r#"SELECT id, name FROM "group" WHERE name = ?"#)
        .bind(name)
        .fetch_optional(&mut *conn)
        .await
        .context("Failed to look up group")?;

    Ok(group)
}
