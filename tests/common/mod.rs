// Common test utilities shared across test files

use sqlx::sqlite::SqliteConnection;
use sqlx::Connection;

pub const SCHEMA: &str = include_str!("../fixtures/schema.sql");

/// Set up an in-memory SQLite database with the dashboard schema
#[allow(dead_code)]
pub async fn setup_test_db() -> SqliteConnection {
    let mut conn = SqliteConnection::connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");

    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&mut conn)
        .await
        .expect("Failed to enable foreign keys");

    sqlx::query(SCHEMA)
        .execute(&mut conn)
        .await
        .expect("Failed to create schema");

    conn
}

#[allow(dead_code)]
pub async fn exec(conn: &mut SqliteConnection, sql: &str) {
    sqlx::query(sql)
        .execute(&mut *conn)
        .await
        .unwrap_or_else(|e| panic!("Failed to run `{}`: {}", sql, e));
}

#[allow(dead_code)]
pub async fn count(conn: &mut SqliteConnection, sql: &str) -> i64 {
    sqlx::query_scalar(sql)
        .fetch_one(&mut *conn)
        .await
        .unwrap_or_else(|e| panic!("Failed to run `{}`: {}", sql, e))
}

#[allow(dead_code)]
pub async fn insert_board(conn: &mut SqliteConnection, id: &str, name: &str) {
    sqlx::query("INSERT INTO board (id, name, is_public) VALUES (?, ?, 0)")
        .bind(id)
        .bind(name)
        .execute(&mut *conn)
        .await
        .unwrap();
}

#[allow(dead_code)]
pub async fn insert_layout(conn: &mut SqliteConnection, id: &str, board_id: &str) {
    sqlx::query("INSERT INTO layout (id, board_id) VALUES (?, ?)")
        .bind(id)
        .bind(board_id)
        .execute(&mut *conn)
        .await
        .unwrap();
}

#[allow(dead_code)]
pub async fn insert_user(conn: &mut SqliteConnection, id: &str, provider: &str, home_board_id: Option<&str>) {
    sqlx::query("INSERT INTO user (id, name, provider, home_board_id) VALUES (?, ?, ?, ?)")
        .bind(id)
        .bind(id)
        .bind(provider)
        .bind(home_board_id)
        .execute(&mut *conn)
        .await
        .unwrap();
}

#[allow(dead_code)]
pub async fn insert_app(conn: &mut SqliteConnection, id: &str, name: &str) {
    sqlx::query("INSERT INTO app (id, name) VALUES (?, ?)")
        .bind(id)
        .bind(name)
        .execute(&mut *conn)
        .await
        .unwrap();
}

/// Insert one app per name, with ids app-0, app-1, ...
#[allow(dead_code)]
pub async fn insert_apps(conn: &mut SqliteConnection, names: &[&str]) {
    for (i, name) in names.iter().enumerate() {
        insert_app(conn, &format!("app-{}", i), name).await;
    }
}

#[allow(dead_code)]
pub async fn insert_integration(conn: &mut SqliteConnection, id: &str, name: &str) {
    sqlx::query("INSERT INTO integration (id, name) VALUES (?, ?)")
        .bind(id)
        .bind(name)
        .execute(&mut *conn)
        .await
        .unwrap();
}

#[allow(dead_code)]
pub async fn insert_group(conn: &mut SqliteConnection, id: &str, name: &str) {
    sqlx::query(r#"INSERT INTO "group" (id, name) VALUES (?, ?)"#)
        .bind(id)
        .bind(name)
        .execute(&mut *conn)
        .await
        .unwrap();
}

#[allow(dead_code)]
pub async fn insert_setting(conn: &mut SqliteConnection, key: &str, value: &str) {
    sqlx::query("INSERT INTO serverSetting (setting_key, value) VALUES (?, ?)")
        .bind(key)
        .bind(value)
        .execute(&mut *conn)
        .await
        .unwrap();
}

/// Rows of every seeded table rendered as text, for before/after comparisons
#[allow(dead_code)]
pub async fn snapshot(conn: &mut SqliteConnection) -> Vec<String> {
    let queries = [
        "SELECT 'board|' || id || '|' || name || '|' || is_public FROM board ORDER BY id",
        "SELECT 'user|' || id || '|' || ifnull(home_board_id, 'NULL') FROM user ORDER BY id",
        "SELECT 'setting|' || setting_key || '|' || value FROM serverSetting ORDER BY setting_key",
        "SELECT 'section|' || s.id || '|' || s.name || '|' || sl.x_offset || ',' || sl.y_offset || ',' || sl.width || ',' || sl.height
         FROM section s JOIN section_layout sl ON sl.section_id = s.id ORDER BY s.id",
        "SELECT 'item|' || i.id || '|' || i.options || '|' || il.section_id || '|' || il.x_offset || ',' || il.y_offset
         FROM item i JOIN item_layout il ON il.item_id = i.id ORDER BY i.id",
        "SELECT 'link|' || integration_id || '|' || item_id FROM integration_item ORDER BY integration_id, item_id",
        "SELECT 'group_perm|' || board_id || '|' || group_id || '|' || permission FROM boardGroupPermission ORDER BY board_id, group_id",
        "SELECT 'user_perm|' || board_id || '|' || user_id || '|' || permission FROM boardUserPermission ORDER BY board_id, user_id",
    ];

    let mut rows = Vec::new();
    for sql in queries {
        let mut table: Vec<String> = sqlx::query_scalar(sql)
            .fetch_all(&mut *conn)
            .await
            .unwrap_or_else(|e| panic!("Failed to snapshot `{}`: {}", sql, e));
        rows.append(&mut table);
    }
    rows
}

/// (x, y) of every item in a section, ordered by position
#[allow(dead_code)]
pub async fn item_cells(conn: &mut SqliteConnection, section_name: &str) -> Vec<(i64, i64, String)> {
    sqlx::query_as::<_, (i64, i64, String)>(
        "SELECT il.x_offset, il.y_offset, json_extract(i.options, '$.json.appId')
         FROM item_layout il
         JOIN item i ON i.id = il.item_id
         JOIN section s ON s.id = il.section_id
         WHERE s.name = ?
         ORDER BY il.y_offset, il.x_offset",
    )
    .bind(section_name)
    .fetch_all(&mut *conn)
    .await
    .unwrap()
}

/// (y, height) of every section on a board, top to bottom
#[allow(dead_code)]
pub async fn section_rows(conn: &mut SqliteConnection, board_id: &str) -> Vec<(String, i64, i64, i64)> {
    sqlx::query_as::<_, (String, i64, i64, i64)>(
        "SELECT s.name, sl.y_offset, sl.width, sl.height
         FROM section s JOIN section_layout sl ON sl.section_id = s.id
         WHERE s.board_id = ?
         ORDER BY sl.y_offset, s.rowid",
    )
    .bind(board_id)
    .fetch_all(&mut *conn)
    .await
    .unwrap()
}
