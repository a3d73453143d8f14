// Seeding procedures for the dashboard store
//
// Each procedure takes an open connection and reports what it did through an
// outcome value; printing is left to the binaries.

pub mod api_key;
pub mod board;
pub mod infra;

use anyhow::Result;
use serde::Serialize;
use sqlx::sqlite::SqliteConnection;
use std::collections::HashMap;

use crate::auth;
use crate::config::boards::SectionDefinition;
use crate::db::{self, Board, LayoutBinding, NamedRow, NewItem, NewSection};
use crate::layout::{GridCursor, Placement};

/// Name of the admin board that stays private and gets its own seeder.
pub const INFRA_BOARD_NAME: &str = "Infrastructure";

const SECTION_KIND: &str = "category";
const APP_ITEM_KIND: &str = "app";

/// What a board looks like before populating it.
#[derive(Debug, Clone, PartialEq)]
pub enum BoardState {
    NoBoard,
    /// Already has items; nothing may be added.
    Populated { board: Board, items: i64 },
    NoLayout { board: Board },
    /// No items and a layout to place them in.
    Empty { board: Board, layout_id: String },
}

// Items win over a missing layout: a board with items is never touched.
pub async fn inspect_board(conn: &mut SqliteConnection, board: Option<Board>) -> Result<BoardState> {
    let Some(board) = board else {
        return Ok(BoardState::NoBoard);
    };

    let items = db::count_items(conn, &board.id).await?;
    if items > 0 {
        return Ok(BoardState::Populated { board, items });
    }

    match db::layout_for_board(conn, &board.id).await? {
        Some(layout_id) => Ok(BoardState::Empty { board, layout_id }),
        None => Ok(BoardState::NoLayout { board }),
    }
}

/// Name-keyed lookup of apps and integrations, built once per run.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    apps: HashMap<String, String>,
    integrations: HashMap<String, String>,
    app_count: usize,
}

impl Catalog {
    /// When two rows share a name the later one wins.
    pub fn from_rows(apps: Vec<NamedRow>, integrations: Vec<NamedRow>) -> Self {
        let app_count = apps.len();
        Self {
            apps: apps.into_iter().map(|row| (row.name, row.id)).collect(),
            integrations: integrations.into_iter().map(|row| (row.name, row.id)).collect(),
            app_count,
        }
    }

    pub async fn load(conn: &mut SqliteConnection) -> Result<Self> {
        let apps = db::list_apps(conn).await?;
        let integrations = db::list_integrations(conn).await?;
        Ok(Self::from_rows(apps, integrations))
    }

    // Apps only; items placed from this catalog are never linked
    pub async fn load_apps(conn: &mut SqliteConnection) -> Result<Self> {
        let apps = db::list_apps(conn).await?;
        Ok(Self::from_rows(apps, Vec::new()))
    }

    pub fn app_id(&self, name: &str) -> Option<&str> {
        self.apps.get(name).map(String::as_str)
    }

    pub fn integration_id(&self, name: &str) -> Option<&str> {
        self.integrations.get(name).map(String::as_str)
    }

    /// Rows in the app table, duplicates included.
    pub fn app_count(&self) -> usize {
        self.app_count
    }
}

// The dashboard's ORM wraps JSON text columns as {"json": ...}
#[derive(Serialize)]
struct OrmJson<T> {
    json: T,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AppOptions<'a> {
    app_id: &'a str,
}

#[derive(Serialize)]
struct NoOptions {}

pub fn app_item_options(app_id: &str) -> Result<String> {
    Ok(serde_json::to_string(&OrmJson { json: AppOptions { app_id } })?)
}

pub fn empty_item_options() -> Result<String> {
    Ok(serde_json::to_string(&OrmJson { json: NoOptions {} })?)
}

/// Result of placing one section.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionReport {
    pub section_id: String,
    pub name: String,
    pub placement: Placement,
    pub items: usize,
    pub links: usize,
    /// Listed apps with no matching row, in list order.
    pub missing: Vec<String>,
}

// Create one section and fill it with the listed apps that exist
pub async fn place_section(
    conn: &mut SqliteConnection,
    board_id: &str,
    layout_id: &str,
    definition: &SectionDefinition,
    placement: Placement,
    catalog: &Catalog,
) -> Result<SectionReport> {
    let section_id = auth::random_id();
    db::insert_section(
        conn,
        &NewSection {
            id: &section_id,
            board_id,
            kind: SECTION_KIND,
            name: &definition.name,
            x_offset: placement.x,
            y_offset: placement.y,
        },
        LayoutBinding {
            layout_id,
            x_offset: placement.x,
            y_offset: placement.y,
            width: placement.width,
            height: placement.height,
        },
    )
    .await?;

    let advanced_options = empty_item_options()?;
    let mut cursor = GridCursor::new();
    let mut links = 0;
    let mut missing = Vec::new();

    for app_name in &definition.apps {
        let Some(app_id) = catalog.app_id(app_name) else {
            tracing::debug!(app = %app_name, section = %definition.name, "app not found, skipping");
            missing.push(app_name.clone());
            continue;
        };

        let item_id = auth::random_id();
        let options = app_item_options(app_id)?;
        let cell = cursor.next_cell();
        db::insert_item(
            conn,
            &NewItem {
                id: &item_id,
                board_id,
                kind: APP_ITEM_KIND,
                options: &options,
                advanced_options: &advanced_options,
            },
            &section_id,
            LayoutBinding {
                layout_id,
                x_offset: cell.x,
                y_offset: cell.y,
                width: cell.width,
                height: cell.height,
            },
        )
        .await?;

        if let Some(integration_id) = catalog.integration_id(app_name) {
            if db::link_integration(conn, integration_id, &item_id).await? {
                links += 1;
            }
        }
    }

    Ok(SectionReport {
        section_id,
        name: definition.name.clone(),
        placement,
        items: cursor.placed(),
        links,
        missing,
    })
}
