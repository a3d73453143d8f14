// Primary board seeding: visibility, home board, sectioned app tiles

use serde_json::{Map, Value};
use sqlx::sqlite::SqliteConnection;
use sqlx::Connection;
use std::fmt;

use crate::config::boards::SectionDefinition;
use crate::db::{self, Board};
use crate::error::{DbResultExt, SeedError};
use crate::layout::SectionStack;
use crate::seed::{self, BoardState, Catalog, SectionReport, INFRA_BOARD_NAME};

/// Server setting holding the default home board for anonymous visitors.
pub const BOARD_SETTING_KEY: &str = "board";

#[derive(Debug, Clone, PartialEq)]
pub struct BoardSeedReport {
    pub boards_made_public: u64,
    /// Set once a board was found.
    pub home_board: Option<HomeBoardUpdate>,
    pub outcome: PopulateOutcome,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HomeBoardUpdate {
    pub board: Board,
    pub users_assigned: u64,
    /// False when there is no board setting row, or its value has no
    /// JSON object to merge into.
    pub default_setting_updated: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PopulateOutcome {
    NoBoard,
    AlreadyPopulated { items: i64 },
    NoLayout,
    Populated(PopulateSummary),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PopulateSummary {
    /// Every row in the app table, placed or not.
    pub app_count: usize,
    pub sections: Vec<SectionReport>,
}

impl PopulateSummary {
    pub fn items_placed(&self) -> usize {
        self.sections.iter().map(|s| s.items).sum()
    }

    pub fn integrations_linked(&self) -> usize {
        self.sections.iter().map(|s| s.links).sum()
    }
}

impl fmt::Display for PopulateOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PopulateOutcome::NoBoard => write!(f, "No board found"),
            PopulateOutcome::AlreadyPopulated { items } => {
                write!(f, "Board already has {} items, skipping populate", items)
            }
            PopulateOutcome::NoLayout => write!(f, "No layout found"),
            PopulateOutcome::Populated(summary) => write!(
                f,
                "Board populated with {} apps in {} sections",
                summary.app_count,
                summary.sections.len()
            ),
        }
    }
}

// Set json.homeBoardId inside a server setting value, keeping every other key.
// Returns None when the value has no object to merge into.
pub fn merge_home_board_id(value: &str, board_id: &str) -> Result<Option<String>, SeedError> {
    let mut root: Value = serde_json::from_str(value)
        .map_err(|e| SeedError::InvalidSetting(format!("{} is not valid JSON: {}", BOARD_SETTING_KEY, e)))?;

    let Some(root_map) = root.as_object_mut() else {
        return Ok(None);
    };

    let Some(inner) = root_map
        .entry("json")
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
    else {
        return Ok(None);
    };

    inner.insert("homeBoardId".to_string(), Value::String(board_id.to_string()));

    serde_json::to_string(&root)
        .map(Some)
        .map_err(|e| SeedError::InvalidSetting(e.to_string()))
}

async fn set_default_home_board(conn: &mut SqliteConnection, board_id: &str) -> Result<bool, SeedError> {
    let Some(value) = db::get_server_setting(conn, BOARD_SETTING_KEY).await.db_err()? else {
        return Ok(false);
    };

    let Some(merged) = merge_home_board_id(&value, board_id)? else {
        tracing::warn!(setting = BOARD_SETTING_KEY, "setting has no JSON object to merge into, leaving it unchanged");
        return Ok(false);
    };
    db::update_server_setting(conn, BOARD_SETTING_KEY, &merged)
        .await
        .db_err()?;

    Ok(true)
}

pub async fn populate_board(
    conn: &mut SqliteConnection,
    sections: &[SectionDefinition],
) -> Result<BoardSeedReport, SeedError> {
    let mut tx = conn.begin().await.db_err()?;

    let boards_made_public = db::make_boards_public_except(&mut tx, INFRA_BOARD_NAME)
        .await
        .db_err()?;

    let Some(board) = db::first_board(&mut tx).await.db_err()? else {
        tx.commit().await.db_err()?;
        return Ok(BoardSeedReport {
            boards_made_public,
            home_board: None,
            outcome: PopulateOutcome::NoBoard,
        });
    };

    let users_assigned = db::assign_home_board_where_unset(&mut tx, &board.id)
        .await
        .db_err()?;
    let default_setting_updated = set_default_home_board(&mut tx, &board.id).await?;
    tracing::info!(board = %board.name, users_assigned, default_setting_updated, "home board set");

    let home_board = Some(HomeBoardUpdate {
        board: board.clone(),
        users_assigned,
        default_setting_updated,
    });

    let outcome = match seed::inspect_board(&mut tx, Some(board)).await.db_err()? {
        BoardState::NoBoard => PopulateOutcome::NoBoard,
        BoardState::Populated { items, .. } => PopulateOutcome::AlreadyPopulated { items },
        BoardState::NoLayout { .. } => PopulateOutcome::NoLayout,
        BoardState::Empty { board, layout_id } => {
            let catalog = Catalog::load(&mut tx).await.db_err()?;

            let removed = db::delete_sections(&mut tx, &board.id).await.db_err()?;
            if removed > 0 {
                tracing::info!(removed, "removed empty sections");
            }

            let mut stack = SectionStack::new();
            let mut reports = Vec::with_capacity(sections.len());
            for definition in sections {
                let placement = stack.push(definition.apps.len());
                let report = seed::place_section(&mut tx, &board.id, &layout_id, definition, placement, &catalog)
                    .await
                    .db_err()?;
                reports.push(report);
            }

            PopulateOutcome::Populated(PopulateSummary {
                app_count: catalog.app_count(),
                sections: reports,
            })
        }
    };

    tx.commit().await.db_err()?;

    Ok(BoardSeedReport {
        boards_made_public,
        home_board,
        outcome,
    })
}
