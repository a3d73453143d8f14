// Infrastructure board seeding: admin tiles plus view permissions

use sqlx::sqlite::SqliteConnection;
use sqlx::Connection;
use std::fmt;

use crate::config::boards::SectionDefinition;
use crate::db::{self, permissions};
use crate::error::{DbResultExt, SeedError};
use crate::layout::SectionStack;
use crate::seed::{self, BoardState, Catalog, SectionReport, INFRA_BOARD_NAME};

/// Group whose members administer credentials and may see the board.
pub const ADMIN_GROUP_NAME: &str = "credentials-admin";

/// Provider tag of users signed in through the identity provider.
pub const OIDC_PROVIDER: &str = "oidc";

#[derive(Debug, Clone, PartialEq)]
pub enum GrantOutcome {
    Granted,
    AlreadyGranted,
    Skipped(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserGrant {
    pub user_id: String,
    pub outcome: GrantOutcome,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UserGrants {
    Applied(Vec<UserGrant>),
    Skipped(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum InfraOutcome {
    NoBoard,
    NoLayout,
    AlreadyPopulated { items: i64 },
    Populated(InfraSummary),
}

#[derive(Debug, Clone, PartialEq)]
pub struct InfraSummary {
    pub section: SectionReport,
    pub group_grant: GrantOutcome,
    pub user_grants: UserGrants,
}

impl fmt::Display for InfraOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InfraOutcome::NoBoard => write!(f, "Infrastructure board not found"),
            InfraOutcome::NoLayout => write!(f, "No layout for Infrastructure board"),
            InfraOutcome::AlreadyPopulated { .. } => write!(f, "Infrastructure board already populated"),
            InfraOutcome::Populated(_) => write!(f, "Infrastructure board populated"),
        }
    }
}

impl InfraSummary {
    /// Human-readable lines describing what was placed and granted.
    pub fn status_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .section
            .missing
            .iter()
            .map(|name| format!("App not found: {}", name))
            .collect();

        match &self.group_grant {
            GrantOutcome::Granted => {
                lines.push(format!("Board permission set for {} group", ADMIN_GROUP_NAME));
            }
            GrantOutcome::AlreadyGranted => {}
            GrantOutcome::Skipped(reason) => {
                lines.push(format!("Group permission skipped: {}", reason));
            }
        }

        match &self.user_grants {
            UserGrants::Applied(grants) => {
                for grant in grants {
                    if grant.outcome == GrantOutcome::Granted {
                        lines.push(format!("Board permission set for OIDC user {}", grant.user_id));
                    }
                }
            }
            UserGrants::Skipped(reason) => {
                lines.push(format!("User permissions skipped: {}", reason));
            }
        }

        lines
    }
}

async fn try_grant_admin_group(conn: &mut SqliteConnection, board_id: &str) -> anyhow::Result<GrantOutcome> {
    let Some(group) = db::group_by_name(conn, ADMIN_GROUP_NAME).await? else {
        return Ok(GrantOutcome::Skipped(format!("group {} not found", ADMIN_GROUP_NAME)));
    };

    let inserted =
        permissions::grant_group_permission(conn, board_id, &group.id, permissions::BOARD_VIEW_ALL).await?;
    Ok(if inserted {
        GrantOutcome::Granted
    } else {
        GrantOutcome::AlreadyGranted
    })
}

async fn try_grant_oidc_users(conn: &mut SqliteConnection, board_id: &str) -> anyhow::Result<Vec<UserGrant>> {
    let user_ids = db::user_ids_by_provider(conn, OIDC_PROVIDER).await?;
    let mut grants = Vec::with_capacity(user_ids.len());
    for user_id in user_ids {
        let inserted =
            permissions::grant_user_permission(conn, board_id, &user_id, permissions::BOARD_VIEW_ALL).await?;
        let outcome = if inserted {
            GrantOutcome::Granted
        } else {
            GrantOutcome::AlreadyGranted
        };
        grants.push(UserGrant { user_id, outcome });
    }
    Ok(grants)
}

// Grant the admin group view access; any store error becomes a skip
pub async fn grant_admin_group(conn: &mut SqliteConnection, board_id: &str) -> GrantOutcome {
    match try_grant_admin_group(conn, board_id).await {
        Ok(outcome) => outcome,
        Err(e) => {
            let reason = format!("{:#}", e);
            tracing::warn!(error = %reason, "could not set group permission");
            GrantOutcome::Skipped(reason)
        }
    }
}

// Grant every OIDC user view access; any store error skips the whole step
pub async fn grant_oidc_users(conn: &mut SqliteConnection, board_id: &str) -> UserGrants {
    match try_grant_oidc_users(conn, board_id).await {
        Ok(grants) => UserGrants::Applied(grants),
        Err(e) => {
            let reason = format!("{:#}", e);
            tracing::warn!(error = %reason, "could not set user permissions");
            UserGrants::Skipped(reason)
        }
    }
}

pub async fn populate_infra_board(
    conn: &mut SqliteConnection,
    section: &SectionDefinition,
) -> Result<InfraOutcome, SeedError> {
    let mut tx = conn.begin().await.db_err()?;

    let board = db::board_by_name(&mut tx, INFRA_BOARD_NAME).await.db_err()?;
    let (board, layout_id) = match seed::inspect_board(&mut tx, board).await.db_err()? {
        BoardState::NoBoard => return Ok(InfraOutcome::NoBoard),
        BoardState::NoLayout { .. } => return Ok(InfraOutcome::NoLayout),
        BoardState::Populated { items, .. } => return Ok(InfraOutcome::AlreadyPopulated { items }),
        BoardState::Empty { board, layout_id } => (board, layout_id),
    };

    let catalog = Catalog::load_apps(&mut tx).await.db_err()?;
    let placement = SectionStack::new().push(section.apps.len());
    let report = seed::place_section(&mut tx, &board.id, &layout_id, section, placement, &catalog)
        .await
        .db_err()?;

    tx.commit().await.db_err()?;

    // Grants run outside the populate transaction so a failure cannot undo the tiles
    let group_grant = grant_admin_group(conn, &board.id).await;
    let user_grants = grant_oidc_users(conn, &board.id).await;

    Ok(InfraOutcome::Populated(InfraSummary {
        section: report,
        group_grant,
        user_grants,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Placement;

    fn summary(group_grant: GrantOutcome, user_grants: UserGrants) -> InfraSummary {
        InfraSummary {
            section: SectionReport {
                section_id: "s1".to_string(),
                name: "Infrastructure".to_string(),
                placement: Placement { x: 0, y: 0, width: 12, height: 1 },
                items: 1,
                links: 0,
                missing: vec!["Traefik".to_string()],
            },
            group_grant,
            user_grants,
        }
    }

    #[test]
    fn test_status_lines_for_grants() {
        let lines = summary(
            GrantOutcome::Granted,
            UserGrants::Applied(vec![
                UserGrant { user_id: "u1".to_string(), outcome: GrantOutcome::Granted },
                UserGrant { user_id: "u2".to_string(), outcome: GrantOutcome::AlreadyGranted },
            ]),
        )
        .status_lines();

        assert_eq!(
            lines,
            vec![
                "App not found: Traefik",
                "Board permission set for credentials-admin group",
                "Board permission set for OIDC user u1",
            ]
        );
    }

    #[test]
    fn test_status_lines_for_skipped_steps() {
        let lines = summary(
            GrantOutcome::Skipped("no such table: boardGroupPermission".to_string()),
            UserGrants::Skipped("no such column: provider".to_string()),
        )
        .status_lines();

        assert_eq!(lines[1], "Group permission skipped: no such table: boardGroupPermission");
        assert_eq!(lines[2], "User permissions skipped: no such column: provider");
    }

    #[test]
    fn test_outcome_messages() {
        assert_eq!(InfraOutcome::NoBoard.to_string(), "Infrastructure board not found");
        assert_eq!(InfraOutcome::NoLayout.to_string(), "No layout for Infrastructure board");
        assert_eq!(
            InfraOutcome::AlreadyPopulated { items: 2 }.to_string(),
            "Infrastructure board already populated"
        );
    }
}
