// Deployment-time seeding for the dashboard's SQLite store.
//
// Three binaries share this library:
//   create-api-key        issue an API key for the first user
//   populate-board        fill the primary board and make it the default
//   populate-infra-board  fill the Infrastructure board and grant admin access

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod layout;
pub mod logging;
pub mod seed;
