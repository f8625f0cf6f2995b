//! Ask command implementation.
//!
//! Sends a raw query to the backend chosen by its task-type tag.

use super::output::print_reply;
use crate::config::Session;
use colored::Colorize;
use rumen_core::TaskOutcome;
use tracing::debug;

/// Exit code for a rejected request.
pub const REJECTED_EXIT_CODE: i32 = 2;

/// Execute the ask command.
pub async fn execute(session: &Session, task_type: &str, query: &str, save: Option<&str>) -> anyhow::Result<()> {
    let router = session.router()?;
    debug!(task_type, query_len = query.len(), "Routing query");

    match router.route(task_type, query).await? {
        TaskOutcome::Completed(response) => {
            debug!(backend = %response.backend, model = ?response.model_id, "Reply received");
            print_reply(&response.text, save, &session.results_dir())
        }
        TaskOutcome::Rejected(rejection) => {
            eprintln!("{}", rejection.to_string().red());
            std::process::exit(REJECTED_EXIT_CODE);
        }
    }
}
