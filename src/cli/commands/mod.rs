//! Command implementations for tally.
//!
//! Each command runs against an open store and returns the text to print.

mod report;
mod task;
mod timer;

pub use report::{history, today};
pub use task::{add, delete, list, rename};
pub use timer::{start, status, stop, toggle, watch_status};

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::args::Cli;
use crate::error::TallyError;
use crate::storage::KeyValueStore;
use crate::tracker::{Clock, Task, TaskStore};

/// Resolve a user-supplied task reference.
///
/// Tries, in order: an exact id, an exact name (ignoring case), and a unique
/// id prefix.
///
/// # Errors
///
/// Returns `TallyError::NotFound` if nothing matches, or
/// `TallyError::InvalidInput` if the reference is ambiguous.
pub fn resolve_task<'a, K: KeyValueStore, C: Clock>(
    store: &'a TaskStore<K, C>,
    reference: &str,
) -> Result<&'a Task, TallyError> {
    let reference = reference.trim();

    if let Some(task) = store.task(reference) {
        return Ok(task);
    }

    let lowered = reference.to_lowercase();
    let by_name: Vec<&Task> = store
        .tasks()
        .iter()
        .filter(|t| t.name.to_lowercase() == lowered)
        .collect();
    match by_name.as_slice() {
        [task] => return Ok(*task),
        [] => {},
        _ => {
            return Err(TallyError::InvalidInput(format!(
                "Several tasks are named \"{reference}\"; use an id instead"
            )))
        },
    }

    if reference.is_empty() {
        return Err(TallyError::NotFound("Task not found: (empty)".to_string()));
    }

    let by_prefix: Vec<&Task> = store
        .tasks()
        .iter()
        .filter(|t| t.id.starts_with(reference))
        .collect();
    match by_prefix.as_slice() {
        [task] => Ok(*task),
        [] => Err(TallyError::task_not_found(reference)),
        _ => Err(TallyError::InvalidInput(format!(
            "Task id prefix \"{reference}\" is ambiguous ({} matches)",
            by_prefix.len()
        ))),
    }
}

/// Join and trim name words, rejecting an empty result.
///
/// # Errors
///
/// Returns `TallyError::InvalidInput` if the name is blank.
pub fn task_name(words: &[String]) -> Result<String, TallyError> {
    let name = words.join(" ").trim().to_string();
    if name.is_empty() {
        return Err(TallyError::InvalidInput(
            "Task name cannot be empty".to_string(),
        ));
    }
    Ok(name)
}

/// Generate a shell completion script.
///
/// # Errors
///
/// Returns an error if the script is not valid UTF-8.
pub fn completions(shell: Shell) -> Result<String, TallyError> {
    let mut cmd = Cli::command();
    let mut buf = Vec::new();
    clap_complete::generate(shell, &mut cmd, "tally", &mut buf);
    String::from_utf8(buf)
        .map_err(|e| TallyError::Config(format!("Completion script is not UTF-8: {e}")))
}


#[cfg(test)]
mod tests {
    use super::test_support::store;
    use super::*;

    #[test]
    fn test_resolve_by_id_name_and_prefix() {
        let mut store = store();
        let task = store.add_task("Write report").unwrap();

        assert_eq!(resolve_task(&store, &task.id).unwrap().id, task.id);
        assert_eq!(resolve_task(&store, "write REPORT").unwrap().id, task.id);
        assert_eq!(resolve_task(&store, &task.id[..6]).unwrap().id, task.id);
    }

    #[test]
    fn test_resolve_unknown() {
        let mut store = store();
        store.add_task("A").unwrap();

        assert!(resolve_task(&store, "zzzz-not-an-id").unwrap_err().is_not_found());
        assert!(resolve_task(&store, "  ").unwrap_err().is_not_found());
    }

    #[test]
    fn test_resolve_ambiguous_name() {
        let mut store = store();
        store.add_task("Same").unwrap();
        store.add_task("same").unwrap();

        assert!(matches!(
            resolve_task(&store, "same"),
            Err(TallyError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_task_name() {
        assert_eq!(
            task_name(&["Write".to_string(), "report".to_string()]).unwrap(),
            "Write report"
        );
        assert!(matches!(
            task_name(&["   ".to_string()]),
            Err(TallyError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_completions_bash() {
        let script = completions(Shell::Bash).unwrap();
        assert!(script.contains("tally"));
    }
}
