//! JSON board files: the on-disk stand-in for the task repository.

use anyhow::{Context, Result};
use boardflow_core::{GroupIndex, Status, Task};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Flat task collection plus status columns for one list.
///
/// `tasks` is stored in backend-canonical order; `statuses` in display order
/// (ascending `orderindex`). Both assumptions match what the engine expects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardFile {
    pub space_id: String,
    pub list_id: String,
    pub statuses: Vec<Status>,
    pub tasks: Vec<Task>,
}

impl BoardFile {
    pub fn index(&self) -> GroupIndex {
        GroupIndex::build(&self.tasks, &self.statuses)
    }
}

pub fn read_board(path: &Path) -> Result<BoardFile> {
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn write_board(path: &Path, board: &BoardFile) -> Result<()> {
    let json = serde_json::to_string_pretty(board)?;
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn print_board(index: &GroupIndex) {
    for group in index.groups() {
        println!("{} ({})", group.status.name, group.tasks.len());
        for (i, task) in group.tasks.iter().enumerate() {
            println!("  [{i}] {}  {}", task.id, task.name);
        }
    }
}
