use anyhow::Result;
use boardflow_core::{DropEvent, DropSlot};
use boardflow_http::HttpBackend;
use boardflow_sync::{BoardScope, CacheKey, CacheLayer, ReconcileOutcome, Reconciler};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod board_file;
mod local_backend;

use board_file::{print_board, read_board, write_board, BoardFile};
use local_backend::LocalBackend;

#[derive(Parser, Debug)]
#[command(name = "boardflow", version, about = "Grouped task reordering engine CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the board grouped by status
    Show {
        /// Path to a JSON board file
        #[arg(long)]
        board: PathBuf,
    },

    /// Print per-group counts and the completion ratio
    Summary {
        #[arg(long)]
        board: PathBuf,
    },

    /// Apply a drag-and-drop move and reconcile it against the board file
    Move {
        #[arg(long)]
        board: PathBuf,

        /// Source group id
        #[arg(long)]
        from_group: String,

        /// Index within the source group
        #[arg(long)]
        from_index: usize,

        /// Destination group id
        #[arg(long)]
        to_group: String,

        /// Index within the destination group
        #[arg(long)]
        to_index: usize,

        /// Inject a status-change rejection to demonstrate rollback
        #[arg(long)]
        fail_status: bool,

        /// Inject an order-persistence rejection for one group
        #[arg(long)]
        fail_order: Option<String>,
    },

    /// Fetch a board from a remote server and save it as a local board file
    Pull {
        /// Server base URL
        #[arg(long)]
        base_url: String,

        /// Bearer token
        #[arg(long)]
        token: String,

        #[arg(long)]
        space: String,

        #[arg(long)]
        list: String,

        /// Where to write the board file
        #[arg(long)]
        out: PathBuf,
    },
}

/// The CLI has no real query cache; log what a data layer would refetch.
struct LoggingCache;

impl CacheLayer for LoggingCache {
    fn invalidate(&self, key: &CacheKey) {
        log::info!(
            "stale: {} space={} list={} filters={:?}",
            key.operation,
            key.scope.space_id,
            key.scope.list_id,
            key.filters
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Show { board } => {
            let b = read_board(&board)?;
            print_board(&b.index());
        }

        Command::Summary { board } => {
            let b = read_board(&board)?;
            let summary = b.index().summary();
            for g in &summary.per_group {
                println!("{:<20} {}", g.status_name, g.count);
            }
            println!("total: {}  done: {:.0}%", summary.total, summary.done_ratio * 100.0);
        }

        Command::Move {
            board,
            from_group,
            from_index,
            to_group,
            to_index,
            fail_status,
            fail_order,
        } => {
            let b = read_board(&board)?;
            let index = b.index();

            let mut backend = LocalBackend::new(board.clone());
            if fail_status {
                backend = backend.with_status_failure();
            }
            if let Some(group) = fail_order {
                backend = backend.with_order_failure(group);
            }

            let scope = BoardScope::new(b.space_id.clone(), b.list_id.clone());
            let rec = Reconciler::new(backend, LoggingCache, scope);

            let event = DropEvent::new(
                DropSlot::new(from_group, from_index),
                DropSlot::new(to_group, to_index),
            );

            let Some(pending) = rec.begin(&index, &event) else {
                println!("no-op: nothing to move");
                return Ok(());
            };

            println!("optimistic:");
            print_board(pending.index());

            match rec.reconcile(pending).await {
                ReconcileOutcome::Reconciled { correlation_id, invalidated } => {
                    println!(
                        "\nreconciled (correlation {correlation_id}, {} keys invalidated)",
                        invalidated.len()
                    );
                    // Re-read: after invalidation the server's order is truth.
                    let fresh = read_board(&board)?;
                    println!("\nserver state:");
                    print_board(&fresh.index());
                }
                ReconcileOutcome::RolledBack { correlation_id, restored, error } => {
                    eprintln!("\nmove failed (correlation {correlation_id}): {error}");
                    if error.is_partial() {
                        eprintln!(
                            "warning: {} call(s) had already landed; local view may lag the server until refresh",
                            error.completed_steps().len()
                        );
                    }
                    println!("\nrolled back to:");
                    print_board(&restored);
                }
            }
        }

        Command::Pull {
            base_url,
            token,
            space,
            list,
            out,
        } => {
            let backend = HttpBackend::new(base_url, token);
            let (tasks, statuses) = backend.fetch_board(&list).await?;
            let board = BoardFile {
                space_id: space,
                list_id: list,
                statuses,
                tasks,
            };
            write_board(&out, &board)?;
            println!("wrote {} tasks to {}", board.tasks.len(), out.display());
            print_board(&board.index());
        }
    }

    Ok(())
}
