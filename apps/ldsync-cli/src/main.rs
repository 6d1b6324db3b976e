//! ldsync - one-way synchronization between two LDAP directories.
//!
//! Fetches a snapshot from each endpoint, computes the change plan
//! that makes the target match the source, and either prints it
//! (dry-run) or applies it. Additions and modifications only: the
//! run reports target-only entries, attributes, and values but never
//! removes them.

use clap::Parser;
use tracing::{debug, error, info};

use ldsync_core::{reconcile, render_plan, ChangeRecord};
use ldsync_ldap::{ChangeApplier, DirectoryConnection, SnapshotSource};

mod args;
mod error;
mod logging;

use args::Args;
use error::{CliError, CliResult};

#[tokio::main]
async fn main() {
    let args = Args::parse();
    logging::init(args.verbose);

    match run(args).await {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            e.print();
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(args: Args) -> CliResult<()> {
    let (source_config, target_config) = args.endpoints()?;
    let dry_run = args.dry_run;

    debug!(source = ?source_config, target = ?target_config, "resolved endpoints");

    let mut source = DirectoryConnection::connect(source_config).await?;
    let source_snapshot = source.fetch_snapshot().await?;
    source.close().await;

    let mut target = DirectoryConnection::connect(target_config).await?;
    let target_snapshot = target.fetch_snapshot().await?;

    let plan = reconcile(&source_snapshot, &target_snapshot)?;

    info!(
        adds = plan.add_count(),
        modifies = plan.modify_count(),
        unchanged = plan.unchanged,
        suppressed_deletes = plan.delete_candidates.len(),
        "reconciliation complete"
    );
    for candidate in &plan.delete_candidates {
        debug!(dn = %candidate.dn(), candidate = ?candidate, "suppressed delete");
    }

    if dry_run {
        if plan.has_changes() {
            print!("{}", render_plan(&plan));
        }
        target.close().await;
        return Ok(());
    }

    let mut applied = 0usize;
    for record in &plan.changes {
        if let Err(e) = target.apply(record).await {
            error!(dn = %record.dn(), applied, error = %e, "apply failed, aborting run");
            return Err(CliError::Store(format!(
                "{e} (after {applied} of {} change(s) applied)",
                plan.total_changes()
            )));
        }
        applied += 1;
        match record {
            ChangeRecord::AddEntry { dn, .. } => info!(dn = %dn, "added"),
            ChangeRecord::ModifyEntry { dn, .. } => info!(dn = %dn, "modified"),
            ChangeRecord::DeleteEntry { .. } => {}
        }
    }

    info!(applied, "run complete");
    target.close().await;

    Ok(())
}
