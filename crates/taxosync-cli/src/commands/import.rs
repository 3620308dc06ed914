//! `taxosync import` command
//!
//! Orchestrates one full run: read and validate the CSV, establish the
//! session, bootstrap the tree context, process every row through the
//! engine, then materialize the record set and print a summary.

use std::sync::Arc;

use colored::Colorize;
use tracing::info;

use taxosync_core::audit::AuditedGateway;
use taxosync_core::{ImportEngine, RecordSetScope};

use crate::api::HttpTaxonGateway;
use crate::audit_log::JsonlAuditSink;
use crate::config::RunConfig;
use crate::error::Result;
use crate::progress::ConsoleProgress;
use crate::rows::read_rows;
use crate::session::Session;

pub async fn run(config: RunConfig) -> Result<()> {
    let rows = read_rows(&config.input)?;
    println!(
        "Importing {} rows from '{}'",
        rows.len(),
        config.input.display()
    );

    let mut session = Session::connect(&config.server_url).await?;
    session
        .login(&config.username, &config.password, &config.collection)
        .await?;
    let scope = RecordSetScope {
        owner: session.user_uri()?.to_string(),
        collection: config.collection.clone(),
    };

    let (gateway, root) =
        HttpTaxonGateway::bootstrap(session, &config.root_name, &config.remarks).await?;
    info!(root = %root.id, name = %root.name, "tree context ready");

    let audit = Arc::new(JsonlAuditSink::create(&config.audit_file)?);
    let gateway = Arc::new(AuditedGateway::new(gateway, audit));

    let progress = Arc::new(ConsoleProgress::new(rows.len()));
    let engine = ImportEngine::new(gateway, root, config.remarks.clone())
        .with_progress(progress.clone());

    let report = engine.run(rows).await;
    progress.finish();

    let handle = engine.finalize(&scope, &config.record_set_name).await?;

    println!();
    println!(
        "{} {} rows imported, {} failed",
        if report.failed() == 0 {
            "✓".green()
        } else {
            "!".yellow()
        },
        report.succeeded(),
        report.failed()
    );
    for failure in &report.failures {
        println!(
            "  {} row {}: {}",
            "✗".red(),
            failure.index,
            failure.error
        );
    }
    println!(
        "Record set '{}' (id {}) created with {} species",
        handle.name,
        handle.id,
        engine.collector().registered().await.len()
    );
    println!(
        "Gateway transcript written to '{}'",
        config.audit_file.display()
    );

    Ok(())
}
