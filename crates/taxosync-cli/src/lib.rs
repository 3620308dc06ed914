//! Taxosync CLI Library
//!
//! Command-line interface for reconciling a CSV taxon sheet against a
//! remote Specify-style store.
//!
//! # Overview
//!
//! - **Import**: resolve every Order→Family→Genus→Species chain under a
//!   fixed root, creating missing nodes, linking synonyms and
//!   reconciling authors (`taxosync import`)
//! - Every gateway call is mirrored to a JSONL transcript for later
//!   inspection

pub mod api;
pub mod audit_log;
pub mod commands;
pub mod config;
pub mod error;
pub mod progress;
pub mod rows;
pub mod session;

// Re-export commonly used types
pub use error::{CliError, Result};

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{
    RunConfig, DEFAULT_RECORD_SET_NAME, DEFAULT_REMARKS, DEFAULT_ROOT_NAME, DEFAULT_SERVER_URL,
};

/// Taxosync - CSV taxon reconciliation for Specify-style stores
#[derive(Parser, Debug)]
#[command(name = "taxosync")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Server URL
    #[arg(long, env = "TAXOSYNC_SERVER_URL", default_value = DEFAULT_SERVER_URL, global = true)]
    pub server_url: String,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Import a CSV taxon sheet into the remote store
    Import {
        /// Input CSV file
        input: PathBuf,

        /// Login username
        #[arg(short, long, env = "TAXOSYNC_USERNAME")]
        username: String,

        /// Login password
        #[arg(short, long, env = "TAXOSYNC_PASSWORD")]
        password: String,

        /// Collection to log into (by name)
        #[arg(short, long, env = "TAXOSYNC_COLLECTION")]
        collection: String,

        /// Root Class node every chain is anchored under
        #[arg(long, default_value = DEFAULT_ROOT_NAME)]
        root: String,

        /// Name of the record set created at the end of the run
        #[arg(long, default_value = DEFAULT_RECORD_SET_NAME)]
        record_set: String,

        /// Path of the JSONL gateway transcript
        #[arg(long, default_value = "taxosync-audit.jsonl")]
        audit_file: PathBuf,

        /// Provenance remark stamped on created nodes
        #[arg(long, default_value = DEFAULT_REMARKS)]
        remarks: String,
    },
}

impl Cli {
    /// Assemble the run configuration for the import command.
    pub fn run_config(&self) -> RunConfig {
        let Commands::Import {
            input,
            username,
            password,
            collection,
            root,
            record_set,
            audit_file,
            remarks,
        } = &self.command;
        RunConfig {
            server_url: self.server_url.clone(),
            username: username.clone(),
            password: password.clone(),
            collection: collection.clone(),
            root_name: root.clone(),
            record_set_name: record_set.clone(),
            remarks: remarks.clone(),
            input: input.clone(),
            audit_file: audit_file.clone(),
        }
    }
}
