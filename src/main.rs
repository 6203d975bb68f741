use clap::Parser;
use std::path::PathBuf;

use simplecontacts::cli::{
    run_export, run_import, run_list, run_lookup_key, run_name, run_permission, run_photo, Cli,
    Commands, ContactsApp,
};
use simplecontacts::config::Config;
use simplecontacts::db::Database;
use simplecontacts::logging::init_tracing;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(path) = cli.db {
        config.database_path = PathBuf::from(path);
    }
    init_tracing(&config.log_filter);

    let app = ContactsApp::new(Database::open(&config)?);

    match cli.command {
        Commands::List(args) => {
            run_list(&app, args.json)?;
        }
        Commands::Name(args) => {
            run_name(&app, &args.number)?;
        }
        Commands::Photo(args) => {
            run_photo(&app, &args.number)?;
        }
        Commands::LookupKey(args) => {
            run_lookup_key(&app, args.raw_id)?;
        }
        Commands::Import(args) => {
            run_import(&app.db, &args.file, args.dry_run)?;
        }
        Commands::Export(args) => {
            run_export(&app, &args.file)?;
        }
        Commands::Permission(args) => {
            run_permission(&app, &args.action)?;
        }
    }

    Ok(())
}
