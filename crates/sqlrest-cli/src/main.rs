use std::{
    path::{Path, PathBuf},
    sync::atomic::Ordering,
};

use clap::Parser;
use cli::{Args, Commands};
use config::{display_config, init_config};
use logging::setup_logging;
use miette::{IntoDiagnostic, Result, WrapErr};
use sqlrest_config::{config::Config, paths::config_path};
use sqlrest_core::{Client, ClientOptions};
use sqlrest_http::Proxy;
use stored::run_query;
use table::{
    delete_rows, export_table, insert_rows, list_rows, show_table, update_rows, ListOptions,
};
use tracing::debug;
use utils::{parse_headers, COLOR};

mod cli;
mod config;
mod logging;
mod output;
mod stored;
mod table;
mod utils;

/// Builds a client from the selected profile, with command line overrides applied.
fn connect(args: &Args, config_file: &Path) -> Result<Client> {
    let config = Config::load(config_file)?;
    let profile = config.select_profile(args.profile.as_deref())?;
    let mut options = ClientOptions::from_profile(&profile)?;

    if let Some(proxy) = args.proxy.as_deref() {
        let proxy = Proxy::new(proxy)
            .into_diagnostic()
            .wrap_err_with(|| format!("Invalid proxy '{proxy}'"))?;
        options.transport.proxy = Some(proxy);
    }
    if let Some(user_agent) = &args.user_agent {
        options.transport.user_agent = Some(user_agent.clone());
    }
    if let Some(headers) = &args.header {
        options.transport.headers = Some(parse_headers(headers)?);
    }

    debug!("connecting to {}", options.base_url);
    Ok(Client::connect(options)?)
}

fn main() -> Result<()> {
    let args = Args::parse();

    setup_logging(&args)?;

    if args.no_color {
        COLOR.store(false, Ordering::Relaxed);
    }

    let config_file = args
        .config
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(config_path);

    if let Commands::Config {
        init,
    } = args.command
    {
        return if init {
            init_config(&config_file)
        } else {
            display_config(&config_file)
        };
    }

    let client = connect(&args, &config_file)?;
    let json = args.json;

    match args.command {
        Commands::Config {
            ..
        } => Ok(()),
        Commands::List {
            table,
            page,
            page_size,
            select,
            order,
            filters,
            count,
            renderer,
        } => {
            let options = ListOptions {
                page,
                page_size,
                select,
                order,
                filters,
                count,
                renderer: renderer.map(Into::into),
            };
            list_rows(&client, &table, options, json)
        }
        Commands::Show {
            table,
        } => show_table(&client, &table, json),
        Commands::Export {
            table,
            data,
            output,
        } => export_table(&client, &table, data.as_deref(), output.as_deref()),
        Commands::Query {
            script,
            params,
            export,
            output,
        } => run_query(&client, &script, &params, export, output.as_deref(), json),
        Commands::Insert {
            table,
            data,
        } => insert_rows(&client, &table, &data, json),
        Commands::Update {
            table,
            data,
            filters,
        } => update_rows(&client, &table, &data, &filters, json),
        Commands::Delete {
            table,
            filters,
        } => delete_rows(&client, &table, &filters, json),
    }
}
