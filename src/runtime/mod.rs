use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;

use local_music::config::LogLevel;
use local_music::pick::ChooserOutcome;
use local_music::plugin::{EchoRequest, ReadRequest};
use local_music::provider::FsDocumentProvider;
use local_music::{LocalMusic, PluginError, logging};

mod cli;
mod host;
mod settings;

use cli::{Args, Command};
use host::{CliHost, StdoutSink};

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("serializing response")?;
    println!("{json}");
    Ok(())
}

fn rejected(e: PluginError) -> anyhow::Error {
    anyhow::anyhow!("{e} ({:?})", e.kind())
}

pub fn run() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut settings = settings::load_settings(args.music_dir.clone());
    if args.verbose {
        settings.logging.level = LogLevel::Debug;
    }
    logging::init(&settings.logging);

    let plugin = LocalMusic::new(
        settings,
        Arc::new(CliHost),
        Arc::new(FsDocumentProvider::new()),
        Arc::new(StdoutSink),
    );

    match args.command {
        Command::Scan => {
            let response = plugin.scan_music_directory().map_err(rejected)?;
            print_json(&response)
        }
        Command::Pick { uri } => {
            let handle = plugin.pick_music_folder().map_err(rejected)?;
            plugin
                .complete_pick(handle.id(), ChooserOutcome::from(Some(uri)))
                .map_err(rejected)?;
            let response = handle.wait().map_err(rejected)?;
            print_json(&response)
        }
        Command::Read { path, uri } => {
            let response = plugin
                .read_file_bytes(&ReadRequest { path, uri })
                .map_err(rejected)?;
            print_json(&response)
        }
        Command::Echo { message } => print_json(&plugin.echo(&EchoRequest { message })),
    }
}
