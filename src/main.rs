// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lembar-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lembar and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Lembar server entrypoint.
//!
//! Runs the slug-to-UUID mapping service over HTTP at
//! `http://127.0.0.1:<port>` and shuts down cleanly on Ctrl-C.

use std::error::Error;

use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_HTTP_PORT: u16 = 8315;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [<data-dir>] [--port <port>] [--durable-writes]\n  {program} [--data <dir>] [--port <port>] [--durable-writes]\n\nServes the mapping API at `http://127.0.0.1:<port>`.\n--port selects the port (0 = ephemeral; default {DEFAULT_HTTP_PORT}).\n\nIf data-dir/--data is omitted, the current working directory is used.\n\n--durable-writes opts into slower, best-effort durable persistence (fsync/sync where supported)."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    data_dir: Option<String>,
    port: Option<u16>,
    durable_writes: bool,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--data" => {
                if options.data_dir.is_some() {
                    return Err(());
                }
                let dir = args.next().ok_or(())?;
                options.data_dir = Some(dir);
            }
            "--port" => {
                if options.port.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                let port: u16 = raw.parse().map_err(|_| ())?;
                options.port = Some(port);
            }
            "--durable-writes" => {
                if options.durable_writes {
                    return Err(());
                }
                options.durable_writes = true;
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.data_dir.is_some() {
                    return Err(());
                }
                options.data_dir = Some(arg);
            }
        }
    }

    Ok(options)
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "lembar".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .init();

        let dir = options.data_dir.unwrap_or_else(|| ".".to_owned());
        let store = lembar::store::MappingStore::open(&dir)?;
        let store = if options.durable_writes {
            store.with_durability(lembar::store::WriteDurability::Durable)
        } else {
            store
        };

        let port = options.port.unwrap_or(DEFAULT_HTTP_PORT);
        let state = lembar::api::ApiState::new(store);
        let router = lembar::api::router(state);

        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;

        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
            let addr = listener.local_addr()?;
            info!("serving mapping API at http://{addr} (data dir: {dir})");

            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    if let Err(err) = tokio::signal::ctrl_c().await {
                        eprintln!("lembar: failed to listen for shutdown signal: {err}");
                    }
                })
                .await?;

            info!("shutting down");
            Ok::<(), Box<dyn Error>>(())
        })?;

        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("lembar: {err}");
        std::process::exit(1);
    }
}
