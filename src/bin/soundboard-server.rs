// SPDX-License-Identifier: GPL-2.0-or-later
use std::{io::Read, sync::Arc, time::Duration};

use clap::Parser;
use tracing::{debug, info};

use soundboard::{
    cli,
    db::{Catalog, PgCatalog},
    handler::{self, Event},
    Error,
};

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    // Logs go to stderr so `invoke` can print its response on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let opts = cli::Soundboard::parse();

    if let Err(e) = process_command(opts).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn process_command(opts: cli::Soundboard) -> Result<(), Error> {
    let config = opts.config();
    let catalog = PgCatalog::from_url(&config.database_url)?;

    match opts.command {
        cli::Command::Serve {} => {
            let http_api = config.http_api;
            let tls = http_api.tls()?;
            let router = soundboard::web::create_router(Arc::new(catalog));

            let http_handle = axum_server::Handle::new();
            let handle = http_handle.clone();
            tokio::spawn(async move {
                let _shutdown_signal = tokio::signal::ctrl_c().await;
                info!("Shutdown signal received; beginning graceful shutdown.");
                handle.graceful_shutdown(Some(Duration::from_secs(15)));
            });

            match tls {
                None => {
                    info!("Starting HTTP server on {:?}", &http_api.url);
                    axum_server::bind(http_api.url)
                        .handle(http_handle)
                        .serve(router.into_make_service())
                        .await
                        .map_err(Error::Server)
                }
                Some((cert, key)) => {
                    info!("Starting HTTPS server on {:?}", &http_api.url);
                    let tls_config =
                        axum_server::tls_rustls::RustlsConfig::from_pem_file(cert, key).await?;
                    axum_server::bind_rustls(http_api.url, tls_config)
                        .handle(http_handle)
                        .serve(router.into_make_service())
                        .await
                        .map_err(Error::Server)
                }
            }
        }
        cli::Command::Invoke { event } => {
            let raw_event = match event {
                Some(path) => tokio::fs::read_to_string(path)
                    .await
                    .map_err(Error::EventReadError)?,
                None => tokio::task::spawn_blocking(|| {
                    let mut buffer = String::new();
                    std::io::stdin().read_to_string(&mut buffer).map(|_| buffer)
                })
                .await?
                .map_err(Error::EventReadError)?,
            };
            let event: Event = serde_json::from_str(&raw_event)?;
            debug!(?event, "Handling invocation");

            let catalog: &dyn Catalog = &catalog;
            let response = handler::handle(catalog, &event).await?;
            println!("{}", serde_json::to_string(&response)?);
            Ok(())
        }
    }
}
