//! waypost-server CLI
//!
//! Serves static asset directories and an optional index page through a
//! [`waypost::Router`].

mod server;

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{Level, debug, info, warn};
use tracing_subscriber::FmtSubscriber;

use waypost::{Request, Response, Router, RouterConfig};

/// Serve static files and routes with waypost.
#[derive(Parser, Debug)]
#[command(name = "waypost-server")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Address to bind.
    #[arg(long, env = "WAYPOST_HOST", default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    host: IpAddr,

    /// Port to bind.
    #[arg(short, long, env = "WAYPOST_PORT", default_value_t = 3000)]
    port: u16,

    /// Router configuration file (JSON).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Asset binding as KEY[,KEY...]=ROOT. May be repeated.
    #[arg(short, long = "asset", value_parser = parse_asset)]
    assets: Vec<AssetArg>,

    /// HTML file served at `/`.
    #[arg(long)]
    index: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct AssetArg {
    keys: String,
    root: PathBuf,
}

fn parse_asset(raw: &str) -> Result<AssetArg, String> {
    let (keys, root) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=ROOT, got `{raw}`"))?;
    if keys.split(',').all(|k| k.trim().is_empty()) {
        return Err(format!("no asset key in `{raw}`"));
    }
    if root.is_empty() {
        return Err(format!("no asset root in `{raw}`"));
    }
    Ok(AssetArg {
        keys: keys.to_string(),
        root: PathBuf::from(root),
    })
}

fn build_router(cli: &Cli) -> anyhow::Result<Router> {
    let config = match &cli.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            RouterConfig::from_json(&raw)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => RouterConfig::default(),
    };
    let mut router = Router::with_config(config);

    for asset in &cli.assets {
        router
            .add_asset_path(&asset.keys, asset.root.clone(), false, "")
            .with_context(|| format!("binding assets {}", asset.keys))?;
    }

    router.get("/health", |_req| async { Response::text("ok") })?;

    if let Some(index) = cli.index.clone() {
        router.get("/", move |_req: Request| {
            let index = index.clone();
            async move {
                match tokio::fs::read_to_string(&index).await {
                    Ok(page) => Response::html(page),
                    Err(err) => {
                        warn!(path = %index.display(), error = %err, "Failed to read index");
                        Response::file_not_found()
                    }
                }
            }
        })?;
    }

    Ok(router)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "Cannot listen for Ctrl-C, running until killed");
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let router = build_router(&cli)?;
    for (template, method) in router.routes() {
        debug!(%method, template, "Route registered");
    }
    for key in router.asset_keys() {
        debug!(key, "Asset key bound");
    }

    let addr = SocketAddr::new(cli.host, cli.port);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!("Listening on http://{addr}");

    server::listen(listener, Arc::new(router), shutdown_signal()).await?;
    info!("Server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use waypost::{Method, MethodFilter};

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["waypost-server"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_parse_asset() {
        assert_eq!(
            parse_asset("css,styles=public/css").unwrap(),
            AssetArg {
                keys: "css,styles".into(),
                root: PathBuf::from("public/css"),
            }
        );
        assert!(parse_asset("public/css").is_err());
        assert!(parse_asset(",=public").is_err());
        assert!(parse_asset("css=").is_err());
    }

    #[test]
    fn test_cli_defaults() {
        let cli = cli(&[]);
        assert_eq!(cli.port, 3000);
        assert_eq!(cli.host, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert!(cli.assets.is_empty());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_build_router_registers_assets() {
        let cli = cli(&["-a", "css=public/css", "--asset", "js,mjs=public/js"]);
        let router = build_router(&cli).unwrap();

        let mut keys: Vec<&str> = router.asset_keys().collect();
        keys.sort_unstable();
        assert_eq!(keys, ["css", "js", "mjs"]);

        let routes: Vec<_> = router.routes().collect();
        assert_eq!(routes, [("/health", MethodFilter::Only(Method::Get))]);
    }

    #[test]
    fn test_build_router_rejects_duplicate_asset() {
        let cli = cli(&["-a", "css=one", "-a", "css=two"]);
        let err = build_router(&cli).unwrap_err();
        assert!(err.to_string().contains("binding assets css"));
    }

    #[tokio::test]
    async fn test_index_and_config() {
        let dir = tempfile::tempdir().unwrap();
        let index = dir.path().join("index.html");
        std::fs::write(&index, "<h1>home</h1>").unwrap();
        let config = dir.path().join("router.json");
        std::fs::write(&config, r#"{"not_found": "nothing here"}"#).unwrap();

        let cli = cli(&[
            "--index",
            index.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ]);
        let router = build_router(&cli).unwrap();

        let res = router.dispatch(Method::Get, "/").await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body_string().unwrap(), "<h1>home</h1>");

        let res = router.dispatch(Method::Get, "/missing").await;
        assert_eq!(res.status, 404);
        assert_eq!(res.body_string().unwrap(), "nothing here");
    }
}
