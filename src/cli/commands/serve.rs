use anyhow::Result;
use clap::Args;

use crate::models::Config;
use crate::server;

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address to bind the HTTP server to (host:port)
    #[arg(long, env = "COURSEBOT_BIND")]
    pub bind: Option<String>,
}

pub async fn handle_serve(args: ServeArgs) -> Result<()> {
    let config = Config::load()?;

    let mut server_config = config.server;
    if let Some(bind) = args.bind {
        server_config.bind = bind;
    }

    server::run(&server_config).await?;
    Ok(())
}
