use anyhow::Result;

use fairjudge::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let config = Config::load()?;
    fairjudge::server::serve(config).await?;

    Ok(())
}
