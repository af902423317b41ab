use chrono::offset::Utc;
use chrono::Duration;

use dotenv::dotenv;

use log::{info, warn};

use finance_snapshot::snapshot::STALE_AFTER_MINUTES;
use finance_snapshot::{SnapshotConfig, SnapshotFile, YahooSource};

fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

/// Notes what kind of file is about to be replaced. Problems here never stop the run.
fn inspect_previous(config: &SnapshotConfig) {
    match SnapshotFile::read_existing(&config.output) {
        Ok(None) => {}
        Ok(Some(previous)) if previous.is_legacy() => {
            warn!(
                "Replacing legacy bare-array snapshot at {}; consumers must read {{meta, data}}",
                config.output.display()
            );
        }
        Ok(Some(previous)) => {
            let stale = previous
                .meta()
                .is_some_and(|meta| meta.is_stale(Utc::now(), Duration::minutes(STALE_AFTER_MINUTES)));
            if stale {
                info!("Previous snapshot is older than {} minutes", STALE_AFTER_MINUTES);
            }
        }
        Err(why) => warn!("Ignoring unreadable previous snapshot: {}", why),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    dotenv().ok();
    init_logger();

    let config = SnapshotConfig::default();
    inspect_previous(&config);

    let source = YahooSource::new()?;
    finance_snapshot::run(&source, &config).await?;

    Ok(())
}
