use std::error;

use env_logger::Env;
use log::{error, info};

use lichtkrant::config::{Settings, NAME};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn error::Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    info!("Starting {}", NAME);

    let settings = Settings::default();

    match lichtkrant::run(&settings).await {
        Ok(image) => {
            info!("Panel updated with {}", image.display());
            Ok(())
        }
        Err(err) => {
            error!("Update aborted: {}", err);
            Err(err.into())
        }
    }
}
