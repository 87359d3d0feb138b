#[macro_use]
extern crate derive_more;

use std::path::PathBuf;

use log::info;

pub mod config;
pub mod domain;
pub mod error;
pub mod fetch;
pub mod publish;
pub mod render;

use config::Settings;
use error::Result;
use fetch::Fetcher;
use publish::{LedMatrix, Publisher};
use render::Renderer;

/// One panel update: fetch the readings, draw them, write the image and show it.
pub async fn run(settings: &Settings) -> Result<PathBuf> {
    info!("Fetching readings from {}", settings.base_url);

    let readings = Fetcher::new(settings.base_url.as_str()).fetch_all().await?;

    let renderer = Renderer::load(&settings.font_path, settings.font_size)?;
    let canvas = renderer.render(&readings)?;

    let publisher = Publisher::new(
        &settings.output_path,
        LedMatrix::new(&settings.display_binary),
    );
    publisher.publish(&canvas).await?;

    Ok(publisher.output().to_path_buf())
}
