use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use log::{info, warn};
use tokio::fs;
use tokio::process::Command;

use crate::config::{DISPLAY_DEMO, DISPLAY_PWM_BITS, DISPLAY_RUNTIME_SECONDS, DISPLAY_SCROLL_MS};
use crate::error::{Error, Result};
use crate::render::Canvas;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DisplayFlags {
    pub runtime_seconds: u32,
    // 0 disables scrolling
    pub scroll_ms: u32,
    pub demo: u8,
    pub pwm_bits: u8,
}

impl Default for DisplayFlags {
    fn default() -> Self {
        DisplayFlags {
            runtime_seconds: DISPLAY_RUNTIME_SECONDS,
            scroll_ms: DISPLAY_SCROLL_MS,
            demo: DISPLAY_DEMO,
            pwm_bits: DISPLAY_PWM_BITS,
        }
    }
}

impl DisplayFlags {
    /// `-V` selects the chain of six 32x32 panels, i.e. 96x64.
    pub fn args(&self, image: &Path) -> Vec<OsString> {
        vec![
            "-t".into(),
            self.runtime_seconds.to_string().into(),
            "-m".into(),
            self.scroll_ms.to_string().into(),
            "-V".into(),
            "-D".into(),
            self.demo.to_string().into(),
            image.as_os_str().to_owned(),
            format!("-p{}", self.pwm_bits).into(),
        ]
    }
}

pub struct LedMatrix {
    program: PathBuf,
    flags: DisplayFlags,
}

impl LedMatrix {
    pub fn new(program: impl Into<PathBuf>) -> LedMatrix {
        LedMatrix {
            program: program.into(),
            flags: DisplayFlags::default(),
        }
    }

    pub fn command(&self, image: &Path) -> Command {
        let mut command = Command::new(&self.program);
        command.args(self.flags.args(image));
        command
    }

    /// Runs the driver on `image` and waits for it. A failing driver is only logged.
    pub async fn show(&self, image: &Path) -> Result<ExitStatus> {
        info!("Showing {} on {}", image.display(), self.program.display());

        let status = self
            .command(image)
            .status()
            .await
            .map_err(|source| Error::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !status.success() {
            warn!("{} exited with {}", self.program.display(), status);
        }

        Ok(status)
    }
}

pub struct Publisher {
    output: PathBuf,
    display: LedMatrix,
}

impl Publisher {
    pub fn new(output: impl Into<PathBuf>, display: LedMatrix) -> Publisher {
        Publisher {
            output: output.into(),
            display,
        }
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub async fn save(&self, canvas: &Canvas) -> Result<()> {
        let bytes = canvas.to_ppm();
        let mut staging = self.output.clone().into_os_string();
        staging.push(".tmp");

        let written = match fs::write(&staging, &bytes).await {
            Ok(()) => fs::rename(&staging, &self.output).await,
            Err(err) => Err(err),
        };

        if let Err(err) = written {
            let _ = fs::remove_file(&staging).await;
            return Err(err.into());
        }

        info!("Wrote {}", self.output.display());

        Ok(())
    }

    pub async fn publish(&self, canvas: &Canvas) -> Result<()> {
        self.save(canvas).await?;
        self.display.show(&self.output).await?;

        Ok(())
    }
}
