use std::path::PathBuf;

pub const NAME: &str = "lichtkrant";

pub const HOST: &str = "192.168.101.2";
pub const ENDPOINT_PREFIX: &str = "/app/lichtkrant";

pub const FONT_PATH: &str = "/usr/share/fonts/truetype/freefont/FreeSans.ttf";
// Em size in pixels
pub const FONT_SIZE: f32 = 12.0;

pub const CANVAS_WIDTH: u32 = 96;
pub const CANVAS_HEIGHT: u32 = 64;
pub const LINE_HEIGHT: i32 = 12;

pub const TEXT_COLOR: (u8, u8, u8) = (58, 58, 251);

pub const OUTPUT_PATH: &str = "/home/pi/images/openhab.ppm";

pub const DISPLAY_BINARY: &str = "/home/pi/led-matrix/led-matrix";
pub const DISPLAY_RUNTIME_SECONDS: u32 = 20;
pub const DISPLAY_SCROLL_MS: u32 = 0;
pub const DISPLAY_DEMO: u8 = 1;
pub const DISPLAY_PWM_BITS: u8 = 4;

#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: String,
    pub font_path: PathBuf,
    pub font_size: f32,
    pub output_path: PathBuf,
    pub display_binary: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            base_url: format!("http://{}{}", HOST, ENDPOINT_PREFIX),
            font_path: PathBuf::from(FONT_PATH),
            font_size: FONT_SIZE,
            output_path: PathBuf::from(OUTPUT_PATH),
            display_binary: PathBuf::from(DISPLAY_BINARY),
        }
    }
}
