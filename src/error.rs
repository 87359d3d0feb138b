use std::io;
use std::path::PathBuf;
use std::string::FromUtf8Error;

use hyper::http::uri::InvalidUri;
use hyper::StatusCode;

#[derive(Debug, Display, From, Error)]
pub enum Error {
    #[display(fmt = "Invalid endpoint url: {}", _0)]
    Uri(InvalidUri),
    #[display(fmt = "Request failed: {}", _0)]
    Http(hyper::Error),
    #[from(ignore)]
    #[display(fmt = "{} answered with {}", url, status)]
    Status { url: String, status: StatusCode },
    #[display(fmt = "Response is not valid UTF-8: {}", _0)]
    Body(FromUtf8Error),
    #[from(ignore)]
    #[display(fmt = "Cannot read font {}: {}", "path.display()", source)]
    Font { path: PathBuf, source: io::Error },
    #[from(ignore)]
    #[display(fmt = "Not a usable font: {}", "path.display()")]
    InvalidFont { path: PathBuf },
    #[from(ignore)]
    #[display(fmt = "Drawing failed: {}", reason)]
    Draw { reason: String },
    #[display(fmt = "Cannot write image: {}", _0)]
    Io(io::Error),
    #[from(ignore)]
    #[display(fmt = "Cannot start {}: {}", "program.display()", source)]
    Spawn { program: PathBuf, source: io::Error },
}

pub type Result<T> = std::result::Result<T, Error>;
