use std::io;
use std::path::PathBuf;

/// Everything that can stop a render. All variants are fatal for a
/// single-shot invocation; an out-of-bounds sample is not an error.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("no image path given (use --image <PATH> or -i <PATH>)")]
    Usage,

    #[error("file does not exist: {}", path.display())]
    Path { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("the file isn't a valid image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("failed to write output: {0}")]
    Output(#[source] io::Error),

    #[error("could not get terminal size: {0}")]
    Terminal(#[source] io::Error),

    #[error(
        "cannot fit a {image_width}x{image_height} image into {columns}x{rows} cells"
    )]
    Geometry {
        image_width: u32,
        image_height: u32,
        columns: u16,
        rows: u16,
    },

    #[error("invalid config file {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("luminance ramp needs at least two glyphs, got {0:?}")]
    InvalidRamp(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;
