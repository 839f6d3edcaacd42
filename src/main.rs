use anyhow::{Context, Result};
use clap::Parser;
use std::env;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use termpix::config::{self, ConfigStorage, TomlConfigStorage};
use termpix::logging;
use termpix::render::{self, RenderMode};
use termpix::{RenderError, source, terminal};

#[derive(Parser)]
#[command(name = "termpix")]
#[command(about = "Render an image as truecolor text in the terminal", long_about = None)]
struct Cli {
    /// Path to the image file (a leading ~ is expanded)
    #[arg(short = 'i', long = "image", value_name = "PATH")]
    image: Option<String>,

    /// How cells are colored (default from config, else half-block)
    #[arg(short, long, value_enum)]
    mode: Option<RenderMode>,

    /// Luminance ramp for ascii mode, darkest glyph first
    #[arg(long, value_name = "GLYPHS")]
    ramp: Option<String>,

    /// Terminal width in columns instead of querying the terminal
    #[arg(long, value_name = "N")]
    cols: Option<u16>,

    /// Terminal height in rows instead of querying the terminal
    #[arg(long, value_name = "N")]
    rows: Option<u16>,

    /// Rows left free below the image (default from config, else 1)
    #[arg(long, value_name = "N")]
    reserve_rows: Option<u16>,

    /// Alternate config file
    #[arg(short, long, value_name = "PATH")]
    config: Option<String>,

    /// More logging on stderr (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    run(Cli::parse())
}

fn run(cli: Cli) -> Result<()> {
    let image_arg = cli.image.as_deref().ok_or(RenderError::Usage)?;

    // Looked up once; everything below takes it as a parameter.
    let home_dir = home::home_dir();
    let home = home_dir.as_deref();

    let config_path = match &cli.config {
        Some(path) => Some(config::expand_home(path, home)),
        None => {
            let xdg = env::var_os("XDG_CONFIG_HOME").map(PathBuf::from);
            config::default_config_path(xdg.as_deref(), home)
        }
    };
    let config = match &config_path {
        Some(path) => TomlConfigStorage::new(path.clone()).load()?,
        None => config::Config::default(),
    };

    let level = logging::raise_level(logging::parse_level(&config.logging.level), cli.verbose);
    let log_file = config
        .logging
        .file
        .as_deref()
        .map(|file| config::expand_home(file, home));
    logging::init_logger(level, log_file.as_deref())?;
    log::debug!("Configuration: {:?}", config_path);

    let image_path = config::expand_home(image_arg, home);

    let image = source::load(&image_path)?;
    log::debug!("Image size: {}x{}", image.width(), image.height());

    let reserved = cli.reserve_rows.unwrap_or(config.render.reserved_rows);
    let extent = terminal::resolve_extent(cli.cols, cli.rows)?.reserve(reserved);

    let mut options = config.render.options();
    if let Some(mode) = cli.mode {
        options.mode = mode;
    }
    if let Some(ramp) = cli.ramp {
        options.ramp = ramp;
    }

    draw(&image_path, &image, extent, &options)
}

/// Stream the frame to stdout. A closed pipe is not an error.
fn draw(
    path: &Path,
    image: &source::SourceImage,
    extent: terminal::TerminalExtent,
    options: &render::RenderOptions,
) -> Result<()> {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let result = render::render_image(image, extent, options, &mut out)
        .and_then(|grid| {
            out.flush().map_err(RenderError::Output)?;
            Ok(grid)
        });

    match result {
        Ok(grid) => {
            log::info!(
                "Rendered {:?} as {}x{} cells ({:?})",
                path,
                grid.cells_wide,
                grid.cells_tall,
                options.mode
            );
            Ok(())
        }
        Err(RenderError::Output(source)) if source.kind() == io::ErrorKind::BrokenPipe => {
            log::debug!("Output closed early");
            Ok(())
        }
        Err(err) => Err(err).with_context(|| format!("Failed to render {:?}", path)),
    }
}
