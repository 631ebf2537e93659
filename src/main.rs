//! `thumbforge` command line: resize images and render thumbnails with the
//! settings from `thumbforge.toml`, overridden by flags.

use clap::{Parser, Subcommand};
use image::{DynamicImage, GenericImageView};
use std::io::BufWriter;
use std::path::PathBuf;
use thumbforge::config::{self, ProcessorConfig};
use thumbforge::{
    BaseSide, CgiResponse, ColorSpec, EncodeOptions, HorizontalAlign, ImageKind, ImageProcessor, PngFilter,
    VerticalAlign,
};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Where and how to write the result.
#[derive(clap::Args, Clone)]
struct OutputArgs {
    /// Output filename template; `%base%` expands to the source name and the
    /// extension is added when missing
    #[arg(short, long, required_unless_present = "stdout")]
    output: Option<String>,

    /// Write a CGI-style response (Content-Type header, blank line, image) to stdout
    #[arg(long, conflicts_with = "output")]
    stdout: bool,

    /// Output format: jpeg, jpg, gif or png [default: from config]
    #[arg(long)]
    format: Option<ImageKind>,

    /// JPEG quality 0-100 or PNG compression 0-9 [default: from config]
    #[arg(long)]
    quality: Option<u8>,

    /// PNG row filter: none, sub, up, avg, paeth or adaptive [default: from config]
    #[arg(long)]
    png_filter: Option<PngFilter>,
}

/// Top-level arguments.
#[derive(Parser)]
#[command(name = "thumbforge")]
#[command(about = "Resize images and render fixed-size thumbnails")]
#[command(version)]
struct Cli {
    /// Configuration file (see `thumbforge gen-config`)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log every processing step
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resize an image proportionally
    Resize {
        /// Source image (.jpg, .jpeg, .gif or .png)
        input: PathBuf,
        #[arg(long)]
        width: u32,
        #[arg(long)]
        height: u32,
        /// none, width, height, big, small or restricted [default: from config]
        #[arg(long)]
        base_side: Option<BaseSide>,
        /// Keep the source as is when both requested sides are larger
        #[arg(long)]
        reduce_only: bool,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Fit an image onto a fixed-size colored canvas
    Thumb {
        /// Source image (.jpg, .jpeg, .gif or .png)
        input: PathBuf,
        #[arg(long)]
        width: u32,
        #[arg(long)]
        height: u32,
        /// "#RRGGBB", "#RGB" or "r,g,b" [default: from config]
        #[arg(long)]
        background: Option<String>,
        /// left, center or right [default: from config]
        #[arg(long)]
        h_align: Option<String>,
        /// top, center or bottom [default: from config]
        #[arg(long)]
        v_align: Option<String>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Print a stock thumbforge.toml with all options documented
    GenConfig,
}

/// Parse flags, load config for the image commands, run the command.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Resize {
            input,
            width,
            height,
            base_side,
            reduce_only,
            output,
        } => {
            let config = config::load_config(cli.config.as_deref())?;
            let processor = ImageProcessor::open(&input)?
                .with_base_side(base_side.unwrap_or(config.base_side))
                .with_reduce_only(reduce_only || config.reduce_only)
                .with_filter(config.filter);
            let resized = processor.resize(width, height)?;
            info!(
                source = %input.display(),
                from = ?processor.dimensions(),
                to = ?resized.dimensions(),
                "resized"
            );
            emit(&processor, &resized, &output, &config)?;
        }
        Command::Thumb {
            input,
            width,
            height,
            background,
            h_align,
            v_align,
            output,
        } => {
            let config = config::load_config(cli.config.as_deref())?;
            let processor = ImageProcessor::open(&input)?.with_filter(config.filter);
            let background = background
                .as_deref()
                .map(parse_color_arg)
                .unwrap_or_else(|| config.thumbnail.background.clone());
            let h_align = h_align
                .as_deref()
                .map(HorizontalAlign::from_name)
                .unwrap_or(config.thumbnail.horizontal_align);
            let v_align = v_align
                .as_deref()
                .map(VerticalAlign::from_name)
                .unwrap_or(config.thumbnail.vertical_align);
            let thumbnail =
                processor.make_thumbnail(width, height, background, h_align, v_align)?;
            info!(source = %input.display(), width, height, "thumbnail rendered");
            emit(&processor, &thumbnail, &output, &config)?;
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Log to stderr so `--stdout` output stays a clean response.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}

/// Accept `r,g,b` on the command line alongside hex strings.
fn parse_color_arg(arg: &str) -> ColorSpec {
    if !arg.contains(',') {
        return ColorSpec::from(arg);
    }
    arg.split(',')
        .map(|c| c.trim().parse::<i64>())
        .collect::<Result<Vec<_>, _>>()
        .map(ColorSpec::Components)
        .unwrap_or_else(|_| ColorSpec::from(arg))
}

/// Output format and encoder options: flags first, then config.
fn encoder_settings(args: &OutputArgs, config: &ProcessorConfig) -> (ImageKind, EncodeOptions) {
    let kind = args.format.unwrap_or(config.output.format);
    let mut options = config.output.encode_options(kind);
    if let Some(quality) = args.quality {
        options.quality = quality;
    }
    if let Some(png_filter) = args.png_filter {
        options.png_filter = png_filter;
    }
    (kind, options)
}

/// Save or stream the result, as the output flags ask.
fn emit(
    processor: &ImageProcessor,
    image: &DynamicImage,
    args: &OutputArgs,
    config: &ProcessorConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let (kind, options) = encoder_settings(args, config);

    if args.stdout {
        let stdout = std::io::stdout().lock();
        let mut response = CgiResponse::new(BufWriter::new(stdout));
        processor.output(image, kind, options, &mut response)?;
        response.finish()?;
    } else if let Some(template) = &args.output {
        let path = processor.save(image, template, kind, options)?;
        info!(path = %path.display(), %kind, "saved");
    }
    Ok(())
}
