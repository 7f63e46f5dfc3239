use clap::{Parser, Subcommand};
use content_lake::api::{self, ListenOptions, QueryParams};
use content_lake::asset::AssetReference;
use content_lake::config::{self, CdnEndpoint, ClientConfig};
use content_lake::imaging::{
    self, Auto, CropMode, Fit, FocalPoint, ImageFormat, ImageUrlBuilder, Orientation,
    TransformParams,
};
use content_lake::output;
use content_lake::types::{Crop, Hotspot, Image, Reference};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "content-lake")]
#[command(about = "Content repository client: asset URLs and API endpoints")]
#[command(long_about = "\
Content repository client: asset URLs and API endpoints

Builds delivery URLs for image and file assets, and the query, listen and
mutate endpoint URLs for a project. Nothing is fetched: every command prints
the URL it would request.

Asset references:

  image-<id>-<W>x<H>-<format>     image-Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000-jpg
  file-<id>-<extension>           file-e3a1c57b0ef7-pdf

Configuration is read from content-lake.toml in --config-dir, then
--project-id and --dataset override it.

Run 'content-lake gen-config' to generate a documented content-lake.toml.")]
#[command(version)]
struct Cli {
    /// Directory containing content-lake.toml
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    /// Project id (overrides the config file)
    #[arg(long, global = true)]
    project_id: Option<String>,

    /// Dataset (overrides the config file)
    #[arg(long, global = true)]
    dataset: Option<String>,

    /// Also print decoded query parameters
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// Transform flags for the image URL builder.
#[derive(clap::Args)]
struct ImageArgs {
    /// Image asset reference
    reference: String,

    /// Crop insets as fractions: top,bottom,left,right
    #[arg(long, value_parser = parse_crop)]
    crop: Option<Crop>,

    /// Hotspot as fractions: x,y,width,height
    #[arg(long, value_parser = parse_hotspot)]
    hotspot: Option<Hotspot>,

    /// Output width in pixels
    #[arg(long, short = 'W')]
    width: Option<u32>,

    /// Output height in pixels
    #[arg(long, short = 'H')]
    height: Option<u32>,

    #[arg(long)]
    max_width: Option<u32>,

    #[arg(long)]
    max_height: Option<u32>,

    #[arg(long)]
    min_width: Option<u32>,

    #[arg(long)]
    min_height: Option<u32>,

    #[arg(long)]
    blur: Option<u32>,

    #[arg(long)]
    sharpen: Option<u32>,

    /// Device pixel ratio
    #[arg(long)]
    dpr: Option<u32>,

    /// Encoding quality, 0-100
    #[arg(long)]
    quality: Option<u32>,

    /// Saturation, -100 to 100
    #[arg(long, allow_hyphen_values = true)]
    saturation: Option<i32>,

    #[arg(long)]
    pad: Option<f64>,

    /// Rotation in degrees: 0, 90, 180 or 270
    #[arg(long, value_parser = parse_orientation)]
    orientation: Option<Orientation>,

    /// clip, crop, fill, fillmax, max, scale or min
    #[arg(long)]
    fit: Option<Fit>,

    /// Crop mode: top, bottom, left, right, center, focalpoint or entropy
    #[arg(long)]
    crop_mode: Option<CropMode>,

    /// jpg, pjpg, png or webp
    #[arg(long)]
    format: Option<ImageFormat>,

    /// Focal point as fractions: x,y
    #[arg(long, value_parser = parse_focal_point)]
    focal_point: Option<FocalPoint>,

    /// Let the CDN pick the best format for the client
    #[arg(long)]
    auto_format: bool,

    #[arg(long)]
    flip_horizontal: bool,

    #[arg(long)]
    flip_vertical: bool,

    #[arg(long)]
    invert: bool,
}

/// Query text plus named parameters.
#[derive(clap::Args)]
struct QueryArgs {
    /// GROQ query
    query: String,

    /// Query parameter as name=value; JSON values are kept typed
    #[arg(long = "param", value_parser = parse_param)]
    params: Vec<(String, serde_json::Value)>,
}

#[derive(Subcommand)]
enum Command {
    /// Parse an asset reference and show its parts
    Inspect {
        /// Asset reference
        reference: String,
    },
    /// Build an image delivery URL
    ImageUrl(ImageArgs),
    /// Build a file delivery URL
    FileUrl {
        /// File asset reference
        reference: String,
    },
    /// Build a query endpoint URL
    QueryUrl(QueryArgs),
    /// Build a listen endpoint URL
    ListenUrl {
        #[command(flatten)]
        query: QueryArgs,

        /// Include the previous document revision in events
        #[arg(long)]
        include_previous_revision: bool,

        /// transaction or query
        #[arg(long)]
        visibility: Option<String>,
    },
    /// Print a stock content-lake.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging();

    match &cli.command {
        Command::Inspect { reference } => {
            let parsed = AssetReference::parse(reference);
            // Parsing works without a project; only the URL line needs one
            let url = match load(&cli).and_then(|config| config.cdn_endpoint()) {
                Ok(endpoint) => delivery_url(endpoint, &parsed),
                Err(e) => {
                    log::debug!("no config for inspect: {e}");
                    None
                }
            };
            output::print_reference(reference, &parsed, url.as_deref());
        }
        Command::ImageUrl(args) => {
            let config = load(&cli)?;
            let url = image_builder(config.cdn_endpoint()?, args).try_build()?;
            output::print_url(&url, cli.verbose);
        }
        Command::FileUrl { reference } => {
            let config = load(&cli)?;
            let parsed = AssetReference::parse(reference);
            let url = imaging::file_url(&config.cdn_endpoint()?, &parsed)
                .ok_or_else(|| format!("not a file reference: {reference}"))?;
            output::print_url(&url, cli.verbose);
        }
        Command::QueryUrl(args) => {
            let config = load(&cli)?;
            let url = api::query_url(&config, &args.query, &query_params(args))?;
            output::print_url(url.as_str(), cli.verbose);
        }
        Command::ListenUrl {
            query,
            include_previous_revision,
            visibility,
        } => {
            let config = load(&cli)?;
            let options = ListenOptions {
                include_previous_revision: include_previous_revision.then_some(true),
                visibility: visibility.clone(),
            };
            let url = api::listen_url(&config, &query.query, &query_params(query), &options)?;
            output::print_url(url.as_str(), cli.verbose);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Diagnostics go to stderr, filtered by `RUST_LOG` (default `warn`).
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false);
    if subscriber.try_init().is_err() {
        // already initialized
    }
}

/// Load `content-lake.toml` with the command-line overrides applied last.
fn load(cli: &Cli) -> Result<ClientConfig, config::ConfigError> {
    let mut overrides = toml::map::Map::new();
    if let Some(project_id) = &cli.project_id {
        overrides.insert("project_id".into(), toml::Value::String(project_id.clone()));
    }
    if let Some(dataset) = &cli.dataset {
        overrides.insert("dataset".into(), toml::Value::String(dataset.clone()));
    }
    config::load_config(&cli.config_dir, Some(toml::Value::Table(overrides)))
}

fn delivery_url(endpoint: CdnEndpoint, reference: &AssetReference) -> Option<String> {
    if reference.is_image() {
        ImageUrlBuilder::for_reference(endpoint, reference.clone()).build()
    } else {
        imaging::file_url(&endpoint, reference)
    }
}

fn image_builder(endpoint: CdnEndpoint, args: &ImageArgs) -> ImageUrlBuilder {
    let image = Image::new(Reference::new(&args.reference), args.crop, args.hotspot);
    let params = TransformParams {
        width: args.width,
        height: args.height,
        max_width: args.max_width,
        max_height: args.max_height,
        min_width: args.min_width,
        min_height: args.min_height,
        blur: args.blur,
        sharpen: args.sharpen,
        dpr: args.dpr,
        quality: args.quality,
        saturation: args.saturation,
        pad: args.pad,
        invert: args.invert.then_some(true),
        flip_horizontal: args.flip_horizontal.then_some(true),
        flip_vertical: args.flip_vertical.then_some(true),
        focal_point: args.focal_point,
        auto: args.auto_format.then_some(Auto::Format),
        format: args.format,
        orientation: args.orientation,
        fit: args.fit,
        crop: args.crop_mode,
    };
    ImageUrlBuilder::new(endpoint, &image).transform(params)
}

fn query_params(args: &QueryArgs) -> QueryParams {
    args.params.iter().cloned().collect()
}

fn parse_fractions<const N: usize>(s: &str) -> Result<[f64; N], String> {
    let values: Vec<f64> = s
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|e| format!("{s:?}: {e}"))?;
    values
        .try_into()
        .map_err(|v: Vec<f64>| format!("expected {N} comma-separated numbers, got {}", v.len()))
}

fn parse_crop(s: &str) -> Result<Crop, String> {
    let [top, bottom, left, right] = parse_fractions::<4>(s)?;
    Ok(Crop::new(top, bottom, left, right))
}

fn parse_hotspot(s: &str) -> Result<Hotspot, String> {
    let [x, y, width, height] = parse_fractions::<4>(s)?;
    Ok(Hotspot::new(x, y, width, height))
}

fn parse_focal_point(s: &str) -> Result<FocalPoint, String> {
    let [x, y] = parse_fractions::<2>(s)?;
    Ok(FocalPoint::new(x, y))
}

fn parse_orientation(s: &str) -> Result<Orientation, String> {
    s.parse::<u32>()
        .ok()
        .and_then(Orientation::from_degrees)
        .ok_or_else(|| format!("{s:?} is not one of 0, 90, 180, 270"))
}

/// `name=value`; the value is kept as JSON when it parses, else as a string.
fn parse_param(s: &str) -> Result<(String, serde_json::Value), String> {
    let (name, raw) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got {s:?}"))?;
    if name.is_empty() {
        return Err(format!("empty parameter name in {s:?}"));
    }
    let value = serde_json::from_str(raw)
        .unwrap_or_else(|_| serde_json::Value::String(raw.to_string()));
    Ok((name.to_string(), value))
}
