//! Renders a FastNoise2 node graph to a grayscale BMP

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use fastnoise2_bindings::core::{LoaderConfig, SimdLevel, init_library, logger};
use fastnoise2_bindings::native::FastNoiseLibrary;
use fastnoise2_bindings::noise::bmp::save_grayscale_bmp;
use fastnoise2_bindings::noise::{FastNoise, OutputMinMax, gen_uniform_grid_2d_par, DEFAULT_BAND_ROWS};
use log::{LevelFilter, info};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    Grid,
    Tileable,
    Positions,
}

#[derive(Parser)]
#[command(name = "fastnoise-preview", about = "Render a FastNoise2 node graph to a BMP image")]
struct Cli {
    /// Path of the FastNoise2 shared library
    #[arg(long, env = "FASTNOISE_LIB_PATH")]
    lib: Option<PathBuf>,

    /// Directory containing the bundled FastNoise2 library
    #[arg(long, env = "FASTNOISE_LIB_DIR")]
    lib_dir: Option<PathBuf>,

    /// JSON loader configuration, command line options override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// SIMD level requested for new nodes (auto, scalar, sse2, avx2, neon, ...)
    #[arg(long)]
    simd: Option<String>,

    /// Encoded node tree exported from NoiseTool, defaults to a demo graph
    #[arg(long)]
    encoded: Option<String>,

    /// Image width and height in pixels
    #[arg(long, default_value_t = 512)]
    size: u16,

    #[arg(long, value_enum, default_value_t = Mode::Grid)]
    mode: Mode,

    #[arg(long, default_value_t = 0.02)]
    frequency: f32,

    #[arg(long, default_value_t = 1337)]
    seed: i32,

    /// Split grid generation into row bands across threads
    #[arg(long)]
    parallel: bool,

    /// Output file name without the .bmp extension
    #[arg(long, default_value = "fastnoise")]
    out: PathBuf,

    /// Increase log verbosity, repeat for trace
    #[arg(short = 'd', long = "debug", action = clap::ArgAction::Count)]
    debug: u8,
}

impl Cli {
    fn loader_config(&self) -> Result<LoaderConfig> {
        let mut config = match &self.config {
            Some(path) => LoaderConfig::from_json_file(path)
                .with_context(|| format!("reading loader config {}", path.display()))?,
            None => LoaderConfig::new(),
        };

        if let Some(path) = &self.lib {
            config = config.with_library_path(path);
        }
        if let Some(dir) = &self.lib_dir {
            config = config.with_library_dir(dir);
        }
        if let Some(simd) = &self.simd {
            config = config.with_simd_level(simd.parse::<SimdLevel>()?);
        }
        Ok(config)
    }

    fn log_level(&self) -> LevelFilter {
        match self.debug {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

/// CellularDistance -> AddDimension 和 FractalFBm(Simplex) 取平滑最大值
fn demo_graph(library: &Arc<FastNoiseLibrary>) -> Result<FastNoise> {
    let mut cellular = library.new_node("CellularDistance")?;
    cellular.set("ReturnType", "Index0Add1")?;
    cellular.set("DistanceIndex0", 2)?;

    let mut add_dim = library.new_node("AddDimension")?;
    add_dim.set("Source", &cellular)?;
    add_dim.set("NewDimensionPosition", 0.5f32)?;

    let simplex = library.new_node("Simplex")?;
    let mut fractal = library.new_node("FractalFBm")?;
    fractal.set("Source", &simplex)?;
    fractal.set("Gain", 0.3f32)?;
    fractal.set("Lacunarity", 0.6f32)?;

    let mut max_smooth = library.new_node("MaxSmooth")?;
    max_smooth.set("LHS", &fractal)?;
    max_smooth.set("RHS", &add_dim)?;
    Ok(max_smooth)
}

fn render(node: &FastNoise, cli: &Cli) -> Result<(Vec<f32>, OutputMinMax)> {
    let size = cli.size as i32;
    let pixels = cli.size as usize * cli.size as usize;

    match cli.mode {
        Mode::Grid if cli.parallel => Ok(gen_uniform_grid_2d_par(
            node,
            0,
            0,
            size,
            size,
            cli.frequency,
            cli.seed,
            DEFAULT_BAND_ROWS,
        )?),
        Mode::Grid => {
            let mut noise = vec![0f32; pixels];
            let min_max = node.gen_uniform_grid_2d(&mut noise, 0, 0, size, size, cli.frequency, cli.seed)?;
            Ok((noise, min_max))
        },
        Mode::Tileable => {
            let mut noise = vec![0f32; pixels];
            let min_max = node.gen_tileable_2d(&mut noise, size, size, cli.frequency, cli.seed)?;
            Ok((noise, min_max))
        },
        Mode::Positions => {
            let (xs, ys): (Vec<f32>, Vec<f32>) = (0..pixels)
                .map(|i| {
                    let x = (i % cli.size as usize) as f32;
                    let y = (i / cli.size as usize) as f32;
                    (x * cli.frequency, y * cli.frequency)
                })
                .unzip();
            let mut noise = vec![0f32; pixels];
            let min_max = node.gen_position_array_2d(&mut noise, &xs, &ys, 0.0, 0.0, cli.seed)?;
            Ok((noise, min_max))
        },
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init_logger(cli.log_level());

    if cli.size == 0 {
        bail!("--size must be greater than 0");
    }

    let library = init_library(&cli.loader_config()?)?;
    info!("{:?}", library);

    let node = match &cli.encoded {
        Some(encoded) => library
            .node_from_encoded_node_tree(encoded)
            .context("decoding --encoded node tree")?,
        None => demo_graph(&library)?,
    };
    info!(
        "Rendering {} ({:?}, simd={:?}) at {}x{}",
        node.metadata_name(),
        cli.mode,
        node.simd_level(),
        cli.size,
        cli.size
    );

    let start = Instant::now();
    let (noise, min_max) = render(&node, &cli)?;
    info!(
        "Generated {} values in {} ms, min={} max={}",
        noise.len(),
        start.elapsed().as_millis(),
        min_max.min,
        min_max.max
    );

    let path = cli.out.with_extension("bmp");
    save_grayscale_bmp(&path, cli.size, cli.size, &noise, &min_max)
        .with_context(|| format!("writing {}", path.display()))?;
    info!("Saved {}", path.display());
    Ok(())
}
