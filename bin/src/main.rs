#[macro_use]
extern crate log;

mod scenes;

use clap::Parser;
use image::{ImageBuffer, ImageFormat, Rgb};
use scenes::*;
use std::process::ExitCode;
use std::sync::Arc;
use strata_cameras::*;
use strata_core::camera::*;
use strata_core::film::*;
use strata_core::geometry::*;
use strata_core::integrator::*;
use strata_core::paramset::*;
use strata_core::pbrt::*;
use strata_core::sampler::*;
use strata_core::{clear_stats, print_stats};
use strata_integrators::*;
use strata_samplers::*;

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(author, version, about = "Volumetric path tracer for layered materials and participating media.", long_about = None)]
struct Args {
    /// Built-in scene to render.
    #[arg(long, value_enum, default_value_t = SceneName::Coated)]
    scene: SceneName,

    /// Samples per pixel.
    #[arg(long, value_name = "NUM", default_value_t = 16)]
    spp: Int,

    /// Maximum number of scattering events along a path.
    #[arg(long, value_name = "NUM", default_value_t = 5)]
    maxdepth: Int,

    /// Paths with throughput below this value are subject to Russian roulette.
    #[arg(long, value_name = "FLOAT", default_value_t = 1.0)]
    rrthreshold: Float,

    /// Light sampling strategy: uniform, power or spatial.
    #[arg(long, value_name = "NAME", default_value = "spatial")]
    lightsamplestrategy: String,

    /// Render only the pixels in [x0, x1) x [y0, y1).
    #[arg(long, value_name = "INT", num_args = 4, allow_negative_numbers = true)]
    pixelbounds: Vec<Int>,

    /// Image resolution.
    #[arg(long, value_name = "PIXELS", num_args = 2, default_values_t = [400, 300])]
    resolution: Vec<Int>,

    /// Number of rendering threads. Zero uses all cores.
    #[arg(long, short = 't', value_name = "NUM", default_value_t = 0)]
    threads: usize,

    /// Seed for the random sample streams.
    #[arg(long, value_name = "NUM", default_value_t = 0)]
    seed: i32,

    /// Suppress all text output other than error messages.
    #[arg(long)]
    quiet: bool,

    /// Reduce sample count and path depth for a quick preview.
    #[arg(long)]
    quickrender: bool,

    /// Measured BSDF table for the right-hand sphere.
    #[arg(long, value_name = "FILE")]
    bsdffile: Option<String>,

    /// Output PNG image.
    #[arg(long, short = 'o', value_name = "FILE", default_value = "strata.png")]
    outfile: String,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize `env_logger`. `RUST_LOG` overrides the default filter.
    let default_filter = if args.quiet { "error" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    match render(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Renders the selected scene and writes the image.
///
/// * `args` - Command line arguments.
fn render(args: &Args) -> Result<(), String> {
    let options: ArcOptions = Arc::new(Options::new(
        args.seed,
        args.threads,
        args.quiet,
        args.quickrender,
        Some(args.outfile.clone()),
    ));
    info!("{}", options);

    let (res_x, res_y) = match args.resolution[..] {
        [x, y] if x > 0 && y > 0 => (x, y),
        _ => return Err(format!("Invalid resolution {:?}.", args.resolution)),
    };

    let description = build_scene(args.scene, args.bsdffile.as_deref(), &options);

    let film = Film::new(&Point2i::new(res_x, res_y), &args.outfile, 1.0);
    let camera: ArcCamera = Arc::new(PerspectiveCamera::from((
        &description.camera_params,
        film,
        description.camera_medium.clone(),
    )));

    let mut sampler_params = ParamSet::new();
    sampler_params.add_int("pixelsamples", &[args.spp]);
    let sampler: ArcSampler = Arc::new(RandomSampler::from((&sampler_params, options.as_ref())));

    let mut params = ParamSet::new();
    params.add_int("maxdepth", &[args.maxdepth]);
    params.add_float("rrthreshold", &[args.rrthreshold]);
    params.add_string("lightsamplestrategy", &[args.lightsamplestrategy.clone()]);
    if !args.pixelbounds.is_empty() {
        params.add_int("pixelbounds", &args.pixelbounds);
    }
    let mut integrator = VolPathIntegrator::from((&params, sampler, Arc::clone(&camera), Arc::clone(&options)));
    params.report_unused();

    clear_stats!();
    integrator.render(&description.scene);
    if !args.quiet {
        print_stats!();
    }

    write_png(&args.outfile, camera.get_film())
}

/// Writes the film as an 8-bit sRGB PNG.
///
/// * `path` - Output file path.
/// * `film` - The film.
fn write_png(path: &str, film: &Film) -> Result<(), String> {
    let res = film.full_resolution;
    info!("Writing image {path} with resolution {}x{}", res.x, res.y);

    let imgbuf: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_raw(res.x as u32, res.y as u32, film.to_srgb8())
        .ok_or_else(|| format!("Film data does not match resolution {}x{}.", res.x, res.y))?;
    imgbuf
        .save_with_format(path, ImageFormat::Png)
        .map_err(|err| format!("Error saving output image {path}: {err}."))
}
