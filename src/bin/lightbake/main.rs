//! Lightbake CLI - bake lightmaps from JSON scene files.

use anyhow::{bail, Context};
use lightbake::prelude::*;
use lightbake::scene::cornell_box;
use std::env;
use std::path::Path;
use std::time::Instant;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Verbosity level
const LOG_QUIET: u8 = 0;
const LOG_INFO: u8 = 1;
const LOG_DEBUG: u8 = 2;
const LOG_TRACE: u8 = 3;

fn main() {
    let args: Vec<String> = env::args().collect();

    // Parse global flags
    let mut level = LOG_INFO;
    let mut filtered_args: Vec<&str> = Vec::new();
    for arg in &args[1..] {
        match arg.as_str() {
            "-v" | "--verbose" => level = LOG_DEBUG,
            "-vv" | "--trace" => level = LOG_TRACE,
            "-q" | "--quiet" => level = LOG_QUIET,
            _ => filtered_args.push(arg),
        }
    }
    let _trace_guard = init_tracing(level);

    if filtered_args.is_empty() {
        print_help();
        return;
    }

    let result = match filtered_args[0] {
        // Bake command - scene file to lightmap image
        "bake" | "b" => {
            if filtered_args.len() < 2 {
                eprintln!("Error: missing scene argument");
                eprintln!("Usage: lightbake bake <scene.json> -o <out.hdr|out.exr> [--settings <file>] [--direct]");
                std::process::exit(1);
            }
            BakeArgs::parse(&filtered_args[2..]).and_then(|opts| cmd_bake(filtered_args[1], &opts))
        }

        // Info command - patch statistics without lighting
        "info" | "i" => {
            if filtered_args.len() < 2 {
                eprintln!("Error: missing scene argument");
                eprintln!("Usage: lightbake info <scene.json> [--settings <file>]");
                std::process::exit(1);
            }
            BakeArgs::parse(&filtered_args[2..]).and_then(|opts| cmd_info(filtered_args[1], &opts))
        }

        // Demo command - built-in scene
        "demo" | "d" => BakeArgs::parse(&filtered_args[1..]).and_then(|opts| cmd_demo(&opts)),

        "help" | "h" | "-h" | "--help" => {
            print_help();
            Ok(())
        }

        "version" | "-V" | "--version" => {
            println!(
                "lightbake {} (built {})",
                env!("CARGO_PKG_VERSION"),
                env!("LIGHTBAKE_BUILD_DATE")
            );
            Ok(())
        }

        other => {
            eprintln!("Unknown command: {}", other);
            eprintln!();
            print_help();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Install the fmt subscriber, plus a Chrome trace writer when
/// `LIGHTBAKE_TRACE=1`. The returned guard flushes `trace.json` on drop.
fn init_tracing(level: u8) -> Option<tracing_chrome::FlushGuard> {
    let default = match level {
        LOG_QUIET => "error",
        LOG_INFO => "info",
        LOG_DEBUG => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let (chrome_layer, guard) = if env::var("LIGHTBAKE_TRACE").ok().as_deref() == Some("1") {
        let (layer, guard) = tracing_chrome::ChromeLayerBuilder::new()
            .file("trace.json")
            .build();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    let subscriber = tracing_subscriber::registry()
        .with(chrome_layer)
        .with(fmt_layer.with_filter(filter));
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        return None;
    }
    guard
}

fn print_help() {
    println!("lightbake - static lightmap baker");
    println!();
    println!("USAGE:");
    println!("    lightbake [OPTIONS] <COMMAND> [ARGS]");
    println!();
    println!("COMMANDS:");
    println!("    b, bake <scene.json>    Bake a scene into a lightmap image");
    println!("    i, info <scene.json>    Rasterize a scene and show patch statistics");
    println!("    d, demo                 Bake the built-in Cornell box");
    println!("    h, help                 Show this help");
    println!("    version                 Show version and build date");
    println!();
    println!("BAKE OPTIONS:");
    println!("    -o, --output <file>     Output image (.hdr or .exr, default lightmap.hdr)");
    println!("    -s, --settings <file>   Bake settings JSON (missing fields use defaults)");
    println!("    -r, --resolution <WxH>  Override lightmap resolution");
    println!("    --direct                Add direct light to the indirect bounce");
    println!("    --save-scene <file>     (demo) Also write the demo scene as JSON");
    println!();
    println!("OPTIONS:");
    println!("    -v, --verbose    Show debug output");
    println!("    -vv, --trace     Show trace output (very verbose)");
    println!("    -q, --quiet      Only show errors");
    println!();
    println!("EXAMPLES:");
    println!("    lightbake demo -o cornell.hdr --direct");
    println!("    lightbake bake room.json -o room.exr -s hq.json");
    println!("    lightbake -v info room.json");
    println!();
    println!("NOTES:");
    println!("    - Set LIGHTBAKE_TRACE=1 to write a Chrome trace to trace.json");
    println!("    - RUST_LOG overrides the verbosity flags");
}

/// Options shared by `bake`, `info` and `demo`.
#[derive(Debug, Default)]
struct BakeArgs<'a> {
    output: Option<&'a str>,
    settings: Option<&'a str>,
    resolution: Option<(u32, u32)>,
    direct: bool,
    save_scene: Option<&'a str>,
}

impl<'a> BakeArgs<'a> {
    fn parse(args: &[&'a str]) -> anyhow::Result<Self> {
        let mut opts = Self::default();
        let mut iter = args.iter().copied();
        while let Some(arg) = iter.next() {
            match arg {
                "-o" | "--output" => opts.output = Some(value(&mut iter, arg)?),
                "-s" | "--settings" => opts.settings = Some(value(&mut iter, arg)?),
                "-r" | "--resolution" => {
                    let text = value(&mut iter, arg)?;
                    opts.resolution = Some(parse_resolution(text)?);
                }
                "--direct" => opts.direct = true,
                "--save-scene" => opts.save_scene = Some(value(&mut iter, arg)?),
                other => bail!("unexpected argument '{}'", other),
            }
        }
        Ok(opts)
    }

    fn load_settings(&self) -> anyhow::Result<BakeSettings> {
        let mut settings = match self.settings {
            Some(path) => BakeSettings::load(path)
                .with_context(|| format!("loading settings {}", path))?,
            None => BakeSettings::default(),
        };
        if let Some((w, h)) = self.resolution {
            settings.width = w;
            settings.height = h;
        }
        Ok(settings)
    }
}

fn value<'a>(iter: &mut impl Iterator<Item = &'a str>, flag: &str) -> anyhow::Result<&'a str> {
    iter.next().with_context(|| format!("{} expects a value", flag))
}

fn parse_resolution(text: &str) -> anyhow::Result<(u32, u32)> {
    let (w, h) = text
        .split_once(['x', 'X'])
        .with_context(|| format!("resolution '{}' is not WxH", text))?;
    Ok((
        w.parse().with_context(|| format!("bad width '{}'", w))?,
        h.parse().with_context(|| format!("bad height '{}'", h))?,
    ))
}

fn cmd_bake(scene_path: &str, opts: &BakeArgs) -> anyhow::Result<()> {
    let scene = Scene::load(scene_path).with_context(|| format!("loading scene {}", scene_path))?;
    bake_scene(&scene, opts)
}

fn cmd_demo(opts: &BakeArgs) -> anyhow::Result<()> {
    let desc = cornell_box();
    if let Some(path) = opts.save_scene {
        desc.save(path).with_context(|| format!("writing scene {}", path))?;
        tracing::info!("Wrote demo scene to {}", path);
    }
    bake_scene(&desc.into_scene()?, opts)
}

fn cmd_info(scene_path: &str, opts: &BakeArgs) -> anyhow::Result<()> {
    let scene = Scene::load(scene_path).with_context(|| format!("loading scene {}", scene_path))?;
    let settings = opts.load_settings()?;
    let mesh = &scene.geometry.mesh;

    println!("Scene: {}", scene_path);
    println!("  Vertices:  {}", mesh.num_vertices());
    println!("  Triangles: {}", mesh.num_triangles());
    println!("  Subsets:   {}", mesh.num_subsets());
    println!("  Lights:    {}", scene.lights.len());
    let (min, max) = mesh.compute_bounds();
    println!("  Bounds:    {:?} - {:?}", min, max);

    let mut baker = Lightmapper::new(settings.clone())?;
    let stats = baker.set_geometry(&scene.geometry)?;
    println!();
    println!("Patches ({}x{}, source level {}):", settings.width, settings.height, settings.indirect_source_level);
    for (level, count) in stats.patches_per_level.iter().enumerate() {
        let (w, h) = settings.level_size(level as u32);
        let coverage = 100.0 * *count as f64 / (w as f64 * h as f64);
        println!("  L{}  {:>4}x{:<4} {:>8} patches  {:>5.1}% coverage", level, w, h, count, coverage);
    }
    if stats.skipped_subsets > 0 {
        println!("  ({} subsets skipped: no material or diffuse color)", stats.skipped_subsets);
    }
    Ok(())
}

fn bake_scene(scene: &Scene, opts: &BakeArgs) -> anyhow::Result<()> {
    let output = opts.output.unwrap_or("lightmap.hdr");
    let settings = opts.load_settings()?;
    let start = Instant::now();

    let raycaster = TriangleRaycaster::from_geometry(&scene.geometry);
    let mut baker = Lightmapper::new(settings)?;
    let stats = baker.set_geometry(&scene.geometry)?;
    if stats.total_patches() == 0 {
        tracing::warn!("No patches were produced; the lightmap will be black");
    }

    baker.render_lights(&scene.lights, &raycaster);
    baker.render(&scene.camera, &raycaster);

    let lightmap = if opts.direct {
        baker.composite()
    } else {
        baker.front_buffer().clone()
    };
    tracing::info!(
        "Baked {}x{} in {:.2?} (max radiance {:?})",
        lightmap.width,
        lightmap.height,
        start.elapsed(),
        lightmap.max_value()
    );

    write_image(&lightmap, Path::new(output))?;
    tracing::info!("Wrote {}", output);
    Ok(())
}

/// Save as Radiance HDR or OpenEXR, chosen by extension.
fn write_image(lightmap: &Lightmap, path: &Path) -> anyhow::Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if ext != "hdr" && ext != "exr" {
        bail!("unsupported output format '{}', use .hdr or .exr", path.display());
    }

    let pixels: Vec<f32> = lightmap.data.iter().flat_map(|c| c.to_array()).collect();
    let image = image::Rgb32FImage::from_raw(lightmap.width, lightmap.height, pixels)
        .context("lightmap size does not match its data")?;
    image::DynamicImage::ImageRgb32F(image)
        .save(path)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
