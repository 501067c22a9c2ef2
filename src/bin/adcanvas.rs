use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "adcanvas", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a template to a PNG.
    Render(RenderArgs),
    /// Validate a template and print its resolved layers.
    Check(CheckArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Template JSON.
    #[arg(long)]
    template: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Caption text (defaults to the template caption).
    #[arg(long)]
    caption: Option<String>,

    /// CTA label (defaults to the template CTA text).
    #[arg(long)]
    cta: Option<String>,

    /// Background color (defaults to the template color, then #0369A1).
    #[arg(long)]
    background: Option<String>,

    /// Photo location, resolved like the template images.
    #[arg(long, conflicts_with = "image_file")]
    image: Option<String>,

    /// Photo file embedded as-is, like an uploaded image.
    #[arg(long)]
    image_file: Option<PathBuf>,

    /// TTF/OTF font used for caption and CTA text; only blank text renders without one.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Root directory for template image locations (defaults to the template's directory).
    #[arg(long, env = "ADCANVAS_ASSETS_DIR")]
    assets: Option<PathBuf>,

    /// Canvas width in pixels.
    #[arg(long, default_value_t = adcanvas::Canvas::REFERENCE.width)]
    width: u32,

    /// Canvas height in pixels.
    #[arg(long, default_value_t = adcanvas::Canvas::REFERENCE.height)]
    height: u32,

    /// Fail instead of skipping layers whose image cannot be loaded.
    #[arg(long, default_value_t = false)]
    strict: bool,
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Template JSON.
    #[arg(long)]
    template: PathBuf,

    /// Root directory for template image locations (defaults to the template's directory).
    #[arg(long, env = "ADCANVAS_ASSETS_DIR")]
    assets: Option<PathBuf>,

    /// Canvas width in pixels.
    #[arg(long, default_value_t = adcanvas::Canvas::REFERENCE.width)]
    width: u32,

    /// Canvas height in pixels.
    #[arg(long, default_value_t = adcanvas::Canvas::REFERENCE.height)]
    height: u32,

    /// Also dry-run the draw and print every surface call.
    #[arg(long, default_value_t = false)]
    trace: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Check(args) => cmd_check(args),
    }
}

fn assets_root(template: &Path, assets: Option<PathBuf>) -> PathBuf {
    assets.unwrap_or_else(|| {
        template
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf()
    })
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let config = adcanvas::TemplateConfig::from_path(&args.template)?;
    let loader = adcanvas::FsImageLoader::new(assets_root(&args.template, args.assets));

    let mut state = adcanvas::RenderState::from_template(&config);
    if let Some(caption) = args.caption {
        state.caption_text = caption;
    }
    if let Some(cta) = args.cta {
        state.cta_text = cta;
    }
    if let Some(bg) = args.background {
        state.background_color = adcanvas::Color::new(bg);
    }
    state.selected_image = match (args.image, args.image_file) {
        (Some(location), _) => Some(adcanvas::ImageRef::location(location)),
        (None, Some(path)) => {
            let bytes = std::fs::read(&path)
                .with_context(|| format!("read image file '{}'", path.display()))?;
            Some(adcanvas::ImageRef::encoded(bytes))
        }
        (None, None) => None,
    };

    let mut surface = adcanvas::CpuSurface::new(adcanvas::Canvas {
        width: args.width,
        height: args.height,
    })?;
    if let Some(path) = &args.font {
        let font =
            std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
        surface = surface.with_font(font)?;
    }

    let opts = adcanvas::RenderOpts {
        image_failures: if args.strict {
            adcanvas::ImageFailurePolicy::Abort
        } else {
            adcanvas::ImageFailurePolicy::Skip
        },
    };
    let report = adcanvas::render_blocking(&mut surface, &config, &state, &loader, opts)?;
    for skipped in &report.skipped {
        eprintln!("skipped {}: {}", skipped.layer, skipped.error);
    }

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    surface.frame().save_png(&args.out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let config = adcanvas::TemplateConfig::from_path(&args.template)?;
    config.validate()?;

    let state = adcanvas::RenderState::from_template(&config);
    let canvas = adcanvas::Canvas {
        width: args.width,
        height: args.height,
    };
    let layers = adcanvas::resolve_layers(&config, &state, canvas)?;
    for (i, layer) in layers.iter().enumerate() {
        match layer.image_source() {
            Some(source) => println!("{i}: {} <- {}", layer.name(), source.label()),
            None => println!("{i}: {}", layer.name()),
        }
    }

    if args.trace {
        let loader = adcanvas::FsImageLoader::new(assets_root(&args.template, args.assets));
        let mut surface = adcanvas::RecordingSurface::new(canvas);
        let report = pollster::block_on(adcanvas::render_layers(
            &mut surface,
            &layers,
            &loader,
            adcanvas::RenderOpts::default(),
        ))?;
        for call in surface.calls() {
            println!("{call:?}");
        }
        for skipped in &report.skipped {
            println!("skipped {}: {}", skipped.layer, skipped.error);
        }
    }
    Ok(())
}
