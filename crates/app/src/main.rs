use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use photo_booth_core::{
    BoothConfig, BoothError, Framer, PhotoBooth, PolaroidFramer, SeededRandom, SourceImage,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> photo_booth_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => BoothConfig::from_json_file(path)?,
        None => BoothConfig::default(),
    };

    match cli.command {
        Commands::Frame {
            input,
            output,
            caption,
            width,
        } => run_frame(&config, &input, &output, caption.as_deref(), width),
        Commands::Session {
            inputs,
            out,
            captions,
            surface,
            seed,
        } => run_session(config, &inputs, &out, &captions, surface, seed).await,
    }
}

fn run_frame(
    config: &BoothConfig,
    input: &Path,
    output: &Path,
    caption: Option<&str>,
    width: Option<u32>,
) -> photo_booth_core::Result<()> {
    let width = width.unwrap_or(config.framing.target_width);
    tracing::info!(?input, ?output, width, "framing single image");

    let source = SourceImage::from_path(input)?;
    let framer = PolaroidFramer::new(&config.framing);
    let bitmap = framer.frame(&source, caption.unwrap_or_default(), width)?;
    std::fs::write(output, &bitmap.png)?;
    Ok(())
}

async fn run_session(
    config: BoothConfig,
    inputs: &[PathBuf],
    out: &Path,
    captions: &[String],
    surface: Surface,
    seed: Option<u64>,
) -> photo_booth_core::Result<()> {
    let booth = match seed {
        Some(seed) => {
            let framer = std::sync::Arc::new(PolaroidFramer::new(&config.framing));
            PhotoBooth::with_parts(config, framer, Box::new(SeededRandom::new(seed)))?
        }
        None => PhotoBooth::new(config)?,
    };

    for (index, input) in inputs.iter().enumerate() {
        let caption = captions.get(index).cloned().unwrap_or_default();
        match SourceImage::from_path(input) {
            Ok(source) => {
                booth.add_pending(source.with_caption(caption))?;
            }
            Err(err @ (BoothError::Capture(_) | BoothError::Decode(_))) => {
                tracing::warn!(?input, %err, "skipping input");
            }
            Err(err) => return Err(err),
        }
    }

    let report = booth.develop().await?;
    tracing::info!(
        framed = report.framed.len(),
        failed = report.failed.len(),
        "session developed"
    );

    std::fs::create_dir_all(out)?;
    while let Some(item) = booth.release(surface.width, surface.height)? {
        let path = out.join(format!("{}.png", item.id()));
        std::fs::write(&path, item.artifact.png())?;
        tracing::info!(?path, z_index = item.z_index, "wrote print");
    }

    let snapshot = booth.snapshot()?;
    let json = serde_json::to_string_pretty(&snapshot)
        .map_err(|err| BoothError::msg(format!("serialize snapshot: {err}")))?;
    println!("{json}");
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Surface size given as `WIDTHxHEIGHT`.
#[derive(Debug, Clone, Copy)]
struct Surface {
    width: f32,
    height: f32,
}

impl std::str::FromStr for Surface {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(|c: char| c == 'x' || c == 'X')
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got `{s}`"))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<f32>()
                .ok()
                .filter(|v| v.is_finite() && *v > 0.0)
                .ok_or_else(|| format!("invalid surface dimension `{v}`"))
        };
        Ok(Self {
            width: parse(w)?,
            height: parse(h)?,
        })
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Virtual instant-print photo booth", long_about = None)]
struct Cli {
    /// Optional JSON configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Frame a single image as an instant print.
    Frame {
        /// Image to frame.
        input: PathBuf,
        /// Where to write the PNG print.
        output: PathBuf,
        /// Caption written under the photo.
        #[arg(long)]
        caption: Option<String>,
        /// Print width in pixels; defaults to the configured width.
        #[arg(long)]
        width: Option<u32>,
    },
    /// Develop a batch of images and release them all onto a surface.
    Session {
        /// Images to upload, in order.
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Directory receiving one PNG per released print.
        #[arg(long)]
        out: PathBuf,
        /// Captions matched to inputs by position.
        #[arg(long = "caption")]
        captions: Vec<String>,
        /// Surface size the prints are scattered over.
        #[arg(long, default_value = "1280x800")]
        surface: Surface,
        /// Seed for a reproducible layout.
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_surface_sizes() {
        let surface: Surface = "1024x768".parse().unwrap();
        assert_eq!((surface.width, surface.height), (1024.0, 768.0));
        assert!("1024".parse::<Surface>().is_err());
        assert!("0x10".parse::<Surface>().is_err());
    }

    #[test]
    fn cli_accepts_repeated_captions() {
        let cli = Cli::try_parse_from([
            "photo-booth",
            "session",
            "a.png",
            "b.png",
            "--out",
            "prints",
            "--caption",
            "A",
            "--caption",
            "B",
            "--seed",
            "3",
        ])
        .unwrap();
        match cli.command {
            Commands::Session {
                inputs,
                captions,
                seed,
                ..
            } => {
                assert_eq!(inputs.len(), 2);
                assert_eq!(captions, vec!["A", "B"]);
                assert_eq!(seed, Some(3));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
