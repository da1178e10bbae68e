/// Point container generator and inspector entry point
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use point_cloud_processing::{
    Axis, PointCloudError, PointContainer, PointSetCollection, SyntheticConfig, generate,
};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "point-cloud-processing", about = "Generate and inspect point containers")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a synthetic labelled container
    Generate {
        #[arg(short, long, default_value = "points.json")]
        output: PathBuf,
        #[arg(long, default_value_t = SyntheticConfig::default().sets)]
        sets: usize,
        #[arg(long, default_value_t = SyntheticConfig::default().points_per_set)]
        points: usize,
        #[arg(long, default_value_t = SyntheticConfig::default().seed)]
        seed: u64,
        /// Store coordinates big-endian instead of little-endian
        #[arg(long)]
        big_endian: bool,
    },
    /// Decode a container and report its sets and bounds
    Inspect {
        input: PathBuf,
        /// Dataset key, defaults to the first key in the container
        #[arg(short, long)]
        key: Option<String>,
        /// Override the padding fraction stored in the container
        #[arg(short, long)]
        padding: Option<f64>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {
        Command::Generate {
            output,
            sets,
            points,
            seed,
            big_endian,
        } => {
            let config = SyntheticConfig {
                sets,
                points_per_set: points,
                seed,
                little_endian: !big_endian,
            };
            let cloud = generate(&config)?;
            cloud.container.write_to_path(&output)?;
            info!(key = %cloud.key, output = %output.display(), "Wrote synthetic container");
        }
        Command::Inspect {
            input,
            key,
            padding,
        } => inspect(&input, key, padding)?,
    }

    Ok(())
}

fn inspect(
    input: &Path,
    key: Option<String>,
    padding: Option<f64>,
) -> Result<(), PointCloudError> {
    let container = PointContainer::from_path(input)?;
    let key = container.resolve_key(key.as_deref())?;
    let padding = padding
        .or_else(|| container.padding_fraction())
        .unwrap_or(0.0);

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {pos}/{len} records ({percent}%) {msg}")
            .map_err(PointCloudError::transport)?
            .progress_chars("▉▊▋▌▍▎▏ "),
    );

    let collection = PointSetCollection::load(&container, &key, padding, &pb)?;
    print!("{}", report(&collection, padding));

    Ok(())
}

fn report(collection: &PointSetCollection, padding: f64) -> String {
    let mut lines = vec![format!(
        "Dataset '{}' ({} points)",
        collection.key,
        collection.total_points()
    )];
    for (set_index, size) in collection.set_sizes().into_iter().enumerate() {
        lines.push(format!(
            "  set {}: {:>6} points  {}  {}",
            set_index, size, collection.colours[set_index], collection.names[set_index]
        ));
    }
    lines.push(format!("Bounds (padding {:.4}):", padding));
    for axis in Axis::ALL {
        let bounds = collection.bounds.axis(axis);
        lines.push(format!("  {}: {:.6} .. {:.6}", axis, bounds.min, bounds.max));
    }
    let (width, height, depth) = collection.bounds.dimensions();
    lines.push(format!("Extent: {width:.6} x {height:.6} x {depth:.6}"));

    lines.join("\n") + "\n"
}
