//! Command-line argument definitions.

use std::path::PathBuf;

use clap::Parser;

/// Composite a folder of photos as circular cutouts onto a card template.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct CardArgs {
    /// Directory containing input photos (png, jpg, jpeg, webp).
    #[arg(short, long)]
    pub input: PathBuf,

    /// Directory for generated cards (created if absent).
    #[arg(short, long, default_value = "results")]
    pub output: PathBuf,

    /// Path to the template background image.
    #[arg(short, long)]
    pub template: PathBuf,

    /// Composition profile: strict, flush, or portrait.
    #[arg(short, long, default_value = "portrait")]
    pub profile: String,

    /// Path to a SeetaFace frontal model for face-aware framing.
    #[arg(long)]
    pub face_model: Option<PathBuf>,

    /// Override the subject size as a fraction of half the template width.
    #[arg(long)]
    pub target_fraction: Option<f32>,

    /// Override the placement mode: quadrant-centered or flush-bottom-left.
    #[arg(long)]
    pub placement: Option<String>,

    /// Write a JSON batch report to this path.
    #[arg(long)]
    pub json: Option<PathBuf>,
}
