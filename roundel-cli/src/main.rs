use std::{
    fs::{self, File},
    path::Path,
};

use anyhow::{Context, Result};
use clap::Parser;
use image::GenericImageView;
use log::{LevelFilter, info, warn};
use roundel_core::{
    CardError, CompositionProfile, CropDecision, Framer, PlacementMode, compose,
};

mod args;
mod input;
mod types;

use args::CardArgs;
use input::{card_output_path, collect_images};
use types::{CardRecord, CardStatus};

fn main() -> Result<()> {
    init_logging(LevelFilter::Info)?;
    let args = CardArgs::parse();

    if !args.template.is_file() {
        return Err(CardError::TemplateNotFound(args.template.clone()).into());
    }
    if !args.input.is_dir() {
        return Err(CardError::InputDirectoryNotFound(args.input.clone()).into());
    }

    let mut profile = CompositionProfile::by_name(&args.profile).with_context(|| {
        format!(
            "unknown profile '{}' (available: strict, flush, portrait)",
            args.profile
        )
    })?;
    apply_profile_overrides(&mut profile, &args);
    profile.sanitize();

    fs::create_dir_all(&args.output)
        .with_context(|| format!("failed to create output directory {}", args.output.display()))?;

    let images = collect_images(&args.input)?;
    if images.is_empty() {
        anyhow::bail!(
            "no images found at {} (supported extensions: png, jpg, jpeg, webp)",
            args.input.display()
        );
    }

    let framer = build_framer(&profile, args.face_model.as_deref())?;

    info!(
        "Processing {} image(s) with profile '{}' against template {}",
        images.len(),
        profile.name,
        args.template.display()
    );

    let mut records = Vec::with_capacity(images.len());
    let (mut composited, mut skipped, mut failed) = (0usize, 0usize, 0usize);
    for image_path in images {
        let output_path = card_output_path(&args.output, &image_path);
        match process_file(&image_path, &output_path, &args.template, &framer, &profile) {
            Ok(decision) => {
                composited += 1;
                info!(
                    "{} -> {} ({})",
                    image_path.display(),
                    output_path.display(),
                    decision.as_label()
                );
                records.push(CardRecord {
                    input: image_path.display().to_string(),
                    output: Some(output_path.display().to_string()),
                    status: CardStatus::Composited,
                    framing: Some(decision.as_label()),
                    reason: None,
                });
            }
            Err(err @ CardError::NonSquareInput { .. }) => {
                skipped += 1;
                info!("Skipping {}: {err}", image_path.display());
                records.push(CardRecord {
                    input: image_path.display().to_string(),
                    output: None,
                    status: CardStatus::Skipped,
                    framing: None,
                    reason: Some(err.to_string()),
                });
            }
            Err(err) => {
                failed += 1;
                warn!("Failed to process {}: {err}", image_path.display());
                records.push(CardRecord {
                    input: image_path.display().to_string(),
                    output: None,
                    status: CardStatus::Failed,
                    framing: None,
                    reason: Some(err.to_string()),
                });
            }
        }
    }

    if let Some(json_path) = args.json.as_ref() {
        if let Some(dir) = json_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create directory {}", dir.display()))?;
        }
        let file = File::create(json_path)
            .with_context(|| format!("failed to create {}", json_path.display()))?;
        serde_json::to_writer_pretty(file, &records)
            .with_context(|| format!("failed to write batch report to {}", json_path.display()))?;
        info!("Wrote batch report to {}", json_path.display());
    }

    info!("Done: {composited} composited, {skipped} skipped, {failed} failed");
    Ok(())
}

/// Process one input photo end to end: decode, frame, compose, save.
///
/// The template is reopened fresh for every file; the decode cost per input
/// is accepted at this batch scale and keeps files fully independent.
fn process_file(
    input: &Path,
    output: &Path,
    template_path: &Path,
    framer: &Framer,
    profile: &CompositionProfile,
) -> Result<CropDecision, CardError> {
    let template = image::open(template_path).map_err(CardError::Decode)?;
    let photo = image::open(input).map_err(CardError::Decode)?;

    let (square, decision) = if profile.reject_non_square {
        let (width, height) = photo.dimensions();
        if width != height {
            return Err(CardError::NonSquareInput { width, height });
        }
        (photo, CropDecision::AlreadySquare)
    } else {
        framer.crop(&photo)?
    };

    let card = compose(&square, &template, profile)?;
    card.save(output).map_err(CardError::Encode)?;
    Ok(decision)
}

fn apply_profile_overrides(profile: &mut CompositionProfile, args: &CardArgs) {
    if let Some(fraction) = args.target_fraction {
        profile.target_fraction = fraction;
    }
    if let Some(token) = args.placement.as_deref() {
        match PlacementMode::parse(token) {
            Some(mode) => profile.placement = mode,
            None => warn!(
                "unknown placement '{token}', keeping {:?}",
                profile.placement
            ),
        }
    }
}

/// Build the framer for a profile, attaching a detector when one is usable.
///
/// A detection profile without `--face-model` degrades to center crops with a
/// warning; a model that fails to load is a startup error.
fn build_framer(profile: &CompositionProfile, face_model: Option<&Path>) -> Result<Framer> {
    if !profile.use_face_detection {
        return Ok(Framer::new());
    }

    let Some(model_path) = face_model else {
        warn!(
            "profile '{}' uses face detection but no --face-model was given; using center crops",
            profile.name
        );
        return Ok(Framer::new());
    };

    #[cfg(feature = "rustface")]
    {
        let detector = roundel_core::RustfaceDetector::from_model_path(model_path)
            .with_context(|| format!("failed to load face model {}", model_path.display()))?;
        info!("Loaded face model from {}", model_path.display());
        Ok(Framer::with_detector(Box::new(detector)))
    }

    #[cfg(not(feature = "rustface"))]
    {
        warn!(
            "built without the rustface feature; ignoring --face-model {}",
            model_path.display()
        );
        Ok(Framer::new())
    }
}

/// Initialize logging once, respecting `RUST_LOG` when set.
fn init_logging(default_filter: LevelFilter) -> Result<()> {
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_filter.as_str()),
    );
    if builder.try_init().is_err() {
        // Logger already initialized; nothing to do.
    }
    Ok(())
}
