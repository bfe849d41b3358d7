//! Single-asset download and post-processing
//!
//! One plan in, one materialized file out. Writes go to a temp name in the
//! target directory followed by a rename, so an aborted invocation never
//! leaves a partially-written asset under its final name.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{ImageFormat, ImageReader};

use crate::error::Result;
use crate::fetch::FetchClient;
use crate::images::crop::{apply_crop, compute_crop_rect};
use crate::images::{ImageDimensions, ImageProcessingResult};
use crate::types::Transform;

/// One deduplicated unit of download work
#[derive(Debug, Clone)]
pub struct DownloadPlan {
    pub url: String,
    pub file_name: String,
    /// Every requested filename this download satisfies
    pub aliases: Vec<String>,
    pub needs_cropping: bool,
    pub crop_transform: Option<Transform>,
    pub requires_image_dimensions: bool,
    /// Tile scaling factor applied to the dimension annotation
    pub scaling_factor: Option<f64>,
}

impl DownloadPlan {
    fn is_svg(&self) -> bool {
        Path::new(&self.file_name)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
    }
}

/// Download one asset, crop and measure as requested, and materialize it
pub async fn download_and_process<F: FetchClient>(
    fetch: &F,
    plan: &DownloadPlan,
    output_dir: &Path,
) -> Result<ImageProcessingResult> {
    let bytes = fetch.get_bytes(&plan.url).await?;
    let target = output_dir.join(&plan.file_name);

    // Vector assets pass through untouched; crop and measurement only apply
    // to raster data.
    if plan.is_svg() {
        write_atomic(&target, &bytes).await?;
        return Ok(ImageProcessingResult {
            file_path: target,
            aliases: plan.aliases.clone(),
            original_dimensions: None,
            final_dimensions: None,
            was_cropped: false,
            dimension_annotation: None,
        });
    }

    let (result, processed) = process_raster(plan, bytes, &target)?;
    write_atomic(&target, &processed).await?;
    Ok(result)
}

/// Raster path: decode when needed, crop when valid, measure when asked
fn process_raster(
    plan: &DownloadPlan,
    bytes: Vec<u8>,
    target: &Path,
) -> Result<(ImageProcessingResult, Vec<u8>)> {
    let mut result = ImageProcessingResult {
        file_path: target.to_path_buf(),
        aliases: plan.aliases.clone(),
        original_dimensions: None,
        final_dimensions: None,
        was_cropped: false,
        dimension_annotation: None,
    };

    let crop_transform = plan.crop_transform.filter(|_| plan.needs_cropping);
    if crop_transform.is_none() && !plan.requires_image_dimensions {
        return Ok((result, bytes));
    }

    if let Some(transform) = crop_transform {
        let image = image::load_from_memory(&bytes)?;
        let (width, height) = (image.width(), image.height());
        result.original_dimensions = Some(ImageDimensions { width, height });

        match compute_crop_rect(&transform, width, height) {
            Some(rect) => {
                let cropped = apply_crop(&image, rect);
                result.final_dimensions = Some(ImageDimensions {
                    width: cropped.width(),
                    height: cropped.height(),
                });
                result.was_cropped = true;

                let format =
                    ImageFormat::from_path(target).unwrap_or(ImageFormat::Png);
                let mut encoded = Vec::new();
                cropped.write_to(&mut Cursor::new(&mut encoded), format)?;
                annotate_dimensions(&mut result, plan);
                return Ok((result, encoded));
            }
            None => {
                // Invalid window: keep the original bytes, flagged as uncropped
                result.final_dimensions = Some(ImageDimensions { width, height });
                annotate_dimensions(&mut result, plan);
                return Ok((result, bytes));
            }
        }
    }

    // Measurement only: read dimensions without a full decode
    let (width, height) = ImageReader::new(Cursor::new(&bytes))
        .with_guessed_format()?
        .into_dimensions()?;
    result.original_dimensions = Some(ImageDimensions { width, height });
    result.final_dimensions = Some(ImageDimensions { width, height });
    annotate_dimensions(&mut result, plan);
    Ok((result, bytes))
}

fn annotate_dimensions(result: &mut ImageProcessingResult, plan: &DownloadPlan) {
    if plan.requires_image_dimensions {
        if let Some(dims) = &result.final_dimensions {
            let factor = plan.scaling_factor.unwrap_or(1.0);
            result.dimension_annotation = Some(format!(
                "{}px {}px",
                (f64::from(dims.width) * factor).round(),
                (f64::from(dims.height) * factor).round()
            ));
        }
    }
}

/// Write to a temp name in the same directory, then rename into place
async fn write_atomic(target: &Path, bytes: &[u8]) -> Result<()> {
    let temp = temp_path(target);
    tokio::fs::write(&temp, bytes).await?;
    if let Err(err) = tokio::fs::rename(&temp, target).await {
        let _ = tokio::fs::remove_file(&temp).await;
        return Err(err.into());
    }
    Ok(())
}

fn temp_path(target: &Path) -> PathBuf {
    let file_name = target
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "download".to_string());
    let nonce = uuid::Uuid::new_v4().simple();
    target.with_file_name(format!(".{file_name}.{nonce}.tmp"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_svg_detection() {
        let plan = DownloadPlan {
            url: String::new(),
            file_name: "icon.SVG".to_string(),
            aliases: vec![],
            needs_cropping: false,
            crop_transform: None,
            requires_image_dimensions: false,
            scaling_factor: None,
        };
        assert!(plan.is_svg());
    }

    #[test]
    fn test_temp_path_stays_in_directory() {
        let temp = temp_path(Path::new("/tmp/assets/photo.png"));
        assert_eq!(temp.parent(), Some(Path::new("/tmp/assets")));
        assert!(temp.to_string_lossy().ends_with(".tmp"));
    }
}
