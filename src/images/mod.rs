//! Image resolution and download pipeline
//!
//! Maps node-level image references and render requests to download URLs,
//! deduplicates identical work, downloads everything concurrently, and
//! applies post-download cropping and measurement.
//!
//! Dedup rule: fill items sharing an image ref with no crop suffix collapse
//! into one physical download carrying every requested filename as an alias.
//! Crop-suffixed items and node renders stay unique even when their
//! parameters coincide; correctness is preferred over the marginal savings.
//!
//! Failure is local to an item: the result array simply omits items whose
//! download or processing failed, and the caller infers failure from the
//! count.

pub mod crop;
pub mod download;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use futures::stream::{self, StreamExt};
use log::{debug, warn};
use serde::Serialize;

use crate::error::{Result, SimplifyError};
use crate::fetch::FetchClient;
use crate::types::Transform;
use download::{download_and_process, DownloadPlan};

/// Upper bound on simultaneous asset downloads
const MAX_CONCURRENT_DOWNLOADS: usize = 8;

/// One requested image: either an image-fill reference or a node render
#[derive(Debug, Clone, Default)]
pub struct ImageDownloadItem {
    /// Opaque image ref of a fill paint (mutually exclusive with `node_id`)
    pub image_ref: Option<String>,
    /// Node id to render server-side (mutually exclusive with `image_ref`)
    pub node_id: Option<String>,
    /// Target filename; a `.svg` extension selects vector rendering
    pub file_name: String,
    pub needs_cropping: bool,
    pub crop_transform: Option<Transform>,
    pub requires_image_dimensions: bool,
    /// Tile scaling factor applied to the dimension annotation
    pub scaling_factor: Option<f64>,
    /// Distinguishes differently-cropped copies of one image ref
    pub filename_suffix: Option<String>,
}

impl ImageDownloadItem {
    /// An image-fill download
    pub fn fill(image_ref: impl Into<String>, file_name: impl Into<String>) -> Self {
        ImageDownloadItem {
            image_ref: Some(image_ref.into()),
            file_name: file_name.into(),
            ..Default::default()
        }
    }

    /// A node-render download
    pub fn render(node_id: impl Into<String>, file_name: impl Into<String>) -> Self {
        ImageDownloadItem {
            node_id: Some(node_id.into()),
            file_name: file_name.into(),
            ..Default::default()
        }
    }

    pub fn with_crop(mut self, transform: Transform, suffix: impl Into<String>) -> Self {
        self.needs_cropping = true;
        self.crop_transform = Some(transform);
        self.filename_suffix = Some(suffix.into());
        self
    }

    pub fn with_dimensions(mut self) -> Self {
        self.requires_image_dimensions = true;
        self
    }

    pub fn with_scale(mut self, scaling_factor: f64) -> Self {
        self.scaling_factor = Some(scaling_factor);
        self
    }
}

/// Options for server-side vector rendering
#[derive(Debug, Clone, Copy)]
pub struct SvgOptions {
    pub outline_text: bool,
    pub include_id: bool,
    pub simplify_stroke: bool,
}

impl Default for SvgOptions {
    fn default() -> Self {
        SvgOptions {
            outline_text: true,
            include_id: false,
            simplify_stroke: true,
        }
    }
}

/// Options for one pipeline invocation
#[derive(Debug, Clone)]
pub struct ImageProcessingOptions {
    /// Export scale for raster renders, must be positive
    pub png_scale: f64,
    pub svg_options: SvgOptions,
}

impl Default for ImageProcessingOptions {
    fn default() -> Self {
        ImageProcessingOptions {
            png_scale: 2.0,
            svg_options: SvgOptions::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

/// Outcome for one unique download
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageProcessingResult {
    pub file_path: PathBuf,
    /// Every requested filename satisfied by this asset
    pub aliases: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_dimensions: Option<ImageDimensions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_dimensions: Option<ImageDimensions>,
    pub was_cropped: bool,
    /// `"Wpx Hpx"` when dimensions were requested (always for TILE fills)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension_annotation: Option<String>,
}

/// Resolve, deduplicate, download and post-process a batch of image requests
pub async fn process_images<F: FetchClient>(
    fetch: &F,
    file_key: &str,
    items: Vec<ImageDownloadItem>,
    output_dir: &Path,
    options: &ImageProcessingOptions,
) -> Result<Vec<ImageProcessingResult>> {
    let (fills, renders): (Vec<_>, Vec<_>) =
        items.into_iter().partition(|item| item.image_ref.is_some());
    let renders: Vec<_> = renders
        .into_iter()
        .filter(|item| {
            let valid = item.node_id.is_some();
            if !valid {
                warn!(
                    "image item {:?} has neither an imageRef nor a nodeId, skipping",
                    item.file_name
                );
            }
            valid
        })
        .collect();

    let (svg_renders, png_renders): (Vec<_>, Vec<_>) = renders
        .into_iter()
        .partition(|item| item.file_name.to_ascii_lowercase().ends_with(".svg"));

    // Fill, raster-render and vector-render URL resolution are independent
    // network calls; run them together.
    let png_query = raster_query(options);
    let svg_query = vector_query(options);
    let (fill_urls, png_urls, svg_urls) = tokio::join!(
        resolve_fill_urls(fetch, file_key, !fills.is_empty()),
        resolve_render_urls(fetch, file_key, &png_renders, &png_query),
        resolve_render_urls(fetch, file_key, &svg_renders, &svg_query),
    );
    let (fill_urls, png_urls, svg_urls) = (fill_urls?, png_urls?, svg_urls?);

    let mut plans: Vec<DownloadPlan> = Vec::new();
    let mut merge_index: HashMap<String, usize> = HashMap::new();

    for item in fills {
        let image_ref = item.image_ref.clone().unwrap_or_default();
        let Some(url) = fill_urls.get(&image_ref) else {
            warn!("no download URL for image ref {image_ref}, skipping");
            continue;
        };
        add_plan(
            &mut plans,
            &mut merge_index,
            fill_merge_key(&image_ref, &item),
            url,
            item,
        );
    }
    // Each render item resolves strictly against its own batch's URL map, so
    // a node exported in both formats gets the right bytes for each file.
    for (batch, urls) in [(png_renders, &png_urls), (svg_renders, &svg_urls)] {
        for item in batch {
            let node_id = item.node_id.clone().unwrap_or_default();
            let Some(url) = urls.get(&node_id) else {
                warn!("no render URL for node {node_id}, skipping");
                continue;
            };
            add_plan(
                &mut plans,
                &mut merge_index,
                format!("render:{node_id}:{}", item.file_name),
                url,
                item,
            );
        }
    }

    debug!("downloading {} unique assets", plans.len());
    tokio::fs::create_dir_all(output_dir).await?;

    let results = stream::iter(plans.iter())
        .map(|plan| async move {
            match download_and_process(fetch, plan, output_dir).await {
                Ok(result) => Some(result),
                Err(err) => {
                    warn!("download failed for {}: {err}", plan.file_name);
                    None
                }
            }
        })
        .buffered(MAX_CONCURRENT_DOWNLOADS)
        .collect::<Vec<_>>()
        .await;

    Ok(results.into_iter().flatten().collect())
}

/// Degraded mode: same pipeline, flat list of materialized paths
pub async fn download_images<F: FetchClient>(
    fetch: &F,
    file_key: &str,
    items: Vec<ImageDownloadItem>,
    output_dir: &Path,
    options: &ImageProcessingOptions,
) -> Result<Vec<PathBuf>> {
    let results = process_images(fetch, file_key, items, output_dir, options).await?;
    Ok(results.into_iter().map(|result| result.file_path).collect())
}

/// Fill items with no crop suffix merge per image ref; anything else stays
/// unique (keyed down to the filename, which still guards against literal
/// duplicates writing the same file twice)
fn fill_merge_key(image_ref: &str, item: &ImageDownloadItem) -> String {
    match &item.filename_suffix {
        None => format!("fill:{image_ref}"),
        Some(suffix) => format!("fill:{image_ref}:{suffix}:{}", item.file_name),
    }
}

fn add_plan(
    plans: &mut Vec<DownloadPlan>,
    merge_index: &mut HashMap<String, usize>,
    key: String,
    url: &str,
    item: ImageDownloadItem,
) {
    if let Some(&index) = merge_index.get(&key) {
        let plan = &mut plans[index];
        if !plan.aliases.contains(&item.file_name) {
            plan.aliases.push(item.file_name);
        }
        return;
    }

    merge_index.insert(key, plans.len());
    plans.push(DownloadPlan {
        url: url.to_string(),
        file_name: physical_file_name(&item),
        aliases: vec![item.file_name],
        needs_cropping: item.needs_cropping,
        crop_transform: item.crop_transform,
        requires_image_dimensions: item.requires_image_dimensions,
        scaling_factor: item.scaling_factor,
    });
}

/// Crop-suffixed items get the suffix folded into the physical name so two
/// crops of one source never collide on disk
fn physical_file_name(item: &ImageDownloadItem) -> String {
    let Some(suffix) = &item.filename_suffix else {
        return item.file_name.clone();
    };
    let path = Path::new(&item.file_name);
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| item.file_name.clone());
    match path.extension() {
        Some(ext) => format!("{stem}-{suffix}.{}", ext.to_string_lossy()),
        None => format!("{stem}-{suffix}"),
    }
}

/// One `files/:key/images` call resolves every fill ref at once
async fn resolve_fill_urls<F: FetchClient>(
    fetch: &F,
    file_key: &str,
    any_fills: bool,
) -> Result<HashMap<String, String>> {
    if !any_fills {
        return Ok(HashMap::new());
    }
    let response = fetch
        .get_json(&format!("/v1/files/{file_key}/images"))
        .await?;
    let images = response
        .get("meta")
        .and_then(|meta| meta.get("images"))
        .and_then(|images| images.as_object())
        .ok_or_else(|| {
            SimplifyError::MalformedResponse("fill URL response missing meta.images".to_string())
        })?;
    Ok(extract_url_map(images))
}

/// One `images/:key` call per render batch, with per-format options
async fn resolve_render_urls<F: FetchClient>(
    fetch: &F,
    file_key: &str,
    items: &[ImageDownloadItem],
    query: &str,
) -> Result<HashMap<String, String>> {
    if items.is_empty() {
        return Ok(HashMap::new());
    }
    let mut ids: Vec<&str> = items
        .iter()
        .filter_map(|item| item.node_id.as_deref())
        .collect();
    ids.sort_unstable();
    ids.dedup();

    let response = fetch
        .get_json(&format!(
            "/v1/images/{file_key}?ids={}&{query}",
            ids.join(",")
        ))
        .await?;
    let images = response
        .get("images")
        .and_then(|images| images.as_object())
        .ok_or_else(|| {
            SimplifyError::MalformedResponse("render URL response missing images".to_string())
        })?;
    Ok(extract_url_map(images))
}

/// Null URLs (nodes the renderer refused) are dropped here and surface later
/// as per-item skips
fn extract_url_map(object: &serde_json::Map<String, serde_json::Value>) -> HashMap<String, String> {
    object
        .iter()
        .filter_map(|(key, value)| {
            value
                .as_str()
                .map(|url| (key.clone(), url.to_string()))
        })
        .collect()
}

fn raster_query(options: &ImageProcessingOptions) -> String {
    format!("format=png&scale={}", options.png_scale)
}

fn vector_query(options: &ImageProcessingOptions) -> String {
    let svg = &options.svg_options;
    format!(
        "format=svg&svg_outline_text={}&svg_include_id={}&svg_simplify_stroke={}",
        svg.outline_text, svg.include_id, svg.simplify_stroke
    )
}
