use serde::Serialize;

use crate::{Result, ShelfService};
use shelf_domain::{
	catalog::Product,
	matcher,
	vision::{DetectedObject, ImageAnalysis, ImageLabel},
};
use shelf_providers::vision::{VisionLabel, VisionResponse};

#[derive(Clone, Debug, Serialize)]
pub struct ImageSearchResponse {
	pub analysis: ImageAnalysis,
	/// The keyword query derived from the analysis.
	pub query: String,
	pub items: Vec<Product>,
}

impl ShelfService {
	/// Describes an image through the vision provider. Failures are reported in `description`
	/// with empty label lists.
	pub async fn analyze_image(&self, image: &[u8]) -> ImageAnalysis {
		if image.is_empty() {
			tracing::warn!("Image analysis skipped. No image data was provided.");

			return ImageAnalysis::failed("Image analysis failed: no image data was provided.");
		}
		if image.len() > self.cfg.search.max_image_bytes {
			tracing::warn!(
				image_bytes = image.len(),
				max_image_bytes = self.cfg.search.max_image_bytes,
				"Image analysis skipped. Image is too large."
			);

			return ImageAnalysis::failed(format!(
				"Image analysis failed: image exceeds {} bytes.",
				self.cfg.search.max_image_bytes
			));
		}

		match self.providers.vision.analyze(&self.cfg.providers.vision, image).await {
			Ok(response) => analysis_from_response(&response),
			Err(err) => {
				tracing::warn!(error = %err, "Image analysis failed.");

				ImageAnalysis::failed(format!("Image analysis failed: {err}"))
			},
		}
	}

	/// Runs the labels of an image through the simplified keyword path.
	pub async fn search_image(&self, image: &[u8]) -> Result<ImageSearchResponse> {
		let analysis = self.analyze_image(image).await;
		let query = analysis.search_query();

		if query.is_empty() {
			return Ok(ImageSearchResponse { analysis, query, items: Vec::new() });
		}

		let products = self.catalog.list_products().await?;
		let items = matcher::find_products_by_query(&products, &query);

		Ok(ImageSearchResponse { analysis, query, items })
	}
}

fn analysis_from_response(response: &VisionResponse) -> ImageAnalysis {
	let objects: Vec<DetectedObject> = response
		.objects
		.iter()
		.map(|object| DetectedObject { labels: object.labels.iter().map(image_label).collect() })
		.collect();
	let tags: Vec<ImageLabel> = response.tags.iter().map(image_label).collect();

	ImageAnalysis::from_labels(response.caption.as_deref(), &objects, &tags)
}

fn image_label(label: &VisionLabel) -> ImageLabel {
	ImageLabel { name: label.name.clone(), confidence: label.confidence }
}
