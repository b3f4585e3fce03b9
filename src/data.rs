//! Fetching the element list.

use log::info;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use crate::tree::{Element, TreeError};

fn js_reason(value: wasm_bindgen::JsValue) -> String {
	value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

/// Decode the JSON array of elements.
pub fn parse_elements(text: &str) -> Result<Vec<Element>, TreeError> {
	serde_json::from_str(text).map_err(|e| TreeError::DataLoad(e.to_string()))
}

/// Fetch and decode the dataset at `url`.
pub async fn load_elements(url: String) -> Result<Vec<Element>, TreeError> {
	let window = web_sys::window().ok_or_else(|| TreeError::DataLoad("no window".into()))?;
	let response = JsFuture::from(window.fetch_with_str(&url))
		.await
		.map_err(|e| TreeError::DataLoad(js_reason(e)))?;
	let response: Response = response
		.dyn_into()
		.map_err(|_| TreeError::DataLoad("fetch did not return a Response".into()))?;
	if !response.ok() {
		return Err(TreeError::DataLoad(format!("{url}: HTTP {}", response.status())));
	}

	let text = response.text().map_err(|e| TreeError::DataLoad(js_reason(e)))?;
	let text = JsFuture::from(text)
		.await
		.map_err(|e| TreeError::DataLoad(js_reason(e)))?
		.as_string()
		.ok_or_else(|| TreeError::DataLoad("response body is not text".into()))?;

	let elements = parse_elements(&text)?;
	info!("fetched {} elements from {url}", elements.len());
	Ok(elements)
}
