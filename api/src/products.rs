//! Product catalogue calls.

use std::path::Path;

use reqwest::multipart::{Form, Part};

use crate::cache::{DETAIL_TTL, LIST_TTL, REFERENCE_TTL};
use crate::endpoint::Endpoint;
use crate::error::ApiError;
use crate::http::{ApiClient, Payload};
use crate::types::{
    ApiAck, Category, Envelope, Product, ProductCity, ProductDraft, ProductQuery, ResultList, SearchQuery, decode,
    decode_ack,
};

/// Multipart field the upload endpoint reads the image from.
const IMAGE_FIELD: &str = "userfile";

fn require_id(id: &str) -> Result<String, ApiError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(ApiError::Validation("product id is required".to_owned()));
    }
    Ok(id.to_owned())
}

fn image_mime(path: &Path) -> &'static str {
    let ext = path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

impl ApiClient {
    /// One page of the supplier's products.
    ///
    /// # Errors
    ///
    /// Transport, business and decode errors.
    pub async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, ApiError> {
        let endpoint = Endpoint::ProductList;
        let body = self.execute_cached(&endpoint, Payload::json(&endpoint, query)?, LIST_TTL).await?;
        let envelope: Envelope<ResultList<Product>> = decode(endpoint.name(), body)?;
        Ok(envelope.content.into_items())
    }

    /// Free-text product search. Not paginated.
    ///
    /// # Errors
    ///
    /// Validation, transport, business and decode errors.
    pub async fn search_products(&self, filter: &str) -> Result<Vec<Product>, ApiError> {
        let filter = filter.trim();
        if filter.is_empty() {
            return Err(ApiError::Validation("search text is required".to_owned()));
        }
        let endpoint = Endpoint::ProductSearch;
        let query = SearchQuery { filter: filter.to_owned() };
        let body = self.execute(&endpoint, Payload::json(&endpoint, &query)?).await?;
        let envelope: Envelope<ResultList<Product>> = decode(endpoint.name(), body)?;
        Ok(envelope.content.into_items())
    }

    /// # Errors
    ///
    /// Validation, transport, business and decode errors.
    pub async fn product(&self, id: &str) -> Result<Product, ApiError> {
        let endpoint = Endpoint::ProductGet(require_id(id)?);
        let body = self.execute_cached(&endpoint, Payload::Empty, DETAIL_TTL).await?;
        let envelope: Envelope<Product> = decode(endpoint.name(), body)?;
        Ok(envelope.content)
    }

    /// # Errors
    ///
    /// Transport, business and decode errors.
    pub async fn product_categories(&self) -> Result<Vec<Category>, ApiError> {
        let endpoint = Endpoint::ProductCategories;
        let body = self.execute_cached(&endpoint, Payload::Empty, REFERENCE_TTL).await?;
        let envelope: Envelope<ResultList<Category>> = decode(endpoint.name(), body)?;
        Ok(envelope.content.into_items())
    }

    /// Cities that currently have products.
    ///
    /// # Errors
    ///
    /// Transport, business and decode errors.
    pub async fn product_cities(&self) -> Result<Vec<ProductCity>, ApiError> {
        let endpoint = Endpoint::ProductCities;
        let body = self.execute_cached(&endpoint, Payload::Empty, REFERENCE_TTL).await?;
        let envelope: Envelope<ResultList<ProductCity>> = decode(endpoint.name(), body)?;
        Ok(envelope.content.into_items())
    }

    /// # Errors
    ///
    /// Validation, transport and business errors.
    pub async fn add_product(&self, draft: &ProductDraft) -> Result<ApiAck, ApiError> {
        draft.validate()?;
        let endpoint = Endpoint::ProductAdd;
        let body = self.execute(&endpoint, Payload::json(&endpoint, draft)?).await?;
        self.forget_product_lists();
        decode_ack(endpoint.name(), body)
    }

    /// # Errors
    ///
    /// Validation, transport and business errors.
    pub async fn update_product(&self, id: &str, draft: &ProductDraft) -> Result<ApiAck, ApiError> {
        draft.validate()?;
        let id = require_id(id)?;
        let endpoint = Endpoint::ProductUpdate(id.clone());
        let body = self.execute(&endpoint, Payload::json(&endpoint, draft)?).await?;
        self.forget_product(&id);
        decode_ack(endpoint.name(), body)
    }

    /// Upload an image file for product `id`.
    ///
    /// # Errors
    ///
    /// [`ApiError::Io`] if the file cannot be read, otherwise validation,
    /// transport and business errors.
    pub async fn add_product_image(&self, id: &str, file: &Path) -> Result<ApiAck, ApiError> {
        let id = require_id(id)?;
        let bytes = tokio::fs::read(file)
            .await
            .map_err(|source| ApiError::Io { path: file.display().to_string(), source })?;
        let file_name = file
            .file_name()
            .map_or_else(|| "image".to_owned(), |n| n.to_string_lossy().into_owned());
        let endpoint = Endpoint::ProductAddImage(id.clone());
        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(image_mime(file))
            .map_err(|e| ApiError::transport(endpoint.name(), e))?;

        tracing::info!(product_id = %id, path = %file.display(), "uploading product image");
        let body = self.execute(&endpoint, Payload::Multipart(Form::new().part(IMAGE_FIELD, part))).await?;
        self.forget_product(&id);
        decode_ack(endpoint.name(), body)
    }

    /// # Errors
    ///
    /// Validation, transport and business errors.
    pub async fn publish_product(&self, id: &str) -> Result<ApiAck, ApiError> {
        let id = require_id(id)?;
        let endpoint = Endpoint::ProductPublish(id.clone());
        let body = self.execute(&endpoint, Payload::Empty).await?;
        self.forget_product(&id);
        decode_ack(endpoint.name(), body)
    }

    fn forget_product_lists(&self) {
        self.cache().invalidate_prefix(&format!("{} ", Endpoint::ProductList.path()));
    }

    fn forget_product(&self, id: &str) {
        self.forget_product_lists();
        self.cache().invalidate_prefix(&format!("{} ", Endpoint::ProductGet(id.to_owned()).path()));
    }
}
