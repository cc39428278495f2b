use super::{Category, CategorySlug, Video, VideoSlug};
use crate::utils::AppResult;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// One category and its videos in feed order.
#[derive(Debug, Clone)]
pub struct CategoryData {
    pub category: Category,
    pub contents: Vec<Arc<Video>>,
}

impl CategoryData {
    /// Build a category, stamping the category reference onto each video.
    pub fn new(category: Category, videos: Vec<Video>) -> Self {
        let contents = videos
            .into_iter()
            .map(|mut video| {
                video.category = Some(category.clone());
                Arc::new(video)
            })
            .collect();
        Self { category, contents }
    }
}

#[derive(Deserialize)]
struct RawCategoryData {
    category: Category,
    contents: Vec<Video>,
}

#[derive(Deserialize)]
struct RawCatalog {
    categories: Vec<RawCategoryData>,
}

/// Read-only catalog handed to the player core by the feed.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    categories: Vec<CategoryData>,
}

impl Catalog {
    pub fn new(categories: Vec<CategoryData>) -> Self {
        Self { categories }
    }

    /// Parse the feed's `{ "categories": [...] }` document.
    pub fn from_json(json: &str) -> AppResult<Self> {
        let raw: RawCatalog = serde_json::from_str(json)?;
        let categories = raw
            .categories
            .into_iter()
            .map(|c| CategoryData::new(c.category, c.contents))
            .collect::<Vec<_>>();
        debug!("Loaded catalog with {} categories", categories.len());
        Ok(Self { categories })
    }

    pub fn load(path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn categories(&self) -> &[CategoryData] {
        &self.categories
    }

    pub fn category(&self, slug: &CategorySlug) -> Option<&CategoryData> {
        self.categories.iter().find(|c| &c.category.slug == slug)
    }

    pub fn find(&self, slug: &VideoSlug) -> Option<Arc<Video>> {
        self.categories
            .iter()
            .flat_map(|c| c.contents.iter())
            .find(|v| &v.slug == slug)
            .cloned()
    }

    /// The video after `current` in its category, wrapping to the first entry.
    ///
    /// Returns `None` when the category is unknown or when the wrap lands back
    /// on `current` (single-video category).
    pub fn next_video(&self, current: &Video) -> Option<Arc<Video>> {
        let data = self.category(current.category_slug()?)?;
        let next_index = data
            .contents
            .iter()
            .position(|v| v.slug == current.slug)
            .map_or(0, |idx| idx + 1);

        let next = data
            .contents
            .get(next_index)
            .or_else(|| data.contents.first())?;

        if next.slug == current.slug {
            return None;
        }
        Some(next.clone())
    }

    /// Same-category videos other than `current`, in catalog order.
    pub fn related(&self, current: &Video) -> Vec<Arc<Video>> {
        let Some(data) = current.category_slug().and_then(|slug| self.category(slug)) else {
            return Vec::new();
        };
        data.contents
            .iter()
            .filter(|v| v.slug != current.slug)
            .cloned()
            .collect()
    }
}
