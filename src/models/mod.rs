pub mod catalog;
mod identifiers;

pub use catalog::{Catalog, CategoryData};
pub use identifiers::{CategorySlug, VideoSlug};

use serde::{Deserialize, Serialize};
use url::Url;

/// Which playback backend a video needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaKind {
    /// Third-party embedded player controlled through its script API
    #[serde(rename = "YOUTUBE", alias = "embedded-widget")]
    EmbeddedWidget,
    /// Host's built-in media element
    #[serde(rename = "MP4", alias = "native")]
    Native,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::EmbeddedWidget => "embedded-widget",
            MediaKind::Native => "native",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub slug: CategorySlug,
    pub name: String,
    pub icon_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub title: String,
    pub media_url: String,
    #[serde(rename = "mediaType")]
    pub media_kind: MediaKind,
    pub thumbnail_url: String,
    pub slug: VideoSlug,
    #[serde(rename = "duration", default)]
    pub duration_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

impl Video {
    pub fn category_slug(&self) -> Option<&CategorySlug> {
        self.category.as_ref().map(|c| &c.slug)
    }

    /// Identifier handed to the embedded widget.
    ///
    /// The slug (without query suffix) wins; otherwise the `/embed/<id>` path
    /// segment of the media URL. Native videos have no widget id.
    pub fn widget_id(&self) -> Option<String> {
        if self.media_kind != MediaKind::EmbeddedWidget {
            return None;
        }
        let base = self.slug.base();
        if !base.is_empty() {
            return Some(base.to_string());
        }

        let url = Url::parse(&self.media_url).ok()?;
        let mut segments = url.path_segments()?;
        segments
            .by_ref()
            .find(|s| *s == "embed")
            .and_then(|_| segments.next())
            .filter(|id| !id.is_empty())
            .map(str::to_string)
    }
}
