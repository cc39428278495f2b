use feedreel::models::{Catalog, Category, CategoryData, CategorySlug, MediaKind, Video, VideoSlug};
use std::sync::Arc;

pub struct Fixtures;

impl Fixtures {
    pub fn category(slug: &str, name: &str) -> Category {
        Category {
            slug: CategorySlug::new(slug),
            name: name.to_string(),
            icon_url: format!("https://cdn.example.com/icons/{}.png", slug),
        }
    }

    pub fn widget_video(slug: &str) -> Video {
        Video {
            title: format!("Widget video {}", slug),
            media_url: format!("https://www.youtube.com/embed/{}", slug),
            media_kind: MediaKind::EmbeddedWidget,
            thumbnail_url: format!("https://cdn.example.com/thumbs/{}.jpg", slug),
            slug: VideoSlug::new(slug),
            duration_label: "2:00".to_string(),
            category: None,
        }
    }

    pub fn native_video(slug: &str) -> Video {
        Video {
            title: format!("Native video {}", slug),
            media_url: format!("https://cdn.example.com/video/{}.mp4", slug),
            media_kind: MediaKind::Native,
            thumbnail_url: format!("https://cdn.example.com/thumbs/{}.jpg", slug),
            slug: VideoSlug::new(slug),
            duration_label: "1:00".to_string(),
            category: None,
        }
    }

    /// "Web Development" holds widget videos v1..v20, "Solo" one widget video,
    /// "Mixed" alternates backends.
    pub fn catalog() -> Catalog {
        let web = CategoryData::new(
            Self::category("web-development", "Web Development"),
            (1..=20).map(|i| Self::widget_video(&format!("v{}", i))).collect(),
        );
        let solo = CategoryData::new(
            Self::category("solo", "Solo"),
            vec![Self::widget_video("solo-1")],
        );
        let mixed = CategoryData::new(
            Self::category("mixed", "Mixed"),
            vec![
                Self::widget_video("m-widget"),
                Self::native_video("m-native"),
                Self::native_video("m-native-2"),
            ],
        );
        Catalog::new(vec![web, solo, mixed])
    }

    /// Look up a catalog video; panics on unknown slugs.
    pub fn video(catalog: &Catalog, slug: &str) -> Arc<Video> {
        catalog
            .find(&VideoSlug::new(slug))
            .unwrap_or_else(|| panic!("fixture video {} missing", slug))
    }
}
