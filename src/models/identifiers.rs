use serde::{Deserialize, Serialize};
use std::fmt;

/// Declares a string-backed slug newtype. Equality and hashing follow the raw text.
macro_rules! slug_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(slug: impl Into<String>) -> Self {
                Self(slug.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(slug: &str) -> Self {
                Self::new(slug)
            }
        }

        impl From<String> for $name {
            fn from(slug: String) -> Self {
                Self(slug)
            }
        }
    };
}

slug_type!(
    /// Feed identifier of a video. Widget videos may carry a `?si=` style suffix.
    VideoSlug
);
slug_type!(
    /// Feed identifier of a category.
    CategorySlug
);

impl VideoSlug {
    /// Slug with any query suffix removed (`abc?t=1` -> `abc`).
    pub fn base(&self) -> &str {
        self.0.split('?').next().unwrap_or_default()
    }
}
