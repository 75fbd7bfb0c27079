pub mod image;

pub use image::ImageResolver;

/// Returned when a page has no qualifying `<img>`.
pub const FALLBACK_IMAGE_URL: &str =
    "https://upload.wikimedia.org/wikipedia/commons/3/39/Abstract_6_by_G._M._Solegaonkar.jpg";

/// A candidate image must be strictly larger than this to count as a lead image.
pub const DEFAULT_MIN_IMAGE_BYTES: usize = 40_000;

pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:52.0) Gecko/20100101 Firefox/52.0";
