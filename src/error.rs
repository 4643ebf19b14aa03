use thiserror::Error;

/// Errors that can occur while comparing or interpolating outlines.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum MorphError {
    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("outline contains non-finite coordinates")]
    NonFinite,

    #[error("input too large: {segments} segments exceeds the limit of {limit}")]
    TooLarge { segments: usize, limit: usize },

    #[error(
        "outlines cannot be aligned: {a} vs {b} segments with a lookback window of {window}"
    )]
    Unbalanced { a: usize, b: usize, window: usize },

    #[error("alignment cost overflowed: outline coordinates are too large")]
    CostOverflow,

    #[error("correspondence does not fit the outlines: {0}")]
    Mismatch(String),

    #[error("blend factor {0} is outside [0, 1]")]
    BlendFactor(f64),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("glyphs have different contour counts ({a} vs {b})")]
    ContourCountMismatch { a: usize, b: usize },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("png encoding error: {0}")]
    PngEncode(#[from] png::EncodingError),

    #[cfg(feature = "ufo")]
    #[error("norad error: {0}")]
    FontLoad(#[from] norad::error::FontLoadError),

    #[cfg(feature = "ufo")]
    #[error("norad write error: {0}")]
    FontWrite(#[from] norad::error::FontWriteError),

    #[cfg(feature = "ufo")]
    #[error("glyph '{0}' not found in the default layer")]
    MissingGlyph(String),

    #[cfg(feature = "ufo")]
    #[error("cannot convert contour: {0}")]
    ContourConvert(String),
}
