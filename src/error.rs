// SPDX-License-Identifier: GPL-3.0-or-later
use std::error::Error as StdError;
use std::fmt;

/// Errors from reading a frame off of a camera.
#[derive(Debug)]
pub(crate) enum ReadError {
    /// A recoverable failure. The acquisition loop skips the frame and tries again.
    Transient(anyhow::Error),

    /// Anything else. These are passed up to the caller.
    Fatal(anyhow::Error),
}

impl ReadError {
    pub(crate) fn transient<E>(err: E) -> Self
    where
        anyhow::Error: From<E>,
    {
        Self::Transient(anyhow::Error::from(err))
    }

    pub(crate) fn fatal<E>(err: E) -> Self
    where
        anyhow::Error: From<E>,
    {
        Self::Fatal(anyhow::Error::from(err))
    }
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transient(err) => write!(f, "transient camera read failure: {}", err),
            Self::Fatal(err) => write!(f, "camera read failure: {}", err),
        }
    }
}

impl StdError for ReadError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Transient(err) => Some(err.as_ref()),
            Self::Fatal(err) => Some(err.as_ref()),
        }
    }
}

/// Invalid configuration values, caught before the acquisition loop is started.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum ConfigError {
    /// The lower temperature limit is not below the upper limit.
    InvalidLimits { lower: f32, upper: f32 },

    /// A palette needs at least one anchor.
    EmptyAnchors,

    /// Anchor positions are normalized, and must be within `[0, 1]`.
    AnchorPosition(f32),

    /// A palette needs at least one color.
    ZeroColorDepth,

    /// The Gaussian spread has to be a positive number.
    InvalidSpread(f32),

    /// One of the image dimensions is zero.
    EmptyDimension(&'static str),

    /// The frame rate smoothing factor must be in `(0, 1]`.
    InvalidSmoothing(f32),

    /// The delay between frames must be a finite, non-negative number of seconds.
    InvalidThrottle(f32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLimits { lower, upper } => write!(
                f,
                "lower temperature limit ({}) must be less than the upper limit ({})",
                lower, upper
            ),
            Self::EmptyAnchors => f.write_str("palette anchor list is empty"),
            Self::AnchorPosition(position) => write!(
                f,
                "palette anchor position {} is outside of 0.0-1.0",
                position
            ),
            Self::ZeroColorDepth => f.write_str("color depth must be at least 1"),
            Self::InvalidSpread(spread) => {
                write!(f, "palette spread must be positive (got {})", spread)
            }
            Self::EmptyDimension(name) => write!(f, "{} must be greater than zero", name),
            Self::InvalidSmoothing(alpha) => write!(
                f,
                "frame rate smoothing factor must be in (0, 1] (got {})",
                alpha
            ),
            Self::InvalidThrottle(seconds) => {
                write!(f, "invalid delay between frames: {} seconds", seconds)
            }
        }
    }
}

impl StdError for ConfigError {}

/// Problems with fonts or other assets used for the overlay.
#[derive(Debug)]
pub(crate) enum RenderAssetError {
    /// The font could not be read or parsed.
    Font(String),

    /// The font does not have a glyph for a character in the text.
    MissingGlyph(char),
}

impl fmt::Display for RenderAssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Font(reason) => write!(f, "unable to load font: {}", reason),
            Self::MissingGlyph(c) => write!(f, "font has no glyph for {:?}", c),
        }
    }
}

impl StdError for RenderAssetError {}
