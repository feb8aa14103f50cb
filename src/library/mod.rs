use std::collections::HashSet;
use std::path::PathBuf;

use thiserror::Error;

mod decode;
mod source;

pub use decode::{decode_for_display, DecodedPhoto, DISPLAY_MAX_EDGE};
pub use source::{media_type_for, DirectoryPhotoSource};

pub const DEFAULT_MAX_PHOTOS: usize = 1000;

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("failed to read photo library: {path}")]
    ReadRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("photo library is not a directory: {path}")]
    NotADirectory { path: PathBuf },
    #[error("failed to walk photo library: {path}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("failed to open photo: {path}")]
    OpenPhoto {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode photo: {path}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("decoded photo too large to display: {path}")]
    Oversized { path: PathBuf },
}

pub type LibraryResult<T> = std::result::Result<T, LibraryError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssetType {
    #[default]
    Photos,
    Videos,
    All,
}

impl AssetType {
    pub fn matches(self, media_type: &str) -> bool {
        match self {
            Self::Photos => media_type.starts_with("image"),
            Self::Videos => media_type.starts_with("video"),
            Self::All => true,
        }
    }
}

/// Optional metadata a query asks the source to fill in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IncludeFields {
    pub filename: bool,
    pub file_size: bool,
    pub image_size: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhotoQuery {
    pub first: usize,
    pub asset_type: AssetType,
    pub include: IncludeFields,
}

impl Default for PhotoQuery {
    fn default() -> Self {
        Self {
            first: DEFAULT_MAX_PHOTOS,
            asset_type: AssetType::Photos,
            include: IncludeFields {
                filename: true,
                file_size: true,
                image_size: false,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PhotoRecord {
    pub media_type: Option<String>,
    pub uri: Option<String>,
    pub filepath: Option<PathBuf>,
    pub filename: Option<String>,
    pub file_size: Option<u64>,
    pub image_size: Option<(u32, u32)>,
}

impl PhotoRecord {
    /// Records without a media type are given the benefit of the doubt.
    pub fn is_image(&self) -> bool {
        self.media_type
            .as_deref()
            .is_none_or(|media_type| media_type.starts_with("image"))
    }

    /// The reference handed to the renderer: the URI, else the file path.
    pub fn display_uri(&self) -> Option<String> {
        if let Some(uri) = self.uri.as_deref().filter(|uri| !uri.is_empty()) {
            return Some(uri.to_string());
        }
        self.filepath
            .as_ref()
            .map(|path| path.to_string_lossy().into_owned())
            .filter(|path| !path.is_empty())
    }
}

/// Filesystem path behind a display reference: `file://` URIs are unwrapped,
/// anything else is taken as a path already.
pub fn photo_path(reference: &str) -> PathBuf {
    PathBuf::from(reference.strip_prefix("file://").unwrap_or(reference))
}

pub trait PhotoSource {
    fn enumerate(&self, query: &PhotoQuery) -> LibraryResult<Vec<PhotoRecord>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryShape {
    Empty,
    Single,
    Many,
}

/// Ordered, duplicate-free photo references for one load.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PhotoList {
    uris: Vec<String>,
}

impl PhotoList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = PhotoRecord>,
    {
        let mut total_records = 0usize;
        let image_uris = records
            .into_iter()
            .inspect(|_| total_records += 1)
            .filter(PhotoRecord::is_image)
            .filter_map(|record| record.display_uri())
            .collect::<Vec<_>>();
        let image_uri_count = image_uris.len();
        let list = Self::from_uris(image_uris);
        tracing::info!(
            records = total_records,
            image_uris = image_uri_count,
            unique = list.len(),
            "built photo list"
        );
        list
    }

    /// Keeps the first occurrence of every URI.
    pub fn from_uris<I, S>(uris: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let uris = uris
            .into_iter()
            .map(Into::into)
            .filter(|uri: &String| seen.insert(uri.clone()))
            .collect();
        Self { uris }
    }

    pub fn len(&self) -> usize {
        self.uris.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uris.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.uris.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.uris.iter().map(String::as_str)
    }

    pub fn shape(&self) -> LibraryShape {
        match self.uris.len() {
            0 => LibraryShape::Empty,
            1 => LibraryShape::Single,
            _ => LibraryShape::Many,
        }
    }

    /// Photo shown for `index`, wrapping around the list.
    pub fn at(&self, index: ViewIndex) -> Option<&str> {
        index.resolve(self.len()).and_then(|resolved| self.get(resolved))
    }
}

/// Position in the photo list; advances modulo the list length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewIndex(usize);

impl ViewIndex {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn get(self) -> usize {
        self.0
    }

    pub fn reset(&mut self) {
        self.0 = 0;
    }

    /// Moves to the next photo. A list of zero or one photo keeps the index.
    pub fn advance(&mut self, len: usize) {
        if len <= 1 {
            self.clamp_to(len);
            return;
        }
        self.0 = (self.0 + 1) % len;
    }

    /// Wraps to 0 when the index no longer fits the list.
    pub fn clamp_to(&mut self, len: usize) {
        if self.0 >= len {
            self.0 = 0;
        }
    }

    pub fn resolve(self, len: usize) -> Option<usize> {
        (len > 0).then(|| self.0 % len)
    }
}
