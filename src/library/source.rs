use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use walkdir::WalkDir;

use super::{LibraryError, LibraryResult, PhotoQuery, PhotoRecord, PhotoSource};

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "m4v", "mov", "mkv", "webm", "avi"];

/// Classifies a file by extension; `None` for anything that is not media.
pub fn media_type_for(path: &Path) -> Option<String> {
    if let Ok(format) = image::ImageFormat::from_path(path) {
        return Some(format.to_mime_type().to_string());
    }
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    VIDEO_EXTENSIONS
        .contains(&extension.as_str())
        .then(|| format!("video/{extension}"))
}

/// A directory tree treated as the device photo library.
#[derive(Debug, Clone)]
pub struct DirectoryPhotoSource {
    root: PathBuf,
}

struct FoundMedia {
    path: PathBuf,
    media_type: String,
    modified: SystemTime,
}

impl DirectoryPhotoSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn scan(&self, query: &PhotoQuery) -> LibraryResult<Vec<FoundMedia>> {
        let metadata = fs::metadata(&self.root).map_err(|source| LibraryError::ReadRoot {
            path: self.root.clone(),
            source,
        })?;
        if !metadata.is_dir() {
            return Err(LibraryError::NotADirectory {
                path: self.root.clone(),
            });
        }

        let mut found = Vec::new();
        for entry in WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if err.depth() == 0 => {
                    return Err(LibraryError::Walk {
                        path: self.root.clone(),
                        source: err,
                    });
                }
                Err(err) => {
                    tracing::debug!(?err, "skipping unreadable library entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(media_type) = media_type_for(entry.path()) else {
                continue;
            };
            if !query.asset_type.matches(&media_type) {
                continue;
            }
            let modified = entry
                .metadata()
                .ok()
                .and_then(|metadata| metadata.modified().ok())
                .unwrap_or(UNIX_EPOCH);
            found.push(FoundMedia {
                path: entry.into_path(),
                media_type,
                modified,
            });
        }

        // Newest first, file name order among equals.
        found.sort_by(|left, right| right.modified.cmp(&left.modified));
        found.truncate(query.first);
        Ok(found)
    }

    fn record_for(media: FoundMedia, query: &PhotoQuery) -> PhotoRecord {
        let include = query.include;
        let filename = include
            .filename
            .then(|| media.path.file_name())
            .flatten()
            .map(|name| name.to_string_lossy().into_owned());
        let file_size = include
            .file_size
            .then(|| fs::metadata(&media.path).ok())
            .flatten()
            .map(|metadata| metadata.len());
        let image_size = (include.image_size && media.media_type.starts_with("image"))
            .then(|| image::image_dimensions(&media.path).ok())
            .flatten();

        PhotoRecord {
            uri: Some(file_uri(&media.path)),
            filepath: Some(media.path),
            media_type: Some(media.media_type),
            filename,
            file_size,
            image_size,
        }
    }
}

impl PhotoSource for DirectoryPhotoSource {
    fn enumerate(&self, query: &PhotoQuery) -> LibraryResult<Vec<PhotoRecord>> {
        let found = self.scan(query)?;
        tracing::debug!(
            root = %self.root.display(),
            count = found.len(),
            first = query.first,
            "enumerated photo library"
        );
        Ok(found
            .into_iter()
            .map(|media| Self::record_for(media, query))
            .collect())
    }
}

fn file_uri(path: &Path) -> String {
    format!("file://{}", path.display())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::{AssetType, IncludeFields, PhotoList};

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "swiper-source-{name}-{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).expect("create scratch dir");
        dir
    }

    #[test]
    fn media_type_for_classifies_images_and_videos() {
        assert_eq!(
            media_type_for(Path::new("a/b/photo.JPG")).as_deref(),
            Some("image/jpeg")
        );
        assert_eq!(
            media_type_for(Path::new("shot.png")).as_deref(),
            Some("image/png")
        );
        assert_eq!(
            media_type_for(Path::new("clip.MOV")).as_deref(),
            Some("video/mov")
        );
        assert_eq!(media_type_for(Path::new("notes.txt")), None);
        assert_eq!(media_type_for(Path::new("README")), None);
    }

    #[test]
    fn enumerate_walks_nested_directories_and_filters_by_asset_type() {
        let dir = scratch_dir("walk");
        fs::create_dir_all(dir.join("2024/trip")).expect("nested dir");
        fs::write(dir.join("a.jpg"), b"jpg").expect("write");
        fs::write(dir.join("2024/trip/b.png"), b"png").expect("write");
        fs::write(dir.join("clip.mp4"), b"mp4").expect("write");
        fs::write(dir.join("notes.txt"), b"txt").expect("write");

        let source = DirectoryPhotoSource::new(&dir);
        let records = source
            .enumerate(&PhotoQuery::default())
            .expect("enumerate");
        let mut names = records
            .iter()
            .filter_map(|record| record.filename.clone())
            .collect::<Vec<_>>();
        names.sort();
        assert_eq!(names, vec!["a.jpg", "b.png"]);
        assert!(records
            .iter()
            .all(|record| record.uri.as_deref().is_some_and(|uri| uri.starts_with("file://"))));
        assert!(records.iter().all(|record| record.file_size == Some(3)));

        let everything = source
            .enumerate(&PhotoQuery {
                asset_type: AssetType::All,
                ..PhotoQuery::default()
            })
            .expect("enumerate all");
        assert_eq!(everything.len(), 3);

        let list = PhotoList::from_records(everything);
        assert_eq!(list.len(), 2);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn enumerate_truncates_to_first_and_skips_unrequested_fields() {
        let dir = scratch_dir("first");
        for index in 0..5 {
            fs::write(dir.join(format!("{index}.jpg")), b"x").expect("write");
        }

        let records = DirectoryPhotoSource::new(&dir)
            .enumerate(&PhotoQuery {
                first: 2,
                asset_type: AssetType::Photos,
                include: IncludeFields::default(),
            })
            .expect("enumerate");
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|record| record.filename.is_none()));
        assert!(records.iter().all(|record| record.file_size.is_none()));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn empty_library_yields_no_records() {
        let dir = scratch_dir("empty");
        let records = DirectoryPhotoSource::new(&dir)
            .enumerate(&PhotoQuery::default())
            .expect("enumerate");
        assert!(records.is_empty());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_library_is_an_error() {
        let dir = scratch_dir("missing").join("nope");
        let err = DirectoryPhotoSource::new(&dir)
            .enumerate(&PhotoQuery::default())
            .expect_err("missing root");
        assert!(matches!(err, LibraryError::ReadRoot { .. }));
    }
}
