//! Orchestrates preparing and publishing a post's images: resize the source
//! image to the configured widths, push every variant to the bucket under a
//! date-keyed name, and hand back the resulting URLs. The pixel work and the
//! storage protocol live behind the [`Resize`] and [`Upload`] seams;
//! external commands implement both by default.

use crate::command::Command;
use crate::compose::date_path;
use anyhow::{anyhow, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub trait Resize {
    /// Produces a copy of `source` resized to `width`, returning the copy's
    /// path.
    fn resize(&self, source: &Path, width: u32) -> Result<PathBuf>;
}

pub trait Upload {
    /// Stores `file` under `key` in `bucket` and returns the public URL.
    fn upload(&self, file: &Path, bucket: &str, key: &str) -> Result<String>;
}

/// The URL triple the image workflow leaves next to the source image, read
/// back when the post's DTO is composed.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ImageUrls {
    #[serde(rename = "postImg")]
    pub post_img: String,

    #[serde(rename = "thumbImg")]
    pub thumb_img: String,

    #[serde(rename = "fullImg")]
    pub full_img: String,
}

pub struct ImageManager<'a> {
    bucket: String,
    source_image_path: PathBuf,
    image_sizes: Vec<u32>,
    upload_image_paths: Vec<PathBuf>,
    image_urls: Vec<String>,
    resizer: &'a dyn Resize,
    uploader: &'a dyn Upload,
    created: DateTime<Local>,
}

impl<'a> ImageManager<'a> {
    pub fn new(
        bucket: &str,
        source_image_path: &Path,
        resizer: &'a dyn Resize,
        uploader: &'a dyn Upload,
    ) -> ImageManager<'a> {
        ImageManager {
            bucket: bucket.to_owned(),
            source_image_path: source_image_path.to_owned(),
            image_sizes: Vec::new(),
            upload_image_paths: Vec::new(),
            image_urls: Vec::new(),
            resizer,
            uploader,
            created: Local::now(),
        }
    }

    pub fn add_image_size(&mut self, width: u32) {
        self.image_sizes.push(width);
    }

    /// Resizes the source image to every configured width. The source image
    /// itself is queued last, so the upload order is: resized variants in
    /// insertion order, then the original.
    pub fn prepare_images(&mut self) -> Result<()> {
        let mut paths = Vec::with_capacity(self.image_sizes.len() + 1);
        for width in &self.image_sizes {
            paths.push(self.resizer.resize(&self.source_image_path, *width)?);
        }
        paths.push(self.source_image_path.clone());
        self.upload_image_paths = paths;
        Ok(())
    }

    /// Uploads every prepared image and collects the resulting URLs in
    /// upload order.
    pub fn upload_images(&mut self) -> Result<()> {
        for path in &self.upload_image_paths {
            let filename = path
                .file_name()
                .ok_or_else(|| anyhow!("image path `{}` has no filename", path.display()))?
                .to_string_lossy();
            let key = self.storage_key(&filename);
            let url = self.uploader.upload(path, &self.bucket, &key)?;
            self.image_urls.push(url);
        }
        Ok(())
    }

    pub fn image_urls(&self) -> &[String] {
        &self.image_urls
    }

    /// Maps the collected URLs onto their roles. Relies on the upload order
    /// established by [`ImageManager::prepare_images`] with the two standard
    /// widths configured: post image, thumbnail, then the full original.
    pub fn published_urls(&self) -> Result<ImageUrls> {
        match self.image_urls.as_slice() {
            [post, thumb, full] => Ok(ImageUrls {
                post_img: post.clone(),
                thumb_img: thumb.clone(),
                full_img: full.clone(),
            }),
            urls => Err(anyhow!(
                "expected three uploaded image urls, got {}",
                urls.len()
            )),
        }
    }

    fn storage_key(&self, filename: &str) -> String {
        format!("blog/{}{}", date_path(&self.created), filename)
    }
}

/// Resizes by running an external program as `program <source> <target>
/// <width>`. The target sits next to the source, its stem suffixed with the
/// width.
pub struct CommandResize {
    pub program: String,
}

impl Resize for CommandResize {
    fn resize(&self, source: &Path, width: u32) -> Result<PathBuf> {
        let stem = source
            .file_stem()
            .ok_or_else(|| anyhow!("image path `{}` has no filename", source.display()))?
            .to_string_lossy();
        let extension = source
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        let target = source.with_file_name(match extension.is_empty() {
            true => format!("{}-w{}", stem, width),
            false => format!("{}-w{}.{}", stem, width, extension),
        });

        Command::new(
            &self.program,
            &[
                &source.to_string_lossy(),
                &target.to_string_lossy(),
                &width.to_string(),
            ],
        )
        .run()?;
        Ok(target)
    }
}

/// Uploads by running an external program as `program <file> <bucket>
/// <key>`.
pub struct CommandUpload {
    pub program: String,
}

impl Upload for CommandUpload {
    fn upload(&self, file: &Path, bucket: &str, key: &str) -> Result<String> {
        Command::new(&self.program, &[&file.to_string_lossy(), bucket, key]).run()?;
        Ok(format!("https://{}.s3.amazonaws.com/{}", bucket, key))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;
    use std::cell::RefCell;

    struct FakeResize;

    impl Resize for FakeResize {
        fn resize(&self, source: &Path, width: u32) -> Result<PathBuf> {
            Ok(source.with_file_name(format!("resized-{}.png", width)))
        }
    }

    struct FakeUpload {
        keys: RefCell<Vec<String>>,
    }

    impl Upload for FakeUpload {
        fn upload(&self, file: &Path, bucket: &str, key: &str) -> Result<String> {
            self.keys.borrow_mut().push(key.to_owned());
            Ok(format!(
                "https://{}.example/{}",
                bucket,
                file.file_name().unwrap().to_string_lossy()
            ))
        }
    }

    fn manager<'a>(resizer: &'a FakeResize, uploader: &'a FakeUpload) -> ImageManager<'a> {
        let mut manager = ImageManager::new(
            "testbucket",
            Path::new("/drop/atthezoo.png"),
            resizer,
            uploader,
        );
        manager.created = Local.ymd(2018, 3, 4).and_hms(9, 5, 1);
        manager.add_image_size(800);
        manager.add_image_size(390);
        manager
    }

    #[test]
    fn test_storage_key_carries_the_date_path() {
        let resizer = FakeResize;
        let uploader = FakeUpload {
            keys: RefCell::new(Vec::new()),
        };
        let manager = manager(&resizer, &uploader);
        assert_eq!(
            manager.storage_key("atthezoo.png"),
            "blog/2018/3/4/atthezoo.png",
        );
    }

    #[test]
    fn test_prepare_and_upload_order() {
        let resizer = FakeResize;
        let uploader = FakeUpload {
            keys: RefCell::new(Vec::new()),
        };
        let mut manager = manager(&resizer, &uploader);
        manager.prepare_images().unwrap();
        manager.upload_images().unwrap();

        assert_eq!(
            manager.image_urls(),
            &[
                "https://testbucket.example/resized-800.png",
                "https://testbucket.example/resized-390.png",
                "https://testbucket.example/atthezoo.png",
            ],
        );
        assert_eq!(
            *uploader.keys.borrow(),
            vec![
                "blog/2018/3/4/resized-800.png",
                "blog/2018/3/4/resized-390.png",
                "blog/2018/3/4/atthezoo.png",
            ],
        );

        let urls = manager.published_urls().unwrap();
        assert_eq!(urls.post_img, "https://testbucket.example/resized-800.png");
        assert_eq!(urls.thumb_img, "https://testbucket.example/resized-390.png");
        assert_eq!(urls.full_img, "https://testbucket.example/atthezoo.png");
    }

    #[test]
    fn test_published_urls_needs_three_uploads() {
        let resizer = FakeResize;
        let uploader = FakeUpload {
            keys: RefCell::new(Vec::new()),
        };
        let manager = manager(&resizer, &uploader);
        assert!(manager.published_urls().is_err());
    }

    #[test]
    fn test_image_urls_json_field_names() {
        let urls = ImageUrls {
            post_img: "p".to_owned(),
            thumb_img: "t".to_owned(),
            full_img: "f".to_owned(),
        };
        let json = serde_json::to_string(&urls).unwrap();
        assert_eq!(json, r#"{"postImg":"p","thumbImg":"t","fullImg":"f"}"#);
    }
}
