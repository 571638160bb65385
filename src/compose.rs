//! The "add post" workflow: turns an image and/or markdown file dropped into
//! the blog's drop directory into a page DTO ready for the next site build.
//! Covers scanning the drop directory, inferring a post title from an image
//! filename, and assembling the DTO (canonical URL, id, excerpt, content).

use crate::dto::{self, CustomFields, PageDto, PostData};
use crate::markdown;
use anyhow::{Context as _, Result};
use chrono::{DateTime, Datelike, Local, Timelike};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

/// Watches the drop directory for the three files a post is composed from:
/// the source image, the optional markdown text, and the image-URL json the
/// upload step leaves behind. Getters return empty names when a file kind is
/// absent.
pub struct PostAdder {
    dir: PathBuf,
    img: String,
    md: String,
    json: String,
}

impl PostAdder {
    pub fn new(dir: &Path) -> PostAdder {
        PostAdder {
            dir: dir.to_owned(),
            img: String::new(),
            md: String::new(),
            json: String::new(),
        }
    }

    /// (Re-)scans the drop directory. The first file of each kind in name
    /// order wins.
    pub fn read(&mut self) -> Result<()> {
        self.img.clear();
        self.md.clear();
        self.json.clear();

        let mut names: Vec<String> = Vec::new();
        let entries = fs::read_dir(&self.dir)
            .with_context(|| format!("Reading drop directory `{}`", self.dir.display()))?;
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();

        for name in names {
            let extension = Path::new(&name)
                .extension()
                .map(|e| e.to_string_lossy().to_lowercase())
                .unwrap_or_default();
            if self.img.is_empty() && IMAGE_EXTENSIONS.contains(&extension.as_str()) {
                self.img = name;
            } else if self.md.is_empty() && extension == "md" {
                self.md = name;
            } else if self.json.is_empty() && extension == "json" {
                self.json = name;
            }
        }
        Ok(())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn img_file_name(&self) -> &str {
        &self.img
    }

    pub fn md_file_name(&self) -> &str {
        &self.md
    }

    pub fn json_file_name(&self) -> &str {
        &self.json
    }

    pub fn img_file_path(&self) -> PathBuf {
        self.dir.join(&self.img)
    }

    pub fn md_file_path(&self) -> PathBuf {
        self.dir.join(&self.md)
    }

    pub fn md_content(&self) -> Result<String> {
        let path = self.md_file_path();
        fs::read_to_string(&path)
            .with_context(|| format!("Reading markdown file `{}`", path.display()))
    }

    pub fn json_content(&self) -> Result<String> {
        let path = self.dir.join(&self.json);
        fs::read_to_string(&path)
            .with_context(|| format!("Reading json file `{}`", path.display()))
    }
}

/// Infers a post title from an image filename: camel-case and digit runs in
/// the stem become words. Returns the display title and its slug form.
pub fn infer_blog_title_from_filename(filename: &str) -> (String, String) {
    let stem = Path::new(filename)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let title = infer_blog_title(&stem);
    let title_plain = slug::slugify(&title);
    (title, title_plain)
}

fn infer_blog_title(stem: &str) -> String {
    let words = Regex::new("(^[a-zäüöß]+)|([A-ZÄÜÖ][a-zäüöß,]*)|([0-9,]+)").unwrap();
    let parts: Vec<String> = words
        .find_iter(stem)
        .map(|word| title_case(word.as_str()))
        .collect();
    parts.join(" ")
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

/// The date path segment used in canonical URLs and storage keys, e.g.
/// `2018/3/4/`. Segments are unpadded; existing published URLs depend on
/// that.
pub fn date_path(time: &DateTime<Local>) -> String {
    format!("{}/{}/{}/", time.year(), time.month(), time.day())
}

/// The publication timestamp stored in the DTO, e.g. `2018-3-4 9:5:1`.
pub fn date_string(time: &DateTime<Local>) -> String {
    format!(
        "{}-{}-{} {}:{}:{}",
        time.year(),
        time.month(),
        time.day(),
        time.hour(),
        time.minute(),
        time.second()
    )
}

/// Assembles the page DTO for a new post.
pub struct PageJsonFactory<'a> {
    original_md: &'a str,
    blog_url: String,
    markdown_file_path: PathBuf,
    thumb_url: String,
    medium_url: String,
    created: DateTime<Local>,
}

impl<'a> PageJsonFactory<'a> {
    /// `original_md` is the markdown as the author dropped it (before the
    /// image link is prepended); it feeds the excerpt. `blog_url` is the
    /// base URL new posts are published under.
    pub fn new(
        original_md: &'a str,
        blog_url: &str,
        markdown_file_path: &Path,
        thumb_url: &str,
        medium_url: &str,
    ) -> PageJsonFactory<'a> {
        let mut blog_url = blog_url.to_owned();
        if !blog_url.ends_with('/') {
            blog_url.push('/');
        }
        PageJsonFactory {
            original_md,
            blog_url,
            markdown_file_path: markdown_file_path.to_owned(),
            thumb_url: thumb_url.to_owned(),
            medium_url: medium_url.to_owned(),
            created: Local::now(),
        }
    }

    /// Builds the DTO and the `page{N}.json` filename it should be stored
    /// under. `N` continues the sequence found in `posts_dir`; the DTO id is
    /// offset by 10000 as in the historical export data.
    pub fn dto(
        &self,
        domain: &str,
        title: &str,
        title_plain: &str,
        posts_dir: &Path,
        default_excerpt: &str,
    ) -> Result<(PageDto, String)> {
        let mut url = self.generate_blog_url(title_plain);
        if !url.ends_with('/') {
            url.push('/');
        }

        let number = dto::next_page_number(posts_dir)?;
        let filename = format!("page{}.json", number);

        let md = fs::read_to_string(&self.markdown_file_path).with_context(|| {
            format!(
                "Reading markdown file `{}`",
                self.markdown_file_path.display()
            )
        })?;
        let content = markdown::dto_content(&md);
        let excerpt = markdown::excerpt(
            &markdown::strip_links_and_images(self.original_md),
            default_excerpt,
        );
        let disqus_id = format!("{} {}{}", domain, date_path(&self.created), title);

        let dto = PageDto {
            thumb_img: self.thumb_url.clone(),
            post_img: self.medium_url.clone(),
            filename: filename.clone(),
            post: PostData {
                post_id: 10000 + number,
                date: date_string(&self.created),
                url,
                title: title.to_owned(),
                title_plain: title_plain.to_owned(),
                excerpt,
                content,
                custom_fields: CustomFields {
                    dsq_thread_id: vec![disqus_id],
                },
            },
        };
        Ok((dto, filename))
    }

    fn generate_blog_url(&self, title_plain: &str) -> String {
        format!(
            "{}{}{}",
            self.blog_url,
            date_path(&self.created),
            title_plain
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;

    fn created() -> DateTime<Local> {
        Local.ymd(2018, 3, 4).and_hms(9, 5, 1)
    }

    #[test]
    fn test_infer_blog_title_from_filename() {
        let (title, title_plain) = infer_blog_title_from_filename("ATest29,This.png");
        assert_eq!(title, "A Test 29, This");
        assert_eq!(title_plain, "a-test-29-this");
    }

    #[test]
    fn test_infer_blog_title_starts_lowercase() {
        let (title, _) = infer_blog_title_from_filename("aTest.png");
        assert_eq!(title, "A Test");
    }

    #[test]
    fn test_infer_blog_title_plain_drops_umlauts() {
        let (_, title_plain) = infer_blog_title_from_filename("ATest29äüöß,This.png");
        assert_eq!(title_plain, "a-test-29-this");
    }

    #[test]
    fn test_date_strings() {
        assert_eq!(date_path(&created()), "2018/3/4/");
        assert_eq!(date_string(&created()), "2018-3-4 9:5:1");
    }

    #[test]
    fn test_post_adder_scans_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        for name in &["atthezoo.png", "atthezoo.md", "atthezoo.png.json", "notes.txt"] {
            std::fs::write(dir.path().join(name), "x").unwrap();
        }

        let mut adder = PostAdder::new(dir.path());
        adder.read().unwrap();
        assert_eq!(adder.img_file_name(), "atthezoo.png");
        assert_eq!(adder.md_file_name(), "atthezoo.md");
        assert_eq!(adder.json_file_name(), "atthezoo.png.json");
    }

    #[test]
    fn test_post_adder_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut adder = PostAdder::new(dir.path());
        adder.read().unwrap();
        assert_eq!(adder.img_file_name(), "");
        assert_eq!(adder.md_file_name(), "");
        assert_eq!(adder.json_file_name(), "");
    }

    #[test]
    fn test_generate_blog_url() {
        let mut factory =
            PageJsonFactory::new("", "https://example.org/blog", Path::new("x.md"), "", "");
        factory.created = created();
        assert_eq!(
            factory.generate_blog_url("just-a-test"),
            "https://example.org/blog/2018/3/4/just-a-test",
        );
    }

    #[test]
    fn test_dto_continues_the_page_sequence() {
        let posts = tempfile::tempdir().unwrap();
        let existing = PageDto::default();
        dto::write_page_dto(&existing, posts.path(), "page2.json").unwrap();

        let drop = tempfile::tempdir().unwrap();
        let md_path = drop.path().join("atthezoo.md");
        std::fs::write(&md_path, "A fine day.").unwrap();

        let mut factory = PageJsonFactory::new(
            "A fine day.",
            "https://example.org/blog/",
            &md_path,
            "https://example.org/img/thumb.png",
            "https://example.org/img/medium.png",
        );
        factory.created = created();

        let (dto, filename) = factory
            .dto(
                "example.org",
                "At The Zoo",
                "at-the-zoo",
                posts.path(),
                "default excerpt",
            )
            .unwrap();

        assert_eq!(filename, "page3.json");
        assert_eq!(dto.filename, "page3.json");
        assert_eq!(dto.post.post_id, 10003);
        assert_eq!(dto.post.url, "https://example.org/blog/2018/3/4/at-the-zoo/");
        assert_eq!(dto.post.date, "2018-3-4 9:5:1");
        assert_eq!(dto.post.title, "At The Zoo");
        assert_eq!(dto.post.title_plain, "at-the-zoo");
        assert_eq!(dto.post.excerpt, "A fine day.");
        assert_eq!(dto.post.content, "<p>A fine day.</p>");
        assert_eq!(dto.thumb_img, "https://example.org/img/thumb.png");
        assert_eq!(dto.post_img, "https://example.org/img/medium.png");
        assert_eq!(
            dto.post.custom_fields.dsq_thread_id,
            vec!["example.org 2018/3/4/At The Zoo"],
        );
    }

    #[test]
    fn test_dto_excerpt_falls_back_for_image_only_posts() {
        let posts = tempfile::tempdir().unwrap();
        let drop = tempfile::tempdir().unwrap();
        let md_path = drop.path().join("image-only.md");
        std::fs::write(
            &md_path,
            "[![](https://example.org/m.png)](https://example.org/f.png)",
        )
        .unwrap();

        let factory = PageJsonFactory::new("", "https://example.org/blog", &md_path, "", "");
        let (dto, _) = factory
            .dto("example.org", "T", "t", posts.path(), "the default excerpt")
            .unwrap();
        assert_eq!(dto.post.excerpt, "the default excerpt");
    }
}
