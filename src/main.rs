use anyhow::{anyhow, Context as _, Result};
use blogpub::command::Command;
use blogpub::compose::{self, PageJsonFactory, PostAdder};
use blogpub::config::{Config, SiteConfig, Variant};
use blogpub::dto;
use blogpub::images::{CommandResize, CommandUpload, ImageManager, ImageUrls};
use blogpub::input::{Choice, Input};
use blogpub::site;
use blogpub::write::FileContainer;
use clap::{App, Arg};
use log::{error, info};
use std::env;
use std::path::{Path, PathBuf};

const UPLOAD_SCRIPT: &str = "blogUpload.pl";
const CLEAR_SCRIPT: &str = "cleardir.pl";
const RESIZE_SCRIPT: &str = "imgresize.pl";
const IMAGE_UPLOAD_SCRIPT: &str = "imgupload.pl";
const DEFAULT_DIR_ENV: &str = "BLOG_DEFAULT_DIR";
const BUCKET_ENV: &str = "AWS_BUCKET";

/// The widths of the published image variants: the in-post image and the
/// navigation thumbnail. The unresized original is published alongside.
const POST_IMAGE_WIDTH: u32 = 800;
const THUMB_IMAGE_WIDTH: u32 = 390;

fn main() -> Result<()> {
    env_logger::init();

    let matches = App::new("blogpub")
        .version(clap::crate_version!())
        .about("Composes blog posts from dropped images and markdown, builds the static site, pushes it out")
        .arg(
            Arg::with_name("img")
                .long("img")
                .help("Generate and upload images, write their URLs next to the image"),
        )
        .arg(
            Arg::with_name("json")
                .long("json")
                .help("Add a page DTO for the dropped post"),
        )
        .arg(
            Arg::with_name("make")
                .long("make")
                .help("Generate the website locally"),
        )
        .arg(
            Arg::with_name("upload")
                .long("upload")
                .help("Upload the generated site"),
        )
        .arg(
            Arg::with_name("clear")
                .long("clear")
                .help("Clear the drop directory"),
        )
        .arg(
            Arg::with_name("rewrite-json")
                .long("rewrite-json")
                .help("Migrate page DTOs to the current field set"),
        )
        .arg(
            Arg::with_name("config")
                .long("config")
                .takes_value(true)
                .value_name("FILE")
                .help("Path to the config file (default: the nearest blogpub.yaml)"),
        )
        .arg(
            Arg::with_name("dir")
                .long("dir")
                .takes_value(true)
                .value_name("DIR")
                .help("The drop directory (default: $BLOG_DEFAULT_DIR)"),
        )
        .get_matches();

    let config = match matches.value_of("config") {
        Some(path) => Config::from_file(Path::new(path))?,
        None => Config::from_directory(&env::current_dir()?)?,
    };
    let drop_dir = matches
        .value_of("dir")
        .map(PathBuf::from)
        .or_else(|| env::var(DEFAULT_DIR_ENV).ok().map(PathBuf::from));

    let flags = ["img", "json", "make", "upload", "clear", "rewrite-json"];
    if flags.iter().any(|flag| matches.is_present(flag)) {
        if matches.is_present("img") {
            add_image(with_drop_dir(&drop_dir)?)?;
        }
        if matches.is_present("json") {
            add_json(&config, with_drop_dir(&drop_dir)?, None)?;
        }
        if matches.is_present("make") {
            site::update_static_sites(&config)?;
        }
        if matches.is_present("upload") {
            upload()?;
        }
        if matches.is_present("clear") {
            clear()?;
        }
        if matches.is_present("rewrite-json") {
            site::update_json_files(&config)?;
        }
        return Ok(());
    }

    enter_interactive_mode(&config, &drop_dir)
}

fn enter_interactive_mode(config: &Config, drop_dir: &Option<PathBuf>) -> Result<()> {
    let choice = configure_actions(config, drop_dir);
    loop {
        choice.ask_user();
    }
}

fn configure_actions<'a>(config: &'a Config, drop_dir: &'a Option<PathBuf>) -> Choice<'a> {
    let mut choice = Choice::new();
    choice.add_action("exit", "Exits the application", || std::process::exit(0));
    choice.add_action("make", "Generate website locally", move || {
        report(site::update_static_sites(config))
    });
    choice.add_action("json", "Add a page DTO for the dropped post", move || {
        report(with_drop_dir(drop_dir).and_then(|dir| add_json(config, dir, None)))
    });
    choice.add_action("upload", "Upload generated html, css and images", || {
        report(upload())
    });
    choice.add_action(
        "img",
        "Generate and upload images, write their URLs next to the image",
        move || report(with_drop_dir(drop_dir).and_then(add_image)),
    );
    choice.add_action(
        "auto",
        "Generate images and page DTO, then build the site",
        move || report(with_drop_dir(drop_dir).and_then(|dir| auto(config, dir))),
    );
    choice.add_action("clear", "Clear the drop directory", || report(clear()));
    choice
}

fn with_drop_dir(drop_dir: &Option<PathBuf>) -> Result<&Path> {
    drop_dir.as_deref().ok_or_else(|| {
        anyhow!(
            "No drop directory: pass --dir or set {}",
            DEFAULT_DIR_ENV
        )
    })
}

fn report(result: Result<()>) {
    if let Err(err) = result {
        error!("{:#}", err);
    }
}

/// Resizes the dropped image to the published widths, uploads every variant
/// and leaves the resulting URLs as `{image}.json` next to the image.
fn add_image(dir: &Path) -> Result<()> {
    let mut adder = PostAdder::new(dir);
    adder.read()?;
    if adder.img_file_name().is_empty() {
        return Err(anyhow!("No image file in `{}`", dir.display()));
    }
    let bucket = env::var(BUCKET_ENV)
        .with_context(|| format!("Reading the {} environment variable", BUCKET_ENV))?;

    let resizer = CommandResize {
        program: RESIZE_SCRIPT.to_owned(),
    };
    let uploader = CommandUpload {
        program: IMAGE_UPLOAD_SCRIPT.to_owned(),
    };
    let mut manager = ImageManager::new(&bucket, &adder.img_file_path(), &resizer, &uploader);
    manager.add_image_size(POST_IMAGE_WIDTH);
    manager.add_image_size(THUMB_IMAGE_WIDTH);
    manager.prepare_images()?;
    manager.upload_images()?;

    let urls = manager.published_urls()?;
    let file = FileContainer {
        path: dir.to_owned(),
        filename: format!("{}.json", adder.img_file_name()),
        data: serde_json::to_string(&urls)?,
    };
    file.write()?;
    info!("published images for {}", adder.img_file_name());
    Ok(())
}

/// Composes the page DTO for the dropped post: prepends the published image
/// to the markdown source (or writes an image-only one), then records the
/// DTO in the blog's posts directory.
fn add_json(config: &Config, dir: &Path, title: Option<(String, String)>) -> Result<()> {
    let mut adder = PostAdder::new(dir);
    adder.read()?;

    let (title, title_plain) = match title {
        Some(pair) => pair,
        None => match adder.img_file_name().is_empty() {
            false => compose::infer_blog_title_from_filename(adder.img_file_name()),
            true => ask_user_for_title()?,
        },
    };

    if adder.json_file_name().is_empty() {
        return Err(anyhow!("No json file in `{}`", dir.display()));
    }
    let urls: ImageUrls = serde_json::from_str(&adder.json_content()?)?;

    let original_md;
    let md_path;
    if adder.md_file_name().is_empty() {
        original_md = String::new();
        md_path = dir.join("image-only.md");
        FileContainer {
            path: dir.to_owned(),
            filename: "image-only.md".to_owned(),
            data: format!("[![]({})]({})", urls.post_img, urls.full_img),
        }
        .write()?;
    } else {
        original_md = adder.md_content()?;
        md_path = adder.md_file_path();
        FileContainer {
            path: dir.to_owned(),
            filename: adder.md_file_name().to_owned(),
            data: format!("[![]({})]({}){}", urls.post_img, urls.full_img, original_md),
        }
        .write()?;
    }

    let (site_config, posts_dir, blog_url) = blog_source(config)?;
    let factory = PageJsonFactory::new(
        &original_md,
        &blog_url,
        &md_path,
        &urls.thumb_img,
        &urls.post_img,
    );
    let (page_dto, filename) = factory.dto(
        &site_config.domain,
        &title,
        &title_plain,
        &posts_dir,
        &site_config.default_meta.blog_excerpt,
    )?;
    dto::write_page_dto(&page_dto, &posts_dir, &filename)?;
    info!("added {}", filename);
    Ok(())
}

/// One-stop publishing: image, DTO and site build in one go. Does nothing
/// when the drop directory holds no image.
fn auto(config: &Config, dir: &Path) -> Result<()> {
    let mut adder = PostAdder::new(dir);
    adder.read()?;
    if adder.img_file_name().is_empty() {
        info!("No image file in drop directory. Nothing to do.");
        return Ok(());
    }
    let title = compose::infer_blog_title_from_filename(adder.img_file_name());
    add_image(dir)?;
    add_json(config, dir, Some(title))?;
    site::update_static_sites(config)
}

fn upload() -> Result<()> {
    println!("Uploading content .. may take a while");
    Command::new(UPLOAD_SCRIPT, &[]).run()
}

fn clear() -> Result<()> {
    Command::new(CLEAR_SCRIPT, &[]).run()
}

fn ask_user_for_title() -> Result<(String, String)> {
    let mut input = Input::new("Enter a title:");
    input.ask_user()?;
    Ok((input.regular().to_owned(), input.sanitized()))
}

/// The first configured blog source: the site it belongs to, its posts
/// directory and the base URL new posts are published under.
fn blog_source(config: &Config) -> Result<(&SiteConfig, PathBuf, String)> {
    for site_config in &config.sites {
        for src in &site_config.src {
            if src.variant == Variant::Blog {
                let posts_dir = config.root.join(&src.dir);
                let base = site_config.base_path.trim_end_matches('/');
                let blog_url = match src.sub_dir.is_empty() {
                    true => format!("{}/", base),
                    false => format!("{}/{}/", base, src.sub_dir.trim_matches('/')),
                };
                return Ok((site_config, posts_dir, blog_url));
            }
        }
    }
    Err(anyhow!("No blog source configured"))
}
