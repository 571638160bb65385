//! Loads the `blogpub.yaml` project configuration. The file holds a list of
//! site definitions; the tool builds every site in it. Source directories
//! and the deploy target are resolved relative to the directory the config
//! file lives in.

use anyhow::{anyhow, Context as _, Result};
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "blogpub.yaml";

#[derive(Deserialize, Clone, Copy, Debug)]
pub struct PageSize(pub usize);
impl Default for PageSize {
    fn default() -> Self {
        PageSize(10)
    }
}

#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Deploy {
    pub target_dir: String,

    #[serde(default = "default_css_file_name")]
    pub css_file_name: String,

    #[serde(default)]
    pub rss_path: String,

    #[serde(default = "default_rss_filename")]
    pub rss_filename: String,
}

fn default_css_file_name() -> String {
    String::from("styles.css")
}

fn default_rss_filename() -> String {
    String::from("feed.atom")
}

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct DefaultMeta {
    #[serde(default)]
    pub blog_excerpt: String,

    #[serde(default)]
    pub key_words: String,

    #[serde(default)]
    pub subject: String,

    #[serde(default)]
    pub author: String,
}

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct SocialContext {
    #[serde(default)]
    pub twitter_handle: String,

    #[serde(default)]
    pub topic: String,

    #[serde(default)]
    pub tags: String,

    #[serde(default)]
    pub card_type: String,

    #[serde(default)]
    pub section: String,

    #[serde(default)]
    pub fb_page: String,

    #[serde(default)]
    pub twitter_page: String,

    #[serde(default)]
    pub disqus_shortname: String,

    #[serde(default)]
    pub main_links: Vec<NavLink>,

    #[serde(default)]
    pub marginal_links: Vec<NavLink>,
}

/// A configured navigation entry. `external_link` wins over the local
/// `path`/`file_name` pair when set.
#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct NavLink {
    pub label: String,

    #[serde(default)]
    pub path: String,

    #[serde(default)]
    pub file_name: String,

    #[serde(default)]
    pub external_link: String,
}

/// What kind of pages a source directory holds, which decides how the site
/// treats them: `blog` sources get navigation pages and the feed, `marginal`
/// pages are linked from the footer, `home` pages stand alone.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Blog,
    Marginal,
    Home,
}

#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    #[serde(rename = "type")]
    pub variant: Variant,

    /// Directory holding the source's page DTOs, relative to the config
    /// file.
    pub dir: String,

    /// Directory below the document root the source's generated navigation
    /// pages go to.
    #[serde(default)]
    pub sub_dir: String,

    #[serde(default)]
    pub headline: String,
}

#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    pub domain: String,

    /// The site's base URL, e.g. `https://example.org`.
    pub base_path: String,

    #[serde(default)]
    pub home_text: String,

    #[serde(default)]
    pub home_headline: String,

    #[serde(default)]
    pub blog_page_size: PageSize,

    pub deploy: Deploy,

    #[serde(default)]
    pub default_meta: DefaultMeta,

    #[serde(default)]
    pub context: SocialContext,

    #[serde(default)]
    pub src: Vec<Source>,
}

pub struct Config {
    /// Directory the config file was found in.
    pub root: PathBuf,
    pub sites: Vec<SiteConfig>,
}

impl Config {
    /// Looks for the config file in `dir` or the nearest parent directory
    /// holding one.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.exists() {
            Config::from_file(&path)
        } else {
            match dir.parent() {
                Some(parent) => Config::from_directory(parent),
                None => Err(anyhow!(
                    "Could not find `{}` in any parent directory",
                    CONFIG_FILE_NAME
                )),
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Config> {
        let file = File::open(path)
            .with_context(|| format!("Opening config file `{}`", path.display()))?;
        let sites: Vec<SiteConfig> = serde_yaml::from_reader(file)
            .with_context(|| format!("Loading configuration from `{}`", path.display()))?;
        match path.parent() {
            Some(root) => Ok(Config {
                root: root.to_owned(),
                sites,
            }),
            None => Err(anyhow!(
                "Can't get parent directory for config file path `{}`",
                path.display()
            )),
        }
    }
}
