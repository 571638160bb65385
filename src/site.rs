//! Assembles whole sites: reads every source's page DTOs, generates the
//! blog's navigation pages, renders all pages through the component stack
//! and writes the result (pages, stylesheet, feed) below the deploy target.
//! One [`SiteCreator`] handles one site; the config may define several.

use crate::bundle;
use crate::config::{Config, NavLink, SiteConfig, Variant};
use crate::dto;
use crate::feed::{self, FeedConfig};
use crate::navi::{self, NaviPage};
use crate::page::Page;
use crate::render::{self, Component, ComponentCollector};
use crate::write::FileContainer;
use anyhow::{Context as _, Result};
use log::debug;
use std::path::Path;

/// A navigation entry as the rendering components consume it.
pub struct NavLocation {
    pub label: String,
    pub url: String,
}

/// Site-level data every rendered page shares.
pub struct Site {
    pub domain: String,
    pub home_url: String,
    pub css_url: String,
    pub rss_url: String,
    pub card_type: String,
    pub section: String,
    pub twitter_handle: String,
    pub twitter_page: String,
    pub fb_page: String,
    pub main_nav: Vec<NavLocation>,
    pub marginal_nav: Vec<NavLocation>,
}

impl Site {
    fn from_config(config: &SiteConfig) -> Site {
        let base = config.base_path.trim_end_matches('/');
        let rss_url = match config.deploy.rss_path.is_empty() {
            true => format!("{}/{}", base, config.deploy.rss_filename),
            false => format!(
                "{}/{}/{}",
                base,
                config.deploy.rss_path.trim_matches('/'),
                config.deploy.rss_filename
            ),
        };

        Site {
            domain: config.domain.clone(),
            home_url: format!("{}/", base),
            css_url: format!("{}/{}", base, config.deploy.css_file_name),
            rss_url,
            card_type: config.context.card_type.clone(),
            section: config.context.section.clone(),
            twitter_handle: config.context.twitter_handle.clone(),
            twitter_page: config.context.twitter_page.clone(),
            fb_page: config.context.fb_page.clone(),
            main_nav: config
                .context
                .main_links
                .iter()
                .map(|link| nav_location(config, link))
                .collect(),
            marginal_nav: config
                .context
                .marginal_links
                .iter()
                .map(|link| nav_location(config, link))
                .collect(),
        }
    }
}

fn nav_location(config: &SiteConfig, link: &NavLink) -> NavLocation {
    if !link.external_link.is_empty() {
        return NavLocation {
            label: link.label.clone(),
            url: link.external_link.clone(),
        };
    }

    let mut path = format!(
        "{}/{}",
        link.path.trim_end_matches('/'),
        link.file_name
    );
    if !path.starts_with('/') {
        path.insert(0, '/');
    }
    NavLocation {
        label: link.label.clone(),
        url: format!("{}{}", config.base_path.trim_end_matches('/'), path),
    }
}

/// Builds every site the config defines.
pub fn update_static_sites(config: &Config) -> Result<()> {
    for site_config in &config.sites {
        debug!("creating site {}", site_config.domain);
        SiteCreator::new(site_config, &config.root).create()?;
    }
    Ok(())
}

/// Migrates every source directory's page DTOs to the current field set.
pub fn update_json_files(config: &Config) -> Result<()> {
    for site_config in &config.sites {
        for src in &site_config.src {
            let dir = config.root.join(&src.dir);
            let count = dto::rewrite_pages(&dir)
                .with_context(|| format!("Migrating pages in `{}`", dir.display()))?;
            debug!("migrated {} pages from {}", count, src.dir);
        }
    }
    Ok(())
}

/// One source directory's pages, plus the navigation pages generated for it.
struct PagesContainer {
    variant: Variant,
    pages: Vec<Page>,
    navi_pages: Vec<Page>,
}

/// Handles the creation of one web site, located under one domain.
pub struct SiteCreator<'a> {
    config: &'a SiteConfig,
    root: &'a Path,
    site: Site,
    containers: Vec<PagesContainer>,
    file_containers: Vec<FileContainer>,
}

impl<'a> SiteCreator<'a> {
    pub fn new(config: &'a SiteConfig, root: &'a Path) -> SiteCreator<'a> {
        SiteCreator {
            config,
            root,
            site: Site::from_config(config),
            containers: Vec::new(),
            file_containers: Vec::new(),
        }
    }

    pub fn create(mut self) -> Result<()> {
        self.add_containers()?;
        self.fill_file_containers()?;
        self.write_files()
    }

    /// Reads the pages of every configured source. Blog sources additionally
    /// get their navigation pages; a marginal source's pages join the
    /// footer navigation of every page rendered afterwards.
    fn add_containers(&mut self) -> Result<()> {
        for src in &self.config.src {
            let dir = self.root.join(&src.dir);
            let dtos = dto::read_pages_from_dir(&dir)
                .with_context(|| format!("Reading pages from `{}`", dir.display()))?;
            debug!("{} page dtos in {}", dtos.len(), src.dir);

            let mut pages = Vec::with_capacity(dtos.len());
            for dto in &dtos {
                pages.push(Page::from_dto(dto, &self.config.domain)?);
            }

            let navi_pages = match src.variant {
                Variant::Blog => self.navi_pages(&pages, &src.sub_dir)?,
                _ => Vec::new(),
            };

            if src.variant == Variant::Marginal {
                for page in &pages {
                    self.site.marginal_nav.push(NavLocation {
                        label: page.title.clone(),
                        url: page.url.clone(),
                    });
                }
            }

            self.containers.push(PagesContainer {
                variant: src.variant,
                pages,
                navi_pages,
            });
        }
        Ok(())
    }

    fn navi_pages(&self, pages: &[Page], sub_dir: &str) -> Result<Vec<Page>> {
        let groups = bundle::bundle(pages, self.config.blog_page_size.0)?;
        let base_path = match sub_dir.is_empty() {
            true => String::from("/"),
            false => format!("/{}/", sub_dir.trim_matches('/')),
        };
        let title = format!("{} Overview", self.config.domain);
        let navi_pages = navi::generate(
            &groups,
            &base_path,
            &title,
            &self.config.default_meta.blog_excerpt,
        );
        Ok(navi_pages
            .into_iter()
            .map(|navi_page| self.navi_page_to_page(navi_page))
            .collect())
    }

    /// Wraps a generated navigation page into a [`Page`] so it flows through
    /// the same rendering and writing as every other page.
    fn navi_page_to_page(&self, navi_page: NaviPage) -> Page {
        let base = self.config.base_path.trim_end_matches('/');
        let url = format!("{}{}{}", base, navi_page.path, navi_page.filename);
        Page {
            id: navi_page.index as u32,
            title: navi_page.title,
            description: navi_page.description,
            content: navi_page.content,
            thumbnail_url: String::new(),
            image_url: String::new(),
            url,
            domain: self.config.domain.clone(),
            published_time: String::new(),
            disqus_id: String::new(),
            fs_path: navi_page.path,
            fs_filename: navi_page.filename,
        }
    }

    /// Renders every page into a file container and adds the stylesheet and
    /// the blog feed.
    fn fill_file_containers(&mut self) -> Result<()> {
        let components: Vec<Box<dyn Component>> = render::components();
        let mut collector = ComponentCollector::new();
        collector.add_components(&components);

        let target = self.root.join(&self.config.deploy.target_dir);
        for container in &self.containers {
            for page in container.pages.iter().chain(container.navi_pages.iter()) {
                self.file_containers.push(FileContainer {
                    path: target.join(page.fs_path.trim_start_matches('/')),
                    filename: page.fs_filename.clone(),
                    data: render::render_page(&self.site, page, &components),
                });
            }
        }

        self.file_containers.push(FileContainer {
            path: target.clone(),
            filename: self.config.deploy.css_file_name.clone(),
            data: collector.css().to_owned(),
        });

        if let Some(blog) = self
            .containers
            .iter()
            .find(|container| container.variant == Variant::Blog)
        {
            let mut buf = Vec::new();
            feed::write_feed(
                FeedConfig {
                    title: self.config.domain.clone(),
                    id: self.site.home_url.clone(),
                    author: match self.config.default_meta.author.is_empty() {
                        true => None,
                        false => Some(self.config.default_meta.author.clone()),
                    },
                    home_page: self.site.home_url.clone(),
                },
                &blog.pages,
                &mut buf,
            )?;
            let rss_dir = match self.config.deploy.rss_path.is_empty() {
                true => target,
                false => target.join(self.config.deploy.rss_path.trim_matches('/')),
            };
            self.file_containers.push(FileContainer {
                path: rss_dir,
                filename: self.config.deploy.rss_filename.clone(),
                data: String::from_utf8(buf)?,
            });
        }
        Ok(())
    }

    fn write_files(&self) -> Result<()> {
        debug!("Number of files to write: {}", self.file_containers.len());
        for file in &self.file_containers {
            debug!(
                "Writing file: {}/{}",
                file.path.display(),
                file.filename
            );
            file.write()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::SiteConfig;

    fn site_config(yaml: &str) -> SiteConfig {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_site_urls_from_config() {
        let config = site_config(
            "\
domain: example.org
basePath: https://example.org/
deploy:
  targetDir: deploy
  rssPath: blog
context:
  mainLinks:
    - label: blog
      path: /blog/
      fileName: index.html
    - label: elsewhere
      externalLink: https://elsewhere.example/
",
        );
        let site = Site::from_config(&config);

        assert_eq!(site.home_url, "https://example.org/");
        assert_eq!(site.css_url, "https://example.org/styles.css");
        assert_eq!(site.rss_url, "https://example.org/blog/feed.atom");
        assert_eq!(site.main_nav[0].url, "https://example.org/blog/index.html");
        assert_eq!(site.main_nav[1].url, "https://elsewhere.example/");
    }

    #[test]
    fn test_nav_path_gets_a_leading_slash() {
        let config = site_config(
            "\
domain: example.org
basePath: https://example.org
deploy:
  targetDir: deploy
context:
  mainLinks:
    - label: about
      path: about
      fileName: index.html
",
        );
        let site = Site::from_config(&config);
        assert_eq!(site.main_nav[0].url, "https://example.org/about/index.html");
    }
}
