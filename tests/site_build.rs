//! End-to-end build of a small site: twelve blog posts and one marginal
//! page, checked for the generated navigation pages, the post pages, the
//! stylesheet and the feed.

use blogpub::config::Config;
use blogpub::dto::{self, PageDto};
use blogpub::site;
use std::fs;
use std::path::Path;

const CONFIG: &str = "\
- domain: example.org
  basePath: https://example.org
  deploy:
    targetDir: deploy
    rssPath: blog
  defaultMeta:
    blogExcerpt: Texts and drawings.
    author: Jane Doe
  context:
    twitterHandle: '@example'
    cardType: summary
    section: blog
    mainLinks:
      - label: blog
        path: /blog/
        fileName: index.html
  src:
    - type: blog
      dir: posts
      subDir: blog
    - type: marginal
      dir: pages
";

fn write_post(dir: &Path, number: u32) {
    let mut dto = PageDto::default();
    dto.filename = format!("page{}.json", number);
    dto.thumb_img = format!("https://example.org/img/{}-thumb.png", number);
    dto.post_img = format!("https://example.org/img/{}.png", number);
    dto.post.post_id = 10000 + number;
    dto.post.date = format!("2021-3-{} 9:5:1", number);
    dto.post.url = format!("https://example.org/blog/2021/3/{}/post-{}/", number, number);
    dto.post.title = format!("Post {}", number);
    dto.post.title_plain = format!("post-{}", number);
    dto.post.excerpt = format!("Excerpt {}", number);
    dto.post.content = format!("<p>Content {}</p>", number);
    dto::write_page_dto(&dto, dir, &format!("page{}.json", number)).unwrap();
}

#[test]
fn test_build_site_end_to_end() {
    let root = tempfile::tempdir().unwrap();
    fs::write(root.path().join("blogpub.yaml"), CONFIG).unwrap();

    let posts = root.path().join("posts");
    for number in 1..=12 {
        write_post(&posts, number);
    }

    let mut about = PageDto::default();
    about.post.post_id = 1;
    about.post.title = "About".to_owned();
    about.post.url = "https://example.org/about.html".to_owned();
    about.post.content = "<p>me</p>".to_owned();
    dto::write_page_dto(&about, &root.path().join("pages"), "page1.json").unwrap();

    let config = Config::from_directory(root.path()).unwrap();
    site::update_static_sites(&config).unwrap();

    let deploy = root.path().join("deploy");
    assert!(deploy.join("styles.css").exists());
    assert!(deploy.join("blog").join("index.html").exists());
    assert!(deploy.join("blog").join("index0.html").exists());
    assert!(!deploy.join("blog").join("index1.html").exists());
    assert!(deploy
        .join("blog/2021/3/12/post-12/index.html")
        .exists());
    assert!(deploy.join("about.html").exists());
    assert!(deploy.join("blog").join("feed.atom").exists());

    // The stable index page holds the ten newest posts, newest first.
    let index = fs::read_to_string(deploy.join("blog").join("index.html")).unwrap();
    assert!(index.contains("<h2>Post 12</h2>"));
    assert!(index.contains("<h2>Post 3</h2>"));
    assert!(!index.contains("<h2>Post 2</h2>"));
    assert!(index.find("Post 12").unwrap() < index.find("Post 11").unwrap());
    assert!(index.contains("<title>example.org Overview</title>"));
    assert!(index.contains("background-image: url(https://example.org/img/12-thumb.png)"));

    // The two oldest posts land on the numbered page.
    let index0 = fs::read_to_string(deploy.join("blog").join("index0.html")).unwrap();
    assert!(index0.contains("<h2>Post 2</h2>"));
    assert!(index0.contains("<h2>Post 1</h2>"));
    assert!(!index0.contains("<h2>Post 3</h2>"));

    // The marginal page joins the footer navigation of rendered pages.
    assert!(index.contains(r#"<a href="https://example.org/about.html">About</a>"#));

    // A post page carries its content and social metadata.
    let post = fs::read_to_string(deploy.join("blog/2021/3/12/post-12/index.html")).unwrap();
    assert!(post.contains("<p>Content 12</p>"));
    assert!(post.contains(r#"<meta property="og:title" content="Post 12"/>"#));
    assert!(post.contains(
        r#"<link rel="canonical" href="https://example.org/blog/2021/3/12/post-12/"/>"#
    ));

    let feed = fs::read_to_string(deploy.join("blog").join("feed.atom")).unwrap();
    assert!(feed.contains("<feed"));
    assert!(feed.contains("Post 12"));
}

#[test]
fn test_rebuild_is_idempotent() {
    let root = tempfile::tempdir().unwrap();
    fs::write(root.path().join("blogpub.yaml"), CONFIG).unwrap();
    let posts = root.path().join("posts");
    for number in 1..=3 {
        write_post(&posts, number);
    }
    fs::create_dir_all(root.path().join("pages")).unwrap();

    let config = Config::from_directory(root.path()).unwrap();
    site::update_static_sites(&config).unwrap();
    let index = root.path().join("deploy").join("blog").join("index.html");
    let first = fs::read_to_string(&index).unwrap();

    site::update_static_sites(&config).unwrap();
    let second = fs::read_to_string(&index).unwrap();
    assert_eq!(first, second);
}
