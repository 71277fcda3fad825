#![allow(clippy::expect_used, reason = "Fine in tests")]
use std::{
  fs,
  io::Read,
  path::{Path, PathBuf},
};

use mdepub::{Config, MdepubError, compile};
use tempfile::{TempDir, tempdir};
use zip::ZipArchive;

struct Book {
  dir: TempDir,
}

impl Book {
  fn new() -> Self {
    let dir = tempdir().expect("Failed to create temp dir in test");
    fs::create_dir(dir.path().join("src")).expect("Failed to create source dir");
    fs::create_dir(dir.path().join("out")).expect("Failed to create output dir");
    Self { dir }
  }

  fn source(&self) -> PathBuf {
    self.dir.path().join("src")
  }

  fn output(&self) -> PathBuf {
    self.dir.path().join("out").join("book.epub")
  }

  fn write(&self, relative: &str, content: impl AsRef<[u8]>) -> &Self {
    let path = self.source().join(relative);
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).expect("Failed to create dir in test");
    }
    fs::write(path, content).expect("Failed to write source file in test");
    self
  }

  fn compile(&self) -> Package {
    self.compile_with(&Config::default())
  }

  fn compile_with(&self, config: &Config) -> Package {
    compile(&self.source(), &self.output(), config).expect("compile should succeed");
    Package(self.output())
  }
}

struct Package(PathBuf);

impl Package {
  fn archive(&self) -> ZipArchive<fs::File> {
    let file = fs::File::open(&self.0).expect("Failed to open package");
    ZipArchive::new(file).expect("Failed to read package")
  }

  fn names(&self) -> Vec<String> {
    self.archive().file_names().map(String::from).collect()
  }

  fn has(&self, name: &str) -> bool {
    self.names().iter().any(|n| n == name)
  }

  fn read(&self, name: &str) -> String {
    let mut archive = self.archive();
    let mut entry = archive.by_name(name).expect("Missing package entry");
    let mut content = String::new();
    entry
      .read_to_string(&mut content)
      .expect("Failed to read package entry");
    content
  }

  fn opf(&self) -> String {
    self.read("OEBPS/content.opf")
  }
}

fn slug_after<'a>(haystack: &'a str, marker: &str) -> &'a str {
  let start = haystack.find(marker).expect("marker present") + marker.len();
  &haystack[start..start + 8]
}

#[test]
fn test_single_article() {
  let book = Book::new();
  book.write("intro.md", "---\ntitle: Intro\n---\nHello\n");
  let package = book.compile();

  let page = package.read("OEBPS/intro.xhtml");
  assert!(page.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!DOCTYPE html>"));
  assert!(page.contains("<title>Intro</title>"));
  assert!(page.contains("<p>Hello</p>"));
  assert!(page.contains(r#"xml:lang="en""#));

  let toc = package.read("OEBPS/_toc.xhtml");
  assert_eq!(toc.matches("<li>").count(), 1);
  assert!(toc.contains(r#"<a href="intro.xhtml">Intro</a>"#));
  assert!(toc.contains("<h1>Contents</h1>"));

  let opf = package.opf();
  assert!(opf.contains("<dc:language>en</dc:language>"));
  assert!(opf.contains("<dc:title>Untitled</dc:title>"));
  assert!(opf.contains(r#"<dc:identifier id="uuid">urn:uuid:"#));
  assert!(opf.contains(r#"href="_toc.xhtml" media-type="application/xhtml+xml" properties="nav""#));
  assert!(opf.contains(r#"<itemref idref="item-1"/>"#));
  assert!(opf.contains(r#"<itemref idref="item-2" linear="no"/>"#));
}

#[test]
fn test_articles_cover_and_metadata() {
  let book = Book::new();
  book
    .write("a.md", "---\ntitle: First\n---\nOne\n")
    .write("b.md", "---\ntitle: Second\n---\nTwo\n")
    .write("cover.png", b"\x89PNG\r\n")
    .write("metadata.yaml", "title: Book\nauthor: Jane\n");
  let package = book.compile();

  let opf = package.opf();
  assert!(opf.contains(r#"<dc:title id="title">Book</dc:title>"#));
  assert!(opf.contains("<dc:creator>Jane</dc:creator>"));
  assert!(opf.contains(r#"href="cover.png" media-type="image/png" properties="cover-image""#));
  assert!(opf.contains(r#"<meta name="cover" content="item-3"/>"#));

  assert!(package.has("OEBPS/a.xhtml"));
  assert!(package.has("OEBPS/b.xhtml"));
  assert!(!package.has("OEBPS/metadata.yaml"));

  let toc = package.read("OEBPS/_toc.xhtml");
  assert_eq!(toc.matches("<li>").count(), 2);
  let first = toc.find(r#"href="a.xhtml""#).expect("first entry listed");
  let second = toc.find(r#"href="b.xhtml""#).expect("second entry listed");
  assert!(first < second);
}

#[test]
fn test_hidden_article_is_auxiliary() {
  let book = Book::new();
  book
    .write("a.md", "Main text\n")
    .write("notes.md", "---\ntitle: Notes\nhidden: true\n---\nAside\n");
  let package = book.compile();

  let opf = package.opf();
  assert!(opf.contains(r#"<itemref idref="item-1"/>"#));
  assert!(opf.contains(r#"<itemref idref="item-2" linear="no"/>"#));

  let toc = package.read("OEBPS/_toc.xhtml");
  assert!(toc.contains(r#"<li class="auxiliary"><a href="notes.xhtml">Notes</a></li>"#));
  assert!(toc.contains(r#"<li><a href="a.xhtml">* * *</a></li>"#));
}

#[test]
fn test_declared_nav_replaces_toc() {
  let book = Book::new();
  book
    .write("chapter.md", "---\ntitle: Chapter\n---\nText\n")
    .write(
      "nav.md",
      "---\ntitle: Contents\nproperties: [nav]\n---\n1. [Chapter](chapter.xhtml)\n",
    );
  let package = book.compile();

  assert!(!package.has("OEBPS/_toc.xhtml"));
  let opf = package.opf();
  assert!(opf.contains(r#"href="nav.xhtml" media-type="application/xhtml+xml" properties="nav""#));
  assert_eq!(opf.matches(r#"properties="nav""#).count(), 1);

  let nav = package.read("OEBPS/nav.xhtml");
  assert!(nav.contains(r#"<nav epub:type="toc" id="toc">"#));
  assert!(nav.contains(r#"<a href="chapter.xhtml">Chapter</a>"#));
}

#[test]
fn test_footnote_cross_reference() {
  let book = Book::new();
  book.write("chapter.md", "Text[^1].\n\n[^1]: Note text\n");
  let package = book.compile();

  let page = package.read("OEBPS/chapter.xhtml");
  let marker = slug_after(&page, r##"href="#fn:"##);
  let note = slug_after(&page, r#"<aside id="fn:"#);
  assert_eq!(marker, note);
  assert!(page.contains(r#"epub:type="noteref""#));
  assert!(page.contains("Note text"));
}

#[test]
fn test_first_cover_candidate_wins() {
  let book = Book::new();
  book
    .write("cover.jpg", b"jpeg")
    .write("cover.png", b"png")
    .write("images/cover.gif", b"gif");
  let package = book.compile();

  let opf = package.opf();
  assert_eq!(opf.matches(r#"properties="cover-image""#).count(), 1);
  assert!(opf.contains(r#"href="cover.jpg" media-type="image/jpeg" properties="cover-image""#));
  assert!(opf.contains(r#"href="cover.png" media-type="image/png"/>"#));
  assert!(opf.contains(r#"href="images/cover.gif" media-type="image/gif"/>"#));
}

#[test]
fn test_hidden_and_unknown_files_are_skipped() {
  let book = Book::new();
  book
    .write("a.md", "Text\n")
    .write(".git/notes.md", "Secret\n")
    .write(".draft.md", "Draft\n")
    .write("~backup.md", "Backup\n")
    .write("notes.txt", "plain\n")
    .write("sub/.hidden/deep.md", "Deep\n");
  let package = book.compile();

  let names = package.names();
  let documents = names
    .iter()
    .filter(|name| name.ends_with(".xhtml"))
    .cloned()
    .collect::<Vec<_>>();
  assert_eq!(documents.len(), 2, "unexpected documents: {documents:?}");
  assert!(package.has("OEBPS/a.xhtml"));
  assert!(!names.iter().any(|name| name.contains("notes")));
}

#[test]
fn test_stylesheet_paths_are_relative() {
  let book = Book::new();
  book
    .write("style.css", "body { margin: 0 }\n")
    .write("intro.md", "Intro\n")
    .write("part/one/chapter.md", "Deep\n");
  let package = book.compile();

  assert!(package.read("OEBPS/intro.xhtml").contains(r#"href="style.css""#));
  assert!(
    package
      .read("OEBPS/part/one/chapter.xhtml")
      .contains(r#"href="../../style.css""#)
  );
  assert!(package.read("OEBPS/_toc.xhtml").contains(r#"href="style.css""#));
  assert!(package.opf().contains(r#"href="style.css" media-type="text/css""#));
}

#[test]
fn test_languages() {
  let book = Book::new();
  book
    .write("metadata.json", r#"{"lang": "de", "title": "Buch"}"#)
    .write("a.md", "Text\n")
    .write("b.md", "---\nlanguage: fr\n---\nTexte\n");
  let package = book.compile();

  assert!(package.read("OEBPS/a.xhtml").contains(r#"xml:lang="de""#));
  assert!(package.read("OEBPS/b.xhtml").contains(r#"xml:lang="fr""#));
  assert!(package.read("OEBPS/_toc.xhtml").contains(r#"xml:lang="de""#));
  assert!(package.opf().contains("<dc:language>de</dc:language>"));
}

#[test]
fn test_config_toc_title_and_typography() {
  let book = Book::new();
  book.write("a.md", "\"Quoted\" -- text...\n");
  let config = Config {
    toc_title: "Inhalt".into(),
    typography: false,
    ..Config::default()
  };
  let package = book.compile_with(&config);

  assert!(package.read("OEBPS/_toc.xhtml").contains("<title>Inhalt</title>"));
  assert!(
    package
      .read("OEBPS/a.xhtml")
      .contains(r#"<p>"Quoted" -- text...</p>"#)
  );
}

fn assert_no_output(book: &Book) {
  assert!(!book.output().exists(), "partial package left behind");
  let leftovers = fs::read_dir(book.dir.path().join("out"))
    .expect("Failed to list output dir")
    .count();
  assert_eq!(leftovers, 0, "temporary archive left behind");
}

#[test]
fn test_malformed_front_matter_leaves_no_output() {
  let book = Book::new();
  book
    .write("a.md", "Fine\n")
    .write("b.md", "---\n- not\n- a mapping\n---\nBody\n");
  let result = compile(&book.source(), &book.output(), &Config::default());
  assert!(matches!(result, Err(MdepubError::FrontMatter { .. })));
  assert_no_output(&book);
}

#[test]
fn test_raw_html_is_written_as_xhtml() {
  let book = Book::new();
  book.write(
    "a.md",
    "Line one<br>line two\n\n<img src=\"x.png\" alt=\"x\">\n\n<div>a&nbsp;b</span></div>\n",
  );
  let package = book.compile();

  let page = package.read("OEBPS/a.xhtml");
  assert!(page.contains("<p>Line one<br/>"), "got {page}");
  assert!(page.contains("<div>a\u{a0}b</div>"), "got {page}");
  assert!(!page.contains("&nbsp;"));
  let img = &page[page.find("<img ").expect("image kept")..];
  let img = &img[..img.find('>').expect("image tag closed") + 1];
  assert!(img.ends_with("/>"), "unclosed {img}");
}

#[test]
fn test_file_names_with_spaces_are_encoded() {
  let book = Book::new();
  book
    .write("my chapter.md", "---\ntitle: Spaced\n---\nText\n")
    .write("my pic.png", b"png");
  let package = book.compile();

  assert!(package.has("OEBPS/my chapter.xhtml"));
  assert!(package.has("OEBPS/my pic.png"));

  let opf = package.opf();
  assert!(opf.contains(r#"href="my%20chapter.xhtml""#), "got {opf}");
  assert!(opf.contains(r#"href="my%20pic.png""#), "got {opf}");
  assert!(!opf.contains(r#"href="my "#));

  let toc = package.read("OEBPS/_toc.xhtml");
  assert!(toc.contains(r#"<a href="my%20chapter.xhtml">Spaced</a>"#), "got {toc}");
}

#[test]
fn test_missing_source_directory() {
  let book = Book::new();
  let missing = Path::new("/nonexistent/mdepub/source");
  let result = compile(missing, &book.output(), &Config::default());
  assert!(matches!(result, Err(MdepubError::MissingSource(_))));
  assert_no_output(&book);
}
