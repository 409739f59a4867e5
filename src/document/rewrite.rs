//! Apply resolved media paths to rendered pages.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::document::scanner::{AttributeRole, MediaAttribute, scan_media_attributes};
use crate::models::{Resolution, RewriteReport};
use crate::resolver::MediaPathResolver;

/// Rewrites media attributes of rendered HTML using a [`MediaPathResolver`].
#[derive(Debug, Clone, Copy)]
pub struct PageRewriter<'a> {
  resolver: &'a MediaPathResolver,
}

impl<'a> PageRewriter<'a> {
  /// Create a rewriter borrowing `resolver`.
  pub fn new(resolver: &'a MediaPathResolver) -> Self {
    Self { resolver }
  }

  /// Resolve every media attribute in `html`, returning the updated document and counts.
  ///
  /// Bytes outside rewritten attribute values are preserved exactly.
  pub fn rewrite_html(&self, html: &str, page_path: &str) -> (String, RewriteReport) {
    let preview_attribute = &self.resolver.config().preview_attribute;
    let attributes = scan_media_attributes(html, page_path, preview_attribute);

    let mut report = RewriteReport::default();
    let mut output = String::with_capacity(html.len());
    let mut cursor = 0;

    for attribute in &attributes {
      let resolution = self.resolve(attribute);
      report.record(&resolution);

      let Some(value) = resolution.value() else {
        continue;
      };

      tracing::debug!(
        page = page_path,
        tag = %attribute.tag,
        category = ?resolution.category().map(|category| category.as_str()),
        "updated {} -> {}",
        attribute.value,
        value
      );

      output.push_str(&html[cursor..attribute.span.start]);
      if attribute.quoted {
        output.push_str(value);
      } else {
        output.push('"');
        output.push_str(value);
        output.push('"');
      }
      cursor = attribute.span.end;
    }
    output.push_str(&html[cursor..]);

    tracing::info!(
      page = page_path,
      skipped = report.skipped,
      unresolved = report.unresolved,
      "updated {} media element(s)",
      report.updated
    );

    (output, report)
  }

  /// Rewrite a single rendered page on disk. The file is only written when it changed.
  pub fn rewrite_file(&self, path: &Path, page_path: &str) -> Result<RewriteReport> {
    let html =
      fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let (updated, report) = self.rewrite_html(&html, page_path);

    if report.updated > 0 {
      fs::write(path, updated).with_context(|| format!("failed to write {}", path.display()))?;
    }

    Ok(report)
  }

  /// Rewrite every `*.html` page under `site_root`.
  ///
  /// Running this again over already rewritten pages changes nothing, so it doubles as the
  /// manual refresh entry point.
  pub fn rewrite_site(&self, site_root: &Path) -> Result<RewriteReport> {
    let mut pages = Vec::new();
    collect_html_files(site_root, &mut pages)
      .with_context(|| format!("failed to scan {}", site_root.display()))?;

    let mut total = RewriteReport::default();
    for page in &pages {
      let page_path = page_path_for(site_root, page);
      total.merge(self.rewrite_file(page, &page_path)?);
    }

    tracing::info!(
      pages = pages.len(),
      updated = total.updated,
      skipped = total.skipped,
      unresolved = total.unresolved,
      "site rewrite finished"
    );

    Ok(total)
  }

  fn resolve(&self, attribute: &MediaAttribute) -> Resolution {
    match attribute.role {
      AttributeRole::Source(kind) => {
        self
          .resolver
          .resolve(&attribute.value, kind, &attribute.context)
      }
      AttributeRole::Preview { in_testimonial } => {
        self.resolver.resolve_preview(&attribute.value, in_testimonial)
      }
    }
  }
}

/// Walk `dir` collecting `*.html` files in a stable order. Hidden entries are skipped.
pub fn collect_html_files(dir: &Path, pages: &mut Vec<PathBuf>) -> std::io::Result<()> {
  let mut entries: Vec<_> = fs::read_dir(dir)?.flatten().collect();
  entries.sort_by_key(|entry| entry.file_name());

  for entry in entries {
    let file_name = entry.file_name();
    let name = file_name.to_string_lossy();
    if name.starts_with('.') {
      continue;
    }

    let path = entry.path();
    let file_type = entry.file_type()?;
    if file_type.is_dir() {
      collect_html_files(&path, pages)?;
    } else if file_type.is_file()
      && path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html"))
    {
      pages.push(path);
    }
  }

  Ok(())
}

/// URL path a page is served at, relative to the site root and always `/`-separated.
pub fn page_path_for(site_root: &Path, page: &Path) -> String {
  let relative = page.strip_prefix(site_root).unwrap_or(page);
  format!(
    "/{}",
    relative
      .to_string_lossy()
      .replace('\\', "/")
      .trim_start_matches('/')
  )
}
