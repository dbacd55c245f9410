use serde::Serialize;
use std::path::Path;

use crate::error::Result;
use crate::scanner::format_size;

use super::DashboardView;

/// Render one page as plain text.
pub fn format_text(view: &DashboardView) -> String {
    let page = view.page();
    let mut output = String::new();

    output.push_str(&format!(
        "Files larger than {} in {}\n",
        view.config,
        view.root.display()
    ));

    let status = if view.from_cache {
        "Cached result"
    } else {
        "Fresh scan"
    };
    output.push_str(&format!(
        "{} | {} file{}\n\n",
        status,
        page.total_items,
        if page.total_items == 1 { "" } else { "s" }
    ));

    if page.items.is_empty() {
        output.push_str(&format!("No files larger than {}.\n", view.config));
        return output;
    }

    for entry in page.items {
        output.push_str(&format!(
            "{:>10}  {}\n",
            format_size(entry.size),
            entry.display_path(&view.root)
        ));
    }

    if page.total_pages > 1 {
        output.push_str(&format!(
            "\nPage {} / {}",
            page.page_number, page.total_pages
        ));
        if page.has_previous() {
            output.push_str(&format!("  prev: --page {}", page.page_number - 1));
        }
        if page.has_next() {
            output.push_str(&format!("  next: --page {}", page.page_number + 1));
        }
        output.push('\n');
    }

    output
}

#[derive(Serialize)]
struct JsonFile<'a> {
    path: &'a Path,
    size: u64,
    size_human: String,
}

#[derive(Serialize)]
struct JsonPage<'a> {
    root: &'a Path,
    threshold: String,
    threshold_bytes: u64,
    from_cache: bool,
    total_items: usize,
    page: usize,
    total_pages: usize,
    page_size: usize,
    files: Vec<JsonFile<'a>>,
}

/// Render one page as JSON.
pub fn format_json(view: &DashboardView, pretty: bool) -> Result<String> {
    let page = view.page();
    let doc = JsonPage {
        root: &view.root,
        threshold: view.config.to_string(),
        threshold_bytes: view.config.threshold_bytes(),
        from_cache: view.from_cache,
        total_items: page.total_items,
        page: page.page_number,
        total_pages: page.total_pages,
        page_size: page.page_size,
        files: page
            .items
            .iter()
            .map(|entry| JsonFile {
                path: &entry.path,
                size: entry.size,
                size_human: format_size(entry.size),
            })
            .collect(),
    };

    let json = if pretty {
        serde_json::to_string_pretty(&doc)?
    } else {
        serde_json::to_string(&doc)?
    };
    Ok(json)
}
