// Server-rendered HTML pages

use handlebars::Handlebars;
use serde::Serialize;

use crate::models::GatewayError;
use crate::storage::StoredName;

pub const FILE_LIST_TEMPLATE: &str = "file_list";

#[derive(Debug, Serialize)]
struct FileListEntry {
    name: String,
    href: String,
    preview: bool,
}

#[derive(Debug, Serialize)]
struct FileListPage {
    files: Vec<FileListEntry>,
}

/// Build the template engine with every page registered.
pub fn build_templates() -> Result<Handlebars<'static>, GatewayError> {
    let mut engine = Handlebars::new();
    engine.set_strict_mode(true);

    engine
        .register_template_string(FILE_LIST_TEMPLATE, include_str!("../templates/file_list.hbs"))
        .map_err(|e| GatewayError::Template(format!("Failed to register template: {}", e)))?;

    Ok(engine)
}

/// Download URL for a stored file; the name is percent-encoded as one path segment.
pub fn download_href(name: &StoredName) -> String {
    format!("/download/{}", urlencoding::encode(name.as_str()))
}

/// Render the listing page. Names are HTML-escaped by the template engine.
pub fn render_file_list(
    engine: &Handlebars<'static>,
    names: &[StoredName],
) -> Result<String, GatewayError> {
    let page = FileListPage {
        files: names
            .iter()
            .map(|name| FileListEntry {
                name: name.to_string(),
                href: download_href(name),
                preview: name.is_image(),
            })
            .collect(),
    };

    Ok(engine.render(FILE_LIST_TEMPLATE, &page)?)
}
