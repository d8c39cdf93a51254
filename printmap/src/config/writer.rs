//! INI serialization logic for converting `ConfigFile` → INI string.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let font_path = config
        .render
        .font_path
        .as_ref()
        .map(|p| path_to_string(p))
        .unwrap_or_default();

    format!(
        r#"[wmts]
; WMTS endpoint serving the base map (GetTile, KVP encoding)
base_url = {}
; Layer identifier, e.g. GEOGRAPHICALGRIDSYSTEMS.PLANIGNV2 or ORTHOIMAGERY.ORTHOPHOTOS
layer = {}
style = {}
; Tile image format: image/png or image/jpeg
format = {}
; Web Mercator tile matrix set
tile_matrix_set = {}

[download]
; Per-request timeout in seconds
timeout_secs = {}
; Connection timeout in seconds
connect_timeout_secs = {}
; Concurrent tile downloads (1-64)
max_parallel = {}

[export]
; Paper size: A3 or A4
paper = {}
; Orientation: portrait or landscape
orientation = {}
dpi = {}
; Base map zoom level (0-19)
zoom = {}
; Draw territory names
labels = {}
; Margin around the territories as a fraction of their extent
margin = {}

[render]
; TrueType font for labels (empty = built-in DejaVu Sans)
font_path = {}
; Label size in pixels
font_size = {}

[logging]
directory = {}
file = {}
"#,
        config.wmts.base_url,
        config.wmts.layer,
        config.wmts.style,
        config.wmts.format,
        config.wmts.tile_matrix_set,
        config.download.timeout_secs,
        config.download.connect_timeout_secs,
        config.download.max_parallel,
        config.export.paper,
        config.export.orientation,
        config.export.dpi,
        config.export.zoom,
        config.export.labels,
        config.export.margin,
        font_path,
        config.render.font_size,
        path_to_string(&config.logging.directory),
        config.logging.file,
    )
}

fn path_to_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
