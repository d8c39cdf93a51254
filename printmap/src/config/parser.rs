//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use std::path::PathBuf;
use std::str::FromStr;

use ini::{Ini, Properties};

use super::defaults::clamp_max_parallel;
use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::coord::{MAX_ZOOM, MIN_ZOOM};
use crate::page::{Orientation, PaperSize};

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [wmts] section
    if let Some(section) = ini.section(Some("wmts")) {
        if let Some(v) = section.get("base_url") {
            let v = v.trim();
            if !(v.starts_with("http://") || v.starts_with("https://")) {
                return Err(invalid("wmts", "base_url", v, "must be an http(s) URL"));
            }
            config.wmts.base_url = v.to_string();
        }
        for (key, field) in [
            ("layer", &mut config.wmts.layer),
            ("style", &mut config.wmts.style),
            ("format", &mut config.wmts.format),
            ("tile_matrix_set", &mut config.wmts.tile_matrix_set),
        ] {
            if let Some(v) = section.get(key) {
                let v = v.trim();
                if v.is_empty() {
                    return Err(invalid("wmts", key, v, "must not be empty"));
                }
                *field = v.to_string();
            }
        }
    }

    // [download] section
    if let Some(section) = ini.section(Some("download")) {
        if let Some(v) = parse_number::<u64>(section, "download", "timeout_secs")? {
            if v == 0 {
                return Err(invalid("download", "timeout_secs", "0", "must be at least 1"));
            }
            config.download.timeout_secs = v;
        }
        if let Some(v) = parse_number::<u64>(section, "download", "connect_timeout_secs")? {
            if v == 0 {
                return Err(invalid(
                    "download",
                    "connect_timeout_secs",
                    "0",
                    "must be at least 1",
                ));
            }
            config.download.connect_timeout_secs = v;
        }
        if let Some(v) = parse_number::<usize>(section, "download", "max_parallel")? {
            config.download.max_parallel = clamp_max_parallel(v);
        }
    }

    // [export] section
    if let Some(section) = ini.section(Some("export")) {
        // Unknown codes fall back like they do on the command line
        if let Some(v) = section.get("paper") {
            config.export.paper = PaperSize::from_code(v);
        }
        if let Some(v) = section.get("orientation") {
            config.export.orientation = Orientation::from_code(v);
        }
        if let Some(v) = parse_number::<u32>(section, "export", "dpi")? {
            if v == 0 {
                return Err(invalid("export", "dpi", "0", "must be at least 1"));
            }
            config.export.dpi = v;
        }
        if let Some(v) = parse_number::<i32>(section, "export", "zoom")? {
            if v < MIN_ZOOM as i32 || v > MAX_ZOOM as i32 {
                return Err(invalid(
                    "export",
                    "zoom",
                    &v.to_string(),
                    &format!("must be between {} and {}", MIN_ZOOM, MAX_ZOOM),
                ));
            }
            config.export.zoom = v;
        }
        if let Some(v) = section.get("labels") {
            config.export.labels = parse_bool(v);
        }
        if let Some(v) = parse_number::<f64>(section, "export", "margin")? {
            if !(0.0..=1.0).contains(&v) {
                return Err(invalid(
                    "export",
                    "margin",
                    &v.to_string(),
                    "must be a fraction between 0 and 1",
                ));
            }
            config.export.margin = v;
        }
    }

    // [render] section
    if let Some(section) = ini.section(Some("render")) {
        if let Some(v) = section.get("font_path") {
            let v = v.trim();
            config.render.font_path = if v.is_empty() {
                None
            } else {
                Some(expand_tilde(v))
            };
        }
        if let Some(v) = parse_number::<f32>(section, "render", "font_size")? {
            if !(v.is_finite() && v > 0.0) {
                return Err(invalid(
                    "render",
                    "font_size",
                    &v.to_string(),
                    "must be a positive number",
                ));
            }
            config.render.font_size = v;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.directory = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = v.to_string();
            }
        }
    }

    Ok(config)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Parses an optional numeric key. Empty values count as absent.
fn parse_number<T: FromStr>(
    section: &Properties,
    name: &str,
    key: &str,
) -> Result<Option<T>, ConfigFileError> {
    match section.get(key).map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => v
            .parse()
            .map(Some)
            .map_err(|_| invalid(name, key, v, "must be a number")),
    }
}

/// Parse a boolean value from a config string.
pub(super) fn parse_bool(value: &str) -> bool {
    let v = value.trim().to_lowercase();
    v == "true" || v == "1" || v == "yes" || v == "on"
}

/// Expands a leading `~/` to the home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::*;

    fn parse(text: &str) -> Result<ConfigFile, ConfigFileError> {
        let ini = Ini::load_from_str(text).unwrap();
        parse_ini(&ini)
    }

    fn assert_invalid(text: &str, expected_key: &str) {
        match parse(text) {
            Err(ConfigFileError::InvalidValue { key, .. }) => assert_eq!(key, expected_key),
            other => panic!("expected invalid {}, got {:?}", expected_key, other),
        }
    }

    #[test]
    fn test_empty_is_default() {
        assert_eq!(parse("").unwrap(), ConfigFile::default());
    }

    #[test]
    fn test_partial_config() {
        let config = parse(
            "[wmts]\nlayer = ORTHOIMAGERY.ORTHOPHOTOS\nformat = image/jpeg\n\
             [export]\npaper = a3\norientation = Portrait\ndpi = 150\nlabels = no\n",
        )
        .unwrap();

        assert_eq!(config.wmts.layer, "ORTHOIMAGERY.ORTHOPHOTOS");
        assert_eq!(config.wmts.format, "image/jpeg");
        assert_eq!(config.wmts.style, "normal");
        assert_eq!(config.export.paper, PaperSize::A3);
        assert_eq!(config.export.orientation, Orientation::Portrait);
        assert_eq!(config.export.dpi, 150);
        assert!(!config.export.labels);
        assert_eq!(config.export.zoom, 14);
    }

    #[test]
    fn test_unknown_paper_falls_back() {
        let config = parse("[export]\npaper = letter\norientation = diagonal\n").unwrap();
        assert_eq!(config.export.paper, PaperSize::A4);
        assert_eq!(config.export.orientation, Orientation::Landscape);
    }

    #[test]
    fn test_invalid_values() {
        assert_invalid("[wmts]\nbase_url = ftp://example.com\n", "base_url");
        assert_invalid("[wmts]\nlayer =\n", "layer");
        assert_invalid("[download]\ntimeout_secs = soon\n", "timeout_secs");
        assert_invalid("[download]\nconnect_timeout_secs = 0\n", "connect_timeout_secs");
        assert_invalid("[export]\ndpi = 0\n", "dpi");
        assert_invalid("[export]\nzoom = 20\n", "zoom");
        assert_invalid("[export]\nmargin = 1.5\n", "margin");
        assert_invalid("[render]\nfont_size = -2\n", "font_size");
    }

    #[test]
    fn test_invalid_value_message() {
        let err = parse("[export]\ndpi = lots\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid configuration: export.dpi = 'lots' - must be a number"
        );
    }

    #[test]
    fn test_max_parallel_clamped() {
        let config = parse("[download]\nmax_parallel = 500\n").unwrap();
        assert_eq!(config.download.max_parallel, MAX_MAX_PARALLEL);

        let config = parse("[download]\nmax_parallel = 0\n").unwrap();
        assert_eq!(config.download.max_parallel, MIN_MAX_PARALLEL);

        let config = parse("[download]\nmax_parallel = 12\n").unwrap();
        assert_eq!(config.download.max_parallel, 12);
    }

    #[test]
    fn test_empty_number_keeps_default() {
        let config = parse("[export]\ndpi =\n").unwrap();
        assert_eq!(config.export.dpi, 300);
    }

    #[test]
    fn test_font_path() {
        let config =
            parse("[render]\nfont_path = /usr/share/fonts/a.ttf\nfont_size = 24\n").unwrap();
        assert_eq!(
            config.render.font_path,
            Some(PathBuf::from("/usr/share/fonts/a.ttf"))
        );
        assert_eq!(config.render.font_size, 24.0);

        let config = parse("[render]\nfont_path =\n").unwrap();
        assert_eq!(config.render.font_path, None);
    }

    #[test]
    fn test_expand_tilde() {
        let expanded = expand_tilde("~/fonts/a.ttf");
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expanded, home.join("fonts/a.ttf"));
        }
        assert_eq!(expand_tilde("/abs/path"), PathBuf::from("/abs/path"));
    }

    #[test]
    fn test_parse_bool() {
        for v in ["true", "TRUE", "1", "yes", " on "] {
            assert!(parse_bool(v), "{}", v);
        }
        for v in ["false", "0", "no", "off", ""] {
            assert!(!parse_bool(v), "{}", v);
        }
    }
}
