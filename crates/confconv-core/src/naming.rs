//! Destination filename derivation

use crate::config::NamingMode;

/// Derive the destination file name for `file_name`
///
/// In [`NamingMode::Literal`] every occurrence of each source extension
/// token is replaced, wherever it appears: `yaml-configs.yml` becomes
/// `json-configs.json`. In [`NamingMode::Suffix`] only the trailing
/// extension changes; a name without a recognized extension gets the
/// target extension appended.
#[must_use]
pub fn derive_target_name(
    file_name: &str,
    source_extensions: &[&str],
    target_extension: &str,
    mode: NamingMode,
) -> String {
    match mode {
        // Shortest token first; neither token can produce the other.
        NamingMode::Literal => {
            let mut tokens = source_extensions.to_vec();
            tokens.sort_by_key(|ext| ext.len());
            tokens
                .into_iter()
                .fold(file_name.to_string(), |name, ext| name.replace(ext, target_extension))
        }
        NamingMode::Suffix => {
            let stem = source_extensions.iter().find_map(|ext| {
                file_name
                    .strip_suffix(ext)
                    .and_then(|rest| rest.strip_suffix('.'))
            });
            format!("{}.{target_extension}", stem.unwrap_or(file_name))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXTS: &[&str] = &["yaml", "yml"];

    fn literal(name: &str) -> String {
        derive_target_name(name, EXTS, "json", NamingMode::Literal)
    }

    fn suffix(name: &str) -> String {
        derive_target_name(name, EXTS, "json", NamingMode::Suffix)
    }

    #[test]
    fn literal_plain_extensions() {
        assert_eq!(literal("app.yaml"), "app.json");
        assert_eq!(literal("readme.yml"), "readme.json");
    }

    #[test]
    fn literal_replaces_every_occurrence() {
        assert_eq!(literal("yaml-configs.yml"), "json-configs.json");
        assert_eq!(literal("my.yaml.backup.yml"), "my.json.backup.json");
        assert_eq!(literal("ymlyml.yaml"), "jsonjson.json");
    }

    #[test]
    fn literal_order_independent_of_extension_list() {
        for name in ["yaml-configs.yml", "yml.yaml", "a.yamlyml.yml"] {
            assert_eq!(
                literal(name),
                derive_target_name(name, &["yml", "yaml"], "json", NamingMode::Literal)
            );
        }
        assert_eq!(literal("yml.yaml"), "json.json");
    }

    #[test]
    fn suffix_only_touches_extension() {
        assert_eq!(suffix("app.yaml"), "app.json");
        assert_eq!(suffix("readme.yml"), "readme.json");
        assert_eq!(suffix("yaml-configs.yml"), "yaml-configs.json");
        assert_eq!(suffix("my.yaml.backup.yml"), "my.yaml.backup.json");
    }

    #[test]
    fn suffix_without_recognized_extension() {
        assert_eq!(suffix("notes"), "notes.json");
        assert_eq!(suffix("fooyaml"), "fooyaml.json");
    }
}
