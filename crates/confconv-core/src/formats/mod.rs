//! Document transcoders
//!
//! A transcoder turns the bytes of one source document into the bytes of
//! the equivalent target document. The pipeline only knows the trait; the
//! shipped implementation is [`YamlToJson`].

use crate::error::ConvertResult;
use std::path::Path;

mod yaml;

pub use yaml::YamlToJson;

/// Converts one document between two serialization formats
///
/// Implementations must be stateless: the same transcoder is shared by every
/// worker of a run.
pub trait Transcoder: Send + Sync + 'static {
    /// Recognized source extensions (without dot), long form first
    fn source_extensions(&self) -> &[&str];

    /// Extension token of the produced format (without dot)
    fn target_extension(&self) -> &str;

    /// Convert `input` into the target format
    ///
    /// `path` identifies the document in errors only; it is never read.
    ///
    /// # Errors
    /// - `ConvertError::Transcode` if `input` is not a valid source document
    fn transcode(&self, path: &Path, input: &[u8]) -> ConvertResult<Vec<u8>>;

    /// Check whether a file name carries one of the source extensions
    fn accepts(&self, file_name: &str) -> bool {
        self.source_extensions().iter().any(|ext| {
            file_name
                .strip_suffix(ext)
                .is_some_and(|stem| stem.ends_with('.'))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConvertError;

    struct UpperCase;

    impl Transcoder for UpperCase {
        fn source_extensions(&self) -> &[&str] {
            &["lower"]
        }

        fn target_extension(&self) -> &str {
            "upper"
        }

        fn transcode(&self, path: &Path, input: &[u8]) -> ConvertResult<Vec<u8>> {
            std::str::from_utf8(input)
                .map(|s| s.to_uppercase().into_bytes())
                .map_err(|e| ConvertError::transcode(path, e.to_string()))
        }
    }

    #[test]
    fn accepts_by_extension() {
        let t = UpperCase;

        assert!(t.accepts("notes.lower"));
        assert!(t.accepts("a.b.lower"));
        assert!(!t.accepts("notes.upper"));
        assert!(!t.accepts("notes-lower"));
        assert!(!t.accepts("lower"));
    }

    #[test]
    fn yaml_extensions() {
        let t = YamlToJson;

        assert!(t.accepts("app.yaml"));
        assert!(t.accepts("app.yml"));
        assert!(t.accepts(".yaml"));
        assert!(!t.accepts("app.json"));
        assert!(!t.accepts("app.yaml.bak"));
        assert!(!t.accepts("appyaml"));
        assert_eq!(t.target_extension(), "json");
    }

    #[test]
    fn custom_transcoder_reports_path() {
        let err = UpperCase
            .transcode(Path::new("bad.lower"), &[0xff, 0xfe])
            .unwrap_err();
        assert!(matches!(err, ConvertError::Transcode { .. }));
        assert_eq!(err.path(), Some(Path::new("bad.lower")));
    }
}
