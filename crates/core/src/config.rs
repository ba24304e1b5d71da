//! Per-invocation settings resolved from the function environment.

/// Environment variable selecting how the payload is interpreted.
pub const INPUT_MODE_VAR: &str = "input_mode";
/// Environment variable selecting the response shape.
pub const OUTPUT_MODE_VAR: &str = "output_mode";
/// Raw query string forwarded by the function host.
pub const QUERY_VAR: &str = "Http_Query";
/// Query parameter consulted when no explicit output mode is configured.
pub const OUTPUT_QUERY_PARAM: &str = "output";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputMode {
    /// Payload is a URL to download.
    Url,
    /// Payload is the image itself, base64 or raw.
    Local,
}

impl InputMode {
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("url") => Self::Url,
            _ => Self::Local,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputMode {
    Image,
    JsonImage,
    /// Absent, empty or unknown; answered with an empty success body.
    Unrecognized(String),
}

impl OutputMode {
    pub fn parse(value: &str) -> Self {
        match value {
            "image" => Self::Image,
            "json_image" => Self::JsonImage,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    /// Whether the redacted image has to be produced at all.
    pub fn renders_image(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HandlerConfig {
    pub input_mode: InputMode,
    pub output_mode: OutputMode,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            input_mode: InputMode::Local,
            output_mode: OutputMode::Unrecognized(String::new()),
        }
    }
}

impl HandlerConfig {
    /// Combines the raw settings.
    ///
    /// A configured `output_mode`, even an empty one, takes precedence over
    /// the `output` query parameter.
    pub fn resolve(input_mode: Option<&str>, output_mode: Option<&str>, query: Option<&str>) -> Self {
        let output = match output_mode {
            Some(mode) => mode.to_string(),
            None => query.and_then(output_from_query).unwrap_or_default(),
        };
        Self {
            input_mode: InputMode::parse(input_mode),
            output_mode: OutputMode::parse(&output),
        }
    }

    /// Reads the settings from an arbitrary key lookup (e.g. the process
    /// environment).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let input_mode = lookup(INPUT_MODE_VAR);
        let output_mode = lookup(OUTPUT_MODE_VAR);
        let query = lookup(QUERY_VAR);
        Self::resolve(input_mode.as_deref(), output_mode.as_deref(), query.as_deref())
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

/// First `output` value in an `application/x-www-form-urlencoded` query.
fn output_from_query(query: &str) -> Option<String> {
    let query = query.strip_prefix('?').unwrap_or(query);
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == OUTPUT_QUERY_PARAM)
        .map(|(_, value)| value.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    #[rstest]
    #[case(Some("url"), InputMode::Url)]
    #[case(Some("URL"), InputMode::Local)]
    #[case(Some("base64"), InputMode::Local)]
    #[case(Some(""), InputMode::Local)]
    #[case(None, InputMode::Local)]
    fn test_input_mode_parse(#[case] raw: Option<&str>, #[case] expected: InputMode) {
        assert_eq!(InputMode::parse(raw), expected);
    }

    #[rstest]
    #[case("image", OutputMode::Image)]
    #[case("json_image", OutputMode::JsonImage)]
    #[case("json", OutputMode::Unrecognized("json".into()))]
    #[case("", OutputMode::Unrecognized(String::new()))]
    fn test_output_mode_parse(#[case] raw: &str, #[case] expected: OutputMode) {
        assert_eq!(OutputMode::parse(raw), expected);
    }

    #[test]
    fn test_query_param_used_without_explicit_mode() {
        let config = HandlerConfig::resolve(None, None, Some("output=image&x=1"));
        assert_eq!(config.output_mode, OutputMode::Image);
    }

    #[test]
    fn test_explicit_mode_overrides_query() {
        let config = HandlerConfig::resolve(None, Some("json_image"), Some("output=image"));
        assert_eq!(config.output_mode, OutputMode::JsonImage);
    }

    #[test]
    fn test_empty_explicit_mode_still_overrides_query() {
        let config = HandlerConfig::resolve(None, Some(""), Some("output=image"));
        assert_eq!(config.output_mode, OutputMode::Unrecognized(String::new()));
    }

    #[test]
    fn test_query_with_leading_question_mark_and_encoding() {
        let config = HandlerConfig::resolve(None, None, Some("?a=b&output=json%5Fimage"));
        assert_eq!(config.output_mode, OutputMode::JsonImage);
    }

    #[test]
    fn test_nothing_configured() {
        assert_eq!(HandlerConfig::resolve(None, None, None), HandlerConfig::default());
    }

    #[test]
    fn test_from_lookup_reads_all_keys() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("input_mode", "url"),
            ("Http_Query", "output=json_image"),
        ]);
        let config = HandlerConfig::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.input_mode, InputMode::Url);
        assert_eq!(config.output_mode, OutputMode::JsonImage);
    }

    #[test]
    fn test_renders_image() {
        assert!(OutputMode::Image.renders_image());
        assert!(OutputMode::JsonImage.renders_image());
        assert!(!OutputMode::Unrecognized("x".into()).renders_image());
    }
}
