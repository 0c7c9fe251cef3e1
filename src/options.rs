use serde::Serialize;

/// Generation options. Built once (usually from the command line) and passed
/// by reference through every call; nothing reads options from global state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Options {
    /// Literal base URLs the generated path templates may start with.
    pub base_urls: Vec<String>,
    /// Accept `http(s)://<anything><path>`.
    pub include_absolute_url: bool,
    /// Accept the `servers[].url` entries of the document as prefixes.
    pub include_server_urls: bool,
    /// Accept the bare path.
    pub include_relative_url: bool,
    /// Use the fully typed `URLSearchParamsString` module and drop the
    /// `URLSearchParams<T>` alternative for form bodies.
    #[serde(rename = "experimentalURLSearchParams")]
    pub experimental_url_search_params: bool,
    /// `string | false` in the CLI's terms; `None` is `false`.
    pub experimental_discriminator: Option<String>,
    pub experimental_require_discriminator: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            base_urls: Vec::new(),
            include_absolute_url: false,
            include_server_urls: true,
            include_relative_url: false,
            experimental_url_search_params: false,
            experimental_discriminator: None,
            experimental_require_discriminator: false,
        }
    }
}

impl Options {
    /// Options that only accept relative paths; handy for tests and embedding.
    pub fn relative() -> Self {
        Self {
            include_server_urls: false,
            include_relative_url: true,
            ..Self::default()
        }
    }

    /// Pretty JSON of the options, used in error messages.
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| format!("{self:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_command_line() {
        let options = Options::default();
        assert!(options.include_server_urls);
        assert!(!options.include_relative_url);
        assert!(!options.include_absolute_url);
        assert!(options.base_urls.is_empty());
        assert_eq!(options.experimental_discriminator, None);
    }

    #[test]
    fn serializes_with_camel_case_names() {
        let json = serde_json::to_value(Options::relative()).unwrap();
        assert_eq!(json["includeRelativeUrl"], true);
        assert_eq!(json["includeServerUrls"], false);
        assert_eq!(json["experimentalURLSearchParams"], false);
        assert!(json["experimentalDiscriminator"].is_null());
    }
}
