//! Fatal errors. Anything that can degrade to an open type does so instead
//! of failing; everything listed here aborts generation.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerateError {
    /// Only same-document pointers (`#/...`) are followed.
    #[error("only references which start with `#/` are supported, got `{0}`")]
    UnsupportedReference(String),

    #[error("reference `{reference}` does not exist (missing `{segment}`)")]
    MissingReference { reference: String, segment: String },

    #[error("reference `{reference}` has hit a nullish part before `{segment}`")]
    NullishReference { reference: String, segment: String },

    #[error("reference `{reference}` has hit a non-traversable part before `{segment}`")]
    NonTraversableReference { reference: String, segment: String },

    /// A `$ref` chain came back to a pointer it already visited.
    #[error("reference cycle detected: {}", chain.join(" -> "))]
    ReferenceCycle { chain: Vec<String> },

    #[error("invalid status code `{code}` for {method} {pattern}")]
    InvalidStatusCode {
        code: String,
        method: String,
        pattern: String,
    },

    #[error("operation is undefined for {method} {pattern}")]
    UndefinedOperation { method: String, pattern: String },

    #[error(
        "no URLs were generated for {path} with the options:\n{options}\n\n\
         You may want to run with one of the following options:\n  \
         --base-urls <URLS>      A comma separated list of custom base urls for paths to start with\n  \
         --include-server-urls   Include server URLs from the schema in the generated paths\n  \
         --include-absolute-url  Include absolute URLs in the generated paths\n  \
         --include-relative-url  Include relative URLs in the generated paths"
    )]
    NoInputUrls { path: String, options: String },

    /// The document (or a resolved part of it) does not have the expected shape.
    #[error("malformed document at JSON path {path}: {message}")]
    MalformedDocument { path: String, message: String },
}

pub type Result<T, E = GenerateError> = std::result::Result<T, E>;
