//! OpenAPI 3.x → TypeScript declarations for `fetch`.
//!
//! [`generate`] turns a loaded [`Document`] into a `.d.ts` source file: one
//! global `fetch` overload per (path, method, request content type) and one
//! exported type alias per component schema.
pub mod body;
pub mod case;
pub mod cli;
pub mod components;
pub mod diagnostic;
pub mod error;
pub mod helpers;
pub mod ir;
pub mod jq_exec;
pub mod lower;
pub mod openapi;
pub mod operation;
pub mod options;
pub mod params;
pub mod path_de;
pub mod resolve;
pub mod status;
pub mod writer;

pub use diagnostic::Diagnostic;
pub use error::{GenerateError, Result};
pub use openapi::Document;
pub use options::Options;
pub use writer::{SourceFile, SourceSettings};

use writer::{Import, helper_module, module_header};

/// The declarations of one document plus whatever was worth a warning.
#[derive(Debug)]
pub struct Generated {
    pub file: SourceFile,
    pub diagnostics: Vec<Diagnostic>,
}

impl Generated {
    pub fn render(&self) -> String {
        self.file.render()
    }
}

pub fn generate(document: &Document, options: &Options, settings: &SourceSettings) -> Result<Generated> {
    let url_search_params = if options.experimental_url_search_params {
        "urlsearchparams"
    } else {
        "url_search_params"
    };
    let import = |name: &str, module: &str| Import {
        names: vec![name.to_string()],
        module: helper_module(&settings.import_root, module),
    };

    let mut file = SourceFile {
        header: module_header(&document.spec().info, &settings.generated_at),
        imports: vec![
            import("JSONString", "json"),
            import("TypedHeadersInit", "headers"),
            import("URLSearchParamsString", url_search_params),
        ],
        ..SourceFile::default()
    };

    let mut diagnostics = operation::add_paths(document, options, &mut file.global)?;
    diagnostics.extend(components::add_components(document, &mut file.module));

    Ok(Generated { file, diagnostics })
}
