use std::path::{Path, PathBuf};

use chrono::{TimeZone, Utc};
use clap::Parser;
use fetchtype::cli::{CommandLineInterface, load_document};
use fetchtype::helpers;
use fetchtype::{Document, GenerateError, Options, SourceSettings, generate};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn settings() -> SourceSettings {
    SourceSettings {
        import_root: "./fetchtype".to_string(),
        generated_at: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
    }
}

fn render(name: &str, options: &Options) -> String {
    let value = load_document(&fixture(name).to_string_lossy()).unwrap();
    let document = Document::from_value(value).unwrap();
    generate(&document, options, &settings()).unwrap().render()
}

#[test]
fn json_and_yaml_documents_generate_the_same_output() {
    let options = Options::default();
    assert_eq!(render("petstore.json", &options), render("petstore.yaml", &options));
}

#[test]
fn header_and_imports() {
    let source = render("petstore.json", &Options::default());
    assert!(source.starts_with(
        "// This file was automatically generated by fetchtype at 2024-01-02T03:04:05.000Z\n\n/**\n * # Swagger Petstore\n"
    ));
    assert!(source.contains(" * @version 1.0.0\n * @license MIT\n * @module\n */\n"));
    assert!(source.contains("import type { JSONString } from \"./fetchtype/types/json\";\n"));
    assert!(source.contains("import type { TypedHeadersInit } from \"./fetchtype/types/headers\";\n"));
    assert!(source.contains("import type { URLSearchParamsString } from \"./fetchtype/types/url_search_params\";\n"));
}

#[test]
fn shipped_helpers_export_every_imported_name() {
    let value = load_document(&fixture("petstore.json").to_string_lossy()).unwrap();
    let document = Document::from_value(value).unwrap();
    for experimental in [false, true] {
        let options = Options { experimental_url_search_params: experimental, ..Options::default() };
        let generated = generate(&document, &options, &settings()).unwrap();
        assert_eq!(generated.file.imports.len(), 3);
        for import in &generated.file.imports {
            let name = import.module.rsplit('/').next().unwrap();
            let module = helpers::find(name).unwrap_or_else(|| panic!("no helper module {name}"));
            for export in &import.names {
                assert!(module.exports(export), "{name} does not export {export}");
            }
        }
    }
}

#[test]
fn operations_become_global_fetch_overloads() {
    let source = render("petstore.json", &Options::default());
    assert!(source.contains("declare global {\n"));
    assert_eq!(source.matches("  function fetch(").count(), 3);
    assert!(source.contains(
        "input: `https://petstore.example.com/v1/pets${`?${URLSearchParamsString<{ limit?: `${number}` }>}` | \"\"}`, \
         init?: Omit<RequestInit, \"method\" | \"body\"> & { method?: \"GET\" }"
    ));
    assert!(source.contains(
        "init: Omit<RequestInit, \"method\" | \"body\" | \"headers\"> & { method: \"POST\"; body: JSONString<Pet>; \
         headers: TypedHeadersInit<{ \"Content-Type\": \"application/json\" }> }"
    ));
    assert!(source.contains("input: `https://petstore.example.com/v1/pets/${string}`"));
    assert!(source.contains("{ ok: true; status: 201 }"));
    assert!(source.contains("{ ok: true; status: 200; json(): Promise<Pets>; text(): Promise<JSONString<Pets>> }"));
    assert!(source.contains("   * @summary List all pets\n"));
}

#[test]
fn class_keys_expand_to_registered_codes() {
    let source = render("petstore.json", &Options::default());
    assert!(source.contains(
        "{ ok: false; status: 400 | 401 | 402 | 403 | 404 | 405 | 406 | 407 | 408 | 409 | 410 | 411 | 412 | 413 \
         | 414 | 415 | 416 | 417 | 418 | 421 | 422 | 423 | 424 | 425 | 426 | 428 | 429 | 431 | 451; \
         json(): Promise<Error>; text(): Promise<JSONString<Error>> }"
    ));
}

#[test]
fn components_become_exported_aliases() {
    let source = render("petstore.json", &Options::default());
    assert!(source.contains(
        "\n/**\n * @example {\n *   \"id\": 1,\n *   \"name\": \"Rex\"\n * }\n */\n\
         export type Pet = { id: number; name: string; tag?: string | null };\n"
    ));
    assert!(source.contains("\nexport type Pets = Pet[];\n"));
    assert!(source.ends_with("export type Error = { code: number; message: string };\n"));
}

#[test]
fn relative_only_options() {
    let source = render("petstore.yaml", &Options::relative());
    assert!(source.contains("input: `/pets/${string}`"));
    assert!(!source.contains("petstore.example.com/v1/pets"));
}

#[test]
fn missing_input_forms_fail_generation() {
    let value = load_document(&fixture("petstore.json").to_string_lossy()).unwrap();
    let document = Document::from_value(value).unwrap();
    let options = Options { include_server_urls: false, ..Options::default() };
    let error = generate(&document, &options, &settings()).unwrap_err();
    assert!(matches!(error, GenerateError::NoInputUrls { .. }));
}

#[test]
fn loads_documents_through_temporary_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("api.yaml");
    std::fs::write(&path, "openapi: 3.1.0\ninfo:\n  title: Tiny\n  version: '1'\npaths: {}\n").unwrap();

    let plain = load_document(&path.to_string_lossy()).unwrap();
    let url = load_document(&format!("file://{}", path.display())).unwrap();
    assert_eq!(plain, url);
    assert_eq!(plain["info"]["title"], "Tiny");

    assert!(load_document(&dir.path().join("missing.json").to_string_lossy()).is_err());
}

#[test]
fn command_line_writes_the_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("generated/petstore.d.ts");
    let cli = CommandLineInterface::try_parse_from([
        "fetchtype".to_string(),
        fixture("petstore.yaml").to_string_lossy().into_owned(),
        "--output".to_string(),
        output.to_string_lossy().into_owned(),
        "--include-relative-url".to_string(),
        "--jq-expr".to_string(),
        ".components.schemas = {}".to_string(),
        "--emit-helpers".to_string(),
        dir.path().join("generated/fetchtype").to_string_lossy().into_owned(),
    ])
    .unwrap();
    cli.run().unwrap();

    let source = std::fs::read_to_string(&output).unwrap();
    assert!(source.contains("declare global {"));
    assert!(source.contains("`/pets/${string}`"));
    assert!(!source.contains("export type"));

    let types_dir = dir.path().join("generated/fetchtype/types");
    for module in &helpers::HELPER_MODULES {
        assert!(types_dir.join(format!("{}.ts", module.name)).is_file());
    }
}
