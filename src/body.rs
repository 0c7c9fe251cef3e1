//! Request and response body types per content type.
use crate::diagnostic::Diagnostics;
use crate::ir::{Member, TsType};
use crate::lower::lower_schema;
use crate::openapi::{Response, Schema};
use crate::options::Options;
use crate::status::StatusCodeSet;

/// Content types with a dedicated mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Json,
    PlainText,
    Multipart,
    FormUrlEncoded,
    OctetStream,
    EventStream,
    Other,
}

impl ContentKind {
    /// Parameters (`; charset=...`) are ignored, `+json` suffixes count as JSON.
    pub fn of(content_type: &str) -> Self {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "application/json" => ContentKind::Json,
            "text/plain" => ContentKind::PlainText,
            "multipart/form-data" => ContentKind::Multipart,
            "application/x-www-form-urlencoded" => ContentKind::FormUrlEncoded,
            "application/octet-stream" => ContentKind::OctetStream,
            "text/event-stream" => ContentKind::EventStream,
            other if other.starts_with("application/") && other.ends_with("+json") => ContentKind::Json,
            _ => ContentKind::Other,
        }
    }
}

/// The `Response` members each variant re-declares with a narrower type.
pub const RESPONSE_ACCESSORS: [&str; 7] = ["ok", "status", "arrayBuffer", "blob", "formData", "json", "text"];

/// Type of `init.body` for one request content type.
pub fn request_body_type(
    content_type: &str,
    schema: Option<&Schema>,
    options: &Options,
    diagnostics: &mut Diagnostics,
) -> TsType {
    match ContentKind::of(content_type) {
        ContentKind::Json => json_string(lower_schema(schema, false, diagnostics).unwrap_or(TsType::UNKNOWN)),
        ContentKind::PlainText => TsType::STRING,
        ContentKind::Multipart => TsType::named("FormData"),
        ContentKind::FormUrlEncoded => match lower_schema(schema, true, diagnostics) {
            Some(fields) => {
                let mut types = vec![TsType::generic("URLSearchParamsString", [fields.clone()])];
                if !options.experimental_url_search_params {
                    types.push(TsType::generic("URLSearchParams", [fields]));
                }
                TsType::union(types)
            }
            None => TsType::named("URLSearchParams"),
        },
        ContentKind::OctetStream => binary_body(),
        ContentKind::EventStream | ContentKind::Other => TsType::named("BodyInit"),
    }
}

/// One union branch per declared content type of `response`, each carrying
/// the `ok`/`status` discriminants of `codes`.
pub fn response_type(codes: &StatusCodeSet, response: &Response, diagnostics: &mut Diagnostics) -> TsType {
    let ok = match codes.ok() {
        Some(ok) => TsType::literal(ok),
        None => TsType::BOOLEAN,
    };
    let status = TsType::union(codes.codes().iter().map(|code| TsType::literal(*code)));
    let head = || vec![Member::property("ok", ok.clone()), Member::property("status", status.clone())];

    if response.content.is_empty() {
        return TsType::Object(head());
    }

    TsType::union(response.content.iter().map(|(content_type, media)| {
        let mut members = head();
        match ContentKind::of(content_type) {
            ContentKind::Json => {
                let ty = lower_schema(media.schema.as_ref(), false, diagnostics).unwrap_or(TsType::UNKNOWN);
                members.push(Member::method("json", promise(ty.clone())));
                members.push(Member::method("text", promise(json_string(ty))));
            }
            ContentKind::PlainText => members.push(Member::method("text", promise(TsType::STRING))),
            ContentKind::Multipart => members.push(Member::method("formData", promise(TsType::named("FormData")))),
            ContentKind::EventStream => members.push(readable_body()),
            ContentKind::OctetStream => {
                members.push(readable_body());
                members.push(Member::method("arrayBuffer", promise(TsType::named("ArrayBuffer"))));
                members.push(Member::method("blob", promise(TsType::named("Blob"))));
            }
            ContentKind::FormUrlEncoded | ContentKind::Other => {}
        }
        TsType::Object(members)
    }))
}

fn json_string(ty: TsType) -> TsType {
    TsType::generic("JSONString", [ty])
}

fn promise(ty: TsType) -> TsType {
    TsType::generic("Promise", [ty])
}

fn binary_body() -> TsType {
    TsType::union([TsType::named("ReadableStream"), TsType::named("Blob"), TsType::named("BufferSource")])
}

fn readable_body() -> Member {
    Member::property("body", TsType::generic("ReadableStream", [TsType::named("Uint8Array")])).readonly()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::{StatusRegistry, expand};
    use serde_json::{Value, json};

    fn schema(value: Value) -> Schema {
        serde_json::from_value(value).unwrap()
    }

    fn request(content_type: &str, value: Option<Value>, options: &Options) -> String {
        let mut diagnostics = Diagnostics::at("test");
        let schema = value.map(schema);
        request_body_type(content_type, schema.as_ref(), options, &mut diagnostics).to_string()
    }

    fn set(key: &str) -> StatusCodeSet {
        expand([(key, ())], StatusRegistry::standard()).unwrap().remove(0).0
    }

    fn response(codes: &StatusCodeSet, value: Value) -> String {
        let response: Response = serde_json::from_value(value).unwrap();
        let mut diagnostics = Diagnostics::at("test");
        response_type(codes, &response, &mut diagnostics).to_string()
    }

    #[test]
    fn content_kinds() {
        assert_eq!(ContentKind::of("application/json; charset=utf-8"), ContentKind::Json);
        assert_eq!(ContentKind::of("application/problem+json"), ContentKind::Json);
        assert_eq!(ContentKind::of("Text/Plain"), ContentKind::PlainText);
        assert_eq!(ContentKind::of("image/png"), ContentKind::Other);
    }

    #[test]
    fn request_bodies() {
        let options = Options::default();
        let pet = json!({"$ref": "#/components/schemas/Pet"});
        assert_eq!(request("application/json", Some(pet), &options), "JSONString<Pet>");
        assert_eq!(request("application/json", None, &options), "JSONString<unknown>");
        assert_eq!(request("text/plain", None, &options), "string");
        assert_eq!(request("multipart/form-data", None, &options), "FormData");
        assert_eq!(
            request("application/octet-stream", None, &options),
            "ReadableStream | Blob | BufferSource"
        );
        assert_eq!(request("image/png", None, &options), "BodyInit");
    }

    #[test]
    fn form_bodies_are_coerced_to_strings() {
        let form = json!({"type": "object", "properties": {"n": {"type": "integer"}}, "required": ["n"]});
        assert_eq!(
            request("application/x-www-form-urlencoded", Some(form.clone()), &Options::default()),
            "URLSearchParamsString<{ n: `${number}` }> | URLSearchParams<{ n: `${number}` }>"
        );
        let experimental = Options { experimental_url_search_params: true, ..Options::default() };
        assert_eq!(
            request("application/x-www-form-urlencoded", Some(form), &experimental),
            "URLSearchParamsString<{ n: `${number}` }>"
        );
        assert_eq!(
            request("application/x-www-form-urlencoded", None, &Options::default()),
            "URLSearchParams"
        );
    }

    #[test]
    fn response_without_content() {
        assert_eq!(response(&set("204"), json!({})), "{ ok: true; status: 204 }");
        assert_eq!(response(&set("404"), json!({})), "{ ok: false; status: 404 }");
    }

    #[test]
    fn json_response() {
        let body = json!({"content": {"application/json": {"schema": {
            "type": "object", "properties": {"name": {"type": "string"}}, "required": ["name"]
        }}}});
        assert_eq!(
            response(&set("200"), body),
            "{ ok: true; status: 200; json(): Promise<{ name: string }>; text(): Promise<JSONString<{ name: string }>> }"
        );
    }

    #[test]
    fn one_branch_per_content_type() {
        let body = json!({"content": {
            "text/plain": {},
            "application/octet-stream": {},
            "text/event-stream": {}
        }});
        assert_eq!(
            response(&set("200"), body),
            "{ ok: true; status: 200; text(): Promise<string> } \
             | { ok: true; status: 200; readonly body: ReadableStream<Uint8Array>; arrayBuffer(): Promise<ArrayBuffer>; blob(): Promise<Blob> } \
             | { ok: true; status: 200; readonly body: ReadableStream<Uint8Array> }"
        );
    }

    #[test]
    fn class_sets_widen_ok() {
        let registry = StatusRegistry::from_codes([200, 201, 400]);
        let sets = expand([("2XX", ()), ("default", ())], &registry).unwrap();
        assert_eq!(response(&sets[0].0, json!({})), "{ ok: true; status: 200 | 201 }");
        assert_eq!(response(&sets[1].0, json!({})), "{ ok: false; status: 400 }");

        let mixed = expand([("default", ())], &registry).unwrap();
        assert_eq!(response(&mixed[0].0, json!({})), "{ ok: boolean; status: 200 | 201 | 400 }");
    }
}
