use pretty_assertions::assert_eq;
use relay_core::{extract_content, FieldPath, PayloadShape};
use serde_json::{json, Value};

#[test]
fn string_payload_is_returned_verbatim() {
    for text in ["A", "hello world", "  padded  ", "ünïcødé"] {
        assert_eq!(extract_content(&Value::String(text.to_string())), text);
    }
}

#[test]
fn falsy_and_bare_scalars_are_empty() {
    for payload in [json!(null), json!(false), json!(0), json!(""), json!(true), json!(42)] {
        assert_eq!(extract_content(&payload), "", "payload {payload}");
    }
}

#[test]
fn empty_object_yields_empty_string() {
    assert_eq!(extract_content(&json!({})), "");
}

#[test]
fn wrapped_string_payload_wins_over_everything() {
    let payload = json!({ "payload": "outer", "content": "inner", "message": "m" });
    assert_eq!(PayloadShape::classify(&payload), PayloadShape::WrappedText("outer"));
    assert_eq!(extract_content(&payload), "outer");
}

#[test]
fn payload_content_beats_root_content() {
    let payload = json!({ "payload": { "content": "nested" }, "content": "root" });
    assert_eq!(extract_content(&payload), "nested");
}

#[test]
fn root_content_is_used_when_no_higher_field() {
    let payload = json!({ "content": "c", "message": "m", "text": "t" });
    assert_eq!(extract_content(&payload), "c");
}

#[test]
fn message_ranks_above_text() {
    let payload = json!({ "message": "B", "text": "T" });
    let shape = PayloadShape::classify(&payload);
    assert!(matches!(
        shape,
        PayloadShape::Field {
            path: FieldPath::Message,
            ..
        }
    ));
    assert_eq!(extract_content(&payload), "B");

    let wrapped = json!({ "payload": { "message": "pm", "text": "pt" }, "text": "t" });
    assert_eq!(extract_content(&wrapped), "pm");
}

#[test]
fn text_fields_follow_message_fields() {
    assert_eq!(extract_content(&json!({ "payload": { "text": "pt" }, "text": "t" })), "pt");
    assert_eq!(extract_content(&json!({ "text": "t" })), "t");
}

#[test]
fn payload_data_string_or_content() {
    assert_eq!(extract_content(&json!({ "payload": { "data": "raw" } })), "raw");
    assert_eq!(
        extract_content(&json!({ "payload": { "data": { "content": "deep" } } })),
        "deep"
    );
}

#[test]
fn payload_data_without_content_stops_the_search() {
    let payload = json!({
        "payload": { "data": { "other": 1 } },
        "dataChunk": { "chunk": { "content": "never" } }
    });
    assert!(matches!(PayloadShape::classify(&payload), PayloadShape::WrappedData(_)));
    assert_eq!(extract_content(&payload), "");
}

#[test]
fn data_chunk_content_is_extracted() {
    assert_eq!(
        extract_content(&json!({ "dataChunk": { "chunk": { "content": "hello" } } })),
        "hello"
    );
    assert_eq!(
        extract_content(&json!({ "payload": { "dataChunk": { "chunk": { "content": "x" } } } })),
        "x"
    );
}

#[test]
fn root_data_chunk_beats_wrapped_data_chunk() {
    let payload = json!({
        "dataChunk": { "chunk": { "content": "root" } },
        "payload": { "dataChunk": { "chunk": { "content": "wrapped" } } }
    });
    assert_eq!(extract_content(&payload), "root");
}

#[test]
fn null_fields_count_as_absent() {
    let payload = json!({ "content": null, "message": "m" });
    assert_eq!(extract_content(&payload), "m");
}

#[test]
fn non_string_field_values_render_as_json() {
    assert_eq!(extract_content(&json!({ "content": 7 })), "7");
    assert_eq!(extract_content(&json!({ "message": true })), "true");
    assert_eq!(extract_content(&json!({ "text": { "a": [1, 2] } })), r#"{"a":[1,2]}"#);
}

#[test]
fn float_field_values_print_like_plain_numbers() {
    assert_eq!(extract_content(&json!({ "content": 1.0 })), "1");
    assert_eq!(extract_content(&json!({ "content": 2.5 })), "2.5");
    assert_eq!(extract_content(&json!({ "message": -3.0 })), "-3");
}

#[test]
fn unrecognised_payload_object_is_serialized() {
    let payload = json!({ "payload": { "status": [1, 2] } });
    assert!(matches!(PayloadShape::classify(&payload), PayloadShape::Opaque(_)));
    assert_eq!(extract_content(&payload), r#"{"status":[1,2]}"#);
    assert_eq!(extract_content(&json!({ "payload": {} })), "{}");
}

#[test]
fn nested_search_finds_text_under_known_keys() {
    let payload = json!({ "envelope": { "body": { "text": "found" } } });
    assert!(matches!(PayloadShape::classify(&payload), PayloadShape::Nested(_)));
    assert_eq!(extract_content(&payload), "found");
}

#[test]
fn nested_search_reads_root_data_string() {
    assert_eq!(extract_content(&json!({ "data": "root data" })), "root data");
}

#[test]
fn nested_search_prefers_content_over_data_at_the_same_node() {
    let payload = json!({ "wrapper": { "data": "d", "content": "c" } });
    assert_eq!(extract_content(&payload), "c");
}

#[test]
fn nested_search_visits_siblings_in_key_order() {
    let payload = json!({
        "zeta": { "message": "last" },
        "alpha": { "message": "first" },
        "mid": { "message": "middle" }
    });
    assert_eq!(extract_content(&payload), "first");
}

#[test]
fn nested_search_skips_empty_hits_and_walks_arrays() {
    let payload = json!({
        "a": { "content": "" },
        "b": [ 1, { "nothing": true }, { "data": "from array" } ]
    });
    assert_eq!(extract_content(&payload), "from array");
    assert_eq!(extract_content(&json!([{ "text": "in list" }])), "in list");
}

#[test]
fn nested_search_ignores_non_string_hits() {
    let payload = json!({ "outer": { "data": { "n": 1 } } });
    assert_eq!(extract_content(&payload), "");
}
