use deft_config::{json_schema, DeftConfig};

#[test]
fn json_schema_lists_synthesis_markers() {
    let schema = json_schema();
    let value = serde_json::to_value(schema).expect("schema serializes");

    let markers = value
        .pointer("/definitions/SynthesisConfig/properties/split_pair_markers")
        .expect("split_pair_markers schema property exists");
    assert_eq!(
        markers.pointer("/items/type").and_then(|v| v.as_str()),
        Some("string")
    );
}

#[test]
fn json_schema_rejects_unknown_synthesis_keys() {
    let schema = json_schema();
    let value = serde_json::to_value(schema).expect("schema serializes");

    let synthesis = value
        .pointer("/definitions/SynthesisConfig")
        .expect("SynthesisConfig definition exists");
    assert_eq!(
        synthesis
            .get("additionalProperties")
            .and_then(|v| v.as_bool()),
        Some(false)
    );
}

#[test]
fn json_schema_documents_char_literal_styles() {
    let schema = json_schema();
    let text = serde_json::to_string(&schema).expect("schema serializes");
    assert!(text.contains("int-cast"), "{text}");
}

#[test]
fn loader_tolerates_keys_the_schema_forbids() {
    let schema = serde_json::to_value(json_schema()).expect("schema serializes");
    assert_eq!(
        schema
            .pointer("/definitions/SynthesisConfig/additionalProperties")
            .and_then(|v| v.as_bool()),
        Some(false)
    );

    let text = "[synthesis]\nsplit_pair_markerz = [\"com.acme.Default\"]\n";
    let config = DeftConfig::load_from_str(text).expect("unknown keys are not fatal");
    assert_eq!(config.synthesis.split_pair_markers, vec!["lombok.Def"]);

    let (_, diagnostics) =
        DeftConfig::load_from_str_with_diagnostics(text).expect("config should parse");
    assert_eq!(diagnostics.unknown_keys, vec!["synthesis.split_pair_markerz"]);
}
