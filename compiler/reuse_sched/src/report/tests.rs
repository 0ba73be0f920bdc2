use pretty_assertions::assert_eq;

use super::*;

#[test]
fn appends_missing_fields() {
    let doc = Document::from_json(r#"{"app": "blur", "rattrs": [[0]], "unroll": 16}"#).unwrap();
    let out = emit(
        doc,
        Report {
            num_ops: 1,
            total_distance: 0,
        },
    );
    assert_eq!(
        out.to_json().unwrap(),
        r#"{"app":"blur","rattrs":[[0]],"unroll":16,"num_ops":1,"total_distance":0}"#
    );
}

#[test]
fn overwrites_stale_fields_in_place() {
    let doc =
        Document::from_json(r#"{"total_distance": "stale", "x": null, "num_ops": -4}"#).unwrap();
    let out = emit(
        doc,
        Report {
            num_ops: 3,
            total_distance: 12,
        },
    );
    assert_eq!(
        out.to_json().unwrap(),
        r#"{"total_distance":12,"x":null,"num_ops":3}"#
    );
}

#[test]
fn leaves_other_fields_alone() {
    let text = r#"{"nested": {"b": [1, 2.5, "s"], "a": true}, "aattrs": [[1, 2]]}"#;
    let doc = Document::from_json(text).unwrap();
    let out = emit(doc.clone(), Report::default());
    for key in doc.keys() {
        assert_eq!(out.get(key), doc.get(key), "field {key}");
    }
    assert_eq!(out.len(), doc.len() + 2);
}
