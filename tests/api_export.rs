mod common;

use std::fs;
use tempfile::TempDir;

use cdm_collections::args::{Config, Mode};
use cdm_collections::run;
use common::{ok, status, StubServer};

fn api_config(base_url: &str, output_dir: &std::path::Path) -> Config {
    Config {
        mode: Mode::Api,
        collection_dir: output_dir.join("unused"),
        public_html_dir: output_dir.join("unused"),
        locale: "en_US".to_string(),
        api_url: Some(base_url.to_string()),
        output_dir: output_dir.to_path_buf(),
        field_info: false,
    }
}

#[test]
fn api_listing_writes_two_field_records() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("out");
    let server = StubServer::start(
        vec![(
            "dmGetCollectionList/json",
            ok(r#"[{"alias":"/foo/","name":"Foo Collection"}]"#),
        )],
        1,
    );

    let stats = run(&api_config(&server.base_url, &out)).unwrap();
    server.finish();

    let manifest = fs::read_to_string(out.join("collection_data.tsv")).unwrap();
    assert_eq!(manifest, "foo\tFoo Collection\n");
    assert!(!out.join("foo").exists());
    assert_eq!(stats.records, 1);
}

#[test]
fn api_listing_with_field_info() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("out");
    let server = StubServer::start(
        vec![
            (
                "dmGetCollectionList/json",
                ok(r#"[{"alias":"/p1","name":"One"},{"alias":"/p2","name":"Two"}]"#),
            ),
            ("dmGetCollectionFieldInfo/p1/json", ok(r#"{"fields":[]}"#)),
            ("dmGetCollectionFieldInfo/p2/json", status(404)),
        ],
        3,
    );

    let mut config = api_config(&format!("{}/", server.base_url), &out);
    config.field_info = true;
    run(&config).unwrap();
    server.finish();

    assert_eq!(
        fs::read_to_string(out.join("p1/CDMFIELDINFO.json")).unwrap(),
        r#"{"fields":[]}"#
    );
    assert!(!out.join("p2").exists());
    let manifest = fs::read_to_string(out.join("collection_data.tsv")).unwrap();
    assert_eq!(manifest, "p1\tOne\np2\tTwo\n");
}

#[test]
fn invalid_listing_json_is_fatal() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("out");
    let server = StubServer::start(
        vec![("dmGetCollectionList/json", ok("<html>maintenance</html>"))],
        1,
    );

    let err = run(&api_config(&server.base_url, &out)).unwrap_err();
    server.finish();

    assert!(format!("{:#}", err).contains("Failed to list collections"));
    assert!(!out.join("collection_data.tsv").exists());
}

#[test]
fn failed_listing_request_is_fatal() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("out");
    let server = StubServer::start(vec![("dmGetCollectionList/json", status(503))], 1);

    assert!(run(&api_config(&server.base_url, &out)).is_err());
    server.finish();
}

#[test]
fn unusable_aliases_never_touch_output_root() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("out");
    let server = StubServer::start(
        vec![
            (
                "dmGetCollectionList/json",
                ok(r#"[{"alias":"/","name":"Root"},{"alias":"/../","name":"Up"},{"alias":"/foo/","name":"Foo"}]"#),
            ),
            ("dmGetCollectionFieldInfo/foo/json", ok(r#"{"fields":[]}"#)),
        ],
        2,
    );

    let mut config = api_config(&server.base_url, &out);
    config.field_info = true;
    let stats = run(&config).unwrap();
    let queries = server.finish();

    assert_eq!(
        queries,
        vec!["dmGetCollectionList/json", "dmGetCollectionFieldInfo/foo/json"]
    );
    assert!(!out.join("CDMFIELDINFO.json").exists());
    assert!(!tmp.path().join("CDMFIELDINFO.json").exists());
    assert!(out.join("foo/CDMFIELDINFO.json").is_file());
    assert_eq!(
        fs::read_to_string(out.join("collection_data.tsv")).unwrap(),
        "foo\tFoo\n"
    );
    assert_eq!(stats.records, 1);
}
