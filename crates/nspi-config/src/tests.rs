use super::*;

const SAMPLE: &str = r#"
[server]
name = "nspi-test"
code_pages = [1252, 20261]
phonetic_sort = false

[[directory.containers]]
dn = "/guid=00000000000000000000000000000001"
display_name = "All Users"
is_master = true

[[directory.objects]]
dn = "/o=Org/ou=Site/cn=Recipients/cn=alice"
display_name = "Alice"
smtp_address = "alice@example.org"
containers = ["/guid=00000000000000000000000000000001"]

[[directory.objects]]
dn = "/o=Org/ou=Site/cn=Recipients/cn=team"
display_name = "Team"
kind = "dist_list"
members = ["/o=Org/ou=Site/cn=Recipients/cn=alice"]

[[directory.objects.properties]]
tag = 0x3A18001F
value = "Engineering"

[[directory.templates]]
dn = "/o=Org/cn=templates/cn=user"
display_type = 0
template = [1, 2, 3]
"#;

#[test]
fn parses_sample_document() {
    let config = ServerConfig::from_toml_str(SAMPLE).unwrap();

    assert_eq!(config.server.name, "nspi-test");
    assert!(config.server.allow_anonymous);
    assert!(!config.server.phonetic_sort);
    assert_eq!(config.directory.containers.len(), 1);
    assert_eq!(config.directory.objects[1].kind, ObjectKind::DistList);
    assert_eq!(
        config.directory.objects[1].properties[0].value,
        SeedValue::Text("Engineering".to_string())
    );
    assert_eq!(
        config.directory.templates[0].effective_locale(),
        NSPI_DEFAULT_LOCALE
    );
}

#[test]
fn empty_document_uses_defaults() {
    let config = ServerConfig::from_toml_str("").unwrap();

    assert!(config.server.supports_code_page(CP_TELETEX));
    assert!(!config.server.supports_code_page(CP_WINUNICODE));
    assert!(config.directory.objects.is_empty());
}

#[test]
fn rejects_unicode_code_page() {
    let err = ServerConfig::from_toml_str("[server]\ncode_pages = [1200]").unwrap_err();
    assert!(matches!(err, ConfigError::UnicodeCodePage(CP_WINUNICODE)));
}

#[test]
fn rejects_missing_default_locale() {
    let err = ServerConfig::from_toml_str("[server]\nlocales = [1031]").unwrap_err();
    assert!(matches!(err, ConfigError::MissingDefaultLocale(_)));
}

#[test]
fn rejects_zero_limits() {
    let err = ServerConfig::from_toml_str("[server]\nmax_explicit_table = 0").unwrap_err();
    assert!(matches!(
        err,
        ConfigError::ZeroLimit {
            field: "max_explicit_table"
        }
    ));
}

#[test]
fn rejects_duplicate_dn_case_insensitively() {
    let doc = r#"
[[directory.objects]]
dn = "/o=Org/cn=a"
display_name = "A"

[[directory.objects]]
dn = "/O=ORG/CN=A"
display_name = "A again"
"#;
    let err = ServerConfig::from_toml_str(doc).unwrap_err();
    assert!(matches!(err, ConfigError::DuplicateDn { .. }));
}

#[test]
fn rejects_dangling_member_reference() {
    let doc = r#"
[[directory.objects]]
dn = "/o=Org/cn=list"
display_name = "List"
kind = "dist_list"
members = ["/o=Org/cn=ghost"]
"#;
    let err = ServerConfig::from_toml_str(doc).unwrap_err();
    assert!(matches!(err, ConfigError::UnknownReference { .. }));
}

#[test]
fn rejects_unknown_fields() {
    let err = ServerConfig::from_toml_str("[server]\nbogus = 1").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn load_reports_missing_file() {
    let err = ServerConfig::load("/nonexistent/nspi.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}
