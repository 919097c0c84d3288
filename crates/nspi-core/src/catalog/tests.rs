use super::*;
use crate::{
    prop::tags,
    test_support::{self, A, B, C, D, E, GAL_ROWS, SALES, SALES_EAST, TEAM},
};
use nspi_config::{ObjectSeed, PropertySeed, SeedValue};

#[test]
fn gal_rows_follow_display_name_collation() {
    let view = test_support::catalog().view();

    assert_eq!(
        view.container_rows(GAL, SortKey::DisplayName),
        Some(&GAL_ROWS[..])
    );
    assert_eq!(view.total_count(GAL), Some(5));
}

#[test]
fn phonetic_rows_use_phonetic_names() {
    let view = test_support::catalog().view();

    assert_eq!(
        view.container_rows(GAL, SortKey::PhoneticDisplayName),
        Some(&[A, E, B, C, D][..])
    );
}

#[test]
fn sub_containers_list_their_members() {
    let view = test_support::catalog().view();

    assert_eq!(
        view.container_rows(SALES, SortKey::DisplayName),
        Some(&[B, D][..])
    );
    assert_eq!(
        view.container_rows(SALES_EAST, SortKey::DisplayName),
        Some(&[D][..])
    );
    assert_eq!(view.container_rows(Mid::new(0x999), SortKey::DisplayName), None);
}

#[test]
fn hidden_objects_resolve_but_are_unlisted() {
    let view = test_support::catalog().view();

    assert!(view.contains(TEAM));
    assert_eq!(view.resolve_dn(&test_support::dn("team")), Some(TEAM));
    assert!(!view
        .container_rows(GAL, SortKey::DisplayName)
        .unwrap()
        .contains(&TEAM));
}

#[test]
fn dn_lookup_ignores_case() {
    let view = test_support::catalog().view();
    let upper = test_support::dn("cclark").to_ascii_uppercase();

    assert_eq!(view.resolve_dn(&upper), Some(C));
    assert_eq!(view.resolve_dn("/o=nowhere"), None);
}

#[test]
fn hierarchy_is_depth_first_with_depths() {
    let view = test_support::catalog().view();
    let containers = view.containers();

    assert_eq!(containers.len(), 2);
    assert_eq!((containers[0].mid, containers[0].depth), (SALES, 0));
    assert_eq!(
        (containers[1].mid, containers[1].depth, containers[1].parent),
        (SALES_EAST, 1, Some(SALES))
    );
    assert_eq!(view.hierarchy_version(), 1);
}

#[test]
fn properties_answer_either_string_width() {
    let view = test_support::catalog().view();

    let narrow = view.property(A, tags::PID_TAG_DISPLAY_NAME);
    let wide = view.property(A, tags::PID_TAG_DISPLAY_NAME.with_type(crate::prop::PropType::String));

    assert_eq!(narrow, wide);
    assert_eq!(narrow.and_then(PropValue::as_text), Some("Adams Alice"));
}

#[test]
fn known_tags_cover_stored_properties() {
    let view = test_support::catalog().view();
    let known = view.known_tags();

    assert!(known.iter().any(|t| t.same_property(tags::PID_TAG_SMTP_ADDRESS)));
    assert!(known.iter().any(|t| t.same_property(tags::PID_TAG_ADDRESS_BOOK_MEMBER)));
    assert!(known.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn extra_seed_properties_take_their_tag_type() {
    let mut seed = test_support::seed();
    seed.objects[0].properties = vec![
        PropertySeed {
            tag: 0x3A4E_0003,
            value: SeedValue::Int(42),
        },
        PropertySeed {
            tag: 0x3A70_1102,
            value: SeedValue::BytesList {
                bytes_list: vec![vec![1, 2]],
            },
        },
    ];
    let view = MemoryCatalog::from_seed(&seed).unwrap().view();

    assert_eq!(
        view.property(A, PropTag::new(0x3A4E_0003)),
        Some(&PropValue::Integer32(42))
    );
    assert_eq!(
        view.property(A, tags::PID_TAG_USER_X509_CERTIFICATE),
        Some(&PropValue::MultiBinary(vec![vec![1, 2]]))
    );
}

#[test]
fn mistyped_seed_property_is_rejected() {
    let mut seed = test_support::seed();
    seed.objects.push(ObjectSeed {
        dn: "/o=x/cn=bad".to_string(),
        display_name: "Bad".to_string(),
        properties: vec![PropertySeed {
            tag: 0x3A4E_0003,
            value: SeedValue::Text("nope".to_string()),
        }],
        ..ObjectSeed::default()
    });

    assert!(MemoryCatalog::from_seed(&seed).is_err());
}

#[test]
fn writes_publish_new_snapshot_without_disturbing_old() {
    let catalog = test_support::catalog();
    let before = catalog.view();

    catalog
        .modify_properties(
            A,
            &[],
            &[TaggedValue::new(
                tags::PID_TAG_USER_X509_CERTIFICATE,
                PropValue::MultiBinary(vec![vec![9]]),
            )],
        )
        .unwrap();

    assert_eq!(before.property(A, tags::PID_TAG_USER_X509_CERTIFICATE), None);
    assert_eq!(
        catalog.view().property(A, tags::PID_TAG_USER_X509_CERTIFICATE),
        Some(&PropValue::MultiBinary(vec![vec![9]]))
    );
}

#[test]
fn link_edits_add_and_remove_dns() {
    let catalog = test_support::catalog();

    catalog
        .modify_links(TEAM, tags::PID_TAG_ADDRESS_BOOK_MEMBER, &[C, A], false)
        .unwrap();
    let members = catalog
        .view()
        .property(TEAM, tags::PID_TAG_ADDRESS_BOOK_MEMBER)
        .cloned();
    assert_eq!(
        members,
        Some(PropValue::MultiString8(vec![
            test_support::dn("aadams"),
            test_support::dn("bbaker"),
            test_support::dn("cclark"),
        ]))
    );

    catalog
        .modify_links(TEAM, tags::PID_TAG_ADDRESS_BOOK_MEMBER, &[A, B, C], true)
        .unwrap();
    assert_eq!(
        catalog
            .view()
            .property(TEAM, tags::PID_TAG_ADDRESS_BOOK_MEMBER),
        None
    );
}

#[test]
fn failed_write_leaves_directory_untouched() {
    let catalog = test_support::catalog();

    let err = catalog
        .modify_links(TEAM, tags::PID_TAG_ADDRESS_BOOK_MEMBER, &[C, Mid::new(0x999)], false)
        .unwrap_err();

    assert_eq!(err.class, crate::error::ErrorClass::NotFound);
    assert_eq!(
        catalog
            .view()
            .property(TEAM, tags::PID_TAG_ADDRESS_BOOK_MEMBER)
            .map(|v| v.text_values().len()),
        Some(2)
    );
}

#[test]
fn collation_orders_case_insensitively_then_ordinally() {
    assert_eq!(collate("apple", "Banana"), Ordering::Less);
    assert_eq!(collate("ABC", "abc"), Ordering::Less);
    assert_eq!(fold("ÄbC"), "äbc");
}
