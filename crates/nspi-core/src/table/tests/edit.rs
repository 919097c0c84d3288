use super::{at, open};
use crate::{
    catalog::{CatalogView, ObjectCatalog},
    error::ErrorCode,
    identity::{DisplayType, EphemeralEntryId, Mid, PermanentEntryId, ProviderGuid},
    prop::{PropValue, TaggedValue, tags},
    stat::Stat,
    table::{AddressBookEdit, flags},
    test_support::{self, A, B, C, D, TEAM},
};

fn certificate(bytes: &[u8]) -> TaggedValue {
    TaggedValue::new(
        tags::PID_TAG_USER_X509_CERTIFICATE,
        PropValue::MultiBinary(vec![bytes.to_vec()]),
    )
}

fn permanent(cn: &str) -> Vec<u8> {
    PermanentEntryId::new(DisplayType::MAILUSER, test_support::dn(cn))
        .unwrap()
        .encode()
}

fn members<V: CatalogView>(view: &V) -> Vec<String> {
    match view.property(TEAM, tags::PID_TAG_ADDRESS_BOOK_MEMBER) {
        Some(PropValue::MultiString8(dns)) => dns.clone(),
        None => Vec::new(),
        other => panic!("member list has unexpected form {other:?}"),
    }
}

//
// ModProps
//

#[test]
fn mod_props_replaces_certificates_on_mail_users() {
    let server = test_support::server();
    let session = open(&server);

    session
        .mod_props(0, &at(A), Some(&[]), &[certificate(&[1, 2, 3])])
        .unwrap();
    let view = server.catalog().view();
    assert_eq!(
        view.property(A, tags::PID_TAG_USER_X509_CERTIFICATE),
        Some(&PropValue::MultiBinary(vec![vec![1, 2, 3]]))
    );

    session
        .mod_props(0, &at(A), Some(&[tags::PID_TAG_USER_X509_CERTIFICATE]), &[])
        .unwrap();
    let view = server.catalog().view();
    assert_eq!(view.property(A, tags::PID_TAG_USER_X509_CERTIFICATE), None);
}

#[test]
fn mod_props_rejects_what_it_may_not_change() {
    let server = test_support::server();
    let session = open(&server);
    let renamed = TaggedValue::new(
        tags::PID_TAG_DISPLAY_NAME,
        PropValue::Unicode("Mallory".to_string()),
    );
    let not_a_list = TaggedValue::new(
        tags::PID_TAG_USER_X509_CERTIFICATE,
        PropValue::Binary(vec![1]),
    );

    let cases = [
        (at(A), None, vec![certificate(&[1])], ErrorCode::InvalidParameter),
        (
            at(Mid::new(0x999)),
            Some(&[][..]),
            vec![certificate(&[1])],
            ErrorCode::InvalidParameter,
        ),
        (at(TEAM), Some(&[][..]), vec![certificate(&[1])], ErrorCode::AccessDenied),
        (at(A), Some(&[][..]), vec![renamed], ErrorCode::AccessDenied),
        (
            at(A),
            Some(&[tags::PID_TAG_DISPLAY_NAME][..]),
            Vec::new(),
            ErrorCode::AccessDenied,
        ),
        (at(A), Some(&[][..]), vec![not_a_list], ErrorCode::InvalidParameter),
    ];

    for (stat, remove, row, expected) in cases {
        assert_eq!(session.mod_props(0, &stat, remove, &row), Err(expected));
    }

    let view = server.catalog().view();
    assert_eq!(view.property(A, tags::PID_TAG_USER_X509_CERTIFICATE), None);
    assert_eq!(
        view.property(A, tags::PID_TAG_DISPLAY_NAME),
        Some(&PropValue::Unicode("Adams Alice".to_string()))
    );
}

#[test]
fn mod_props_checks_code_page_first() {
    let server = test_support::server();
    let session = open(&server);
    let stat = Stat {
        code_page: 4242,
        ..at(A)
    };

    assert_eq!(
        session.mod_props(0, &stat, None, &[]),
        Err(ErrorCode::InvalidCodepage)
    );
}

//
// ModLinkAtt
//

#[test]
fn mod_link_att_adds_permanent_targets() {
    let server = test_support::server();
    let session = open(&server);

    session
        .mod_link_att(0, tags::PID_TAG_ADDRESS_BOOK_MEMBER, TEAM, &[permanent("cclark")])
        .unwrap();

    let view = server.catalog().view();
    assert_eq!(
        members(&view),
        [
            test_support::dn("aadams"),
            test_support::dn("bbaker"),
            test_support::dn("cclark"),
        ]
    );
}

#[test]
fn mod_link_att_deletes_with_ephemeral_ids_of_this_session() {
    let server = test_support::server();
    let session = open(&server);
    let own = EphemeralEntryId::new(session.provider_guid(), DisplayType::MAILUSER, A);
    let foreign = EphemeralEntryId::new(ProviderGuid([0x42; 16]), DisplayType::MAILUSER, B);

    session
        .mod_link_att(
            flags::DELETE | 0x100,
            tags::PID_TAG_ADDRESS_BOOK_MEMBER,
            TEAM,
            &[own.encode().to_vec(), foreign.encode().to_vec()],
        )
        .unwrap();

    let view = server.catalog().view();
    assert_eq!(members(&view), [test_support::dn("bbaker")]);
}

#[test]
fn mod_link_att_edits_public_delegates_on_mail_users() {
    let server = test_support::server();
    let session = open(&server);

    session
        .mod_link_att(
            0,
            tags::PID_TAG_ADDRESS_BOOK_PUBLIC_DELEGATES,
            D,
            &[permanent("cclark")],
        )
        .unwrap();

    let view = server.catalog().view();
    assert_eq!(
        view.property(D, tags::PID_TAG_ADDRESS_BOOK_PUBLIC_DELEGATES),
        Some(&PropValue::MultiString8(vec![test_support::dn("cclark")]))
    );
    assert!(view.contains(C));
}

#[test]
fn mod_link_att_rejects_bad_requests_without_changes() {
    let server = test_support::server();
    let session = open(&server);
    let target = [permanent("cclark")];

    assert_eq!(
        session.mod_link_att(0, tags::PID_TAG_DISPLAY_NAME, TEAM, &target),
        Err(ErrorCode::NotFound)
    );
    assert_eq!(
        session.mod_link_att(0, tags::PID_TAG_ADDRESS_BOOK_MEMBER, Mid::new(0x999), &target),
        Err(ErrorCode::InvalidParameter)
    );
    assert_eq!(
        session.mod_link_att(0, tags::PID_TAG_ADDRESS_BOOK_MEMBER, A, &target),
        Err(ErrorCode::AccessDenied)
    );
    assert_eq!(
        session.mod_link_att(
            0,
            tags::PID_TAG_ADDRESS_BOOK_MEMBER,
            TEAM,
            &[permanent("cclark"), vec![0x87, 0, 0]],
        ),
        Err(ErrorCode::GeneralFailure)
    );

    let view = server.catalog().view();
    assert_eq!(
        members(&view),
        [test_support::dn("aadams"), test_support::dn("bbaker")]
    );
}
