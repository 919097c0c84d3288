use super::*;
use proptest::prelude::*;

const SESSION: ProviderGuid = ProviderGuid([
    0x10, 0x32, 0x54, 0x76, 0x98, 0xBA, 0xDC, 0xFE, 0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF,
]);
const ALICE_DN: &str = "/o=Contoso/ou=Exchange Administrative Group/cn=Recipients/cn=alice";

#[test]
fn ephemeral_layout_is_exact() {
    let id = EphemeralEntryId::new(SESSION, DisplayType::DISTLIST, Mid::new(0x1234));
    let bytes = id.encode();

    assert_eq!(bytes.len(), 32);
    assert_eq!(&bytes[..4], &[0x87, 0, 0, 0]);
    assert_eq!(&bytes[4..20], SESSION.as_bytes());
    assert_eq!(&bytes[20..24], &[1, 0, 0, 0]);
    assert_eq!(&bytes[24..28], &[1, 0, 0, 0]);
    assert_eq!(&bytes[28..32], &[0x34, 0x12, 0, 0]);
}

#[test]
fn permanent_layout_is_exact() {
    let id = PermanentEntryId::new(DisplayType::MAILUSER, ALICE_DN).unwrap();
    let bytes = id.encode();

    assert_eq!(bytes.len(), 28 + ALICE_DN.len() + 1);
    assert_eq!(&bytes[..4], &[0, 0, 0, 0]);
    assert_eq!(&bytes[4..20], GUID_NSPI.as_bytes());
    assert_eq!(&bytes[20..24], &[1, 0, 0, 0]);
    assert_eq!(&bytes[28..bytes.len() - 1], ALICE_DN.as_bytes());
    assert_eq!(bytes.last(), Some(&0));
}

#[test]
fn permanent_ids_are_session_independent() {
    let a = PermanentEntryId::new(DisplayType::MAILUSER, ALICE_DN).unwrap();
    let b = PermanentEntryId::new(DisplayType::MAILUSER, ALICE_DN).unwrap();

    assert_eq!(a.encode(), b.encode());
}

#[test]
fn entry_id_dispatches_on_id_type() {
    let eph = EphemeralEntryId::new(SESSION, DisplayType::MAILUSER, Mid::new(0x20));
    let perm = PermanentEntryId::new(DisplayType::MAILUSER, ALICE_DN).unwrap();

    assert_eq!(
        EntryId::decode(&eph.encode()).unwrap(),
        EntryId::Ephemeral(eph)
    );
    assert_eq!(
        EntryId::decode(&perm.encode()).unwrap(),
        EntryId::Permanent(perm)
    );
}

#[test]
fn rejects_wrong_ephemeral_length() {
    let bytes = EphemeralEntryId::new(SESSION, DisplayType::MAILUSER, Mid::new(0x20)).encode();

    let err = EphemeralEntryId::decode(&bytes[..31]).unwrap_err();
    assert_eq!(
        err,
        MalformedIdentifier::InvalidLength {
            len: 31,
            expected: 32
        }
    );
}

#[test]
fn rejects_unknown_id_type() {
    let mut bytes = EphemeralEntryId::new(SESSION, DisplayType::MAILUSER, Mid::new(0x20)).encode();
    bytes[0] = 0x42;

    let err = EntryId::decode(&bytes).unwrap_err();
    assert_eq!(err, MalformedIdentifier::UnknownIdType(0x42));
}

#[test]
fn rejects_non_zero_reserved_bytes() {
    let mut bytes = EphemeralEntryId::new(SESSION, DisplayType::MAILUSER, Mid::new(0x20)).encode();
    bytes[2] = 1;

    let err = EphemeralEntryId::decode(&bytes).unwrap_err();
    assert_eq!(err, MalformedIdentifier::NonZeroReserved);
}

#[test]
fn rejects_wrong_r4() {
    let mut bytes = PermanentEntryId::new(DisplayType::MAILUSER, ALICE_DN)
        .unwrap()
        .encode();
    bytes[20] = 2;

    let err = PermanentEntryId::decode(&bytes).unwrap_err();
    assert_eq!(err, MalformedIdentifier::InvalidR4(2));
}

#[test]
fn rejects_permanent_id_with_session_provider() {
    let mut bytes = PermanentEntryId::new(DisplayType::MAILUSER, ALICE_DN)
        .unwrap()
        .encode();
    bytes[4..20].copy_from_slice(SESSION.as_bytes());

    let err = PermanentEntryId::decode(&bytes).unwrap_err();
    assert_eq!(err, MalformedIdentifier::ForeignProvider);
}

#[test]
fn rejects_missing_terminator() {
    let mut bytes = PermanentEntryId::new(DisplayType::MAILUSER, ALICE_DN)
        .unwrap()
        .encode();
    bytes.pop();

    let err = PermanentEntryId::decode(&bytes).unwrap_err();
    assert_eq!(err, MalformedIdentifier::MissingTerminator);
}

#[test]
fn rejects_embedded_nul_instead_of_truncating() {
    let mut bytes = PermanentEntryId::new(DisplayType::MAILUSER, "/o=a/cn=b")
        .unwrap()
        .encode();
    bytes[30] = 0;

    let err = PermanentEntryId::decode(&bytes).unwrap_err();
    assert_eq!(err, MalformedIdentifier::MissingTerminator);
}

#[test]
fn rejects_non_ascii_dn() {
    let err = PermanentEntryId::new(DisplayType::MAILUSER, "/o=Köln").unwrap_err();
    assert_eq!(err, MalformedIdentifier::NonAscii);
}

#[test]
fn reserved_mids_are_never_assignable() {
    assert!(Mid::BEGINNING_OF_TABLE.is_reserved());
    assert!(Mid::END_OF_TABLE.is_reserved());
    assert!(Mid::new(0x0F).is_reserved());
    assert!(!Mid::FIRST_ASSIGNABLE.is_reserved());
}

#[test]
fn object_type_follows_display_type() {
    assert_eq!(DisplayType::CONTAINER.object_type(), 4);
    assert_eq!(DisplayType::DISTLIST.object_type(), 8);
    assert_eq!(DisplayType::MAILUSER.object_type(), 6);
}

proptest! {
    #[test]
    fn ephemeral_round_trip(guid in any::<[u8; 16]>(), display in any::<u32>(), mid in any::<u32>()) {
        let id = EphemeralEntryId::new(ProviderGuid(guid), DisplayType(display), Mid::new(mid));
        prop_assert_eq!(EphemeralEntryId::decode(&id.encode()).unwrap(), id);
    }

    #[test]
    fn permanent_round_trip(display in any::<u32>(), dn in "/o=[A-Za-z0-9 ]{1,12}(/cn=[A-Za-z0-9._-]{1,24}){0,4}") {
        let id = PermanentEntryId::new(DisplayType(display), dn).unwrap();
        prop_assert_eq!(PermanentEntryId::decode(&id.encode()).unwrap(), id);
    }

    #[test]
    fn decode_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..80)) {
        let _ = EntryId::decode(&bytes);
    }
}
