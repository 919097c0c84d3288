use nspi::{
    ErrorKind, ErrorOrigin,
    core::obs::{Method, MetricsEvent, MetricsSink, with_metrics_sink},
    prelude::*,
};
use proptest::prelude::*;
use std::{cell::RefCell, rc::Rc};

const DIRECTORY: &str = r#"
[server]
name = "integration"

[[directory.containers]]
dn = "/guid=00000000000000000000000000000e0e"
display_name = "Engineering"

[[directory.objects]]
dn = "/o=Org/ou=Site/cn=Recipients/cn=alice"
display_name = "Alice Archer"
account = "alice"
smtp_address = "alice@example.org"
containers = ["/guid=00000000000000000000000000000e0e"]

[[directory.objects]]
dn = "/o=Org/ou=Site/cn=Recipients/cn=bob"
display_name = "Bob Brown"
account = "bob"
containers = ["/guid=00000000000000000000000000000e0e"]

[[directory.objects]]
dn = "/o=Org/ou=Site/cn=Recipients/cn=carol"
display_name = "carol Chen"
account = "carol"

[[directory.objects.properties]]
tag = 0x3A180102
value = { bytes = [1, 2] }

[[directory.objects]]
dn = "/o=Org/ou=Site/cn=Recipients/cn=team"
display_name = "Team"
kind = "dist_list"
hidden = true
members = ["/o=Org/ou=Site/cn=Recipients/cn=alice"]
"#;

const ENGINEERING: Mid = Mid::new(0x10);
const ALICE: Mid = Mid::new(0x11);
const BOB: Mid = Mid::new(0x12);
const CAROL: Mid = Mid::new(0x13);
const TEAM: Mid = Mid::new(0x14);

fn server() -> Server {
    nspi::from_toml_str(DIRECTORY).unwrap()
}

fn display_names(rows: &[PropertyRow]) -> Vec<String> {
    rows.iter()
        .filter_map(|row| row.value_of(tags::PID_TAG_DISPLAY_NAME))
        .filter_map(|value| value.as_text().map(str::to_string))
        .collect()
}

#[test]
fn browse_then_resolve_then_edit() {
    let server = server();
    let binding = server.bind(0, &Stat::default(), true).unwrap();
    let session = server.session(binding.handle).unwrap();

    // The GAL collates case-insensitively.
    let mut stat = Stat::default();
    let rows = session.query_rows(0, &mut stat, None, 10, None).unwrap();
    assert_eq!(
        display_names(&rows),
        ["Alice Archer", "Bob Brown", "carol Chen"]
    );
    assert_eq!(stat.current_rec, Mid::END_OF_TABLE);

    // Sub-container browse.
    let mut stat = Stat {
        container_id: ENGINEERING,
        ..Stat::default()
    };
    session.update_stat(0, &mut stat, false).unwrap();
    assert_eq!(stat.total_recs, 2);

    // Resolution by name and by DN.
    let reply = session
        .resolve_names_w(
            0,
            &Stat::default(),
            Some(&[tags::PID_TAG_ENTRY_ID, tags::PID_TAG_DISPLAY_NAME]),
            &["bob", "/o=Org/ou=Site/cn=Recipients/cn=TEAM"],
        )
        .unwrap();
    assert_eq!(reply.mids, [BOB, TEAM]);

    // Add Bob to the team, then read the membership back.
    let bob_id = reply.rows[0].value_of(tags::PID_TAG_ENTRY_ID).cloned();
    let Some(PropValue::Binary(bob_id)) = bob_id else {
        panic!("resolved row must carry an entry id");
    };
    session
        .mod_link_att(0, tags::PID_TAG_ADDRESS_BOOK_MEMBER, TEAM, &[bob_id])
        .unwrap();

    let mut at_team = Stat {
        current_rec: TEAM,
        ..Stat::default()
    };
    let members = session
        .get_matches(
            0,
            &mut at_team,
            None,
            0,
            None,
            Some(&PropertyName::mapi(tags::PID_TAG_ADDRESS_BOOK_MEMBER)),
            10,
            None,
        )
        .unwrap();
    assert_eq!(members.mids, [ALICE, BOB]);

    assert_eq!(server.unbind(binding.handle, 0), flags::UNBIND_SUCCESS);
}

#[test]
fn extra_properties_use_their_declared_type() {
    let server = server();
    let session = server
        .session(server.bind(0, &Stat::default(), false).unwrap().handle)
        .unwrap();
    let stat = Stat {
        current_rec: CAROL,
        ..Stat::default()
    };

    let reply = session
        .get_props(0, &stat, Some(&[tags::PID_TAG_DEPARTMENT_NAME]))
        .unwrap();

    // Stored as binary, so a string column cannot report it.
    assert_eq!(reply.code, ErrorCode::ErrorsReturned);

    let list = session.get_prop_list(0, CAROL, 1252).unwrap();
    assert!(list.contains(&PropTag::new(0x3A18_0102)));
}

#[test]
fn dn_to_mid_maps_unregistered_names_to_zero() {
    let server = server();
    let session = server
        .session(server.bind(0, &Stat::default(), false).unwrap().handle)
        .unwrap();

    let mids = session
        .dn_to_mid(0, &["/o=Org/ou=Site/cn=Recipients/cn=nobody"])
        .unwrap();

    assert_eq!(mids, [Mid::new(0)]);
}

#[test]
fn configuration_errors_carry_kind_and_origin() {
    let parse = nspi::from_toml_str("[server]\nbogus = 1").unwrap_err();
    assert_eq!(parse.kind, ErrorKind::Parse);
    assert_eq!(parse.origin, ErrorOrigin::Config);

    let invalid = nspi::from_toml_str("[server]\ncode_pages = [1200]").unwrap_err();
    assert_eq!(invalid.kind, ErrorKind::Invalid);

    let duplicate = format!(
        "{DIRECTORY}\n[[directory.objects]]\ndn = \"/O=ORG/OU=SITE/CN=RECIPIENTS/CN=BOB\"\ndisplay_name = \"Bob Again\"\n"
    );
    let err = nspi::from_toml_str(&duplicate).unwrap_err();
    assert_eq!((err.kind, err.origin), (ErrorKind::Invalid, ErrorOrigin::Config));

    let missing = nspi::open("/nonexistent/nspi.toml").unwrap_err();
    assert_eq!(missing.kind, ErrorKind::Io);
}

#[derive(Default)]
struct Outcomes(RefCell<Vec<(Method, ErrorCode)>>);

impl MetricsSink for Outcomes {
    fn record(&self, event: MetricsEvent) {
        if let MetricsEvent::MethodFinish { method, code, .. } = event {
            self.0.borrow_mut().push((method, code));
        }
    }
}

#[test]
fn scoped_sink_sees_method_outcomes() {
    let server = server();
    let outcomes = Rc::new(Outcomes::default());

    with_metrics_sink(outcomes.clone(), || {
        let session = server
            .session(server.bind(0, &Stat::default(), false).unwrap().handle)
            .unwrap();
        let mut stat = Stat {
            container_id: Mid::new(0xDEAD),
            ..Stat::default()
        };
        let _ = session.query_rows(0, &mut stat, None, 1, None);
        let _ = session.dn_to_mid(0, &[]);
    });

    assert_eq!(
        *outcomes.0.borrow(),
        [
            (Method::Bind, ErrorCode::Success),
            (Method::QueryRows, ErrorCode::InvalidBookmark),
            (Method::DnToMid, ErrorCode::Success),
        ]
    );
}

proptest! {
    // Paging through the GAL with any page size visits every row once.
    #[test]
    fn paging_visits_every_row_once(page in 1u32..5) {
        let server = server();
        let session = server
            .session(server.bind(0, &Stat::default(), false).unwrap().handle)
            .unwrap();

        let mut stat = Stat::default();
        let mut seen = Vec::new();
        while stat.current_rec != Mid::END_OF_TABLE {
            let rows = session.query_rows(0, &mut stat, None, page, None).unwrap();
            prop_assert!(rows.len() <= page as usize);
            seen.extend(display_names(&rows));
        }

        prop_assert_eq!(seen, ["Alice Archer", "Bob Brown", "carol Chen"]);
    }

    // Seeking then comparing agrees with table order.
    #[test]
    fn compare_mids_is_antisymmetric(a in 0usize..3, b in 0usize..3) {
        let server = server();
        let session = server
            .session(server.bind(0, &Stat::default(), false).unwrap().handle)
            .unwrap();
        let rows = [ALICE, BOB, CAROL];

        let forward = session.compare_mids(0, &Stat::default(), rows[a], rows[b]).unwrap();
        let backward = session.compare_mids(0, &Stat::default(), rows[b], rows[a]).unwrap();

        prop_assert_eq!(forward, -backward);
        prop_assert_eq!(forward, (a as i32 - b as i32).signum());
    }
}
