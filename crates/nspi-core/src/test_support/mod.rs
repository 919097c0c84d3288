//! Shared fixture: a five-recipient directory.
//!
//! GAL rows in display-name order are `[A, B, C, D, E]`. The `Sales`
//! container lists B and D, its child `Sales East` lists D. A hidden
//! distribution list `Team` (members A and B) is resolvable but unlisted.

use crate::{
    catalog::MemoryCatalog,
    identity::Mid,
    table::NspiServer,
};
use nspi_config::{
    ContainerSeed, DirectorySeed, ObjectKind, ObjectSeed, ServerConfig, TemplateSeed,
};

pub(crate) const SALES: Mid = Mid::new(0x10);
pub(crate) const SALES_EAST: Mid = Mid::new(0x11);
pub(crate) const A: Mid = Mid::new(0x12);
pub(crate) const B: Mid = Mid::new(0x13);
pub(crate) const C: Mid = Mid::new(0x14);
pub(crate) const D: Mid = Mid::new(0x15);
pub(crate) const E: Mid = Mid::new(0x16);
pub(crate) const TEAM: Mid = Mid::new(0x17);
pub(crate) const USER_TEMPLATE: Mid = Mid::new(0x18);
pub(crate) const SMTP_TEMPLATE: Mid = Mid::new(0x19);

pub(crate) const GAL_ROWS: [Mid; 5] = [A, B, C, D, E];

pub(crate) const ORG: &str = "/o=Contoso/ou=Exchange Administrative Group (FYDIBOHF23SPDLT)/cn=Recipients";

pub(crate) fn dn(cn: &str) -> String {
    format!("{ORG}/cn={cn}")
}

fn user(cn: &str, display: &str, phonetic: &str) -> ObjectSeed {
    ObjectSeed {
        dn: dn(cn),
        display_name: display.to_string(),
        phonetic_display_name: Some(phonetic.to_string()),
        account: Some(cn.to_string()),
        smtp_address: Some(format!("{cn}@contoso.com")),
        ..ObjectSeed::default()
    }
}

pub(crate) fn seed() -> DirectorySeed {
    let sales = "/guid=5A1E5000000000000000000000000001".to_string();
    let sales_east = "/guid=5A1E5000000000000000000000000002".to_string();

    let mut b = user("bbaker", "Baker Bob", "Bayker");
    b.containers = vec![sales.clone()];
    b.department = Some("Sales".to_string());
    let mut d = user("ddavis", "Davis Dana", "Dayvis");
    d.containers = vec![sales.clone(), sales_east.clone()];
    d.title = Some("Manager".to_string());

    // Phonetic order differs from display order: E sorts first.
    let mut e = user("eevans", "Evans Eve", "Aevans");
    e.given_name = Some("Eve".to_string());
    e.surname = Some("Evans".to_string());

    DirectorySeed {
        containers: vec![
            ContainerSeed {
                dn: sales,
                display_name: "Sales".to_string(),
                parent: None,
                flags: 0x9,
                is_master: false,
            },
            ContainerSeed {
                dn: sales_east.clone(),
                display_name: "Sales East".to_string(),
                parent: Some("/guid=5A1E5000000000000000000000000001".to_string()),
                flags: 0x9,
                is_master: false,
            },
        ],
        objects: vec![
            user("aadams", "Adams Alice", "Adams"),
            b,
            user("cclark", "Clark Carol", "Clark"),
            d,
            e,
            ObjectSeed {
                dn: dn("team"),
                display_name: "Team".to_string(),
                kind: ObjectKind::DistList,
                members: vec![dn("aadams"), dn("bbaker")],
                hidden: true,
                ..ObjectSeed::default()
            },
        ],
        templates: vec![
            TemplateSeed {
                dn: "/o=Contoso/cn=Templates/cn=0409/cn=User".to_string(),
                display_name: "User".to_string(),
                display_type: 0,
                locale: 0x0409,
                template: vec![0xAA, 0xBB],
                script: vec![0x01],
                ..TemplateSeed::default()
            },
            TemplateSeed {
                dn: "/o=Contoso/cn=Templates/cn=0409/cn=SMTP".to_string(),
                display_name: "Internet Address".to_string(),
                display_type: 6,
                locale: 0x0409,
                address_type: Some("SMTP".to_string()),
                creation: true,
                template: vec![0xCC],
                ..TemplateSeed::default()
            },
        ],
    }
}

pub(crate) fn catalog() -> MemoryCatalog {
    match MemoryCatalog::from_seed(&seed()) {
        Ok(catalog) => catalog,
        Err(err) => panic!("fixture seed must build: {err}"),
    }
}

pub(crate) fn config() -> ServerConfig {
    ServerConfig {
        directory: seed(),
        ..ServerConfig::default()
    }
}

pub(crate) fn server() -> NspiServer<MemoryCatalog> {
    NspiServer::new(catalog(), config().server)
}
