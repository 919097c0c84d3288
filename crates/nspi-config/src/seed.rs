use crate::NSPI_DEFAULT_LOCALE;
use serde::{Deserialize, Serialize};

///
/// DirectorySeed
///
/// Declarative directory contents loaded into the in-memory catalog.
/// Entries are referenced by distinguished name; identifiers are assigned
/// at load time in declaration order.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DirectorySeed {
    #[serde(default)]
    pub containers: Vec<ContainerSeed>,

    #[serde(default)]
    pub objects: Vec<ObjectSeed>,

    #[serde(default)]
    pub templates: Vec<TemplateSeed>,
}

///
/// ContainerSeed
///

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ContainerSeed {
    pub dn: String,
    pub display_name: String,

    /// DN of the parent container; top-level containers have none.
    #[serde(default)]
    pub parent: Option<String>,

    /// Raw PidTagContainerFlags value.
    #[serde(default = "default_container_flags")]
    pub flags: u32,

    #[serde(default)]
    pub is_master: bool,
}

const fn default_container_flags() -> u32 {
    // AB_RECIPIENTS | AB_UNMODIFIABLE
    0x0000_0009
}

///
/// ObjectKind
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    #[default]
    MailUser,
    DistList,
    Forum,
    Agent,
    Organization,
    PrivateDistList,
    RemoteMailUser,
}

impl ObjectKind {
    /// Wire display-type value for this kind.
    #[must_use]
    pub const fn display_type(self) -> u32 {
        match self {
            Self::MailUser => 0x00,
            Self::DistList => 0x01,
            Self::Forum => 0x02,
            Self::Agent => 0x03,
            Self::Organization => 0x04,
            Self::PrivateDistList => 0x05,
            Self::RemoteMailUser => 0x06,
        }
    }
}

///
/// ObjectSeed
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct ObjectSeed {
    pub dn: String,
    pub display_name: String,
    pub kind: ObjectKind,
    pub phonetic_display_name: Option<String>,
    pub account: Option<String>,
    pub given_name: Option<String>,
    pub surname: Option<String>,
    pub smtp_address: Option<String>,
    pub title: Option<String>,
    pub department: Option<String>,
    pub office_location: Option<String>,
    pub phone: Option<String>,

    /// DNs of the containers (besides the GAL) that list this object.
    pub containers: Vec<String>,

    /// Member DNs; meaningful for distribution lists.
    pub members: Vec<String>,

    /// Delegate DNs; meaningful for mail users.
    pub public_delegates: Vec<String>,

    /// Excluded from container listings, still resolvable by DN.
    pub hidden: bool,

    /// Additional typed properties keyed by full property tag.
    pub properties: Vec<PropertySeed>,
}

///
/// PropertySeed
///

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PropertySeed {
    pub tag: u32,
    pub value: SeedValue,
}

///
/// SeedValue
///
/// Untyped TOML value; the property tag decides the stored type.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SeedValue {
    Bool(bool),
    Int(i64),
    Text(String),
    TextList(Vec<String>),
    Bytes { bytes: Vec<u8> },
    BytesList { bytes_list: Vec<Vec<u8>> },
}

///
/// TemplateSeed
///
/// A details or address-creation template.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct TemplateSeed {
    pub dn: String,
    pub display_name: String,

    /// Display type of the objects this template renders.
    pub display_type: u32,

    pub locale: u32,

    /// Address type offered by an address-creation template.
    pub address_type: Option<String>,

    /// Listed in the address-creation table for its locale.
    pub creation: bool,

    pub template: Vec<u8>,
    pub script: Vec<u8>,
}

impl TemplateSeed {
    /// Locale with the default applied for unset (zero) values.
    #[must_use]
    pub const fn effective_locale(&self) -> u32 {
        if self.locale == 0 {
            NSPI_DEFAULT_LOCALE
        } else {
            self.locale
        }
    }
}
