//! Method flag bits. Bits a method does not name are ignored.

/// Bind: anonymous login.
pub const ANONYMOUS_LOGIN: u32 = 0x0000_0020;

/// GetPropList: skip properties of type EmbeddedTable.
pub const SKIP_OBJECTS: u32 = 0x0000_0001;

/// QueryRows, GetProps: return Ephemeral rather than Permanent entry IDs.
pub const EPH_ID: u32 = 0x0000_0002;

/// ModLinkAtt: remove the listed links instead of adding them.
pub const DELETE: u32 = 0x0000_0001;

/// QueryColumns: report string columns as wide strings.
pub const UNICODE_PROPTYPES: u32 = 0x8000_0000;

/// GetSpecialTable: return the address-creation table.
pub const ADDRESS_CREATION_TEMPLATES: u32 = 0x0000_0002;

/// GetSpecialTable: return wide display names.
pub const UNICODE_STRINGS: u32 = 0x0000_0004;

/// GetTemplateInfo: include the template data.
pub const TI_TEMPLATE: u32 = 0x0000_0001;

/// GetTemplateInfo: include the script data.
pub const TI_SCRIPT: u32 = 0x0000_0004;

/// Unbind results.
pub const UNBIND_SUCCESS: u32 = 1;
pub const UNBIND_FAILURE: u32 = 2;
