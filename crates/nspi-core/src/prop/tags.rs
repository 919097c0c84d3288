//! Well-known property tags.

use super::PropTag;

pub const PID_TAG_TEMPLATE_DATA: PropTag = PropTag::new(0x0001_0102);
pub const PID_TAG_SCRIPT_DATA: PropTag = PropTag::new(0x0004_0102);
pub const PID_TAG_INSTANCE_KEY: PropTag = PropTag::new(0x0FF6_0102);
pub const PID_TAG_RECORD_KEY: PropTag = PropTag::new(0x0FF9_0102);
pub const PID_TAG_MAPPING_SIGNATURE: PropTag = PropTag::new(0x0FF8_0102);
pub const PID_TAG_OBJECT_TYPE: PropTag = PropTag::new(0x0FFE_0003);
pub const PID_TAG_ENTRY_ID: PropTag = PropTag::new(0x0FFF_0102);
pub const PID_TAG_DISPLAY_NAME: PropTag = PropTag::new(0x3001_001E);
pub const PID_TAG_ADDRESS_TYPE: PropTag = PropTag::new(0x3002_001E);
pub const PID_TAG_EMAIL_ADDRESS: PropTag = PropTag::new(0x3003_001F);
pub const PID_TAG_DEPTH: PropTag = PropTag::new(0x3005_0003);
pub const PID_TAG_SEARCH_KEY: PropTag = PropTag::new(0x300B_0102);
pub const PID_TAG_CONTAINER_FLAGS: PropTag = PropTag::new(0x3600_0003);
pub const PID_TAG_SELECTABLE: PropTag = PropTag::new(0x3609_000B);
pub const PID_TAG_ANR: PropTag = PropTag::new(0x360C_001F);
pub const PID_TAG_CONTAINER_CONTENTS: PropTag = PropTag::new(0x360F_000D);
pub const PID_TAG_DISPLAY_TYPE: PropTag = PropTag::new(0x3900_0003);
pub const PID_TAG_TEMPLATE_ID: PropTag = PropTag::new(0x3902_0102);
pub const PID_TAG_SMTP_ADDRESS: PropTag = PropTag::new(0x39FE_001F);
pub const PID_TAG_ADDRESS_BOOK_DISPLAY_NAME_PRINTABLE: PropTag = PropTag::new(0x39FF_001F);
pub const PID_TAG_ACCOUNT: PropTag = PropTag::new(0x3A00_001F);
pub const PID_TAG_GIVEN_NAME: PropTag = PropTag::new(0x3A06_001F);
pub const PID_TAG_SURNAME: PropTag = PropTag::new(0x3A11_001F);
pub const PID_TAG_TITLE: PropTag = PropTag::new(0x3A17_001F);
pub const PID_TAG_DEPARTMENT_NAME: PropTag = PropTag::new(0x3A18_001E);
pub const PID_TAG_OFFICE_LOCATION: PropTag = PropTag::new(0x3A19_001E);
pub const PID_TAG_PRIMARY_TELEPHONE_NUMBER: PropTag = PropTag::new(0x3A1A_001E);
pub const PID_TAG_TRANSMITTABLE_DISPLAY_NAME: PropTag = PropTag::new(0x3A20_001F);
pub const PID_TAG_USER_X509_CERTIFICATE: PropTag = PropTag::new(0x3A70_1102);
pub const PID_TAG_INITIAL_DETAILS_PANE: PropTag = PropTag::new(0x3F08_0003);
pub const PID_TAG_ADDRESS_BOOK_MEMBER: PropTag = PropTag::new(0x8009_101E);
pub const PID_TAG_ADDRESS_BOOK_PUBLIC_DELEGATES: PropTag = PropTag::new(0x8015_101E);
pub const PID_TAG_ADDRESS_BOOK_OBJECT_DISTINGUISHED_NAME: PropTag = PropTag::new(0x803C_001F);
pub const PID_TAG_ADDRESS_BOOK_X509_CERTIFICATE: PropTag = PropTag::new(0x8C6A_1102);
pub const PID_TAG_ADDRESS_BOOK_PHONETIC_DISPLAY_NAME: PropTag = PropTag::new(0x8C92_001F);
pub const PID_TAG_ADDRESS_BOOK_IS_MASTER: PropTag = PropTag::new(0xFFFB_000B);
pub const PID_TAG_ADDRESS_BOOK_PARENT_ENTRY_ID: PropTag = PropTag::new(0xFFFC_0102);
pub const PID_TAG_ADDRESS_BOOK_CONTAINER_ID: PropTag = PropTag::new(0xFFFD_0003);

/// Columns returned when a table read supplies no column set.
pub const DEFAULT_COLUMNS: [PropTag; 7] = [
    PID_TAG_ADDRESS_BOOK_CONTAINER_ID,
    PID_TAG_OBJECT_TYPE,
    PID_TAG_DISPLAY_TYPE,
    PID_TAG_DISPLAY_NAME,
    PID_TAG_PRIMARY_TELEPHONE_NUMBER,
    PID_TAG_DEPARTMENT_NAME,
    PID_TAG_OFFICE_LOCATION,
];

/// Properties derived from identity rather than stored on the object.
pub const COMPUTED: [PropTag; 6] = [
    PID_TAG_ENTRY_ID,
    PID_TAG_INSTANCE_KEY,
    PID_TAG_RECORD_KEY,
    PID_TAG_SEARCH_KEY,
    PID_TAG_MAPPING_SIGNATURE,
    PID_TAG_ADDRESS_BOOK_CONTAINER_ID,
];
