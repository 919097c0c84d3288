//! Special tables: the container hierarchy, address-creation templates and
//! per-template data.

use crate::{
    catalog::{CatalogView, ContainerRecord, GAL, ObjectCatalog, TemplateRecord},
    error::{ErrorCode, NspiResult},
    identity::{DisplayType, PermanentEntryId},
    obs::Method,
    prop::{PropTag, PropType, PropValue, PropertyRow, RowSet, TaggedValue, tags},
    stat::{CP_WINUNICODE, Stat},
    table::{Session, SpecialTable, check_code_page, flags},
};

// GAL hierarchy row: DN "/", selectable and holding recipients.
const GAL_DN: &str = "/";
const GAL_FLAGS: u32 = 0x0000_0009;

pub(super) fn get_special_table<C: ObjectCatalog>(
    session: &Session<'_, C>,
    flag_bits: u32,
    stat: &Stat,
) -> NspiResult<SpecialTable> {
    session.run(Method::GetSpecialTable, |span| {
        let creation = flag_bits & flags::ADDRESS_CREATION_TEMPLATES != 0;
        let unicode = !creation && flag_bits & flags::UNICODE_STRINGS != 0;

        // Phase 1: a Unicode STAT code page needs Unicode strings.
        if stat.code_page == CP_WINUNICODE {
            if !unicode {
                return Err(ErrorCode::InvalidCodepage);
            }
        } else {
            check_code_page(session.config(), stat.code_page)?;
        }

        // Phase 2: build the rows.
        let view = session.view();
        let rows: RowSet = if creation {
            view.templates()
                .iter()
                .filter(|t| t.creation && t.locale == stat.template_locale)
                .map(creation_row)
                .collect()
        } else {
            let containers = view.containers();
            std::iter::once(gal_row(unicode))
                .chain(containers.iter().map(|c| container_row(containers, c, unicode)))
                .collect()
        };

        span.set_rows(rows.len());
        Ok(SpecialTable {
            version: view.hierarchy_version(),
            rows,
        })
    })
}

fn display_name(name: &str, unicode: bool) -> TaggedValue {
    if unicode {
        TaggedValue::new(
            tags::PID_TAG_DISPLAY_NAME.with_type(PropType::String),
            PropValue::Unicode(name.to_string()),
        )
    } else {
        TaggedValue::new(
            tags::PID_TAG_DISPLAY_NAME.with_type(PropType::String8),
            PropValue::String8(name.to_string()),
        )
    }
}

// Permanent entry id as a binary value; error slot if the DN is not ASCII.
fn permanent_entry_id(tag: PropTag, display_type: DisplayType, dn: &str) -> TaggedValue {
    match PermanentEntryId::new(display_type, dn) {
        Ok(id) => TaggedValue::new(tag, PropValue::Binary(id.encode())),
        Err(_) => TaggedValue::error(tag, ErrorCode::NotFound),
    }
}

fn gal_row(unicode: bool) -> PropertyRow {
    PropertyRow::new(vec![
        permanent_entry_id(tags::PID_TAG_ENTRY_ID, DisplayType::CONTAINER, GAL_DN),
        TaggedValue::new(
            tags::PID_TAG_CONTAINER_FLAGS,
            PropValue::Integer32(GAL_FLAGS.cast_signed()),
        ),
        TaggedValue::new(tags::PID_TAG_DEPTH, PropValue::Integer32(0)),
        TaggedValue::new(
            tags::PID_TAG_ADDRESS_BOOK_CONTAINER_ID,
            PropValue::Integer32(GAL.raw().cast_signed()),
        ),
        display_name("", unicode),
        TaggedValue::new(tags::PID_TAG_ADDRESS_BOOK_IS_MASTER, PropValue::Boolean(false)),
    ])
}

fn container_row(
    containers: &[ContainerRecord],
    container: &ContainerRecord,
    unicode: bool,
) -> PropertyRow {
    let mut values = vec![
        permanent_entry_id(
            tags::PID_TAG_ENTRY_ID,
            DisplayType::CONTAINER,
            &container.dn,
        ),
        TaggedValue::new(
            tags::PID_TAG_CONTAINER_FLAGS,
            PropValue::Integer32(container.flags.cast_signed()),
        ),
        TaggedValue::new(
            tags::PID_TAG_DEPTH,
            PropValue::Integer32(container.depth.cast_signed()),
        ),
        TaggedValue::new(
            tags::PID_TAG_ADDRESS_BOOK_CONTAINER_ID,
            PropValue::Integer32(container.mid.raw().cast_signed()),
        ),
        display_name(&container.display_name, unicode),
        TaggedValue::new(
            tags::PID_TAG_ADDRESS_BOOK_IS_MASTER,
            PropValue::Boolean(container.is_master),
        ),
    ];

    let parent = container
        .parent
        .and_then(|mid| containers.iter().find(|c| c.mid == mid));
    if let Some(parent) = parent {
        values.push(permanent_entry_id(
            tags::PID_TAG_ADDRESS_BOOK_PARENT_ENTRY_ID,
            DisplayType::CONTAINER,
            &parent.dn,
        ));
    }

    PropertyRow::new(values)
}

fn creation_row(template: &TemplateRecord) -> PropertyRow {
    let address_type = template.address_type.as_deref().map_or_else(
        || TaggedValue::error(tags::PID_TAG_ADDRESS_TYPE, ErrorCode::NotFound),
        |ty| TaggedValue::new(tags::PID_TAG_ADDRESS_TYPE, PropValue::String8(ty.to_string())),
    );

    PropertyRow::new(vec![
        permanent_entry_id(
            tags::PID_TAG_ENTRY_ID,
            DisplayType::ADDRESS_TEMPLATE,
            &template.dn,
        ),
        display_name(&template.display_name, false),
        address_type,
        TaggedValue::new(
            tags::PID_TAG_DISPLAY_TYPE,
            PropValue::Integer32(template.display_type.raw().cast_signed()),
        ),
    ])
}

pub(super) fn get_template_info<C: ObjectCatalog>(
    session: &Session<'_, C>,
    flag_bits: u32,
    display_type: u32,
    dn: Option<&str>,
    code_page: u32,
    locale: u32,
) -> NspiResult<PropertyRow> {
    session.run(Method::GetTemplateInfo, |span| {
        check_code_page(session.config(), code_page)?;

        let view = session.view();
        let template = match dn {
            Some(dn) => view
                .templates()
                .iter()
                .find(|t| t.dn.eq_ignore_ascii_case(dn)),
            None => view
                .templates()
                .iter()
                .find(|t| t.display_type.raw() == display_type && t.locale == locale),
        }
        .ok_or(ErrorCode::InvalidLocale)?;

        let mut values = Vec::new();
        if flag_bits & flags::TI_TEMPLATE != 0 {
            values.push(TaggedValue::new(
                tags::PID_TAG_TEMPLATE_DATA,
                PropValue::Binary(template.template.clone()),
            ));
        }
        if flag_bits & flags::TI_SCRIPT != 0 {
            values.push(TaggedValue::new(
                tags::PID_TAG_SCRIPT_DATA,
                PropValue::Binary(template.script.clone()),
            ));
        }

        span.set_rows(1);
        Ok(PropertyRow::new(values))
    })
}

