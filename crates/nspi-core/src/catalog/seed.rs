use crate::{
    catalog::memory::{ContainerRecord, Directory, ObjectRecord, TemplateRecord},
    error::InternalError,
    identity::{DisplayType, Mid},
    prop::{PropTag, PropType, PropValue, tags},
};
use nspi_config::{DirectorySeed, ObjectSeed, SeedValue};
use std::collections::{BTreeMap, HashMap};

// Build a directory from a validated seed. Identifiers are assigned in
// declaration order: containers, then objects, then templates.
pub(super) fn build(seed: &DirectorySeed) -> Result<Directory, InternalError> {
    let mut next = Mid::FIRST_ASSIGNABLE.raw();
    let mut assign = || {
        let mid = Mid::new(next);
        next += 1;
        mid
    };

    let mut dir = Directory::default();

    // Phase 1: containers, with depth from the parent chain.
    let mut container_mids = HashMap::new();
    let mut containers = Vec::with_capacity(seed.containers.len());
    for container in &seed.containers {
        let mid = assign();
        container_mids.insert(container.dn.to_ascii_lowercase(), mid);
        containers.push(ContainerRecord {
            mid,
            dn: container.dn.clone(),
            display_name: container.display_name.clone(),
            parent: None,
            depth: 0,
            flags: container.flags,
            is_master: container.is_master,
        });
    }
    for (record, container) in containers.iter_mut().zip(&seed.containers) {
        record.parent = container
            .parent
            .as_ref()
            .and_then(|p| container_mids.get(&p.to_ascii_lowercase()).copied());
    }
    let containers = hierarchy_order(containers)?;

    for container in &containers {
        let mut props = BTreeMap::new();
        props.insert(
            tags::PID_TAG_DISPLAY_NAME.id(),
            PropValue::Unicode(container.display_name.clone()),
        );
        put_type_props(&mut props, DisplayType::CONTAINER);
        props.insert(
            tags::PID_TAG_CONTAINER_FLAGS.id(),
            PropValue::Integer32(container.flags.cast_signed()),
        );
        props.insert(
            tags::PID_TAG_DEPTH.id(),
            PropValue::Integer32(container.depth.cast_signed()),
        );
        dir.insert(
            container.mid,
            ObjectRecord {
                dn: container.dn.clone(),
                display_type: DisplayType::CONTAINER,
                props,
                containers: Vec::new(),
                listed: false,
            },
        );
    }

    // Phase 2: recipients.
    for object in &seed.objects {
        let mid = assign();
        let display_type = DisplayType(object.kind.display_type());
        let props = object_props(object, display_type)?;
        let member_of = object
            .containers
            .iter()
            .filter_map(|dn| container_mids.get(&dn.to_ascii_lowercase()).copied())
            .collect();

        dir.insert(
            mid,
            ObjectRecord {
                dn: object.dn.clone(),
                display_type,
                props,
                containers: member_of,
                listed: !object.hidden,
            },
        );
    }

    // Phase 3: templates.
    let mut templates = Vec::with_capacity(seed.templates.len());
    for template in &seed.templates {
        let mid = assign();
        let own_type = if template.creation {
            DisplayType::ADDRESS_TEMPLATE
        } else {
            DisplayType::TEMPLATE
        };

        let mut props = BTreeMap::new();
        props.insert(
            tags::PID_TAG_DISPLAY_NAME.id(),
            PropValue::Unicode(template.display_name.clone()),
        );
        put_type_props(&mut props, own_type);
        if let Some(address_type) = &template.address_type {
            props.insert(
                tags::PID_TAG_ADDRESS_TYPE.id(),
                PropValue::String8(address_type.clone()),
            );
        }
        dir.insert(
            mid,
            ObjectRecord {
                dn: template.dn.clone(),
                display_type: own_type,
                props,
                containers: Vec::new(),
                listed: false,
            },
        );

        templates.push(TemplateRecord {
            mid,
            dn: template.dn.clone(),
            display_name: template.display_name.clone(),
            display_type: DisplayType(template.display_type),
            locale: template.effective_locale(),
            address_type: template.address_type.clone(),
            creation: template.creation,
            template: template.template.clone(),
            script: template.script.clone(),
        });
    }

    dir.set_hierarchy(containers, templates);
    dir.reindex();

    Ok(dir)
}

// Depth-first pre-order, siblings in declaration order.
fn hierarchy_order(
    containers: Vec<ContainerRecord>,
) -> Result<Vec<ContainerRecord>, InternalError> {
    fn visit(
        parent: Option<Mid>,
        depth: u32,
        pending: &[ContainerRecord],
        out: &mut Vec<ContainerRecord>,
    ) {
        for container in pending.iter().filter(|c| c.parent == parent) {
            out.push(ContainerRecord {
                depth,
                ..container.clone()
            });
            visit(Some(container.mid), depth + 1, pending, out);
        }
    }

    let mut out = Vec::with_capacity(containers.len());
    visit(None, 0, &containers, &mut out);

    if out.len() != containers.len() {
        return Err(InternalError::catalog_invariant(
            "container hierarchy contains a parent cycle",
        ));
    }

    Ok(out)
}

fn put_type_props(props: &mut BTreeMap<u16, PropValue>, display_type: DisplayType) {
    props.insert(
        tags::PID_TAG_DISPLAY_TYPE.id(),
        PropValue::Integer32(display_type.raw().cast_signed()),
    );
    props.insert(
        tags::PID_TAG_OBJECT_TYPE.id(),
        PropValue::Integer32(display_type.object_type().cast_signed()),
    );
}

fn object_props(
    object: &ObjectSeed,
    display_type: DisplayType,
) -> Result<BTreeMap<u16, PropValue>, InternalError> {
    let mut props = BTreeMap::new();
    let mut text = |tag: PropTag, value: Option<&str>| {
        if let Some(value) = value {
            props.insert(tag.id(), PropValue::Unicode(value.to_string()));
        }
    };

    text(tags::PID_TAG_DISPLAY_NAME, Some(object.display_name.as_str()));
    text(
        tags::PID_TAG_ADDRESS_BOOK_PHONETIC_DISPLAY_NAME,
        object.phonetic_display_name.as_deref(),
    );
    text(tags::PID_TAG_ACCOUNT, object.account.as_deref());
    text(tags::PID_TAG_GIVEN_NAME, object.given_name.as_deref());
    text(tags::PID_TAG_SURNAME, object.surname.as_deref());
    text(tags::PID_TAG_SMTP_ADDRESS, object.smtp_address.as_deref());
    text(tags::PID_TAG_TITLE, object.title.as_deref());
    text(tags::PID_TAG_DEPARTMENT_NAME, object.department.as_deref());
    text(tags::PID_TAG_OFFICE_LOCATION, object.office_location.as_deref());
    text(tags::PID_TAG_PRIMARY_TELEPHONE_NUMBER, object.phone.as_deref());
    text(tags::PID_TAG_EMAIL_ADDRESS, Some(object.dn.as_str()));
    text(
        tags::PID_TAG_ADDRESS_BOOK_OBJECT_DISTINGUISHED_NAME,
        Some(object.dn.as_str()),
    );

    put_type_props(&mut props, display_type);
    props.insert(
        tags::PID_TAG_ADDRESS_TYPE.id(),
        PropValue::String8("EX".to_string()),
    );
    if !object.members.is_empty() {
        props.insert(
            tags::PID_TAG_ADDRESS_BOOK_MEMBER.id(),
            PropValue::MultiString8(object.members.clone()),
        );
    }
    if !object.public_delegates.is_empty() {
        props.insert(
            tags::PID_TAG_ADDRESS_BOOK_PUBLIC_DELEGATES.id(),
            PropValue::MultiString8(object.public_delegates.clone()),
        );
    }

    for extra in &object.properties {
        let tag = PropTag::new(extra.tag);
        props.insert(tag.id(), seed_value(tag, &extra.value)?);
    }

    Ok(props)
}

// Interpret an untyped seed value under the type bits of its tag.
fn seed_value(tag: PropTag, value: &SeedValue) -> Result<PropValue, InternalError> {
    let mismatch = || {
        InternalError::catalog_unsupported(format!("seed value {value:?} does not fit tag {tag}"))
    };
    let prop_type = tag.prop_type().ok_or_else(mismatch)?;

    let converted = match (prop_type, value) {
        (PropType::Boolean, SeedValue::Bool(b)) => PropValue::Boolean(*b),
        (PropType::Integer16, SeedValue::Int(i)) => {
            PropValue::Integer16(i16::try_from(*i).map_err(|_| mismatch())?)
        }
        (PropType::Integer32, SeedValue::Int(i)) => {
            PropValue::Integer32(i32::try_from(*i).map_err(|_| mismatch())?)
        }
        (PropType::Integer64, SeedValue::Int(i)) => PropValue::Integer64(*i),
        (PropType::Time, SeedValue::Int(i)) => {
            PropValue::Time(u64::try_from(*i).map_err(|_| mismatch())?)
        }
        (PropType::String8, SeedValue::Text(s)) => PropValue::String8(s.clone()),
        (PropType::String, SeedValue::Text(s)) => PropValue::Unicode(s.clone()),
        (PropType::MultipleString8, SeedValue::TextList(v)) => PropValue::MultiString8(v.clone()),
        (PropType::MultipleString, SeedValue::TextList(v)) => PropValue::MultiUnicode(v.clone()),
        (PropType::Binary, SeedValue::Bytes { bytes }) => PropValue::Binary(bytes.clone()),
        (PropType::MultipleBinary, SeedValue::BytesList { bytes_list }) => {
            PropValue::MultiBinary(bytes_list.clone())
        }
        _ => return Err(mismatch()),
    };

    Ok(converted)
}
