use crate::{
    catalog::{CatalogView, CatalogWriter, GAL, ObjectCatalog, collate},
    error::InternalError,
    identity::{DisplayType, Mid},
    prop::{PropTag, PropValue, TaggedValue, tags},
    stat::SortKey,
};
use arc_swap::ArcSwap;
use nspi_config::DirectorySeed;
use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    sync::{Arc, Mutex},
};

///
/// ObjectRecord
///

#[derive(Clone, Debug)]
pub(crate) struct ObjectRecord {
    pub(crate) dn: String,
    pub(crate) display_type: DisplayType,
    pub(crate) props: BTreeMap<u16, PropValue>,
    pub(crate) containers: Vec<Mid>,
    pub(crate) listed: bool,
}

///
/// ContainerRecord
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContainerRecord {
    pub mid: Mid,
    pub dn: String,
    pub display_name: String,
    pub parent: Option<Mid>,
    pub depth: u32,
    pub flags: u32,
    pub is_master: bool,
}

///
/// TemplateRecord
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TemplateRecord {
    pub mid: Mid,
    pub dn: String,
    pub display_name: String,
    pub display_type: DisplayType,
    pub locale: u32,
    pub address_type: Option<String>,
    pub creation: bool,
    pub template: Vec<u8>,
    pub script: Vec<u8>,
}

///
/// Directory
///
/// One immutable directory snapshot with precomputed sorted container rows.
///

#[derive(Clone, Debug, Default)]
pub struct Directory {
    pub(crate) objects: BTreeMap<Mid, ObjectRecord>,
    pub(crate) by_dn: HashMap<String, Mid>,
    pub(crate) containers: Vec<ContainerRecord>,
    pub(crate) templates: Vec<TemplateRecord>,
    pub(crate) hierarchy_version: u32,
    rows: HashMap<(Mid, SortKey), Vec<Mid>>,
}

impl Directory {
    /// Build a directory from a validated seed.
    pub fn from_seed(seed: &DirectorySeed) -> Result<Self, InternalError> {
        super::seed::build(seed)
    }

    pub(crate) fn insert(&mut self, mid: Mid, record: ObjectRecord) {
        self.by_dn.insert(record.dn.to_ascii_lowercase(), mid);
        self.objects.insert(mid, record);
    }

    pub(crate) fn set_hierarchy(
        &mut self,
        containers: Vec<ContainerRecord>,
        templates: Vec<TemplateRecord>,
    ) {
        self.containers = containers;
        self.templates = templates;
        self.hierarchy_version = self.hierarchy_version.wrapping_add(1);
    }

    /// Recompute every container's sorted row list.
    pub(crate) fn reindex(&mut self) {
        let mut members: HashMap<Mid, Vec<Mid>> = HashMap::new();
        members.insert(GAL, Vec::new());
        for container in &self.containers {
            members.insert(container.mid, Vec::new());
        }

        for (&mid, record) in &self.objects {
            if !record.listed {
                continue;
            }
            if let Some(gal) = members.get_mut(&GAL) {
                gal.push(mid);
            }
            for container in &record.containers {
                if let Some(list) = members.get_mut(container) {
                    list.push(mid);
                }
            }
        }

        self.rows.clear();
        for (container, mids) in members {
            for key in [SortKey::DisplayName, SortKey::PhoneticDisplayName] {
                let mut sorted = mids.clone();
                sorted.sort_by(|a, b| {
                    let left = self.sort_text(*a, key).unwrap_or_default();
                    let right = self.sort_text(*b, key).unwrap_or_default();
                    collate(left, right).then_with(|| a.cmp(b))
                });
                self.rows.insert((container, key), sorted);
            }
        }
    }

    fn record(&self, mid: Mid) -> Option<&ObjectRecord> {
        self.objects.get(&mid)
    }

    fn record_mut(&mut self, mid: Mid) -> Result<&mut ObjectRecord, InternalError> {
        self.objects
            .get_mut(&mid)
            .ok_or_else(|| InternalError::catalog_not_found(format!("no object {mid:?}")))
    }
}

impl CatalogView for Directory {
    fn container_rows(&self, container: Mid, key: SortKey) -> Option<&[Mid]> {
        self.rows.get(&(container, key)).map(Vec::as_slice)
    }

    fn contains(&self, mid: Mid) -> bool {
        self.objects.contains_key(&mid)
    }

    fn display_type(&self, mid: Mid) -> Option<DisplayType> {
        self.record(mid).map(|r| r.display_type)
    }

    fn dn(&self, mid: Mid) -> Option<&str> {
        self.record(mid).map(|r| r.dn.as_str())
    }

    fn property(&self, mid: Mid, tag: PropTag) -> Option<&PropValue> {
        self.record(mid)?
            .props
            .get(&tag.id())
            .filter(|v| !v.is_empty_multi())
    }

    fn prop_tags(&self, mid: Mid) -> Option<Vec<PropTag>> {
        let record = self.record(mid)?;
        let tags = record
            .props
            .iter()
            .filter(|(_, v)| !v.is_empty_multi())
            .map(|(&id, v)| PropTag::from_parts(id, v.prop_type()))
            .collect();

        Some(tags)
    }

    fn resolve_dn(&self, dn: &str) -> Option<Mid> {
        self.by_dn.get(&dn.to_ascii_lowercase()).copied()
    }

    fn containers(&self) -> &[ContainerRecord] {
        &self.containers
    }

    fn hierarchy_version(&self) -> u32 {
        self.hierarchy_version
    }

    fn templates(&self) -> &[TemplateRecord] {
        &self.templates
    }

    fn known_tags(&self) -> Vec<PropTag> {
        let mut seen = BTreeSet::new();
        for record in self.objects.values() {
            for (&id, value) in &record.props {
                seen.insert(PropTag::from_parts(id, value.prop_type()));
            }
        }

        seen.into_iter().collect()
    }

    fn sort_text(&self, mid: Mid, key: SortKey) -> Option<&str> {
        let record = self.record(mid)?;
        let display = record
            .props
            .get(&tags::PID_TAG_DISPLAY_NAME.id())
            .and_then(PropValue::as_text);

        match key {
            SortKey::DisplayName => display,
            SortKey::PhoneticDisplayName => record
                .props
                .get(&tags::PID_TAG_ADDRESS_BOOK_PHONETIC_DISPLAY_NAME.id())
                .and_then(PropValue::as_text)
                .or(display),
        }
    }
}

///
/// MemoryCatalog
///
/// Snapshot-publishing in-memory catalog. Readers load the current
/// `Arc<Directory>` without locking; writers are serialized and publish a
/// modified copy.
///

#[derive(Debug)]
pub struct MemoryCatalog {
    current: ArcSwap<Directory>,
    write_lock: Mutex<()>,
}

impl MemoryCatalog {
    #[must_use]
    pub fn new(directory: Directory) -> Self {
        Self {
            current: ArcSwap::from_pointee(directory),
            write_lock: Mutex::new(()),
        }
    }

    pub fn from_seed(seed: &DirectorySeed) -> Result<Self, InternalError> {
        Directory::from_seed(seed).map(Self::new)
    }

    // Clone the current snapshot, apply `edit`, publish on success.
    fn update(
        &self,
        edit: impl FnOnce(&mut Directory) -> Result<(), InternalError>,
    ) -> Result<(), InternalError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let mut next = Directory::clone(&self.current.load());
        edit(&mut next)?;
        next.reindex();
        self.current.store(Arc::new(next));

        Ok(())
    }
}

impl Default for MemoryCatalog {
    fn default() -> Self {
        let mut directory = Directory::default();
        directory.reindex();

        Self::new(directory)
    }
}

impl ObjectCatalog for MemoryCatalog {
    type View = Arc<Directory>;

    fn view(&self) -> Self::View {
        self.current.load_full()
    }
}

impl CatalogWriter for MemoryCatalog {
    fn modify_properties(
        &self,
        mid: Mid,
        remove: &[PropTag],
        set: &[TaggedValue],
    ) -> Result<(), InternalError> {
        self.update(|dir| {
            let record = dir.record_mut(mid)?;
            for tag in remove {
                record.props.remove(&tag.id());
            }
            for value in set {
                record.props.insert(value.tag.id(), value.value.clone());
            }

            Ok(())
        })
    }

    fn modify_links(
        &self,
        mid: Mid,
        tag: PropTag,
        targets: &[Mid],
        delete: bool,
    ) -> Result<(), InternalError> {
        self.update(|dir| {
            // Phase 1: resolve target DNs against the pre-edit snapshot.
            let mut dns = Vec::with_capacity(targets.len());
            for target in targets {
                let record = dir.record(*target).ok_or_else(|| {
                    InternalError::catalog_not_found(format!("link target {target:?} not found"))
                })?;
                dns.push(record.dn.clone());
            }

            // Phase 2: edit the DN list in place, preserving order.
            let record = dir.record_mut(mid)?;
            let mut links = match record.props.get(&tag.id()) {
                None => Vec::new(),
                Some(PropValue::MultiString8(v) | PropValue::MultiUnicode(v)) => v.clone(),
                Some(other) => {
                    return Err(InternalError::catalog_invariant(format!(
                        "link property {tag} holds {:?}",
                        other.prop_type()
                    )));
                }
            };

            for dn in dns {
                let existing = links.iter().position(|l| l.eq_ignore_ascii_case(&dn));
                match (delete, existing) {
                    (true, Some(at)) => {
                        links.remove(at);
                    }
                    (false, None) => links.push(dn),
                    _ => {}
                }
            }

            record
                .props
                .insert(tag.id(), PropValue::MultiString8(links));

            Ok(())
        })
    }
}
