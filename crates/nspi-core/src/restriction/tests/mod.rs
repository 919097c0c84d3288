
use crate::{
    prop::{PropTag, PropValue},
    restriction::PropertySource,
};
use std::collections::BTreeMap;

///
/// TestRow
///

#[derive(Clone, Debug, Default)]
pub(super) struct TestRow {
    dn: Option<String>,
    props: BTreeMap<u16, PropValue>,
}

impl TestRow {
    pub(super) fn with(mut self, tag: PropTag, value: PropValue) -> Self {
        self.props.insert(tag.id(), value);
        self
    }

    pub(super) fn with_dn(mut self, dn: &str) -> Self {
        self.dn = Some(dn.to_string());
        self
    }
}

impl PropertySource for TestRow {
    fn prop(&self, tag: PropTag) -> Option<&PropValue> {
        self.props.get(&tag.id())
    }

    fn dn(&self) -> Option<&str> {
        self.dn.as_deref()
    }
}
