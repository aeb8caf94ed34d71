/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use super::property::{DavProperty, DavValue};

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(test, derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(test, serde(tag = "type", content = "data"))]
pub enum PropFind {
    PropName,
    AllProp(Vec<DavProperty>),
    Prop(Vec<DavProperty>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(test, derive(serde::Serialize, serde::Deserialize))]
pub struct DavPropertyValue {
    pub property: DavProperty,
    pub value: DavValue,
}

impl DavPropertyValue {
    pub fn new(property: DavProperty, value: impl Into<DavValue>) -> Self {
        DavPropertyValue {
            property,
            value: value.into(),
        }
    }

    pub fn empty(property: DavProperty) -> Self {
        DavPropertyValue {
            property,
            value: DavValue::Null,
        }
    }
}

impl Default for PropFind {
    fn default() -> Self {
        PropFind::AllProp(Vec::new())
    }
}

impl PropFind {
    pub fn is_all_prop(&self) -> bool {
        matches!(self, PropFind::AllProp(_))
    }
}
