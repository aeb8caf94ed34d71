/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use dav_proto::schema::{property::DavProperty, request::PropFind};

/// Per-entry view of the parsed request body: decides, property by property,
/// whether it is shown and whether its value is included.
///
/// In the explicit variant every matched name is removed from `unmatched`;
/// whatever is left when the entry settles becomes the not-found propstat.
#[derive(Debug)]
pub(crate) enum PropertyRule {
    All,
    NamesOnly,
    Explicit { unmatched: Vec<DavProperty> },
}

impl PropertyRule {
    pub fn new(propfind: &PropFind) -> Self {
        match propfind {
            PropFind::PropName => PropertyRule::NamesOnly,
            PropFind::AllProp(_) => PropertyRule::All,
            PropFind::Prop(props) => PropertyRule::Explicit {
                unmatched: props.clone(),
            },
        }
    }

    pub fn must_display(&mut self, property: &DavProperty) -> bool {
        match self {
            PropertyRule::All | PropertyRule::NamesOnly => true,
            PropertyRule::Explicit { unmatched } => {
                if let Some(idx) = unmatched.iter().position(|item| item == property) {
                    unmatched.remove(idx);
                    true
                } else {
                    false
                }
            }
        }
    }

    pub fn must_display_value(&self, _property: &DavProperty) -> bool {
        match self {
            PropertyRule::All | PropertyRule::Explicit { .. } => true,
            PropertyRule::NamesOnly => false,
        }
    }

    pub fn into_unmatched(self) -> Vec<DavProperty> {
        match self {
            PropertyRule::Explicit { unmatched } => unmatched,
            _ => Vec::new(),
        }
    }
}
