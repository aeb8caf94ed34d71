/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "test_mode", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "test_mode", serde(tag = "type", content = "data"))]
pub enum DeadPropertyTag {
    ElementStart(DeadElementTag),
    ElementEnd,
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "test_mode", derive(serde::Serialize, serde::Deserialize))]
pub struct DeadElementTag {
    pub name: String,
    pub attrs: Option<String>,
}

// Resource-defined ("dead") properties are kept as a flat tag stream so that
// arbitrary XML fragments survive storage and reserialization unmodified.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "test_mode", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "test_mode", serde(transparent))]
#[repr(transparent)]
pub struct DeadProperty(pub Vec<DeadPropertyTag>);

impl DeadProperty {
    pub fn find_tag(&self, needle: &DeadElementTag) -> Option<DeadProperty> {
        let mut depth: u32 = 0;
        let mut tags = Vec::new();
        let mut found_tag = false;

        for tag in self.0.iter() {
            match tag {
                DeadPropertyTag::ElementStart(start) => {
                    if depth == 0 && start.matches(needle) {
                        found_tag = true;
                    } else if found_tag {
                        tags.push(tag.clone());
                    }

                    depth += 1;
                }
                DeadPropertyTag::ElementEnd => {
                    if found_tag {
                        if depth == 1 {
                            break;
                        } else {
                            tags.push(tag.clone());
                        }
                    }
                    depth = depth.saturating_sub(1);
                }
                DeadPropertyTag::Text(_) => {
                    if found_tag {
                        tags.push(tag.clone());
                    }
                }
            }
        }

        if found_tag {
            Some(DeadProperty(tags))
        } else {
            None
        }
    }

    pub fn add_element(&mut self, element: DeadElementTag, values: Vec<DeadPropertyTag>) {
        self.0.push(DeadPropertyTag::ElementStart(element));
        self.0.extend(values);
        self.0.push(DeadPropertyTag::ElementEnd);
    }

    pub fn remove_element(&mut self, element: &DeadElementTag) {
        let mut depth = 0;
        let mut remove = false;
        self.0.retain(|item| match item {
            DeadPropertyTag::ElementStart(tag) => {
                if depth == 0 && !remove && tag.matches(element) {
                    remove = true;
                }
                depth += 1;

                !remove
            }
            DeadPropertyTag::ElementEnd => {
                depth -= 1;
                if remove && depth == 0 {
                    remove = false;
                    false
                } else {
                    !remove
                }
            }
            _ => !remove,
        });
    }

    // Splits the stream into its top-level (element, contents) pairs.
    pub fn to_pairs(&self) -> Vec<(DeadElementTag, DeadProperty)> {
        let mut depth: u32 = 0;
        let mut pairs = Vec::new();
        let mut tags = Vec::new();
        let mut tag_start = None;

        for tag in self.0.iter() {
            match tag {
                DeadPropertyTag::ElementStart(start) => {
                    if depth == 0 {
                        tag_start = Some(start.clone());
                    } else {
                        tags.push(tag.clone());
                    }

                    depth += 1;
                }
                DeadPropertyTag::ElementEnd => {
                    depth = depth.saturating_sub(1);

                    if depth > 0 {
                        tags.push(tag.clone());
                    } else if let Some(tag_start) = tag_start.take() {
                        pairs.push((tag_start, DeadProperty(std::mem::take(&mut tags))));
                    }
                }
                DeadPropertyTag::Text(_) => {
                    if tag_start.is_some() {
                        tags.push(tag.clone());
                    }
                }
            }
        }

        pairs
    }

}

impl DeadElementTag {
    pub fn new(name: impl Into<String>, attrs: Option<String>) -> Self {
        DeadElementTag {
            name: name.into(),
            attrs,
        }
    }

    // Two tags name the same property when their local names and namespace
    // declarations agree; the prefix itself is not significant.
    pub fn matches(&self, other: &DeadElementTag) -> bool {
        self.name == other.name && self.attrs == other.attrs
    }
}

impl Default for DeadProperty {
    fn default() -> Self {
        DeadProperty(Vec::with_capacity(4))
    }
}
