/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use crate::schema::{
    property::{ActiveLock, DavProperty, DavValue, ResourceType, SupportedLock},
    request::DavPropertyValue,
    response::{Href, List, MultiStatus, PropStat, Response, Status},
};
use std::fmt::{Display, Formatter};
use types::dead_property::{DeadProperty, DeadPropertyTag};

pub trait XmlEscape {
    fn write_escaped_to(&self, f: &mut Formatter<'_>) -> std::fmt::Result;
}

impl XmlEscape for str {
    fn write_escaped_to(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for ch in self.chars() {
            match ch {
                '&' => f.write_str("&amp;")?,
                '<' => f.write_str("&lt;")?,
                '>' => f.write_str("&gt;")?,
                '"' => f.write_str("&quot;")?,
                _ => std::fmt::Write::write_char(f, ch)?,
            }
        }
        Ok(())
    }
}

trait WriteXmlTo {
    fn write_xml_to(&self, f: &mut Formatter<'_>) -> std::fmt::Result;
}

impl Display for MultiStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
        write!(
            f,
            "<D:multistatus xmlns:D=\"DAV:\">{}</D:multistatus>",
            self.response
        )
    }
}

impl<T: Display> Display for List<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for item in &self.0 {
            item.fmt(f)?;
        }
        Ok(())
    }
}

impl Display for Response {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "<D:response>{}", self.href)?;
        if let Some(location) = &self.location {
            write!(f, "<D:location>{location}</D:location>")?;
        }
        for propstat in &self.propstat {
            propstat.fmt(f)?;
        }
        write!(f, "</D:response>")
    }
}

impl Display for Href {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "<D:href>")?;
        self.0.write_escaped_to(f)?;
        write!(f, "</D:href>")
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "<D:status>HTTP/1.1 {} {}</D:status>",
            self.0.as_u16(),
            self.0.canonical_reason().unwrap_or_default()
        )
    }
}

impl Display for PropStat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "<D:propstat><D:prop>")?;
        for prop in &self.prop {
            prop.fmt(f)?;
        }
        write!(f, "</D:prop>{}</D:propstat>", self.status)
    }
}

impl Display for DavPropertyValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.property {
            DavProperty::WebDav(property) => {
                if !matches!(self.value, DavValue::Null) {
                    write!(f, "<D:{}>", property.name())?;
                    self.value.write_xml_to(f)?;
                    write!(f, "</D:{}>", property.name())
                } else {
                    write!(f, "<D:{}/>", property.name())
                }
            }
            DavProperty::DeadProperty(tag) => {
                let attrs = tag.attrs.as_deref().unwrap_or_default();
                let space = if attrs.is_empty() { "" } else { " " };
                if !matches!(self.value, DavValue::Null) {
                    write!(f, "<{}{space}{attrs}>", tag.name)?;
                    self.value.write_xml_to(f)?;
                    write!(f, "</{}>", tag.name)
                } else {
                    write!(f, "<{}{space}{attrs}/>", tag.name)
                }
            }
        }
    }
}

impl WriteXmlTo for DavValue {
    fn write_xml_to(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DavValue::Null => Ok(()),
            DavValue::String(value) => value.as_str().write_escaped_to(f),
            DavValue::Uint64(value) => write!(f, "{value}"),
            DavValue::Rfc1123Date(date) => date.fmt(f),
            DavValue::Rfc3339Date(date) => date.fmt(f),
            DavValue::ResourceType(items) => {
                for item in items {
                    item.fmt(f)?;
                }
                Ok(())
            }
            DavValue::ActiveLocks(locks) => {
                for lock in locks {
                    lock.fmt(f)?;
                }
                Ok(())
            }
            DavValue::SupportedLock(supported) => supported.fmt(f),
            DavValue::DeadProperty(dead) => dead.write_xml_to(f),
        }
    }
}

impl Display for ResourceType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceType::Collection => write!(f, "<D:collection/>"),
        }
    }
}

impl Display for SupportedLock {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for kind in &self.0 {
            write!(
                f,
                concat!(
                    "<D:lockentry>",
                    "<D:lockscope><D:{}/></D:lockscope>",
                    "<D:locktype><D:{}/></D:locktype>",
                    "</D:lockentry>"
                ),
                kind.scope.as_str(),
                kind.lock_type.as_str()
            )?;
        }
        Ok(())
    }
}

impl Display for ActiveLock {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            concat!(
                "<D:activelock>",
                "<D:lockscope><D:{}/></D:lockscope>",
                "<D:locktype><D:{}/></D:locktype>",
                "<D:depth>{}</D:depth>"
            ),
            self.scope.as_str(),
            self.lock_type.as_str(),
            if self.depth_infinity { "Infinity" } else { "0" }
        )?;
        if let Some(owner) = &self.owner {
            write!(f, "<D:owner>")?;
            owner.as_str().write_escaped_to(f)?;
            write!(f, "</D:owner>")?;
        }
        write!(f, "<D:timeout>Second-{}</D:timeout>", self.timeout)?;
        write!(f, "<D:locktoken><D:href>")?;
        self.token.as_str().write_escaped_to(f)?;
        write!(f, "</D:href></D:locktoken>")?;
        write!(f, "<D:lockroot><D:href>")?;
        self.root.as_str().write_escaped_to(f)?;
        write!(f, "</D:href></D:lockroot>")?;
        write!(f, "</D:activelock>")
    }
}

impl WriteXmlTo for DeadProperty {
    fn write_xml_to(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut open_tags = Vec::new();
        for tag in &self.0 {
            match tag {
                DeadPropertyTag::ElementStart(element) => {
                    match &element.attrs {
                        Some(attrs) => write!(f, "<{} {attrs}>", element.name)?,
                        None => write!(f, "<{}>", element.name)?,
                    }
                    open_tags.push(element.name.as_str());
                }
                DeadPropertyTag::ElementEnd => {
                    if let Some(name) = open_tags.pop() {
                        write!(f, "</{name}>")?;
                    }
                }
                DeadPropertyTag::Text(text) => {
                    text.as_str().write_escaped_to(f)?;
                }
            }
        }
        Ok(())
    }
}
