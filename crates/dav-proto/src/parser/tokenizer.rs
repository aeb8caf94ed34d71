/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use crate::parser::{Error, Result};
use quick_xml::{
    events::{BytesStart, Event},
    name::ResolveResult,
    NsReader,
};
use std::borrow::Cow;

pub const DAV_NAMESPACE: &[u8] = b"DAV:";

pub struct Tokenizer<'x> {
    reader: NsReader<&'x [u8]>,
    pending_end: bool,
}

#[derive(Debug)]
pub struct RawElement<'x> {
    pub element: BytesStart<'x>,
    pub namespace: Option<Vec<u8>>,
}

#[derive(Debug)]
pub enum Token<'x> {
    ElementStart(RawElement<'x>),
    ElementEnd,
    Text(Cow<'x, str>),
    Bytes(Cow<'x, [u8]>),
    Eof,
}

impl<'x> RawElement<'x> {
    pub fn new(element: BytesStart<'x>, resolve: ResolveResult<'_>) -> Self {
        RawElement {
            element,
            namespace: match resolve {
                ResolveResult::Bound(ns) => Some(ns.0.to_vec()),
                _ => None,
            },
        }
    }

    pub fn is_dav(&self, name: &[u8]) -> bool {
        self.in_dav_namespace() && self.element.local_name().as_ref() == name
    }

    pub fn in_dav_namespace(&self) -> bool {
        self.namespace.as_deref() == Some(DAV_NAMESPACE)
    }
}

impl<'x> Tokenizer<'x> {
    pub fn new(input: &'x [u8]) -> Self {
        Tokenizer {
            reader: NsReader::from_reader(input),
            pending_end: false,
        }
    }

    pub fn token(&mut self) -> Result<Token<'x>> {
        if self.pending_end {
            self.pending_end = false;
            return Ok(Token::ElementEnd);
        }

        loop {
            let (resolve, event) = self.reader.read_resolved_event()?;
            match event {
                Event::Start(element) => {
                    return Ok(Token::ElementStart(RawElement::new(element, resolve)));
                }
                Event::Empty(element) => {
                    self.pending_end = true;
                    return Ok(Token::ElementStart(RawElement::new(element, resolve)));
                }
                Event::End(_) => {
                    return Ok(Token::ElementEnd);
                }
                Event::Text(text) => {
                    let text = text
                        .unescape()
                        .map_err(|err| Error::Escape(err.to_string()))?;
                    if !text.trim().is_empty() {
                        return Ok(Token::Text(Cow::Owned(text.into_owned())));
                    }
                }
                Event::CData(data) => {
                    return Ok(Token::Bytes(Cow::Owned(data.into_inner().into_owned())));
                }
                Event::Eof => {
                    return Ok(Token::Eof);
                }
                _ => (),
            }
        }
    }

    /// Consumes the remainder of the element whose start token was just
    /// returned, including all nested content.
    pub fn skip_subtree(&mut self) -> Result<()> {
        if self.pending_end {
            self.pending_end = false;
            return Ok(());
        }

        let mut depth = 1;
        while depth > 0 {
            match self.token()? {
                Token::ElementStart(_) => depth += 1,
                Token::ElementEnd => depth -= 1,
                Token::Eof => return Err(Error::Eof),
                _ => (),
            }
        }

        Ok(())
    }
}
