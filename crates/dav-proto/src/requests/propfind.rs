/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use crate::{
    parser::{tokenizer::Token, tokenizer::Tokenizer, DavParser, Error, Result},
    schema::{property::DavProperty, request::PropFind},
};

impl DavParser for PropFind {
    fn parse(stream: &mut Tokenizer<'_>) -> Result<Self> {
        match stream.token()? {
            Token::ElementStart(raw) if raw.is_dav(b"propfind") => (),
            _ => return Err(Error::UnexpectedToken("DAV:propfind")),
        }

        let mut prop_names = false;
        let mut all_prop = false;
        let mut has_prop = false;
        let mut include = Vec::new();
        let mut props = Vec::new();

        loop {
            match stream.token()? {
                Token::ElementStart(raw) => {
                    if raw.is_dav(b"propname") {
                        prop_names = true;
                        stream.skip_subtree()?;
                    } else if raw.is_dav(b"allprop") {
                        all_prop = true;
                        stream.skip_subtree()?;
                    } else if raw.is_dav(b"include") {
                        parse_property_names(stream, &mut include)?;
                    } else if raw.is_dav(b"prop") {
                        has_prop = true;
                        parse_property_names(stream, &mut props)?;
                    } else {
                        stream.skip_subtree()?;
                    }
                }
                Token::ElementEnd | Token::Eof => break,
                _ => (),
            }
        }

        if prop_names {
            Ok(PropFind::PropName)
        } else if all_prop {
            Ok(PropFind::AllProp(include))
        } else if has_prop {
            // An empty prop list is valid: it selects nothing.
            Ok(PropFind::Prop(props))
        } else {
            Err(Error::UnexpectedToken(
                "DAV:propname, DAV:allprop or DAV:prop",
            ))
        }
    }
}

fn parse_property_names(stream: &mut Tokenizer<'_>, props: &mut Vec<DavProperty>) -> Result<()> {
    loop {
        match stream.token()? {
            Token::ElementStart(raw) => {
                let property = DavProperty::from(&raw);
                stream.skip_subtree()?;
                if !props.contains(&property) {
                    props.push(property);
                }
            }
            Token::ElementEnd => return Ok(()),
            Token::Eof => return Err(Error::Eof),
            _ => (),
        }
    }
}
