// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Converts a deck to and from its XML file format:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <flashcards>
//!   <flashcard>
//!     <side1><![CDATA[question]]></side1>
//!     <side2><![CDATA[answer]]></side2>
//!   </flashcard>
//! </flashcards>
//! ```
//!
//! Card text is written verbatim into CDATA sections. The parser strips the
//! whitespace that pretty-printing puts around a side, but never touches the
//! inside of a CDATA section.

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::BytesCData;
use quick_xml::events::BytesDecl;
use quick_xml::events::BytesEnd;
use quick_xml::events::BytesStart;
use quick_xml::events::Event;

use crate::error::DeckError;
use crate::store::DeckStore;
use crate::types::card::Card;

const ROOT: &str = "flashcards";
const CARD: &str = "flashcard";
const SIDE_A: &str = "side1";
const SIDE_B: &str = "side2";

/// Serializes the deck in canonical order.
pub fn serialize(store: &DeckStore) -> Result<Vec<u8>, DeckError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    write_deck(&mut writer, store).map_err(|e| DeckError::format(0, e.to_string()))?;
    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    log::debug!("Serialized {} cards into {} bytes.", store.len(), bytes.len());
    Ok(bytes)
}

fn write_deck(writer: &mut Writer<Vec<u8>>, store: &DeckStore) -> Result<(), quick_xml::Error> {
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new(ROOT)))?;
    for card in store.all() {
        writer.write_event(Event::Start(BytesStart::new(CARD)))?;
        write_side(writer, SIDE_A, card.side_a())?;
        write_side(writer, SIDE_B, card.side_b())?;
        writer.write_event(Event::End(BytesEnd::new(CARD)))?;
    }
    writer.write_event(Event::End(BytesEnd::new(ROOT)))?;
    Ok(())
}

fn write_side(writer: &mut Writer<Vec<u8>>, tag: &str, text: &str) -> Result<(), quick_xml::Error> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    for section in cdata_sections(text) {
        writer.write_event(Event::CData(BytesCData::new(section)))?;
    }
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

/// A CDATA section cannot contain `]]>`, so the text is cut between the
/// brackets and the `>` and written as adjacent sections.
fn cdata_sections(text: &str) -> Vec<&str> {
    let mut sections = Vec::new();
    let mut rest = text;
    while let Some(at) = rest.find("]]>") {
        sections.push(&rest[..at + 2]);
        rest = &rest[at + 2..];
    }
    sections.push(rest);
    sections
}

/// Parses a deck file.
pub fn deserialize(bytes: &[u8]) -> Result<DeckStore, DeckError> {
    let text = std::str::from_utf8(bytes).map_err(|e| {
        DeckError::format(e.valid_up_to() as u64, format!("invalid UTF-8: {e}"))
    })?;
    if text.trim().is_empty() {
        log::warn!("Deck file is empty, treating it as a deck with no cards.");
        return Ok(DeckStore::new());
    }

    let mut reader = Reader::from_str(text);
    reader.config_mut().expand_empty_elements = true;

    let mut stack: Vec<String> = Vec::new();
    let mut seen_root = false;
    let mut cards: Vec<Card> = Vec::new();
    let mut pending: Option<PendingCard> = None;
    let mut side: Option<Vec<Segment>> = None;

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => return Err(DeckError::format(reader.buffer_position() as u64, e.to_string())),
        };
        let position = reader.buffer_position() as u64;
        match event {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                match (stack.len(), name.as_str()) {
                    (0, ROOT) if !seen_root => seen_root = true,
                    (0, ROOT) => {
                        return Err(DeckError::format(position, "more than one <flashcards> element"));
                    }
                    (0, other) => {
                        return Err(DeckError::format(
                            position,
                            format!("expected <flashcards> as the root element, found <{other}>"),
                        ));
                    }
                    (1, CARD) => pending = Some(PendingCard::default()),
                    (2, SIDE_A | SIDE_B) if pending.is_some() => side = Some(Vec::new()),
                    _ => {}
                }
                stack.push(name);
            }
            Event::End(_) => {
                let name = stack.pop().unwrap_or_default();
                match (stack.len(), name.as_str()) {
                    (2, SIDE_A | SIDE_B) => {
                        if let (Some(card), Some(segments)) = (pending.as_mut(), side.take()) {
                            card.set(&name, assemble(segments), cards.len() + 1, position)?;
                        }
                    }
                    (1, CARD) => {
                        if let Some(card) = pending.take() {
                            cards.push(card.finish(cards.len() + 1, position)?);
                        }
                    }
                    _ => {}
                }
            }
            Event::Text(e) if stack.is_empty() => {
                if !e.iter().all(u8::is_ascii_whitespace) {
                    return Err(DeckError::format(position, "text outside the root element"));
                }
            }
            Event::CData(_) if stack.is_empty() => {
                return Err(DeckError::format(position, "text outside the root element"));
            }
            Event::Text(e) => {
                if let (3, Some(segments)) = (stack.len(), side.as_mut()) {
                    let text = e
                        .unescape()
                        .map_err(|err| DeckError::format(position, err.to_string()))?;
                    segments.push(Segment::Text(text.into_owned()));
                }
            }
            Event::CData(e) => {
                if let (3, Some(segments)) = (stack.len(), side.as_mut()) {
                    segments.push(Segment::CData(String::from_utf8_lossy(&e).into_owned()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(DeckError::format(
            text.len() as u64,
            format!("unexpected end of file inside <{open}>"),
        ));
    }
    if !seen_root {
        return Err(DeckError::format(0, "missing <flashcards> root element"));
    }
    log::debug!("Parsed {} cards.", cards.len());
    Ok(cards.into_iter().collect())
}

enum Segment {
    Text(String),
    CData(String),
}

impl Segment {
    fn is_formatting(&self) -> bool {
        match self {
            Segment::Text(text) => text.trim().is_empty(),
            Segment::CData(_) => false,
        }
    }
}

/// Joins the pieces of a side. Whitespace-only text at either edge is
/// indentation; the outer whitespace of edge text nodes is trimmed; CDATA is
/// kept byte for byte.
fn assemble(segments: Vec<Segment>) -> String {
    let start = segments
        .iter()
        .position(|s| !s.is_formatting())
        .unwrap_or(segments.len());
    let end = segments
        .iter()
        .rposition(|s| !s.is_formatting())
        .map_or(start, |i| i + 1);
    let kept = &segments[start..end];
    let mut out = String::new();
    for (i, segment) in kept.iter().enumerate() {
        match segment {
            Segment::CData(text) => out.push_str(text),
            Segment::Text(text) => {
                let mut text = text.as_str();
                if i == 0 {
                    text = text.trim_start();
                }
                if i + 1 == kept.len() {
                    text = text.trim_end();
                }
                out.push_str(text);
            }
        }
    }
    out
}

#[derive(Default)]
struct PendingCard {
    side_a: Option<String>,
    side_b: Option<String>,
}

impl PendingCard {
    fn set(&mut self, tag: &str, text: String, number: usize, position: u64) -> Result<(), DeckError> {
        let slot = if tag == SIDE_A {
            &mut self.side_a
        } else {
            &mut self.side_b
        };
        if slot.is_some() {
            return Err(DeckError::format(
                position,
                format!("flashcard {number} has more than one <{tag}>"),
            ));
        }
        *slot = Some(text);
        Ok(())
    }

    fn finish(self, number: usize, position: u64) -> Result<Card, DeckError> {
        match (self.side_a, self.side_b) {
            (Some(side_a), Some(side_b)) => {
                let card = Card::new(side_a, side_b);
                if !card.is_complete() {
                    log::warn!("Flashcard {number} has a blank side.");
                }
                Ok(card)
            }
            (None, _) => Err(DeckError::format(
                position,
                format!("flashcard {number} has no <{SIDE_A}>"),
            )),
            (_, None) => Err(DeckError::format(
                position,
                format!("flashcard {number} has no <{SIDE_B}>"),
            )),
        }
    }
}
