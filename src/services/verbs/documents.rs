//! Decoding of the two verb XML sources.
//!
//! Both documents are decoded straight into closed variant sets, one per
//! element tag, so downstream code matches exhaustively instead of zipping
//! discriminant arrays by position.

use std::collections::BTreeMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// One decoded row of the verbs document.
#[derive(Debug, Clone, PartialEq)]
pub enum VerbRecord {
    Solo {
        name: String,
        model_a: Option<String>,
    },
    SoloProp {
        name: String,
        model_a: Option<String>,
    },
    HeldProp {
        name: String,
        model_a: Option<String>,
        model_b: Option<String>,
    },
    InteractiveProp {
        name: String,
        model_a: Option<String>,
        model_b: Option<String>,
    },
    Mutual {
        name: String,
        model_a: Option<String>,
        model_b: Option<String>,
    },
    MutualStem {
        name: String,
    },
}

/// One node of a state-machine name-map.
#[derive(Debug, Clone, PartialEq)]
pub enum StateNode {
    /// Ends processing of the current name-map only.
    TerminalState,
    AnimationTransition {
        menu_path: String,
        animation: String,
    },
    GestureTransition {
        menu_path: String,
        animation: String,
    },
}

/// A named, ordered node sequence from the state-machine document.
#[derive(Debug, Clone, PartialEq)]
pub struct NameMap {
    pub name: String,
    pub nodes: Vec<StateNode>,
}

const TAG_SOLO: &[u8] = b"SoloVerb";
const TAG_SOLO_PROP: &[u8] = b"mscope.things.verbs.SoloPropAnimVerb";
const TAG_HELD_PROP: &[u8] = b"HeldPropVerb";
const TAG_PROP: &[u8] = b"PropVerb";
const TAG_MUTUAL: &[u8] = b"MutualVerb";
const TAG_MUTUAL_STEM: &[u8] = b"MutualStemVerb";

const TAG_NAME_MAP: &[u8] = b"namemap";
const TAG_STATE: &[u8] = b"State";
const TAG_ANIM_TRANSITION: &[u8] = b"AnimTransition";
const TAG_GESTURE_TRANSITION: &[u8] = b"GestureTransition";

/// Decode the verbs document into its row list.
pub fn parse_verbs_document(text: &str) -> Result<Vec<VerbRecord>, String> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);
    let mut records = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                let tag = start.name().as_ref().to_vec();
                match tag.as_slice() {
                    TAG_SOLO | TAG_SOLO_PROP | TAG_HELD_PROP | TAG_PROP | TAG_MUTUAL
                    | TAG_MUTUAL_STEM => {
                        let fields = read_fields(&mut reader, &tag)?;
                        records.push(verb_record(&tag, &fields)?);
                    }
                    // Container element; descend.
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(format!("malformed XML: {e}")),
        }
    }

    Ok(records)
}

/// Decode the state-machine document into its name-map list.
pub fn parse_state_machine_document(text: &str) -> Result<Vec<NameMap>, String> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);
    let mut maps: Vec<NameMap> = Vec::new();
    let mut current: Option<NameMap> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => match start.name().as_ref() {
                TAG_NAME_MAP => {
                    current = Some(NameMap {
                        name: attribute_value(&start, b"name")?.unwrap_or_default(),
                        nodes: Vec::new(),
                    });
                }
                TAG_STATE => {
                    push_node(&mut current, StateNode::TerminalState);
                    reader
                        .read_to_end(start.name())
                        .map_err(|e| format!("malformed XML: {e}"))?;
                }
                TAG_ANIM_TRANSITION => {
                    let fields = read_fields(&mut reader, TAG_ANIM_TRANSITION)?;
                    push_node(
                        &mut current,
                        StateNode::AnimationTransition {
                            menu_path: field(&fields, "menuPath").unwrap_or_default(),
                            animation: field(&fields, "name").unwrap_or_default(),
                        },
                    );
                }
                TAG_GESTURE_TRANSITION => {
                    let node = gesture_node(&start)?;
                    push_node(&mut current, node);
                    reader
                        .read_to_end(start.name())
                        .map_err(|e| format!("malformed XML: {e}"))?;
                }
                _ => {}
            },
            Ok(Event::Empty(start)) => match start.name().as_ref() {
                TAG_STATE => push_node(&mut current, StateNode::TerminalState),
                TAG_GESTURE_TRANSITION => {
                    let node = gesture_node(&start)?;
                    push_node(&mut current, node);
                }
                _ => {}
            },
            Ok(Event::End(end)) => {
                if end.name().as_ref() == TAG_NAME_MAP {
                    if let Some(map) = current.take() {
                        maps.push(map);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(format!("malformed XML: {e}")),
        }
    }

    Ok(maps)
}

fn push_node(current: &mut Option<NameMap>, node: StateNode) {
    match current {
        Some(map) => map.nodes.push(node),
        None => log::warn!("State machine node outside a name-map, skipped"),
    }
}

fn gesture_node(start: &BytesStart) -> Result<StateNode, String> {
    Ok(StateNode::GestureTransition {
        menu_path: attribute_value(start, b"menuPath")?.unwrap_or_default(),
        animation: attribute_value(start, b"name")?.unwrap_or_default(),
    })
}

fn attribute_value(start: &BytesStart, key: &[u8]) -> Result<Option<String>, String> {
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| format!("malformed attribute: {e}"))?;
        if attribute.key.as_ref() == key {
            let value = attribute
                .unescape_value()
                .map_err(|e| format!("malformed attribute value: {e}"))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// Read the flat leaf children of `parent` into a field map, consuming the
/// parent's end tag.
fn read_fields(reader: &mut Reader<&[u8]>, parent: &[u8]) -> Result<BTreeMap<String, String>, String> {
    let parent_name = String::from_utf8_lossy(parent).into_owned();
    let mut fields = BTreeMap::new();
    let mut current: Option<String> = None;
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(child)) => {
                if current.is_some() {
                    return Err(format!("unexpected nested element inside <{parent_name}>"));
                }
                current = Some(String::from_utf8_lossy(child.name().as_ref()).into_owned());
                text.clear();
            }
            Ok(Event::Text(value)) => {
                if current.is_some() {
                    let value = value
                        .unescape()
                        .map_err(|e| format!("malformed text inside <{parent_name}>: {e}"))?;
                    text.push_str(&value);
                }
            }
            Ok(Event::Empty(child)) => {
                let name = String::from_utf8_lossy(child.name().as_ref()).into_owned();
                fields.insert(name, String::new());
            }
            Ok(Event::End(end)) => {
                if end.name().as_ref() == parent {
                    break;
                }
                if let Some(field_name) = current.take() {
                    fields.insert(field_name, text.trim().to_string());
                }
            }
            Ok(Event::Eof) => {
                return Err(format!("unexpected end of document inside <{parent_name}>"))
            }
            Ok(_) => {}
            Err(e) => return Err(format!("malformed XML: {e}")),
        }
    }

    Ok(fields)
}

fn verb_record(tag: &[u8], fields: &BTreeMap<String, String>) -> Result<VerbRecord, String> {
    let tag_name = String::from_utf8_lossy(tag).into_owned();
    let name = field(fields, "name")
        .ok_or_else(|| format!("<{tag_name}> element missing <name>"))?;
    let model_a = field(fields, "modelA");
    let model_b = field(fields, "modelB");

    Ok(match tag {
        TAG_SOLO => VerbRecord::Solo { name, model_a },
        TAG_SOLO_PROP => VerbRecord::SoloProp { name, model_a },
        TAG_HELD_PROP => VerbRecord::HeldProp {
            name,
            model_a,
            model_b,
        },
        TAG_PROP => VerbRecord::InteractiveProp {
            name,
            model_a,
            model_b,
        },
        TAG_MUTUAL => VerbRecord::Mutual {
            name,
            model_a,
            model_b,
        },
        TAG_MUTUAL_STEM => VerbRecord::MutualStem { name },
        _ => return Err(format!("unsupported verb element <{tag_name}>")),
    })
}

/// Trimmed, non-empty field lookup.
fn field(fields: &BTreeMap<String, String>, key: &str) -> Option<String> {
    fields
        .get(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
#[path = "tests/documents_tests.rs"]
mod tests;
