//! Textual command decoding
//!
//! Commands arrive as a `(topic, payload)` pair. Addresses are written as
//! `S<set>M<module>V<attribute>` with decimal set/module ids and a hex
//! attribute id (`V` is optional and defaults to 0).
//!
//! | Topic    | Payload                                          |
//! |----------|--------------------------------------------------|
//! | `SET`    | `S1M0V100 0.5;0.2;S1M1V1 J3 V0 S1M0V0 0 1 0.3 0` |
//! | `CSET`   | `S1M0V0 FF00FF;N JFF0000 00FF00 2`               |
//! | `SSET`   | `S1M1 Hello there`                               |
//! | `DELETE` | `S1M0;SET 2`                                     |
//! | `DTIME`  | `S1M0 2.5;S1M1 N`                                |
//!
//! Entries are separated by `;`. A `SET` entry without an address targets
//! the attribute after the previous entry's, a `CSET` entry starting with `N`
//! does the same for colors. Malformed entries are skipped.

use core::iter::Peekable;

use crate::color::Color;
use crate::id::{ElementId, GlobalAddress};

pub const TOPIC_SET: &str = "SET";
pub const TOPIC_COLOR_SET: &str = "CSET";
pub const TOPIC_STRING_SET: &str = "SSET";
pub const TOPIC_DELETE: &str = "DELETE";
pub const TOPIC_DELETE_TIME: &str = "DTIME";

const DELETE_SET_PREFIX: &str = "SET";
const NEXT_COLOR_MARKER: char = 'N';
const CANCEL_MARKER: &str = "N";

/// Known command topics
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Topic {
    SetFloat,
    SetColor,
    SetText,
    Delete,
    DeleteTime,
}

impl Topic {
    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            TOPIC_SET => Some(Self::SetFloat),
            TOPIC_COLOR_SET => Some(Self::SetColor),
            TOPIC_STRING_SET => Some(Self::SetText),
            TOPIC_DELETE => Some(Self::Delete),
            TOPIC_DELETE_TIME => Some(Self::DeleteTime),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SetFloat => TOPIC_SET,
            Self::SetColor => TOPIC_COLOR_SET,
            Self::SetText => TOPIC_STRING_SET,
            Self::Delete => TOPIC_DELETE,
            Self::DeleteTime => TOPIC_DELETE_TIME,
        }
    }
}

/// Float link parameters, see [`crate::link::CopyOp`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatLinkSpec {
    /// Assign this value right away
    pub jump: Option<f32>,
    /// Initial follower speed
    pub speed: Option<f32>,
    /// Source attribute; when absent an existing link keeps its source
    pub source: Option<GlobalAddress>,
    pub add_offset: f32,
    pub mult_offset: f32,
    pub distance: f32,
    pub time: f32,
}

/// Decoded float value spec
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FloatCommand {
    /// Bare value: written directly, or into the link offset if linked
    Set(f32),
    /// `J<value>` alone: written directly even if linked
    Jump(f32),
    /// Create or update a standing link
    Link(FloatLinkSpec),
}

impl FloatCommand {
    /// Decode `[J<value>] [V<speed>] [S<source>] [add [mult [distance [time]]]]`
    pub fn parse(spec: &str) -> Option<Self> {
        let mut tokens = spec.split_whitespace().peekable();

        let jump = match prefixed(&mut tokens, 'J') {
            Some(value) => Some(parse_float(value)?),
            None => None,
        };
        let speed = match prefixed(&mut tokens, 'V') {
            Some(value) => Some(parse_float(value)?),
            None => None,
        };
        let source = match tokens.next_if(|token| token.starts_with('S')) {
            Some(token) => Some(decode_address(token)?),
            None => None,
        };

        let mut values = [0.0_f32; 4];
        let mut count = 0;
        for (value, token) in values.iter_mut().zip(tokens) {
            *value = parse_float(token)?;
            count += 1;
        }

        match (jump, speed, source, count) {
            (None, None, None, 0) => None,
            (None, None, None, 1) => Some(Self::Set(values[0])),
            (Some(value), None, None, 0) => Some(Self::Jump(value)),
            _ => Some(Self::Link(FloatLinkSpec {
                jump,
                speed,
                source,
                add_offset: values[0],
                mult_offset: values[1],
                distance: values[2],
                time: values[3],
            })),
        }
    }
}

/// Color fade parameters, see [`crate::link::ColorOp`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorLinkSpec {
    pub jump: Option<Color>,
    /// When absent an existing fade keeps its intermediate color
    pub intermediate: Option<Color>,
    pub target: Color,
    pub f1: f32,
    pub f2: f32,
}

/// Decoded color value spec
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorCommand {
    /// Bare color: written directly, or as the fade target if one exists
    Set(Color),
    /// `J<hex>` alone: written directly even if a fade exists
    Jump(Color),
    Link(ColorLinkSpec),
}

impl ColorCommand {
    /// Decode `[J<hex>] [V<hex>] [target [f1 [f2]]]`
    pub fn parse(spec: &str) -> Option<Self> {
        let mut tokens = spec.split_whitespace().peekable();

        let jump = match prefixed(&mut tokens, 'J') {
            Some(hex) => Some(parse_hex_color(hex)?),
            None => None,
        };
        let intermediate = match prefixed(&mut tokens, 'V') {
            Some(hex) => Some(parse_hex_color(hex)?),
            None => None,
        };
        let target = match tokens.next() {
            Some(token) => Some(parse_hex_color(token)?),
            None => None,
        };

        let mut factors = [0.0_f32; 2];
        let mut count = 0;
        for (factor, token) in factors.iter_mut().zip(tokens) {
            *factor = parse_float(token)?;
            count += 1;
        }

        match (jump, intermediate, target, count) {
            (None, None, None, _) => None,
            (None, None, Some(color), 0) => Some(Self::Set(color)),
            (Some(color), None, None, _) => Some(Self::Jump(color)),
            _ => Some(Self::Link(ColorLinkSpec {
                jump,
                intermediate,
                target: target.unwrap_or(Color::BLACK),
                f1: factors[0],
                f2: factors[1],
            })),
        }
    }
}

/// One decoded command entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command<'a> {
    SetFloat(GlobalAddress, FloatCommand),
    SetColor(GlobalAddress, ColorCommand),
    SetText(ElementId, &'a str),
    Delete(ElementId),
    DeleteSet(u8),
    /// Delete once the clock has advanced by the given seconds, `None` cancels
    DeleteAfter(ElementId, Option<f32>),
}

/// Decode a command payload
///
/// Returns `None` for an unknown topic.
pub fn decode<'a>(topic: &str, payload: &'a str) -> Option<Commands<'a>> {
    let topic = Topic::parse_from_str(topic)?;
    Some(Commands {
        topic,
        rest: Some(payload),
        target: None,
    })
}

/// Iterator over the entries of one command payload
#[derive(Debug, Clone)]
pub struct Commands<'a> {
    topic: Topic,
    rest: Option<&'a str>,
    target: Option<GlobalAddress>,
}

impl<'a> Commands<'a> {
    pub const fn topic(&self) -> Topic {
        self.topic
    }

    fn next_entry(&mut self) -> Option<&'a str> {
        let rest = self.rest?;
        // Text may contain separators
        if self.topic == Topic::SetText {
            self.rest = None;
            return Some(rest);
        }
        if let Some((entry, tail)) = rest.split_once(';') {
            self.rest = Some(tail);
            Some(entry)
        } else {
            self.rest = None;
            Some(rest)
        }
    }

    /// Target of an entry: its own address, or the one after the previous
    fn entry_target(&mut self, address: Option<&str>) -> Option<GlobalAddress> {
        if let Some(address) = address {
            self.target = decode_address(address);
            return self.target;
        }
        let target = self.target.as_mut()?;
        target.attribute = target.attribute.wrapping_add(1);
        Some(*target)
    }

    fn decode_entry(&mut self, entry: &'a str) -> Option<Command<'a>> {
        match self.topic {
            Topic::SetFloat => {
                let (address, spec) = if entry.starts_with('S') {
                    let (address, spec) = split_token(entry);
                    (Some(address), spec)
                } else {
                    (None, entry)
                };
                let target = self.entry_target(address)?;
                Some(Command::SetFloat(target, FloatCommand::parse(spec)?))
            }
            Topic::SetColor => {
                let (address, spec) = match entry.strip_prefix(NEXT_COLOR_MARKER) {
                    Some(spec) => (None, spec),
                    None => {
                        let (address, spec) = split_token(entry);
                        (Some(address), spec)
                    }
                };
                let target = self.entry_target(address)?;
                Some(Command::SetColor(target, ColorCommand::parse(spec)?))
            }
            Topic::SetText => {
                let (address, text) = entry.split_once(' ').unwrap_or((entry, ""));
                Some(Command::SetText(decode_address(address)?.element, text))
            }
            Topic::Delete => {
                if let Some(set) = entry.strip_prefix(DELETE_SET_PREFIX) {
                    return set.trim().parse().ok().map(Command::DeleteSet);
                }
                let (address, _) = split_token(entry);
                Some(Command::Delete(decode_address(address)?.element))
            }
            Topic::DeleteTime => {
                let (address, time) = split_token(entry);
                let element = decode_address(address)?.element;
                let time = time.trim();
                if time == CANCEL_MARKER {
                    Some(Command::DeleteAfter(element, None))
                } else {
                    Some(Command::DeleteAfter(element, Some(parse_float(time)?)))
                }
            }
        }
    }
}

impl<'a> Iterator for Commands<'a> {
    type Item = Command<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = self.next_entry()?;
            let entry = if self.topic == Topic::SetText {
                entry.trim_start()
            } else {
                entry.trim()
            };
            if entry.is_empty() {
                continue;
            }
            if let Some(command) = self.decode_entry(entry) {
                return Some(command);
            }
        }
    }
}

/// Decode a `S<set>M<module>[V<hex attribute>]` address token
pub fn decode_address(token: &str) -> Option<GlobalAddress> {
    let rest = token.strip_prefix('S')?;
    let (set_id, rest) = split_digits(rest, 10);
    let rest = rest.strip_prefix('M')?;
    let (module_id, rest) = split_digits(rest, 10);

    let attribute = if rest.is_empty() {
        0
    } else {
        let hex = rest.strip_prefix('V')?;
        let (attribute, rest) = split_digits(hex, 16);
        if !rest.is_empty() {
            return None;
        }
        u16::from_str_radix(attribute, 16).ok()?
    };

    Some(GlobalAddress::new(
        ElementId::new(set_id.parse().ok()?, module_id.parse().ok()?),
        attribute,
    ))
}

/// Decode a hex color: 6 digits are `RRGGBB`, 8 digits `AARRGGBB`
///
/// Accepts an optional `0x` or `#` prefix.
pub fn parse_hex_color(token: &str) -> Option<Color> {
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix('#'))
        .unwrap_or(token);
    // Hex digits only, no sign
    if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_hexdigit()) {
        return None;
    }
    let value = u32::from_str_radix(digits, 16).ok()?;
    match digits.len() {
        1..=6 => Some(Color::from_u32(value)),
        7 | 8 => Some(Color::from_argb(value)),
        _ => None,
    }
}

/// Take the next token if it starts with `prefix`, returning the remainder
fn prefixed<'a, I>(tokens: &mut Peekable<I>, prefix: char) -> Option<&'a str>
where
    I: Iterator<Item = &'a str>,
{
    let value = (*tokens.peek()?).strip_prefix(prefix)?;
    tokens.next();
    Some(value)
}

fn parse_float(token: &str) -> Option<f32> {
    token.parse().ok()
}

/// Split off the first whitespace separated token
fn split_token(entry: &str) -> (&str, &str) {
    match entry.split_once(char::is_whitespace) {
        Some((token, rest)) => (token, rest.trim_start()),
        None => (entry, ""),
    }
}

/// Split a string after its leading run of digits in `radix`
fn split_digits(s: &str, radix: u32) -> (&str, &str) {
    let end = s
        .find(|ch: char| !ch.is_digit(radix))
        .unwrap_or(s.len());
    s.split_at(end)
}
