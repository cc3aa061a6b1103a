// Copyright (c) 2026 AVR-Stack-Tree Authors.
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

//! Line classification for avr-objdump listings.
//!
//! A listing mixes symbol headers, instruction lines, source lines, section
//! banners and blank lines. We only care about the first two:
//!
//! ```text
//! 00000978 <realloc>:
//!  9f6:	cd 01       	movw	r24, r26
//!  9f8:	20 df       	rcall	.-448    	; 0x83a <free>
//!  a08:	e0 91 f9 04 	lds	r30, 0x04F9
//! ```
//!
//! Everything else is `Line::Unrecognized`, which is a normal outcome and
//! never an error.

/// One instruction line. Borrowed from the listing text, consumed right away
/// by the call resolver and the frame estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction<'a> {
    pub address: u64,
    pub opcode: &'a str,
    /// Operands plus the optional `;` comment, e.g. `.-448 ; 0x83a <free>`.
    pub rest: Option<&'a str>,
}

/// First line of a symbol block: `00000978 <realloc>:`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionHeader<'a> {
    pub address: u64,
    pub name: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    Instruction(Instruction<'a>),
    FunctionHeader(FunctionHeader<'a>),
    Unrecognized,
}

pub fn classify_line(line: &str) -> Line<'_> {
    if let Some(header) = match_header(line) {
        return Line::FunctionHeader(header);
    }
    match match_instruction(line) {
        Some(instr) => Line::Instruction(instr),
        None => Line::Unrecognized,
    }
}

/// Match `<hex-address>: <xx xx> [<xx xx>] <opcode> [<rest>]`.
///
/// Surrounding whitespace is ignored. The second byte group is optional so
/// both 16-bit and 32-bit AVR instructions match.
pub fn match_instruction(line: &str) -> Option<Instruction<'_>> {
    let line = line.trim();
    let colon = line.find(':')?;
    let address = parse_address(&line[..colon])?;

    let after_colon = &line[colon + 1..];
    if !after_colon.starts_with(char::is_whitespace) {
        return None;
    }

    let mut remaining = skip_byte_group(after_colon)?;
    // A second group is only taken when an opcode still follows it.
    if let Some(after_second) = skip_byte_group(remaining) {
        if next_token(after_second).is_some_and(|(tok, _)| tok.starts_with(is_word_char)) {
            remaining = after_second;
        }
    }

    let (token, after_token) = next_token(remaining)?;
    let word_len = token.find(|c| !is_word_char(c)).unwrap_or(token.len());
    if word_len == 0 {
        return None;
    }
    let opcode = &token[..word_len];

    // Operands must be separated from the opcode by whitespace; `lpm.x` style
    // tokens keep the word prefix as opcode and carry no operands.
    let rest = if word_len == token.len() {
        Some(after_token.trim_start()).filter(|r| !r.is_empty())
    } else {
        None
    };

    Some(Instruction {
        address,
        opcode,
        rest,
    })
}

/// Match `<hex-address> <<symbol-name>>:` at the very start of `line`.
pub fn match_header(line: &str) -> Option<FunctionHeader<'_>> {
    let hex_len = line
        .bytes()
        .take_while(|b| is_lower_hex_digit(*b))
        .count();
    let address = parse_address(&line[..hex_len])?;

    let after_hex = &line[hex_len..];
    let trimmed = after_hex.trim_start();
    if trimmed.len() == after_hex.len() {
        return None;
    }

    let inner = trimmed.strip_prefix('<')?;
    let close = inner.find('>')?;
    let name = &inner[..close];
    if name.is_empty() || !name.chars().all(is_word_char) {
        return None;
    }
    if !inner[close + 1..].starts_with(':') {
        return None;
    }

    Some(FunctionHeader { address, name })
}

/// Split off the next whitespace-delimited token.
pub(crate) fn next_token(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    let end = s.find(char::is_whitespace).unwrap_or(s.len());
    Some((&s[..end], &s[end..]))
}

pub(crate) fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Parse a hex literal as printed by the disassembler: `0e`, `0x0e`, `0X0E`.
pub(crate) fn parse_hex_literal(s: &str) -> Option<u32> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    if digits.is_empty() {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

fn is_lower_hex_digit(b: u8) -> bool {
    matches!(b, b'0'..=b'9' | b'a'..=b'f')
}

// objdump prints addresses in lowercase without a prefix.
fn parse_address(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(is_lower_hex_digit) {
        return None;
    }
    u64::from_str_radix(s, 16).ok()
}

fn is_byte_token(tok: &str) -> bool {
    tok.len() == 2 && tok.bytes().all(is_lower_hex_digit)
}

// Consume one `xx xx` group, returning what follows it.
fn skip_byte_group(s: &str) -> Option<&str> {
    let (first, rest) = next_token(s)?;
    let (second, rest) = next_token(rest)?;
    (is_byte_token(first) && is_byte_token(second)).then_some(rest)
}
