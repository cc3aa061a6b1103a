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

//! Call-edge detection.

use std::collections::BTreeSet;

use crate::instr::{is_word_char, next_token, Instruction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    /// `call` / `rcall`, anywhere in the body.
    Direct,
    /// `jmp` / `rjmp` as the last instruction: the compiler folded call + ret.
    Tail,
    /// `icall` / `eicall`. The target is only known at run time.
    Indirect,
    NotACall,
}

/// Kind of control transfer `opcode` makes. `is_last` says whether the
/// instruction ends the function body, which is what turns a jump into a
/// tail call.
pub fn classify_call(opcode: &str, is_last: bool) -> CallKind {
    match opcode {
        "call" | "rcall" => CallKind::Direct,
        "jmp" | "rjmp" if is_last => CallKind::Tail,
        "icall" | "eicall" => CallKind::Indirect,
        _ => CallKind::NotACall,
    }
}

/// Name of the function called by `instr`, if it is a call edge whose target
/// the disassembler resolved.
pub fn call_target<'a>(instr: &Instruction<'a>, is_last: bool) -> Option<&'a str> {
    match classify_call(instr.opcode, is_last) {
        CallKind::Direct | CallKind::Tail => instr.rest.and_then(resolve_target),
        CallKind::Indirect | CallKind::NotACall => None,
    }
}

/// Pull the symbol out of `<operand> ; <address> <<name>>`.
///
/// Targets inside a function (`<main+0x12>`) are not function entries and
/// yield nothing.
pub fn resolve_target(rest: &str) -> Option<&str> {
    let (_operand, after_operand) = next_token(rest)?;
    let comment = after_operand.trim_start();
    if comment.len() == after_operand.len() {
        return None;
    }

    let after_semicolon = comment.strip_prefix(';')?;
    let (address, after_address) = next_token(after_semicolon)?;
    if after_semicolon.len() == after_semicolon.trim_start().len()
        || !address
            .bytes()
            .all(|b| matches!(b, b'x' | b'0'..=b'9' | b'a'..=b'f'))
    {
        return None;
    }

    let symbol = after_address.trim_start().strip_prefix('<')?;
    let close = symbol.find('>')?;
    let name = &symbol[..close];
    (!name.is_empty() && name.chars().all(is_word_char)).then_some(name)
}

/// Resolved callees of a function body. The last instruction may be a tail
/// call; duplicates collapse.
pub fn collect_callees(instructions: &[Instruction<'_>]) -> BTreeSet<String> {
    let last = instructions.len().saturating_sub(1);
    instructions
        .iter()
        .enumerate()
        .filter_map(|(i, instr)| call_target(instr, i == last))
        .map(str::to_string)
        .collect()
}
