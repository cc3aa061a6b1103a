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

//! Stack-frame size from a function prologue.
//!
//! avr-gcc reserves stack space with a fixed idiom: save registers with
//! `push`, copy SP into the Y register pair, then subtract the frame size
//! from Y (and write Y back to SP):
//!
//! ```text
//! 574a:	cf 93       	push	r28
//! 574c:	cd b7       	in	r28, 0x3d	; 61
//! 574e:	de b7       	in	r29, 0x3e	; 62
//! 5750:	2e 97       	sbiw	r28, 0x0e	; 14
//! ```
//!
//! Large frames use `subi r28, 0x80` + `sbc r29, r1` instead of `sbiw`.

use log::debug;

use crate::instr::{parse_hex_literal, Instruction};

/// Low byte of the Y pointer, which shadows SP while the frame is set up.
pub const FRAME_POINTER_LOW: &str = "r28";

const STACK_POINTER_READS: usize = 2;

/// Bytes reserved by the prologue at the top of `instructions`. Saturates
/// instead of overflowing on absurd immediates.
///
/// Scanning stops at the first instruction that does not fit the idiom, so
/// a function without the idiom reports 0 and a push-only prologue reports
/// its push count.
pub fn estimate_frame_size(instructions: &[Instruction<'_>]) -> u32 {
    let mut iter = instructions.iter().peekable();

    let mut size = 0u32;
    while iter.next_if(|instr| instr.opcode == "push").is_some() {
        size += 1;
    }

    let mut reads = 0;
    while reads < STACK_POINTER_READS && iter.next_if(|instr| instr.opcode == "in").is_some() {
        reads += 1;
    }
    if reads < STACK_POINTER_READS {
        return size;
    }

    match iter.next() {
        Some(instr) if matches!(instr.opcode, "sbiw" | "subi") => {
            size.saturating_add(frame_adjustment(instr).unwrap_or(0))
        }
        _ => size,
    }
}

// `r28, 0x0e ; 14` -> 14
fn frame_adjustment(instr: &Instruction<'_>) -> Option<u32> {
    let mut operands = instr.rest?.split_whitespace();
    if operands.next()?.strip_suffix(',')? != FRAME_POINTER_LOW {
        return None;
    }
    let immediate = operands.next()?;
    let value = parse_hex_literal(immediate);
    if value.is_none() {
        debug!(
            "unparseable frame adjustment {:?} at 0x{:x}",
            immediate, instr.address
        );
    }
    value
}
