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

use std::collections::BTreeSet;
use std::fmt;

use log::{debug, trace};

use crate::calls::collect_callees;
use crate::frame::estimate_frame_size;
use crate::instr::{match_header, match_instruction, Instruction};

/// Name given to a block whose first line is not a symbol header.
pub const UNKNOWN_FUNCTION: &str = "unknown";

/// One symbol block of the listing. Callees and frame size are computed when
/// the record is built and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    name: String,
    address: u64,
    body: Vec<String>,
    callees: BTreeSet<String>,
    stack_size: u32,
}

impl Function {
    /// Build a record from the lines of one block. If the first line is not a
    /// header the block becomes an `unknown` placeholder at address 0 and that
    /// line stays part of the body.
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Self {
        let header = lines.first().and_then(|l| match_header(l.as_ref()));
        let (name, address, body_lines) = match header {
            Some(h) => (h.name.to_string(), h.address, &lines[1..]),
            None => {
                debug!(
                    "block without symbol header: {:?}",
                    lines.first().map(|l| l.as_ref()).unwrap_or_default()
                );
                (UNKNOWN_FUNCTION.to_string(), 0, lines)
            }
        };

        let instructions: Vec<Instruction<'_>> = body_lines
            .iter()
            .filter_map(|l| match_instruction(l.as_ref()))
            .collect();
        let callees = collect_callees(&instructions);
        let stack_size = estimate_frame_size(&instructions);

        trace!(
            "{} @0x{:x}: {} instructions, frame {} bytes, callees {:?}",
            name,
            address,
            instructions.len(),
            stack_size,
            callees
        );

        Self {
            name,
            address,
            body: body_lines.iter().map(|l| l.as_ref().to_string()).collect(),
            callees,
            stack_size,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> u64 {
        self.address
    }

    pub fn body(&self) -> &[String] {
        &self.body
    }

    /// Resolved callees in name order.
    pub fn callees(&self) -> impl Iterator<Item = &str> {
        self.callees.iter().map(String::as_str)
    }

    pub fn calls(&self, name: &str) -> bool {
        self.callees.contains(name)
    }

    pub fn stack_size(&self) -> u32 {
        self.stack_size
    }

    pub fn is_placeholder(&self) -> bool {
        self.address == 0 && self.name == UNKNOWN_FUNCTION
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Function name={} addr=0x{:04x}>", self.name, self.address)
    }
}
