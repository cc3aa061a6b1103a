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

//! Text, JSON and dump output for analysis results.

use std::io;

use anyhow::Result;

use crate::call_tree::{CallEdge, CallNode, CallTree};
use crate::demangle::display_name;
use crate::function::Function;

/// Width of the two `{:3} ` size columns in front of each tree line.
const SIZE_COLUMNS: usize = 8;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub demangle: bool,
}

impl RenderOptions {
    fn name<'a>(&self, raw: &'a str) -> std::borrow::Cow<'a, str> {
        if self.demangle {
            display_name(raw)
        } else {
            raw.into()
        }
    }
}

/// Print the tree, one line per visited node, then the summary line:
///
/// ```text
///  16  16 main
///  17   1   helper
///  17   0     leaf
/// Deepest stacksize: 17
/// ```
pub fn write_tree(
    tree: &CallTree,
    options: RenderOptions,
    mut writer: impl io::Write,
) -> io::Result<()> {
    write_node(&tree.root, options, &mut writer)?;
    writeln!(writer, "Deepest stacksize: {}", tree.deepest)
}

fn write_node<W: io::Write>(
    node: &CallNode,
    options: RenderOptions,
    writer: &mut W,
) -> io::Result<()> {
    writeln!(
        writer,
        "{:3} {:3} {}{}",
        node.cumulative,
        node.own,
        "  ".repeat(node.depth),
        options.name(&node.name)
    )?;

    let marker_indent = format!(
        "{}{}",
        " ".repeat(SIZE_COLUMNS),
        "  ".repeat(node.depth + 1)
    );
    if node.too_deep {
        return writeln!(writer, "{marker_indent} !!!! Nested too deeply");
    }

    for edge in &node.edges {
        match edge {
            CallEdge::Call(child) => write_node(child, options, writer)?,
            CallEdge::Recursive { name } => writeln!(
                writer,
                "{marker_indent}{} !!!! Recursive call",
                options.name(name)
            )?,
        }
    }
    Ok(())
}

/// Pretty JSON of the whole tree. Names are always the raw symbols.
pub fn write_json(tree: &CallTree, mut writer: impl io::Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, tree)?;
    writeln!(writer)?;
    Ok(())
}

/// List functions with their callees:
///
/// ```text
/// <Function name=main addr=0x0100>
/// >>	helper
/// >>	leaf
/// ```
pub fn write_dump<'a>(
    functions: impl IntoIterator<Item = &'a Function>,
    options: RenderOptions,
    mut writer: impl io::Write,
) -> io::Result<()> {
    for function in functions {
        writeln!(
            writer,
            "<Function name={} addr=0x{:04x}>",
            options.name(function.name()),
            function.address()
        )?;
        for callee in function.callees() {
            writeln!(writer, ">>\t{}", options.name(callee))?;
        }
    }
    Ok(())
}
