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

//! Worst-case stack depth along every call path from a root function.

use log::debug;
use serde::Serialize;

use crate::symbols::FunctionIndex;

/// Deepest call level that is still expanded. Beyond it the branch is cut;
/// this is what stops mutual recursion, which is not detected otherwise.
pub const DEFAULT_MAX_DEPTH: usize = 20;

/// Tuning for [`walk`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkOptions {
    pub max_depth: usize,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallTree {
    pub root: CallNode,
    /// Largest cumulative stack size seen on any path.
    pub deepest: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallNode {
    pub name: String,
    pub depth: usize,
    /// This function's own frame.
    pub own: u32,
    /// Sum of frames from the root down to and including this node.
    pub cumulative: u32,
    /// False for names missing from the index (library or external code).
    pub resolved: bool,
    /// Set when the depth cap stopped expansion here.
    pub too_deep: bool,
    pub edges: Vec<CallEdge>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CallEdge {
    Call(CallNode),
    /// The function calls itself; not expanded.
    Recursive { name: String },
}

/// Walk the call graph from `root`, accumulating frame sizes along every
/// path, and report the largest total found.
///
/// Names missing from `index` are leaves with a zero frame, including an
/// unknown root. A function calling itself is recorded as a
/// [`CallEdge::Recursive`] and not followed. A node deeper than
/// `options.max_depth` is recorded with `too_deep` set and its branch is
/// dropped from the `deepest` figure.
pub fn walk(index: &FunctionIndex, root: &str, options: WalkOptions) -> CallTree {
    let (root, deepest) = visit(index, root, 0, 0, options);
    CallTree { root, deepest }
}

fn visit(
    index: &FunctionIndex,
    name: &str,
    ancestors: u32,
    depth: usize,
    options: WalkOptions,
) -> (CallNode, u32) {
    let function = index.get(name);
    let own = function.map_or(0, |f| f.stack_size());
    let cumulative = ancestors.saturating_add(own);

    let mut node = CallNode {
        name: name.to_string(),
        depth,
        own,
        cumulative,
        resolved: function.is_some(),
        too_deep: false,
        edges: Vec::new(),
    };

    if depth > options.max_depth {
        debug!("{} nested too deeply at depth {}", name, depth);
        node.too_deep = true;
        // The cut branch is abandoned: only the path down to the parent counts.
        return (node, ancestors);
    }

    let mut deepest = cumulative;
    if let Some(function) = function {
        for callee in function.callees() {
            if callee == name {
                debug!("{} calls itself", name);
                node.edges.push(CallEdge::Recursive {
                    name: name.to_string(),
                });
                continue;
            }
            let (child, child_deepest) = visit(index, callee, cumulative, depth + 1, options);
            deepest = deepest.max(child_deepest);
            node.edges.push(CallEdge::Call(child));
        }
    }

    (node, deepest)
}

impl CallNode {
    /// Nodes actually visited below this one, in walk order.
    pub fn children(&self) -> impl Iterator<Item = &CallNode> {
        self.edges.iter().filter_map(|edge| match edge {
            CallEdge::Call(child) => Some(child),
            CallEdge::Recursive { .. } => None,
        })
    }
}
