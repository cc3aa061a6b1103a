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

//! Call-tree and stack-depth analysis for AVR firmware listings.
//!
//! Feed the text of an `avr-objdump -d` / `.lss` listing to
//! [`FunctionIndex::from_listing`], then [`walk`] it from an entry point to
//! get the worst-case stack depth and the tree that produced it.

pub mod call_tree;
pub mod calls;
pub mod debug;
pub mod demangle;
pub mod frame;
pub mod function;
pub mod get_assembly;
pub mod instr;
pub mod report;
pub mod symbols;

// Re-export commonly used API from the library for binaries/tests
pub use call_tree::{walk, CallEdge, CallNode, CallTree, WalkOptions};
pub use function::Function;
pub use get_assembly::{extract_functions, load_listing};
pub use report::RenderOptions;
pub use symbols::FunctionIndex;
