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

use std::collections::HashMap;

use log::debug;

use crate::function::Function;
use crate::get_assembly::extract_functions;

/// Every function of one listing, keyed by symbol name. Built once, then only
/// read. A name that is not here is an external or unresolved symbol.
#[derive(Debug, Clone)]
pub struct FunctionIndex {
    by_name: HashMap<String, Function>,
}

impl Default for FunctionIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl FunctionIndex {
    pub fn new() -> Self {
        Self {
            by_name: HashMap::new(),
        }
    }

    /// Index every block of a listing. Headerless blocks (the file preamble,
    /// stray text) land under the placeholder name and are counted in the
    /// debug log.
    pub fn from_listing(text: &str) -> Self {
        let mut index = Self::new();
        let mut placeholders = 0;
        for function in extract_functions(text) {
            if function.is_placeholder() {
                placeholders += 1;
            }
            index.insert(function);
        }
        debug!(
            "indexed {} functions, {} blocks without a symbol header",
            index.len(),
            placeholders
        );
        index
    }

    /// A later block with the same name replaces the earlier one.
    pub fn insert(&mut self, function: Function) -> Option<Function> {
        self.by_name.insert(function.name().to_string(), function)
    }

    pub fn get(&self, name: &str) -> Option<&Function> {
        self.by_name.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Functions ordered by address, then name.
    pub fn iter_by_address(&self) -> impl Iterator<Item = &Function> {
        let mut functions: Vec<&Function> = self.by_name.values().collect();
        functions.sort_by(|a, b| {
            a.address()
                .cmp(&b.address())
                .then_with(|| a.name().cmp(b.name()))
        });
        functions.into_iter()
    }
}

impl FromIterator<Function> for FunctionIndex {
    fn from_iter<I: IntoIterator<Item = Function>>(iter: I) -> Self {
        let mut index = Self::new();
        for function in iter {
            index.insert(function);
        }
        index
    }
}
