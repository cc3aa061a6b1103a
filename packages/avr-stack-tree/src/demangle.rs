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

use std::borrow::Cow;

/// Human-readable form of a symbol name. Rust symbols are tried first (their
/// legacy mangling is also valid Itanium C++), then C++. Anything else is
/// returned unchanged.
pub fn display_name(raw: &str) -> Cow<'_, str> {
    if let Ok(demangled) = rustc_demangle::try_demangle(raw) {
        return Cow::Owned(format!("{demangled:#}"));
    }
    if let Ok(symbol) = cpp_demangle::Symbol::new(raw) {
        if let Ok(demangled) = symbol.demangle() {
            return Cow::Owned(demangled);
        }
    }
    Cow::Borrowed(raw)
}
