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

//! Splitting an avr-objdump `.lss` listing into per-symbol blocks.
//!
//! The listing has no explicit delimiters. A new symbol starts wherever a
//! blank line is followed by a line that begins with a hex address and a
//! space:
//!
//! ```text
//!  9f8:	20 df       	rcall	.-448    	; 0x83a <free>
//!  9fa:	08 95       	ret
//!
//! 000009fc <calloc>:
//! ```
//!
//! A blank line inside a function body followed by hex-looking text will
//! split that function in two. objdump output does not produce that shape in
//! practice, so the rule is kept as is.

use std::path::Path;
use std::sync::OnceLock;

use anyhow::{Context, Result};
use regex::Regex;

use crate::function::Function;

static BLOCK_BOUNDARY: OnceLock<Regex> = OnceLock::new();

fn block_boundary() -> &'static Regex {
    BLOCK_BOUNDARY.get_or_init(|| Regex::new(r"\n\n[0-9a-f]+ ").unwrap())
}

/// Raw text of each block, in listing order. The two newlines separating
/// blocks belong to neither side. Always yields at least one (possibly
/// empty) block.
pub fn split_blocks(text: &str) -> impl Iterator<Item = &str> + '_ {
    let mut boundaries = block_boundary().find_iter(text);
    let mut start = Some(0);
    std::iter::from_fn(move || {
        let from = start?;
        match boundaries.next() {
            Some(m) => {
                start = Some(m.start() + 2);
                Some(&text[from..m.start()])
            }
            None => {
                start = None;
                Some(&text[from..])
            }
        }
    })
}

/// Lazily build one `Function` per non-empty block. Calling this again on the
/// same text yields the same sequence.
pub fn extract_functions(text: &str) -> impl Iterator<Item = Function> + '_ {
    split_blocks(text).filter_map(|block| {
        let lines: Vec<&str> = block.lines().collect();
        (!lines.is_empty()).then(|| Function::from_lines(&lines))
    })
}

/// Read a listing from disk. Stray non-UTF-8 bytes (string literal dumps)
/// are replaced rather than rejected, and `\r\n` / `\r` line endings become
/// `\n` so block boundaries are found in listings produced on Windows.
pub fn load_listing(path: &Path) -> Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(text.replace("\r\n", "\n").replace('\r', "\n"))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const LISTING: &str = concat!(
        "\n",
        "firmware.elf:     file format elf32-avr\n",
        "\n",
        "Sections:\n",
        "Idx Name          Size      VMA       LMA       File off  Algn\n",
        "  0 .text         00000142  00000000  00000000  00000094  2**1\n",
        "\n",
        "Disassembly of section .text:\n",
        "\n",
        "00000000 <__vectors>:\n",
        "   0:\t0c 94 34 00 \tjmp\t0x68\t; 0x68 <__ctors_end>\n",
        "\n",
        "00000068 <__ctors_end>:\n",
        "  68:\t11 24       \teor\tr1, r1\n",
        "  6a:\t0e 94 80 00 \tcall\t0x100\t; 0x100 <main>\n",
        "\n",
        "00000100 <main>:\n",
        " 100:\tcf 93       \tpush\tr28\n",
        " 102:\tdf 93       \tpush\tr29\n",
        " 104:\tcd b7       \tin\tr28, 0x3d\t; 61\n",
        " 106:\tde b7       \tin\tr29, 0x3e\t; 62\n",
        " 108:\t2e 97       \tsbiw\tr28, 0x0e\t; 14\n",
        " 10a:\t0e 94 90 00 \tcall\t0x120\t; 0x120 <helper>\n",
        " 10e:\t0e 94 a0 00 \tcall\t0x140\t; 0x140 <leaf>\n",
        " 112:\tff cf       \trjmp\t.-2      \t; 0x112 <main+0x12>\n",
        "\n",
        "00000120 <helper>:\n",
        " 120:\t0f 93       \tpush\tr16\n",
        " 122:\t0e 94 a0 00 \tcall\t0x140\t; 0x140 <leaf>\n",
        " 126:\t0f 91       \tpop\tr16\n",
        " 128:\t0c 94 50 00 \tjmp\t0xa0\t; 0xa0 <printf>\n",
        "\n",
        "00000140 <leaf>:\n",
        " 140:\t08 95       \tret\n",
    );

    #[test]
    fn splits_on_blank_line_before_address() {
        let blocks: Vec<&str> = split_blocks(LISTING).collect();
        assert_eq!(blocks.len(), 6);
        assert!(blocks[0].contains("Disassembly of section .text:"));
        assert!(blocks[1].starts_with("00000000 <__vectors>:"));
        assert!(blocks[5].starts_with("00000140 <leaf>:"));
    }

    #[test]
    fn blank_line_before_text_does_not_split() {
        let text = "00000100 <main>:\n 100:\t08 95       \tret\n\n  while (1) {}\n";
        assert_eq!(split_blocks(text).count(), 1);
    }

    #[test]
    fn empty_text_is_one_empty_block() {
        assert_eq!(split_blocks("").collect::<Vec<_>>(), vec![""]);
        assert_eq!(extract_functions("").count(), 0);
    }

    #[test]
    fn extracts_functions_in_listing_order() {
        let names: Vec<String> = extract_functions(LISTING)
            .map(|f| f.name().to_string())
            .collect();
        assert_eq!(
            names,
            vec!["unknown", "__vectors", "__ctors_end", "main", "helper", "leaf"]
        );
    }

    #[test]
    fn extraction_is_restartable() {
        let first: Vec<Function> = extract_functions(LISTING).collect();
        let second: Vec<Function> = extract_functions(LISTING).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn extracted_records_carry_calls_and_frames() {
        let funcs: Vec<Function> = extract_functions(LISTING).collect();
        let main = funcs.iter().find(|f| f.name() == "main").unwrap();
        assert_eq!(main.stack_size(), 16);
        assert_eq!(main.callees().collect::<Vec<_>>(), vec!["helper", "leaf"]);

        let vectors = funcs.iter().find(|f| f.name() == "__vectors").unwrap();
        assert!(vectors.calls("__ctors_end"));
    }

    #[test]
    fn load_listing_reports_missing_file() {
        let err = load_listing(Path::new("/nonexistent/firmware.lss")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/firmware.lss"));
    }

    #[test]
    fn load_listing_normalizes_crlf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("firmware.lss");
        std::fs::write(&path, LISTING.replace('\n', "\r\n")).unwrap();

        let text = load_listing(&path).unwrap();
        assert!(!text.contains('\r'));
        let names: Vec<String> = extract_functions(&text)
            .map(|f| f.name().to_string())
            .collect();
        assert_eq!(
            names,
            vec!["unknown", "__vectors", "__ctors_end", "main", "helper", "leaf"]
        );
        let main = extract_functions(&text).find(|f| f.name() == "main").unwrap();
        assert_eq!(main.stack_size(), 16);
    }

    #[test]
    fn load_listing_replaces_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("firmware.lss");
        std::fs::write(&path, b"00000140 <leaf>:\n \xff\n").unwrap();
        let text = load_listing(&path).unwrap();
        assert!(text.starts_with("00000140 <leaf>:"));
        assert!(text.contains('\u{fffd}'));
    }
}
