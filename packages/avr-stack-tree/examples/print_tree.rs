use avr_stack_tree::report::write_tree;
use avr_stack_tree::{walk, FunctionIndex, RenderOptions, WalkOptions};

fn main() {
    let listing = concat!(
        "00000100 <main>:\n",
        " 100:\tcf 93       \tpush\tr28\n",
        " 102:\tcd b7       \tin\tr28, 0x3d\t; 61\n",
        " 104:\tde b7       \tin\tr29, 0x3e\t; 62\n",
        " 106:\t2e 97       \tsbiw\tr28, 0x0e\t; 14\n",
        " 108:\t0e 94 90 00 \tcall\t0x120\t; 0x120 <blink>\n",
        "\n",
        "00000120 <blink>:\n",
        " 120:\t0f 93       \tpush\tr16\n",
        " 122:\t0c 94 50 00 \tjmp\t0xa0\t; 0xa0 <_delay_ms>\n",
    );

    let index = FunctionIndex::from_listing(listing);
    let tree = walk(&index, "main", WalkOptions::default());
    write_tree(&tree, RenderOptions::default(), std::io::stdout().lock()).unwrap();
}
