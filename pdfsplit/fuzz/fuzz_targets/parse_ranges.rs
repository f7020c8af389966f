#![no_main]

use libfuzzer_sys::fuzz_target;
use pdfsplit::split::parse_ranges;

fuzz_target!(|input: (&str, u8)| {
    let (ranges, page_count) = input;
    let page_count = usize::from(page_count);

    if let Ok(selection) = parse_ranges(ranges, page_count) {
        for range in selection.ranges() {
            assert!(range.start() >= 1);
            assert!(range.start() <= range.end());
            assert!(range.end() <= page_count);
        }
    }
});
