#![no_main]

use libfuzzer_sys::fuzz_target;
use pdfsplit::io::MemoryDelivery;
use pdfsplit::split::{AssemblyMode, NoProgress, RawDocument, SplitOptions, Splitter};

fuzz_target!(|data: &[u8]| {
    let doc = RawDocument::from_bytes(data.to_vec());

    for mode in [AssemblyMode::Raw, AssemblyMode::Structured] {
        let splitter = Splitter::new(SplitOptions {
            mode,
            ..Default::default()
        });

        let mut delivery = MemoryDelivery::new();
        if let Ok(report) = splitter.split(&doc, "1-3,2,4-9", &mut delivery, &mut NoProgress) {
            assert_eq!(report.outputs.len(), delivery.outputs().len());
            assert!(report.outputs.len() <= 3);
        }
    }
});
