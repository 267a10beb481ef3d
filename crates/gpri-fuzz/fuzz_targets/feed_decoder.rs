#![no_main]
use gpri_core::http::decode_merge_events;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bodies must decode or fail, never panic
    if let Ok(events) = decode_merge_events(data) {
        for event in &events {
            let _ = event.issue.label_names();
        }
    }
});
