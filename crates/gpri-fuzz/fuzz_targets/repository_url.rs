#![no_main]
use gpri_core::config::parse_repository_url;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(slug) = parse_repository_url(s) {
            assert!(!slug.owner.is_empty());
            assert!(!slug.owner.contains('/'));
            assert!(!slug.name.is_empty());
        }
    }
});
