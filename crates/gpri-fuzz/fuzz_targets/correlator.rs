#![no_main]
use gpri_core::coordination::MergeCorrelator;
use gpri_core::http::decode_merge_events;
use gpri_core::OtherTitlesMode;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // First line is the target commit, the rest is the feed
    let split = data.iter().position(|&b| b == b'\n').unwrap_or(data.len());
    let (target, body) = data.split_at(split);
    let Ok(target) = std::str::from_utf8(target) else {
        return;
    };
    let Ok(events) = decode_merge_events(body.get(1..).unwrap_or_default()) else {
        return;
    };

    let matches = events.iter().filter(|e| e.commit_id == target).count();
    let others = events.len() - matches;
    for mode in [OtherTitlesMode::Documented, OtherTitlesMode::OwnTitles] {
        let result = MergeCorrelator::new(target)
            .with_mode(mode)
            .correlate(events.clone());
        // Titles may contain newlines of their own
        assert!(result.other_titles.matches('\n').count() >= others);
    }
});
