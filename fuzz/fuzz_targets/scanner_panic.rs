#![no_main]
use ferrotex_lint::{EnvironmentScanner, ListRules, repair};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Lossy conversion keeps inputs that are "almost" text, including
    // multi-byte characters that snippet truncation must not split.
    let s = String::from_utf8_lossy(data);
    let _ = EnvironmentScanner::default().scan_text(&s);

    let rules = ListRules {
        flag_leading_content: true,
        ..ListRules::extended()
    };
    let outcome = repair(&s, &rules);
    assert_eq!(outcome.text.split('\n').count(), s.split('\n').count());
});
