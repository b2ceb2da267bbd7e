#![no_main]
use libfuzzer_sys::fuzz_target;
use lrsim::Pipeline;

// Arbitrary text must either build a full pipeline or fail with a typed
// error; panics and hangs are bugs.
fuzz_target!(|data: &str| {
    let _ = Pipeline::from_text(data);
});
