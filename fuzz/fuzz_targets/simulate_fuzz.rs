#![no_main]
use libfuzzer_sys::fuzz_target;
use lrsim::Pipeline;

// Split the input into grammar text and a token sequence; any grammar
// that builds must simulate any input without panicking, and the trace
// invariants must hold even on the error path.
fuzz_target!(|data: &str| {
    let Some((grammar_text, input)) = data.split_once('\x00') else {
        return;
    };
    let Ok(pipeline) = Pipeline::from_text(grammar_text) else {
        return;
    };

    let mut simulation = pipeline.simulate(input);
    let _ = simulation.run();
    for entry in simulation.trace() {
        assert_eq!(entry.states.len(), entry.symbols.len() + 1);
    }
});
