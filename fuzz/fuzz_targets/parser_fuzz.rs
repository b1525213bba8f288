//! Schema fuzz target: arbitrary bytes through parse, resolve and alias resolution.
//! None of these may panic; malformed input must surface as an error.
//! Build with: cargo fuzz run parser_fuzz (requires nightly and cargo fuzz).

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    let s = match std::str::from_utf8(data) {
        Ok(x) => x,
        Err(_) => return,
    };
    let schema = match wiregen::parse(s) {
        Ok(schema) => schema,
        Err(_) => return,
    };
    if let Ok(resolved) = wiregen::ResolvedSchema::resolve(schema) {
        let _ = wiregen::resolve_schema_aliases(&resolved.schema);
    }
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run parser_fuzz");
}
