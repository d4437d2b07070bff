//! Shared assertions for the subset-check suites.
//!
//! Every positive or negative expectation also checks that both operands
//! are subsets of themselves, so a broken reflexive case cannot hide
//! behind a passing expectation.

#![allow(dead_code)]

use jsc_subset::{check, CompatErrorList, CompatOptions, Verdict};
use serde_json::Value;

fn assert_reflexive(schema: &Value, options: &CompatOptions) {
    let verdict = check(schema, schema, options).expect("operand must be usable");
    assert!(verdict.is_compatible(), "{schema} does not match itself: {:?}", verdict.errors());
}

/// `sub` is accepted as a subset of `sup` under `options`.
pub fn assert_satisfies_with(sub: &Value, sup: &Value, options: &CompatOptions) {
    assert_reflexive(sub, options);
    assert_reflexive(sup, options);
    match check(sub, sup, options).expect("operands must be usable") {
        Verdict::Compatible => {}
        Verdict::Incompatible(errors) => panic!("expected {sub} to satisfy {sup}:\n{errors}"),
    }
}

/// `sub` is accepted as a subset of `sup` under default options.
pub fn assert_satisfies(sub: &Value, sup: &Value) {
    assert_satisfies_with(sub, sup, &CompatOptions::default());
}

/// `sub` is rejected against `sup` under `options`; returns the trace.
pub fn assert_violates_with(sub: &Value, sup: &Value, options: &CompatOptions) -> CompatErrorList {
    assert_reflexive(sub, options);
    assert_reflexive(sup, options);
    match check(sub, sup, options).expect("operands must be usable") {
        Verdict::Compatible => panic!("expected {sub} not to satisfy {sup}"),
        Verdict::Incompatible(errors) => errors,
    }
}

/// `sub` is rejected against `sup` under default options.
pub fn assert_violates(sub: &Value, sup: &Value) -> CompatErrorList {
    assert_violates_with(sub, sup, &CompatOptions::default())
}
