//! # Numeric Rules
//!
//! Bounds are compared as half-lines. When the input declares both an
//! inclusive and an exclusive bound on the same side, the tighter one is
//! used; each target bound is then checked on its own.
//!
//! `multipleOf` uses exact decimal divisibility. An integer-only input
//! behaves as if it also declared `multipleOf: 1`.

use jsc_core::{CompatErrorList, Decimal, Outcome, PathPair, SchemaNode, TypeName};

use super::{family_applies, NUMERIC_FAMILY};
use crate::compare::Comparator;

/// One side of a numeric range.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Bound {
    value: f64,
    exclusive: bool,
}

impl Bound {
    fn inclusive(value: f64) -> Self {
        Self {
            value,
            exclusive: false,
        }
    }

    fn exclusive(value: f64) -> Self {
        Self { value, exclusive: true }
    }
}

fn tighter_upper(a: Option<Bound>, b: Option<Bound>) -> Option<Bound> {
    match (a, b) {
        (Some(x), Some(y)) if x.value < y.value || (x.value == y.value && x.exclusive) => Some(x),
        (Some(_), Some(y)) => Some(y),
        (x, None) => x,
        (None, y) => y,
    }
}

fn tighter_lower(a: Option<Bound>, b: Option<Bound>) -> Option<Bound> {
    match (a, b) {
        (Some(x), Some(y)) if x.value > y.value || (x.value == y.value && x.exclusive) => Some(x),
        (Some(_), Some(y)) => Some(y),
        (x, None) => x,
        (None, y) => y,
    }
}

fn upper_bound(node: &SchemaNode) -> Option<Bound> {
    tighter_upper(
        node.maximum.map(Bound::inclusive),
        node.exclusive_maximum.map(Bound::exclusive),
    )
}

fn lower_bound(node: &SchemaNode) -> Option<Bound> {
    tighter_lower(
        node.minimum.map(Bound::inclusive),
        node.exclusive_minimum.map(Bound::exclusive),
    )
}

/// Does an input upper bound stay within a target upper bound?
fn upper_within(input: Bound, target: Bound) -> bool {
    if target.exclusive && !input.exclusive {
        input.value < target.value
    } else {
        input.value <= target.value
    }
}

/// Does an input lower bound stay within a target lower bound?
fn lower_within(input: Bound, target: Bound) -> bool {
    if target.exclusive && !input.exclusive {
        input.value > target.value
    } else {
        input.value >= target.value
    }
}

fn is_integer_only(node: &SchemaNode) -> bool {
    node.effective_types()
        .is_some_and(|t| t.iter().all(|name| name == TypeName::Integer))
}

/// Numeric keyword containment.
pub fn num_rules_match(_: &Comparator<'_>, input: &SchemaNode, target: &SchemaNode, paths: &PathPair) -> Outcome {
    if !family_applies(input, target, NUMERIC_FAMILY) {
        return None;
    }
    let fail = |message: &str| Some(CompatErrorList::single(paths, message));

    let input_upper = upper_bound(input);
    if let Some(max) = target.maximum {
        match input_upper {
            None => return fail("input has no maximum property"),
            Some(b) if !upper_within(b, Bound::inclusive(max)) => {
                return fail(if b.exclusive {
                    "input permits greater maximum (exclusive)"
                } else {
                    "input permits greater maximum"
                })
            }
            Some(_) => {}
        }
    }
    if let Some(max) = target.exclusive_maximum {
        match input_upper {
            None => return fail("input has no maximum property"),
            Some(b) if !upper_within(b, Bound::exclusive(max)) => {
                return fail("input permits greater exclusiveMaximum")
            }
            Some(_) => {}
        }
    }

    let input_lower = lower_bound(input);
    if let Some(min) = target.minimum {
        match input_lower {
            None => return fail("input has no minimum property"),
            Some(b) if !lower_within(b, Bound::inclusive(min)) => {
                return fail(if b.exclusive {
                    "input permits smaller minimum (exclusive)"
                } else {
                    "input permits smaller minimum"
                })
            }
            Some(_) => {}
        }
    }
    if let Some(min) = target.exclusive_minimum {
        match input_lower {
            None => return fail("input has no minimum property"),
            Some(b) if !lower_within(b, Bound::exclusive(min)) => {
                return fail("input permits smaller exclusiveMinimum")
            }
            Some(_) => {}
        }
    }

    if let Some(step) = target.multiple_of {
        let unit = Decimal::new(1, 0);
        let input_step = match (input.multiple_of, is_integer_only(input)) {
            (Some(s), true) => Some(s.lcm(unit).unwrap_or(s)),
            (Some(s), false) => Some(s),
            (None, true) => Some(unit),
            (None, false) => None,
        };
        match input_step {
            None => return fail("input lacks multipleOf"),
            Some(s) if !s.is_integer_multiple_of(step) => {
                return fail(if input.multiple_of.is_some() {
                    "input multipleOf is not an integer multiple of target multipleOf"
                } else {
                    "input lacks multipleOf"
                })
            }
            Some(_) => {}
        }
    }
    None
}
