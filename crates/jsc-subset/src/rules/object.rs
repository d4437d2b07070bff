//! Object rules: closed targets, required members, shared properties.

use jsc_core::{AdditionalProperties, CompatErrorList, Outcome, PathPair, SchemaNode};

use super::{family_applies, OBJECT_FAMILY};
use crate::compare::Comparator;

/// A closed target (`additionalProperties: false`) admits no property the
/// input declares but the target does not. A target `additionalProperties`
/// schema must hold for those properties and for whatever else the input
/// admits. Both are skipped when `allow_additional_props` is set.
pub fn no_extraneous_props(cmp: &Comparator<'_>, input: &SchemaNode, target: &SchemaNode, paths: &PathPair) -> Outcome {
    if cmp.options().allow_additional_props || !family_applies(input, target, OBJECT_FAMILY) {
        return None;
    }
    match &target.additional_properties {
        Some(AdditionalProperties::Allowed(false)) => {
            let extra = input.properties.keys().find(|name| !target.properties.contains_key(*name))?;
            Some(CompatErrorList::single(
                paths,
                format!("input has extraneous property: {extra}"),
            ))
        }
        Some(AdditionalProperties::Schema(extra)) => extra_props_match(cmp, input, target, extra, paths),
        _ => None,
    }
}

fn extra_props_match(
    cmp: &Comparator<'_>,
    input: &SchemaNode,
    target: &SchemaNode,
    extra: &SchemaNode,
    paths: &PathPair,
) -> Outcome {
    for (name, prop) in &input.properties {
        if target.properties.contains_key(name) {
            continue;
        }
        let at = paths.descend_input([name.as_str()]).descend_target(["additionalProperties"]);
        if let Some(errors) = cmp.compare(prop, extra, &at) {
            return Some(errors.push_context(
                paths,
                format!("Property {name} does not match target.additionalProperties"),
            ));
        }
    }
    if input.opaque.contains_key("patternProperties") {
        return Some(CompatErrorList::single(
            paths,
            "input patternProperties cannot be compared with target.additionalProperties",
        ));
    }
    match &input.additional_properties {
        Some(AdditionalProperties::Allowed(false)) => None,
        Some(AdditionalProperties::Schema(own)) => {
            cmp.compare(own, extra, &paths.descend_both("additionalProperties")).map(|errors| {
                errors.push_context(
                    paths,
                    "input.additionalProperties does not satisfy target.additionalProperties",
                )
            })
        }
        _ => Some(CompatErrorList::single(paths, "input does not restrict additional properties")),
    }
}

/// Every property the target requires must be required by the input,
/// unless the target supplies a `default` for it or `allow_partial` is set.
pub fn has_required_props(cmp: &Comparator<'_>, input: &SchemaNode, target: &SchemaNode, paths: &PathPair) -> Outcome {
    if cmp.options().allow_partial || !family_applies(input, target, OBJECT_FAMILY) {
        return None;
    }
    let missing = target.required.iter().find(|name| {
        !input.required.contains(*name)
            && target
                .properties
                .get(*name)
                .and_then(|p| p.default.as_ref())
                .is_none()
    })?;
    Some(CompatErrorList::single(
        paths,
        format!("input does not guarantee required property {missing}"),
    ))
}

/// Properties declared on both sides must be compatible. Properties only
/// one side declares are the business of the two rules above.
pub fn properties_match(cmp: &Comparator<'_>, input: &SchemaNode, target: &SchemaNode, paths: &PathPair) -> Outcome {
    if !family_applies(input, target, OBJECT_FAMILY) {
        return None;
    }
    for (name, target_prop) in &target.properties {
        let Some(input_prop) = input.properties.get(name) else {
            continue;
        };
        if let Some(errors) = cmp.compare(input_prop, target_prop, &paths.descend_both(name.as_str())) {
            return Some(errors.push_context(paths, format!("Property {name} does not match")));
        }
    }
    None
}
