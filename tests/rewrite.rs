//! End-to-end rewrite tests over the public API.
//!
//! These tests exercise the full pipeline the host patching driver runs:
//! 1. Compile a signature expression to an instruction sequence
//! 2. Trim the generator suffix and build a search pattern
//! 3. Locate and splice over a method body with the stream editor
//! 4. Verify the emitted stream

use cilsplice::prelude::*;

/// `EMono._zone` — the static field the original patch reads.
fn zone_field() -> MemberRef {
    MemberRef::field(
        TypeRef::new("Verse.EMono"),
        "_zone",
        TypeRef::new("Verse.Zone"),
        MemberModifiers::PUBLIC | MemberModifiers::STATIC,
    )
}

/// `Zone.lastZone` instance field, the second hop of the access chain.
fn last_zone_field() -> MemberRef {
    MemberRef::field(
        TypeRef::new("Verse.Zone"),
        "lastZone",
        TypeRef::new("Verse.Zone"),
        MemberModifiers::PUBLIC,
    )
}

/// The replacement routine the patch substitutes for the matched check.
fn replacement_routine() -> MemberRef {
    MemberRef::method(
        TypeRef::new("NoSquash.ScenePatch"),
        "IsSafeTransition",
        vec![],
        TypeRef::new("System.Boolean"),
        MemberModifiers::STATIC,
    )
}

/// The patched method's descriptor (diagnostics only).
fn target_method() -> MemberRef {
    MemberRef::method(
        TypeRef::new("Verse.Scene"),
        "OnUpdate",
        vec![],
        TypeRef::new("System.Void"),
        MemberModifiers::PUBLIC,
    )
}

/// The method body shared by the scenario tests:
/// `[ldsfld _zone, ldfld lastZone, isinst Region, ldnull, cgt.un]`.
fn haystack() -> Vec<Instruction> {
    vec![
        Instruction::with_member(OpCode::Ldsfld, zone_field()),
        Instruction::with_member(OpCode::Ldfld, last_zone_field()),
        Instruction::with_type(OpCode::Isinst, TypeRef::new("Verse.Region")),
        Instruction::new(OpCode::Ldnull),
        Instruction::new(OpCode::CgtUn),
    ]
}

/// The `_zone.lastZone is Region` signature expression.
fn is_region_expr() -> Expr {
    Expr::type_test(
        Expr::field_of(Expr::static_field(zone_field()), last_zone_field()),
        TypeRef::new("Verse.Region"),
    )
}

#[test]
fn test_trimmed_signature_matches_at_start() -> Result<()> {
    // The compiled signature carries the boolean materialization suffix;
    // dropping it yields the three-instruction search pattern.
    let signature = compile(&is_region_expr())?;
    assert_eq!(signature.len(), 5);

    let pattern = Pattern::from_signature(signature.drop_trailing(2)?)?;
    assert_eq!(pattern.len(), 3);
    assert_eq!(pattern.find_first(&haystack(), 0), Some(0));
    Ok(())
}

#[test]
fn test_opcode_only_type_test_matches_any_operand() -> Result<()> {
    // A 1-element isinst pattern authored against Zone_Tent still matches the
    // Region test in the body when the operand is ignored.
    let pattern = Pattern::new(vec![PatternElement::new(
        Instruction::with_type(OpCode::Isinst, TypeRef::new("Verse.Zone_Tent")),
        MatchMode::OpcodeOnly,
    )])?;

    assert_eq!(pattern.find_first(&haystack(), 0), Some(2));

    // Exact mode on the same element does not match
    let exact = Pattern::exact(&[Instruction::with_type(
        OpCode::Isinst,
        TypeRef::new("Verse.Zone_Tent"),
    )])?;
    assert_eq!(exact.find_first(&haystack(), 0), None);
    Ok(())
}

#[test]
fn test_replace_consumes_matched_region() -> Result<()> {
    let pattern = Pattern::from_signature(compile(&is_region_expr())?.drop_trailing(2)?)?;
    let replacement = compile(&Expr::static_call(replacement_routine(), vec![]))?
        .into_instructions();

    // Note: the pattern here is 3 elements but the haystack's trailing
    // ldnull/cgt.un belong to the check being replaced too, so the patch
    // matches the full 5-element lowering instead.
    let full_pattern = Pattern::from_signature(compile(&is_region_expr())?)?;

    let mut editor = StreamEditor::new(&haystack(), &target_method());
    editor.seek_to_start().replace(&full_pattern, &replacement)?;
    let out = editor.emit_result();

    assert_eq!(out.len(), 5 - 5 + 1);
    assert_eq!(out[0].opcode, OpCode::Call);

    // The trimmed pattern instead preserves the trailing pair
    let mut editor = StreamEditor::new(&haystack(), &target_method());
    editor.seek_to_start().replace(&pattern, &replacement)?;
    let out = editor.emit_result();

    let rendered: Vec<String> = out.iter().map(ToString::to_string).collect();
    assert_eq!(
        rendered,
        vec![
            "call NoSquash.ScenePatch::IsSafeTransition",
            "ldnull",
            "cgt.un",
        ]
    );
    Ok(())
}

#[test]
fn test_apply_patch_end_to_end() -> Result<()> {
    struct NullLog;
    impl PatchLog for NullLog {
        fn info(&self, _: &str) {}
        fn warn(&self, _: &str) {}
        fn error(&self, _: &str) {}
    }

    let pattern = Pattern::from_signature(compile(&is_region_expr())?.drop_trailing(2)?)?;
    let replacement = compile(&Expr::static_call(replacement_routine(), vec![]))?
        .into_instructions();

    let body = haystack();
    let out = apply_patch(&body, &target_method(), &NullLog, |editor| {
        editor.seek_to_start().replace(&pattern, &replacement)?;
        Ok(())
    })?;

    assert_eq!(out.len(), body.len() - pattern.len() + replacement.len());
    Ok(())
}

#[test]
fn test_missing_pattern_aborts_patch() {
    let pattern = Pattern::exact(&[Instruction::with_type(
        OpCode::Isinst,
        TypeRef::new("Verse.Zone_Tent"),
    )])
    .unwrap();

    let body = haystack();
    let result = apply_patch(&body, &target_method(), &FacadeLog, |editor| {
        editor.seek_to_start().replace(&pattern, &[])?;
        Ok(())
    });

    let err = result.unwrap_err();
    assert!(matches!(err, Error::PatternNotFound { .. }));
    let message = err.to_string();
    assert!(message.contains("Verse.Scene::OnUpdate"));
    assert!(message.contains("isinst Verse.Zone_Tent"));
}

#[test]
fn test_repeated_compilation_yields_identical_patterns() -> Result<()> {
    // Determinism across re-runs keeps existing patterns matching.
    let first = compile(&is_region_expr())?;
    let second = compile(&is_region_expr())?;
    assert_eq!(first, second);

    let body = haystack();
    let a = Pattern::from_signature(first.drop_trailing(2)?)?;
    let b = Pattern::from_signature(second.drop_trailing(2)?)?;
    assert_eq!(a.find_first(&body, 0), b.find_first(&body, 0));
    Ok(())
}

#[test]
fn test_patterns_shared_across_streams() -> Result<()> {
    // One compiled pattern applies to multiple method bodies (e.g. overloads).
    let pattern = Pattern::from_signature(compile(&is_region_expr())?.drop_trailing(2)?)?;
    let replacement = [Instruction::with_member(OpCode::Call, replacement_routine())];

    for padding in 0..3 {
        let mut body = vec![Instruction::new(OpCode::Nop); padding];
        body.extend(haystack());

        let mut editor = StreamEditor::new(&body, &target_method());
        editor.seek_to_start().replace(&pattern, &replacement)?;
        let out = editor.emit_result();
        assert_eq!(out.len(), body.len() - pattern.len() + replacement.len());
        assert_eq!(out[padding].opcode, OpCode::Call);
    }
    Ok(())
}
