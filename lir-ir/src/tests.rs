//! Unit tests for the IR crate

use super::*;
use pretty_assertions::assert_eq;
use std::collections::HashSet;
use std::sync::Arc;

fn i32_param(name: &str) -> ValueRef {
    Param::value(name, IrType::i32())
}

fn binary_fixture(op: BinaryOp) -> Instruction {
    let ty = if op.opcode().is_float_op() { IrType::Double } else { IrType::i32() };
    Instruction::binary(op, ty.clone(), Param::value("a", ty.clone()), Param::value("b", ty))
}

/// One well-formed instruction of each kind
fn opcode_fixture(opcode: Opcode) -> Instruction {
    let ptr = Param::value("p", IrType::ptr_to(IrType::i32()));
    match opcode {
        Opcode::Alloca => Instruction::alloca(IrType::i32()),
        Opcode::Load => Instruction::load(IrType::i32(), ptr),
        Opcode::Store => Instruction::store(IrType::i32(), i32_param("v"), ptr),
        Opcode::Getelementptr => Instruction::getelementptr(IrType::i32(), ptr, vec![0]),
        Opcode::Icmp => Instruction::icmp(IntPredicate::Eq, IrType::i32(), i32_param("a"), i32_param("b")),
        Opcode::Fcmp => Instruction::fcmp(
            FloatPredicate::Oeq,
            IrType::Double,
            Param::value("x", IrType::Double),
            Param::value("y", IrType::Double),
        ),
        Opcode::Phi => Instruction::from(PhiInst::new(IrType::i32()).with_incoming("entry", i32_param("a"))),
        binary => match BinaryOp::ALL.into_iter().find(|op| op.opcode() == binary) {
            Some(op) => binary_fixture(op),
            None => panic!("no fixture for {binary}"),
        },
    }
}

fn read_float(text: &str) -> f64 {
    match text.strip_prefix("0x") {
        Some(hex) => f64::from_bits(u64::from_str_radix(hex, 16).unwrap()),
        None => text.parse().unwrap(),
    }
}

#[test]
fn test_add_preserves_operand_identity() {
    let a = i32_param("a");
    let b = i32_param("b");
    let add = Instruction::add(IrType::i32(), Arc::clone(&a), Arc::clone(&b));

    assert_eq!(add.ty(), IrType::i32());
    let inst = add.as_binary().unwrap();
    assert!(Arc::ptr_eq(inst.op1(), &a));
    assert!(Arc::ptr_eq(inst.op2(), &b));
    assert_eq!(inst.ty(), &IrType::i32());
}

#[test]
fn test_binary_rendering() {
    let add = Instruction::add(IrType::i32(), i32_param("a"), Constant::int(IrType::i32(), 7));
    assert_eq!(add.to_string(), "add i32 %a, 7");

    let fmul = Instruction::fmul(
        IrType::Double,
        Param::value("x", IrType::Double),
        Constant::float(IrType::Double, 0.5),
    );
    assert_eq!(fmul.to_string(), "fmul double %x, 5.0e-1");

    let shl = Instruction::shl(
        IrType::vector(4, IrType::i16()),
        Param::value("v", IrType::vector(4, IrType::i16())),
        Param::value("s", IrType::vector(4, IrType::i16())),
    );
    assert_eq!(shl.to_string(), "shl <4 x i16> %v, %s");
}

#[test]
fn test_named_constructors_match_binary() {
    let ty = IrType::i8();
    let pairs = [
        (Instruction::sub(ty.clone(), i32_param("a"), i32_param("b")), Opcode::Sub),
        (Instruction::udiv(ty.clone(), i32_param("a"), i32_param("b")), Opcode::Udiv),
        (Instruction::srem(ty.clone(), i32_param("a"), i32_param("b")), Opcode::Srem),
        (Instruction::lshr(ty.clone(), i32_param("a"), i32_param("b")), Opcode::Lshr),
        (Instruction::and(ty.clone(), i32_param("a"), i32_param("b")), Opcode::And),
        (Instruction::xor(ty, i32_param("a"), i32_param("b")), Opcode::Xor),
    ];
    for (inst, opcode) in pairs {
        assert_eq!(inst.opcode(), opcode);
    }
}

#[test]
fn test_every_binary_op_is_an_instruction() {
    for op in BinaryOp::ALL {
        let inst = binary_fixture(op);
        assert_eq!(inst.opcode(), op.opcode());
        assert!(inst.produces_value());
        assert_eq!(inst.operands().len(), 2);

        let value: ValueRef = Arc::new(inst);
        assert_eq!(value.kind(), ValueKind::Instruction);
        assert!(value.kind().is_instruction());
        assert!(!value.kind().is_terminator());
    }
}

#[test]
fn test_comparisons_are_instructions() {
    let icmp: ValueRef = Arc::new(Instruction::icmp(
        IntPredicate::Slt,
        IrType::i32(),
        i32_param("a"),
        i32_param("b"),
    ));
    let fcmp: ValueRef = Arc::new(Instruction::fcmp(
        FloatPredicate::Olt,
        IrType::Double,
        Param::value("x", IrType::Double),
        Param::value("y", IrType::Double),
    ));

    for value in [icmp, fcmp] {
        assert!(value.kind().is_instruction());
        assert!(!value.kind().is_terminator());
        assert!(value.kind().is_node());
    }
}

#[test]
fn test_every_opcode_is_an_instruction() {
    for opcode in Opcode::ALL {
        let inst = opcode_fixture(opcode);
        assert_eq!(inst.opcode(), opcode);
        assert!(verify_instruction(&inst, &VerifyOptions::default()).is_empty(), "{inst}");

        let value: ValueRef = Arc::new(inst);
        assert_eq!(value.kind(), ValueKind::Instruction, "{opcode}");
        assert!(!value.kind().is_terminator(), "{opcode}");
    }
}

#[test]
fn test_node_partition_is_disjoint() {
    let mut values: Vec<ValueRef> = Vec::new();
    let mut expected = Vec::new();
    for opcode in Opcode::ALL {
        values.push(Arc::new(opcode_fixture(opcode)));
        expected.push(ValueKind::Instruction);
    }
    values.push(Arc::new(Terminator::ret_void()));
    values.push(Arc::new(Terminator::br("exit")));
    values.push(Arc::new(Terminator::Unreachable));
    expected.extend([ValueKind::Terminator; 3]);
    values.push(Arc::new(BasicBlock::new("entry")));
    expected.push(ValueKind::BasicBlock);

    for (value, kind) in values.iter().zip(expected) {
        assert_eq!(value.kind(), kind, "{value}");
        let memberships = [
            value.kind().is_instruction(),
            value.kind().is_terminator(),
            value.kind() == ValueKind::BasicBlock,
        ];
        assert_eq!(memberships.iter().filter(|m| **m).count(), 1);
    }

    let leaves: Vec<ValueRef> = vec![
        Constant::int(IrType::i32(), 1),
        i32_param("p"),
        Global::value("g", IrType::ptr_to(IrType::i32())),
        Arc::new(Local::forward("later", IrType::i32())),
    ];
    for leaf in leaves {
        assert!(!leaf.kind().is_node());
    }
}

#[test]
fn test_icmp_preserves_predicate() {
    let icmp = Instruction::icmp(IntPredicate::Slt, IrType::i32(), i32_param("a"), i32_param("b"));
    match &icmp {
        Instruction::Icmp(inst) => {
            assert_eq!(inst.pred(), IntPredicate::Slt);
            assert_eq!(inst.operand_type(), &IrType::i32());
        }
        other => panic!("expected icmp, got {other}"),
    }
    assert_eq!(icmp.to_string(), "icmp slt i32 %a, %b");
    assert_eq!(icmp.ty(), IrType::i1());
}

#[test]
fn test_fcmp_vector_result_type() {
    let ty = IrType::vector(4, IrType::Float);
    let fcmp = Instruction::fcmp(
        FloatPredicate::Uno,
        ty.clone(),
        Param::value("x", ty.clone()),
        Param::value("y", ty),
    );
    assert_eq!(fcmp.ty(), IrType::vector(4, IrType::i1()));
    assert_eq!(fcmp.to_string(), "fcmp uno <4 x float> %x, %y");
}

#[test]
fn test_alloca_defaults() {
    let alloca = AllocaInst::new(IrType::i32());
    assert_eq!(alloca.num_elems(), 1);
    assert_eq!(alloca.align(), 0);

    let inst = Instruction::from(alloca);
    assert_eq!(inst.ty(), IrType::ptr_to(IrType::i32()));
    assert_eq!(inst.to_string(), "alloca i32");

    let sized = Instruction::from(AllocaInst::new(IrType::Double).with_num_elems(4).with_align(8));
    assert_eq!(sized.to_string(), "alloca double, i32 4, align 8");
}

#[test]
fn test_load_store_rendering() {
    let addr = Param::value("addr", IrType::ptr_to(IrType::i32()));
    let load = Instruction::from(LoadInst::new(IrType::i32(), Arc::clone(&addr)).with_align(4));
    assert_eq!(load.to_string(), "load i32* %addr, align 4");
    assert_eq!(load.ty(), IrType::i32());

    let store = Instruction::store(IrType::i32(), i32_param("v"), addr);
    assert_eq!(store.to_string(), "store i32 %v, i32* %addr");
    assert_eq!(store.ty(), IrType::Void);
    assert!(!store.produces_value());
}

#[test]
fn test_gep_keeps_index_order() {
    let p = Param::value("p", IrType::ptr_to(IrType::i32()));
    let gep = Instruction::getelementptr(IrType::i32(), p, vec![0, 3]);

    match &gep {
        Instruction::Getelementptr(inst) => assert_eq!(inst.indices(), &[0, 3]),
        other => panic!("expected getelementptr, got {other}"),
    }
    assert_eq!(gep.to_string(), "getelementptr i32* %p, i32 0, i32 3");
    assert_eq!(gep.ty(), IrType::ptr_to(IrType::i32()));
}

#[test]
fn test_gep_declared_result_type() {
    let st = IrType::Struct { name: Some("pair".to_string()), fields: vec![IrType::i8(), IrType::i64()], packed: false };
    let base = Param::value("s", IrType::ptr_to(st.clone()));
    let gep = GepInst::new(st, base, vec![0, 1]).with_result_type(IrType::ptr_to(IrType::i64()));
    let inst = Instruction::from(gep);
    assert_eq!(inst.ty(), IrType::ptr_to(IrType::i64()));
    assert_eq!(inst.to_string(), "getelementptr %pair* %s, i32 0, i32 1");
}

#[test]
fn test_phi_lookup_and_overwrite() {
    let v1 = i32_param("v1");
    let v2 = i32_param("v2");
    let v3 = i32_param("v3");

    let mut phi = PhiInst::new(IrType::i32())
        .with_incoming("bb1", Arc::clone(&v1))
        .with_incoming("bb2", Arc::clone(&v2));

    assert!(Arc::ptr_eq(phi.incoming("bb1").unwrap(), &v1));
    assert!(phi.incoming("bb").is_none());

    let replaced = phi.insert("bb2", Arc::clone(&v3));
    assert!(Arc::ptr_eq(&replaced.unwrap(), &v2));
    assert_eq!(phi.len(), 2);
    assert!(Arc::ptr_eq(phi.incoming("bb2").unwrap(), &v3));

    let inst = Instruction::from(phi);
    assert_eq!(inst.to_string(), "phi i32 [ %v1, %bb1 ], [ %v3, %bb2 ]");
}

#[test]
fn test_phi_rendering_ignores_insertion_order() {
    let forward: PhiInst = vec![("a", i32_param("x")), ("b", i32_param("y"))].into_iter().collect();
    let backward: PhiInst = vec![("b", i32_param("y")), ("a", i32_param("x"))].into_iter().collect();

    assert_eq!(forward.ty(), &IrType::i32());
    assert_eq!(
        Instruction::from(forward).to_string(),
        Instruction::from(backward).to_string()
    );
}

#[test]
fn test_rendering_is_repeatable() {
    let inst = Instruction::from(PhiInst::new(IrType::i32()).with_incoming("entry", i32_param("x")));
    let first = inst.to_string();
    let second = inst.to_string();
    assert_eq!(first, second);
}

#[test]
fn test_constant_rendering() {
    assert_eq!(Constant::int(IrType::i1(), 1).to_string(), "true");
    assert_eq!(Constant::int(IrType::i1(), 0).to_string(), "false");
    assert_eq!(Constant::int(IrType::i64(), -12).to_string(), "-12");
    assert_eq!(Constant::float(IrType::Float, 1.0).to_string(), "1.0e0");
    assert_eq!(Constant::null(IrType::ptr_to(IrType::i8())).to_string(), "null");
    assert_eq!(Constant::undef(IrType::i32()).to_string(), "undef");
    assert_eq!(Global::value("counter", IrType::ptr_to(IrType::i32())).to_string(), "@counter");
}

#[test]
fn test_float_rendering_round_trips() {
    let values = [
        0.5,
        1.0,
        -0.0,
        0.1,
        0.1234567891,
        0.1234567892,
        1e300,
        f64::MIN_POSITIVE,
        5e-324,
        f64::MAX,
        f64::NAN,
        f64::INFINITY,
        f64::NEG_INFINITY,
    ];

    let mut seen = HashSet::new();
    for value in values {
        let text = Constant::float(IrType::Double, value).to_string();
        assert!(text.contains('.') || text.starts_with("0x"), "{text}");
        assert_eq!(read_float(&text).to_bits(), value.to_bits(), "{text}");
        assert!(seen.insert(text));
    }

    assert_eq!(Constant::float(IrType::Double, 0.1234567891).to_string(), "1.234567891e-1");
    assert_eq!(Constant::float(IrType::Double, f64::INFINITY).to_string(), "0x7FF0000000000000");
    assert_eq!(Constant::float(IrType::Float, 0.5).to_string(), "5.0e-1");
    // 0.1 has no exact single precision form
    assert_eq!(Constant::float(IrType::Float, 0.1).to_string(), "0x3FB999999999999A");
}

#[test]
fn test_forward_local_binding() {
    let next = Arc::new(Local::forward("next", IrType::i32()));
    assert!(!next.is_bound());
    assert!(next.inst().is_none());

    let user = Instruction::add(IrType::i32(), next.clone(), i32_param("a"));
    assert_eq!(user.to_string(), "add i32 %next, %a");
    assert_eq!(
        verify_instruction(&user, &VerifyOptions::default()),
        vec![VerifyError::UnboundLocal { name: "next".to_string() }]
    );

    let mut block = BasicBlock::new("loop");
    block
        .push_bound(&next, Instruction::sub(IrType::i32(), i32_param("a"), i32_param("b")))
        .unwrap();
    assert!(next.is_bound());
    assert_eq!(next.inst().unwrap().opcode(), Opcode::Sub);
    assert!(verify_instruction(&user, &VerifyOptions::default()).is_empty());
    assert_eq!(block.slots()[0].to_string(), "%next = sub i32 %a, %b");

    assert_eq!(
        block.push_bound(&next, Instruction::mul(IrType::i32(), i32_param("a"), i32_param("b"))),
        Err(IrError::AlreadyBound { name: "next".to_string() })
    );
    assert_eq!(block.slots().len(), 1);

    drop(block);
    assert!(next.is_bound());
    assert!(next.inst().is_none());
}

#[test]
fn test_forward_local_type_must_match() {
    let flag = Local::forward("flag", IrType::i1());
    let mut block = BasicBlock::new("entry");
    assert_eq!(
        block.push_bound(&flag, Instruction::add(IrType::i32(), i32_param("a"), i32_param("b"))),
        Err(IrError::BindingTypeMismatch {
            name: "flag".to_string(),
            expected: IrType::i1(),
            found: IrType::i32(),
        })
    );
    assert!(!flag.is_bound());
    assert!(block.slots().is_empty());
}

#[test]
fn test_basic_block() {
    let mut block = BasicBlock::new("entry");
    assert!(block.is_empty());
    assert!(!block.has_terminator());

    let x = block.push_named("x", Instruction::add(IrType::i32(), i32_param("a"), i32_param("b")));
    assert_eq!(x.to_string(), "%x");
    assert_eq!(x.ty(), IrType::i32());
    assert_eq!(x.kind(), ValueKind::Local);

    let addr = Param::value("out", IrType::ptr_to(IrType::i32()));
    block.push(Instruction::store(IrType::i32(), Arc::clone(&x), addr));
    assert!(block.terminate(Terminator::ret_void()).is_none());

    assert!(block.has_terminator());
    assert_eq!(block.ty(), IrType::Label);
    assert_eq!(
        block.to_string(),
        "entry:\n  %x = add i32 %a, %b\n  store i32 %x, i32* %out\n  ret void\n"
    );
}

#[test]
fn test_predecessors() {
    let mut entry = BasicBlock::new("entry");
    entry.terminate(Terminator::cond_br(Constant::int(IrType::i1(), 1), "then", "join"));
    let mut then = BasicBlock::new("then");
    then.terminate(Terminator::br("join"));
    let mut join = BasicBlock::new("join");
    join.terminate(Terminator::ret_void());

    let preds = predecessors(&[entry, then, join]);
    assert_eq!(preds["entry"], Vec::<String>::new());
    assert_eq!(preds["then"], vec!["entry".to_string()]);
    assert_eq!(preds["join"], vec!["entry".to_string(), "then".to_string()]);
}

#[test]
fn test_terminator_rendering() {
    assert_eq!(Terminator::ret(i32_param("r")).to_string(), "ret i32 %r");
    assert_eq!(
        Terminator::cond_br(Param::value("c", IrType::i1()), "a", "b").to_string(),
        "br i1 %c, label %a, label %b"
    );
    assert_eq!(Terminator::Unreachable.to_string(), "unreachable");
    assert_eq!(Terminator::cond_br(Param::value("c", IrType::i1()), "a", "a").successors(), vec!["a"]);
}

#[test]
fn test_verify_operand_type_mismatch() {
    let add = Instruction::add(IrType::i32(), i32_param("a"), Param::value("b", IrType::i64()));
    let errors = verify_instruction(&add, &VerifyOptions::default());
    assert_eq!(
        errors,
        vec![VerifyError::OperandTypeMismatch {
            opcode: Opcode::Add,
            operand: "second operand".to_string(),
            expected: IrType::i32(),
            found: IrType::i64(),
        }]
    );
}

#[test]
fn test_verify_int_float_split() {
    let fadd = Instruction::fadd(IrType::i32(), i32_param("a"), i32_param("b"));
    let errors = verify_instruction(&fadd, &VerifyOptions::default());
    assert!(matches!(errors.as_slice(), [VerifyError::InvalidOperandType { opcode: Opcode::Fadd, .. }]));

    let xor = Instruction::xor(IrType::Float, Param::value("a", IrType::Float), Param::value("b", IrType::Float));
    let errors = verify_instruction(&xor, &VerifyOptions::default());
    assert!(matches!(errors.as_slice(), [VerifyError::InvalidOperandType { opcode: Opcode::Xor, .. }]));
}

#[test]
fn test_verify_memory_checks() {
    let options = VerifyOptions::default();

    let alloca = Instruction::from(AllocaInst::new(IrType::i32()).with_num_elems(0).with_align(3));
    assert_eq!(
        verify_instruction(&alloca, &options),
        vec![
            VerifyError::InvalidElementCount { num_elems: 0 },
            VerifyError::InvalidAlignment { opcode: Opcode::Alloca, align: 3 },
        ]
    );

    let gep = Instruction::getelementptr(IrType::i32(), Param::value("p", IrType::ptr_to(IrType::i32())), Vec::new());
    assert_eq!(verify_instruction(&gep, &options), vec![VerifyError::EmptyIndexList]);
    assert!(verify_instruction(&gep, &VerifyOptions::permissive()).is_empty());

    let load = Instruction::load(IrType::i32(), i32_param("not_a_pointer"));
    assert!(matches!(
        verify_instruction(&load, &options).as_slice(),
        [VerifyError::OperandTypeMismatch { opcode: Opcode::Load, .. }]
    ));
}

#[test]
fn test_verify_definition_as_operand() {
    let inner: ValueRef = Arc::new(Instruction::add(IrType::i32(), i32_param("a"), i32_param("b")));
    let outer = Instruction::mul(IrType::i32(), inner, i32_param("c"));

    let errors = verify_instruction(&outer, &VerifyOptions::default());
    assert_eq!(
        errors,
        vec![VerifyError::DefinitionAsOperand { opcode: Opcode::Mul, kind: ValueKind::Instruction }]
    );
    assert!(verify_instruction(&outer, &VerifyOptions::permissive()).is_empty());
}

#[test]
fn test_validated_constructor() {
    let good = Instruction::sdiv(IrType::i32(), i32_param("a"), i32_param("b"));
    assert!(good.validated(&VerifyOptions::default()).is_ok());

    let bad = Instruction::sdiv(IrType::Double, i32_param("a"), i32_param("b"));
    let err = bad.validated(&VerifyOptions::default()).unwrap_err();
    assert_eq!(err.code(), "invalid-operand-type");
}

#[test]
fn test_verify_options_json() {
    let options = VerifyOptions::from_json(r#"{ "allow_empty_gep": true }"#).unwrap();
    assert!(options.allow_empty_gep);
    assert!(options.check_operand_kinds);
    assert!(options.require_terminator);

    assert!(VerifyOptions::from_json("{ \"allow_empty_gep\": 3 }").is_err());
}
