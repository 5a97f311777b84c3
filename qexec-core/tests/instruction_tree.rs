//! Instruction tree construction, traversal and serialization

use qexec_core::{Composite, GateInstruction, GateKind, Instruction, Parameter, WalkMode};

fn ansatz_with_measurements() -> Composite {
    let mut ansatz = Composite::new("ansatz");
    ansatz.ry(0, 0.25).rx(1, 1.5);
    ansatz.cnot(0, 1).unwrap();

    let mut basis = Composite::new("x-basis");
    basis.h(0).h(1);

    let mut kernel = Composite::new("kernel");
    kernel.push(ansatz).push(basis);
    kernel.measure(0).measure(1);
    kernel
}

#[test]
fn test_leaf_sequence_spans_nested_composites() {
    let kernel = ansatz_with_measurements();
    let leaves = kernel.flatten();

    assert_eq!(leaves.len(), 7);
    assert_eq!(leaves[0].kind(), GateKind::RotationY);
    assert_eq!(leaves[2].kind(), GateKind::ControlledNot);
    assert!(leaves[5].kind().is_measurement());
    assert_eq!(kernel.required_qubits(), 2);
}

#[test]
fn test_all_mode_yields_composites_before_children() {
    let kernel = ansatz_with_measurements();
    let first_two: Vec<bool> = kernel
        .walk(WalkMode::All)
        .take(2)
        .map(Instruction::is_composite)
        .collect();
    assert_eq!(first_two, vec![true, false]);
}

#[test]
fn test_json_roundtrip_keeps_structure() {
    let mut kernel = ansatz_with_measurements();
    kernel.children_mut()[1].set_enabled(false);

    let json = serde_json::to_string(&kernel).unwrap();
    let restored: Composite = serde_json::from_str(&json).unwrap();

    assert_eq!(restored, kernel);
    assert_eq!(restored.leaves().count(), 5);
}

#[test]
fn test_deserialize_minimal_gate() {
    let json = r#"{"name":"k","children":[
        {"type":"gate","kind":"RotationZ","qubits":[0],"parameters":[1]}
    ]}"#;
    let kernel: Composite = serde_json::from_str(json).unwrap();

    let gate: &GateInstruction = kernel.leaves().next().unwrap();
    assert!(gate.is_enabled());
    assert_eq!(gate.parameters(), &[Parameter::Int(1)]);
    assert_eq!(gate.angle(0).unwrap(), 1.0);
}
