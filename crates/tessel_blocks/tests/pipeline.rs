//! End-to-end tests for the label pipeline: text in, descriptors out.

use tessel_blocks::descriptor::{CodePort, INPUT_PORT_ID};
use tessel_blocks::{
    anchor_offset, check_unique, copy_pins, derive_pins, parse_port_label, BlockBuilder,
    BlockError, BlockKind, EditOutcome, Footprint, Grammar, PortOptions, Position, Wire, WireEnd,
};

#[test]
fn bus_label_round_trips() {
    let label = parse_port_label("n[7:0]", Grammar::Global).unwrap();
    assert_eq!(label.name, "n");
    assert_eq!(label.size(), 8);
    assert_eq!(format!("{}{}", label.name, label.range_str()), "n[7:0]");
}

#[test]
fn scalar_label_has_no_range() {
    for text in ["n", "clk", "LED 0", "  x  "] {
        let label = parse_port_label(text, Grammar::Global).unwrap();
        assert_eq!(label.size(), 1, "{text}");
        assert!(label.range.is_none(), "{text}");
    }
}

#[test]
fn pins_match_label_size() {
    for text in ["a", "a[0]", "a[3:0]", "a[0:3]", "a[31:16]"] {
        let label = parse_port_label(text, Grammar::Global).unwrap();
        let pins = derive_pins(&label);
        assert_eq!(pins.len() as u32, label.size(), "{text}");
        assert_eq!(pins, derive_pins(&label), "{text}");
    }
}

#[test]
fn copying_equal_pins_is_idempotent() {
    let label = parse_port_label("d[3:0]", Grammar::Global).unwrap();
    let old = derive_pins(&label);
    let mut new = old.clone();
    copy_pins(&old, &mut new);
    assert_eq!(new, old);
    copy_pins(&old, &mut new);
    assert_eq!(new, old);
}

#[test]
fn uniqueness() {
    assert_eq!(
        check_unique(["a", "b", "a"]),
        Err(BlockError::DuplicateName { name: "a".into() })
    );
    assert!(check_unique(["a", "b", "c"]).is_ok());
}

#[test]
fn code_without_ports_fails_even_with_params() {
    let err = BlockBuilder::default().new_code("", "", "N, M").unwrap_err();
    assert_eq!(err, BlockError::InsufficientPorts);
}

#[test]
fn geometry_offsets() {
    assert_eq!(anchor_offset(Footprint::physical(1), Footprint::physical(4), 8), -48);
    assert_eq!(
        anchor_offset(Footprint::virtual_pins(1), Footprint::virtual_pins(8), 8),
        0
    );
}

#[test]
fn sum_wire_follows_matching_width() {
    let builder = BlockBuilder::default();
    let mut block = builder.new_code("a[3:0], b[3:0]", "sum[3:0]", "").unwrap();
    block.id = Some("adder".into());
    let wire = || Wire::new(WireEnd::new("adder", "sum"), WireEnd::new("out", "in"), 4);

    let EditOutcome::Replace { wires, .. } = builder
        .edit_code(&block, "a[3:0], b[3:0]", "sum[3:0], carry", "", vec![wire()])
        .unwrap()
    else {
        panic!("code edits always replace");
    };
    assert_eq!(wires.kept, vec![wire()]);

    let EditOutcome::Replace { wires, .. } = builder
        .edit_code(&block, "a, b", "sum", "", vec![wire()])
        .unwrap()
    else {
        panic!("code edits always replace");
    };
    assert!(wires.kept.is_empty());
    assert_eq!(wires.dropped, vec![wire()]);
}

#[test]
fn creates_sixteen_bit_input() {
    let blocks = BlockBuilder::default()
        .new_inputs("addr[15:0]", PortOptions::default())
        .unwrap();
    assert_eq!(blocks.len(), 1);
    let block = &blocks[0];
    assert_eq!(block.type_name(), "basic.input");
    assert_eq!(block.ports.right.len(), 1);
    assert_eq!(block.ports.right[0].id, INPUT_PORT_ID);
    assert_eq!(block.ports.right[0].size, 16);
    assert!(block.ports.left.is_empty());
    let BlockKind::Input(data) = &block.kind else {
        panic!("expected an input block");
    };
    assert_eq!(data.pins.len(), 16);
    assert!(data.pins.iter().all(|pin| pin.value.is_none()));
}

#[test]
fn duplicated_code_inputs_fail_before_pins() {
    let err = BlockBuilder::default()
        .new_code("a[1:0], a[1:0]", "", "")
        .unwrap_err();
    assert_eq!(err, BlockError::DuplicateName { name: "a".into() });
}

#[test]
fn edit_then_serialize() {
    let builder = BlockBuilder::default();
    let mut block = builder
        .new_inputs("d", PortOptions::default())
        .unwrap()
        .remove(0);
    block.id = Some("i1".into());
    block.position = Position::new(0, 100);

    let outcome = builder
        .edit_port(&block, "d[3:0]", false, false, Vec::new())
        .unwrap();
    let new = outcome.block().unwrap();
    assert_eq!(new.position, Position::new(0, 52));

    let json = serde_json::to_value(new).unwrap();
    assert_eq!(json["kind"]["type"], "basic.input");
    assert_eq!(json["kind"]["data"]["range"], "[3:0]");
    assert_eq!(json["ports"]["right"][0]["size"], 4);
}

#[test]
fn code_ports_serialize_with_short_keys() {
    let block = BlockBuilder::default().new_code("a", "y[1:0]", "").unwrap();
    let json = serde_json::to_value(&block).unwrap();
    let outputs: Vec<CodePort> =
        serde_json::from_value(json["kind"]["data"]["ports"]["out"].clone()).unwrap();
    assert_eq!(outputs[0].size, 2);
    assert_eq!(json["kind"]["data"]["ports"]["in"][0]["name"], "a");
}
