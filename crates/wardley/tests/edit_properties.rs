use float_cmp::approx_eq;
use proptest::prelude::*;

use wardley::{
    MapBuilder,
    config::{AppConfig, EditConfig, MapConfig},
    geometry::{MapDimensions, Position, Region, maturity_to_x, x_to_maturity},
    links::resolve_links,
    pst::{ResizeHandle, resize},
    rename::rename,
    rewrite::{Target, Update, update_position},
    structure::MapElements,
};

const TEA_SHOP: &str = "\
title Tea Shop
anchor Business [0.95, 0.63]
component Cup of Tea [0.79, 0.61] label [19, -4]
component Tea [0.63, 0.81]
component Hot Water [0.52, 0.80]
component Kettle [0.43, 0.35] label [-57, 4]
evolve Kettle->Electric Kettle 0.62 label [16, 5]
component Power [0.1, 0.7] label [-27, 20]
evolve Power 0.89 label [-12, 21]
Business->Cup of Tea
Cup of Tea->Tea
Cup of Tea->Hot Water
Hot Water->Kettle; limited by
Kettle->Power
build Kettle
";

/// Line numbers whose content differs between two texts of equal length.
fn changed_lines(before: &str, after: &str) -> Vec<usize> {
    assert_eq!(before.lines().count(), after.lines().count());
    before
        .lines()
        .zip(after.lines())
        .enumerate()
        .filter(|(_, (a, b))| a != b)
        .map(|(index, _)| index + 1)
        .collect()
}

#[test]
fn test_rename_leaves_other_tokens() {
    let text = "component A [0.5,0.5]\ncomponent Aardvark [0.2, 0.3]\nA->C\nAardvark->A\n";
    let renamed = rename(text, 1, "A", "B").expect("renamed");
    assert_eq!(
        renamed,
        "component B [0.5,0.5]\ncomponent Aardvark [0.2, 0.3]\nB->C\nAardvark->B\n"
    );
}

#[test]
fn test_evolution_substitution() {
    let source = "component X [0.5, 0.2]\ncomponent Y [0.4, 0.6]\nevolve X 0.8\nX->Y\n";
    let outcome = wardley_parser::parse(source);
    let map = outcome.map();
    let elements = MapElements::new(map, Default::default());

    let substituted = resolve_links(map.links(), &elements, true);
    let link = substituted.iter().next().expect("resolved");
    assert!(link.start().evolved());
    assert!(approx_eq!(f64, link.start().maturity(), 0.8, ulps = 2));

    let plain = resolve_links(map.links(), &elements, false);
    let link = plain.iter().next().expect("resolved");
    assert!(!link.start().evolved());
    assert!(approx_eq!(f64, link.start().maturity(), 0.2, ulps = 2));
}

#[test]
fn test_evolution_substitution_without_space() {
    let source = "component X [0.5,0.2]\ncomponent Y [0.3, 0.6]\nevolveX 0.8\nX->Y\n";
    let outcome = wardley_parser::parse(source);
    assert_eq!(outcome.diagnostics().len(), 0);
    let map = outcome.map();
    let elements = MapElements::new(map, Default::default());
    assert_eq!(elements.evolved_components().count(), 1);

    let substituted = resolve_links(map.links(), &elements, true);
    let link = substituted.iter().next().expect("resolved");
    assert!(link.start().evolved());
    assert_eq!(link.start().line(), 3);
    assert!(approx_eq!(f64, link.start().maturity(), 0.8, ulps = 2));

    let edited = update_position(source, &Target::evolved("X"), Update::Maturity(0.9));
    assert_eq!(changed_lines(source, &edited), vec![3]);
    assert!(edited.contains("\nevolveX 0.90\n"));
}

#[test]
fn test_tea_shop_labels_move_in_place() {
    let builder = MapBuilder::new(AppConfig::new(MapConfig::default(), EditConfig::default()));
    let map = builder.parse(TEA_SHOP);
    let elements = builder.elements(&map);

    let electric = elements
        .evolved_components()
        .find(|element| element.name() == "Electric Kettle")
        .expect("evolved kettle");
    let edited = update_position(
        TEA_SHOP,
        &Target::from_element(electric),
        Update::Label(wardley::semantic::LabelOffset::new(20.0, -3.0)),
    );
    assert_eq!(changed_lines(TEA_SHOP, &edited), vec![7]);
    assert!(edited.contains("evolve Kettle->Electric Kettle 0.62 label [20, -3]\n"));
}

#[test]
fn test_evolved_power_keeps_its_base_line() {
    let edited = update_position(TEA_SHOP, &Target::evolved("Power"), Update::Maturity(0.95));
    assert_eq!(changed_lines(TEA_SHOP, &edited), vec![9]);
    assert!(edited.contains("evolve Power 0.95 label [-12, 21]\n"));
}

fn element_names() -> impl Strategy<Value = (&'static str, usize)> {
    prop_oneof![
        Just(("Business", 2)),
        Just(("Cup of Tea", 3)),
        Just(("Tea", 4)),
        Just(("Hot Water", 5)),
        Just(("Kettle", 6)),
        Just(("Power", 8)),
    ]
}

proptest! {
    #[test]
    fn prop_rewrite_is_local(
        (name, line) in element_names(),
        visibility in 0.0f64..=1.0,
        maturity in 0.0f64..=1.0,
    ) {
        let update = Update::Position(Position::new(visibility, maturity));
        let edited = update_position(TEA_SHOP, &Target::element(name), update);
        let changed = changed_lines(TEA_SHOP, &edited);
        prop_assert!(changed.is_empty() || changed == vec![line]);
    }

    #[test]
    fn prop_insert_is_idempotent(visibility in 0.0f64..=1.0, maturity in 0.0f64..=1.0) {
        let source = "component Kettle\nKettle->Power\n";
        let target = Target::element("Kettle");
        let update = Update::Position(Position::new(visibility, maturity));

        let once = update_position(source, &target, update);
        let twice = update_position(&once, &target, update);
        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(once.matches('[').count(), 1);
    }

    #[test]
    fn prop_transform_round_trip(maturity in 0.0f64..=1.0, width in 1.0f64..4000.0) {
        let back = x_to_maturity(maturity_to_x(maturity, width), width);
        prop_assert!((back - maturity).abs() < 0.01);
    }

    #[test]
    fn prop_pixel_position_round_trip(
        visibility in 0.0f64..=1.0,
        maturity in 0.0f64..=1.0,
    ) {
        let dimensions = MapDimensions::default();
        let position = Position::new(visibility, maturity);
        let back = dimensions.to_position(dimensions.to_point(position));
        prop_assert!((back.visibility() - visibility).abs() < 0.01);
        prop_assert!((back.maturity() - maturity).abs() < 0.01);
    }

    #[test]
    fn prop_resized_region_is_ordered(
        v1 in 0.0f64..=1.0,
        m1 in 0.0f64..=1.0,
        v2 in 0.0f64..=1.0,
        m2 in 0.0f64..=1.0,
        pointer_v in -0.5f64..=1.5,
        pointer_m in -0.5f64..=1.5,
        handle in prop_oneof![
            Just(ResizeHandle::TopLeft),
            Just(ResizeHandle::TopRight),
            Just(ResizeHandle::BottomLeft),
            Just(ResizeHandle::BottomRight),
            Just(ResizeHandle::Top),
            Just(ResizeHandle::Bottom),
            Just(ResizeHandle::Left),
            Just(ResizeHandle::Right),
        ],
    ) {
        let resized = resize(Region::new(v1, m1, v2, m2), handle, Position::new(pointer_v, pointer_m));
        prop_assert!(resized.maturity1() < resized.maturity2());
        prop_assert!(resized.visibility1() > resized.visibility2());
        for value in [resized.visibility1(), resized.maturity1(), resized.visibility2(), resized.maturity2()] {
            prop_assert!((0.0..=1.0).contains(&value));
        }
    }
}
